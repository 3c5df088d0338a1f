use super::*;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use std::time::Instant;

const SYSTEM_PROMPT: &str = "You pick secret words for a party game played around one phone. \
    Reply only with the requested JSON object.";

/// OpenAI chat completions generator using structured JSON output
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider with the given API key and model
    pub fn new(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);

        Self { client, model }
    }
}

#[async_trait]
impl SecretGenerator for OpenAiProvider {
    async fn generate(&self, request: SecretRequest) -> SecretResult<GenerateResponse> {
        let start = Instant::now();

        let mut req_builder = CreateChatCompletionRequestArgs::default();
        req_builder
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| SecretError::ApiError(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(request.prompt.as_str())
                    .build()
                    .map_err(|e| SecretError::ApiError(e.to_string()))?
                    .into(),
            ])
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some("A secret word and its category".to_string()),
                    name: "secret".to_string(),
                    schema: Some(secret_schema()),
                    strict: Some(true),
                },
            });

        if let Some(max_tokens) = request.max_tokens {
            req_builder.max_tokens(max_tokens);
        }

        let chat_request = req_builder
            .build()
            .map_err(|e| SecretError::ApiError(e.to_string()))?;

        let response =
            tokio::time::timeout(request.timeout, self.client.chat().create(chat_request))
                .await
                .map_err(|_| SecretError::Timeout(request.timeout))?
                .map_err(|e| SecretError::ApiError(e.to_string()))?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(SecretError::EmptyPayload)?;

        Ok(GenerateResponse {
            text,
            metadata: ResponseMetadata {
                provider: "openai".to_string(),
                model: self.model.clone(),
                latency_ms: start.elapsed().as_millis() as u64,
            },
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Only run with actual API key
    async fn test_openai_generate() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let provider = OpenAiProvider::new(api_key, "gpt-4o-mini".to_string());

        let request = SecretRequest {
            prompt: build_prompt("Fruits", &[], Language::En),
            max_tokens: Some(100),
            timeout: Duration::from_secs(30),
        };

        let response = provider.generate(request).await.unwrap();
        let secret = parse_secret(&response.text).unwrap();

        assert!(!secret.word.is_empty());
        assert_eq!(response.metadata.provider, "openai");
        println!("Generated secret: {:?}", secret);
    }
}
