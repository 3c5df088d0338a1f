use super::*;
use serde::Serialize;
use std::time::Instant;

/// Ollama generator using the non-streaming generate endpoint
pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the given base URL and model
    pub fn new(base_url: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build Ollama HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client,
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    /// JSON schema constraining the reply
    format: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[async_trait]
impl SecretGenerator for OllamaProvider {
    async fn generate(&self, request: SecretRequest) -> SecretResult<GenerateResponse> {
        let start = Instant::now();

        let ollama_request = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: request.prompt,
            stream: false,
            format: secret_schema(),
            options: request.max_tokens.map(|num_predict| OllamaOptions {
                num_predict: Some(num_predict),
            }),
        };

        let url = format!("{}/api/generate", self.base_url);

        let response = tokio::time::timeout(
            request.timeout,
            self.client.post(&url).json(&ollama_request).send(),
        )
        .await
        .map_err(|_| SecretError::Timeout(request.timeout))?
        .map_err(|e| SecretError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SecretError::ApiError(format!(
                "Ollama API returned status: {}",
                response.status()
            )));
        }

        let ollama_response: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| SecretError::ParseError(e.to_string()))?;

        Ok(GenerateResponse {
            text: ollama_response.response,
            metadata: ResponseMetadata {
                provider: "ollama".to_string(),
                model: self.model.clone(),
                latency_ms: start.elapsed().as_millis() as u64,
            },
        })
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_schema_format() {
        let request = OllamaGenerateRequest {
            model: "llama3.2".to_string(),
            prompt: "pick a word".to_string(),
            stream: false,
            format: secret_schema(),
            options: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["format"]["required"], serde_json::json!(["word", "category"]));
        assert!(json.get("options").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        // Port 9 (discard) is essentially never an HTTP server
        let provider =
            OllamaProvider::new("http://127.0.0.1:9/".to_string(), "llama3.2".to_string());
        let request = SecretRequest {
            prompt: build_prompt("", &[], Language::En),
            max_tokens: Some(50),
            timeout: Duration::from_secs(2),
        };

        assert!(provider.generate(request).await.is_err());
    }

    #[tokio::test]
    #[ignore] // Only run with Ollama running locally
    async fn test_ollama_generate() {
        let provider =
            OllamaProvider::new("http://localhost:11434".to_string(), "llama3.2".to_string());

        let request = SecretRequest {
            prompt: build_prompt("", &[], Language::Cs),
            max_tokens: Some(100),
            timeout: Duration::from_secs(30),
        };

        let response = provider.generate(request).await.unwrap();
        let secret = parse_secret(&response.text).unwrap();

        assert!(!secret.word.is_empty());
        assert_eq!(response.metadata.provider, "ollama");
        println!("Generated secret: {:?}", secret);
    }
}
