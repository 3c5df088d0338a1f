//! WebSocket message dispatch
//!
//! Successful actions are announced to every screen through the broadcast
//! channel, so the direct reply is only used for errors and state requests.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::{AppState, GameError};
use crate::types::GamePhase;
use std::sync::Arc;

fn error_message(e: GameError) -> ServerMessage {
    ServerMessage::Error {
        code: e.code().to_string(),
        msg: e.to_string(),
    }
}

/// Map a controller result to the direct reply for the requesting client
fn reply<T>(result: Result<T, GameError>) -> Option<ServerMessage> {
    match result {
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Rejected action: {}", e);
            Some(error_message(e))
        }
    }
}

/// Handle client messages and return optional response
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        ClientMessage::StartGame { names, settings } => {
            tracing::info!(
                "Start requested: {} names, {} imposter(s), randomize={}, language={:?}",
                names.len(),
                settings.imposter_count,
                settings.randomize_imposters,
                settings.language
            );
            reply(state.start_game(names, settings).await)
        }

        ClientMessage::RevealRole => reply(state.reveal_role().await),

        ClientMessage::PassDevice => {
            let result = state.pass_device().await;
            if result.is_ok() && state.phase().await == GamePhase::Playing {
                tracing::info!("All roles revealed, discussion open");
            }
            reply(result)
        }

        ClientMessage::RevealIdentities => reply(state.reveal_identities().await),

        ClientMessage::Restart => reply(state.restart().await),

        ClientMessage::GetState => Some(ServerMessage::screen(state.screen().await)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameSettings;

    #[tokio::test]
    async fn test_errors_carry_codes() {
        let state = Arc::new(AppState::default());

        match handle_message(ClientMessage::RevealRole, &state).await {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "INVALID_PHASE"),
            other => panic!("expected error, got {:?}", other),
        }

        let start = ClientMessage::StartGame {
            names: vec!["Solo".to_string()],
            settings: GameSettings::default(),
        };
        match handle_message(start, &state).await {
            Some(ServerMessage::Error { code, msg }) => {
                assert_eq!(code, "INVALID_SETUP");
                assert!(msg.contains("at least"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_state_replies_with_screen() {
        let state = Arc::new(AppState::default());
        match handle_message(ClientMessage::GetState, &state).await {
            Some(ServerMessage::Screen { screen, .. }) => {
                assert_eq!(screen.phase(), GamePhase::Setup)
            }
            other => panic!("expected screen, got {:?}", other),
        }
    }
}
