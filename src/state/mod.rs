mod game;
pub mod reveal;
pub mod roles;
pub mod session;
pub mod setup;
mod view;

use crate::protocol::ServerMessage;
use crate::secret::SecretProvider;
use crate::types::GamePhase;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

pub use reveal::{RevealProgress, RevealSequencer, RoleCard};
pub use roles::{assign_roles, Assignment};
pub use session::GameSession;
pub use setup::validate_setup;

/// Errors raised by the game controller
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Invalid phase transition from {from:?} to {to:?}")]
    InvalidTransition { from: GamePhase, to: GamePhase },

    #[error("Action requires phase {expected:?}, game is in {actual:?}")]
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },

    #[error("A game is already starting")]
    StartInProgress,

    #[error("{0}")]
    InvalidSetup(String),

    #[error("Cannot start a game without players")]
    EmptyRoster,

    #[error("Failed to generate game data: {0}")]
    SecretUnavailable(String),

    #[error("No secret for the current round")]
    MissingSecret,

    #[error("Reveal your role before passing the device")]
    CardNotShown,

    #[error("Every player has already seen their role")]
    RevealExhausted,
}

impl GameError {
    /// Stable code sent to clients alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidTransition { .. } | GameError::WrongPhase { .. } => {
                "INVALID_PHASE"
            }
            GameError::StartInProgress => "START_IN_PROGRESS",
            GameError::InvalidSetup(_) => "INVALID_SETUP",
            GameError::EmptyRoster
            | GameError::SecretUnavailable(_)
            | GameError::MissingSecret => "GAME_START_FAILED",
            GameError::CardNotShown | GameError::RevealExhausted => "REVEAL_FAILED",
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<GameSession>>,
    pub secrets: Arc<SecretProvider>,
    /// Screen updates for every connected client
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    pub fn new(secrets: SecretProvider) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            session: Arc::new(RwLock::new(GameSession::new())),
            secrets: Arc::new(secrets),
            broadcast: tx,
        }
    }

    /// Subscribe to screen updates
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.broadcast.subscribe()
    }

    /// Send a message to every connected client
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // No receivers connected is fine
        let _ = self.broadcast.send(msg);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SecretProvider::fallback_only())
    }
}
