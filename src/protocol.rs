use crate::state::RoleCard;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Version string sent in the welcome message
pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Submit the setup form
    StartGame {
        names: Vec<String>,
        settings: GameSettings,
    },
    /// Current player is ready to look at their card
    RevealRole,
    /// Current player has read their card and hands the device on
    PassDevice,
    /// Discussion is over, show every role
    RevealIdentities,
    Restart,
    /// Ask for the current screen (e.g., after a reconnect)
    GetState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        screen: ScreenView,
        server_now: String,
    },
    /// Sent whenever the phase or reveal position changes
    Screen {
        screen: ScreenView,
        server_now: String,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn screen(screen: ScreenView) -> Self {
        ServerMessage::Screen {
            screen,
            server_now: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// One player's role in the end-of-round summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleSummary {
    pub id: PlayerId,
    pub name: String,
    pub is_imposter: bool,
}

/// What the shared screen shows. Each variant carries only what its phase
/// is allowed to reveal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenView {
    Setup {
        prefill_names: Vec<String>,
        settings: GameSettings,
        min_players: usize,
        max_players: usize,
    },
    Loading,
    Reveal {
        player_index: usize,
        player_count: usize,
        player_name: String,
        /// Present only while the card is flipped
        #[serde(skip_serializing_if = "Option::is_none")]
        card: Option<RoleCard>,
    },
    Playing {
        players: Vec<String>,
        starting_player: String,
    },
    Finished {
        secret: SecretData,
        players: Vec<RoleSummary>,
        starting_player: String,
    },
}

impl ScreenView {
    pub fn phase(&self) -> GamePhase {
        match self {
            ScreenView::Setup { .. } => GamePhase::Setup,
            ScreenView::Loading => GamePhase::Loading,
            ScreenView::Reveal { .. } => GamePhase::Reveal,
            ScreenView::Playing { .. } => GamePhase::Playing,
            ScreenView::Finished { .. } => GamePhase::Finished,
        }
    }
}
