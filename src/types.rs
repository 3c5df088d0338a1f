use serde::{Deserialize, Serialize};

/// Opaque ID type for players
pub type PlayerId = String;

/// Fewest names the setup form accepts
pub const MIN_PLAYERS: usize = 3;
/// Most names the setup form accepts
pub const MAX_PLAYERS: usize = 12;

/// How many recently used secret words the session remembers
pub const RECENT_WORDS_CAP: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Setup,
    Loading,
    Reveal,
    Playing,
    /// End-of-round summary where every role is shown
    Finished,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Cs,
}

impl Language {
    /// Instruction used in generation prompts so the word comes back in this language
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            Language::En => "Output MUST be in English language.",
            Language::Cs => "Output MUST be in Czech language (Čeština).",
        }
    }

    /// Text shown to an imposter instead of the secret word
    pub fn imposter_instructions(&self) -> &'static str {
        match self {
            Language::En => {
                "You don't know the secret word. Listen closely, blend in and try to work it out."
            }
            Language::Cs => {
                "Tajné slovo neznáš. Pozorně poslouchej, nenápadně zapadni a zkus ho uhodnout."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_imposter: bool,
    /// Set once the player has acknowledged their role card. Advisory only.
    pub has_seen_role: bool,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name: name.into(),
            is_imposter: false,
            has_seen_role: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    pub imposter_count: usize,
    pub randomize_imposters: bool,
    pub hint_visible: bool,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub language: Language,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            imposter_count: 1,
            randomize_imposters: false,
            hint_visible: false,
            topic: String::new(),
            language: Language::En,
        }
    }
}

/// Largest imposter count the setup form offers for a roster of `player_count`
pub fn max_imposters(player_count: usize) -> usize {
    (player_count.saturating_sub(1) / 2).max(1)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretData {
    pub word: String,
    pub category: String,
}

impl SecretData {
    pub fn new(word: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            category: category.into(),
        }
    }
}

/// Position of the reveal sequencer: which player holds the device and
/// whether their card is currently flipped
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevealState {
    pub current_player_index: usize,
    pub is_card_flipped: bool,
}
