//! Private per-player role reveal
//!
//! The device is passed around the table. For player `i` the card starts
//! hidden; the player confirms to flip it, reads it, then acknowledges to hand
//! the device on. Acknowledging the last player exhausts the sequencer.

use serde::{Deserialize, Serialize};

use super::GameError;
use crate::types::{Language, Player, RevealState, SecretData};

/// What a player sees once their card is flipped
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleCard {
    Citizen {
        word: String,
        category: String,
    },
    Imposter {
        message: String,
        /// Category, only when hints are enabled for the round
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
}

impl RoleCard {
    pub fn for_player(
        player: &Player,
        secret: &SecretData,
        hint_visible: bool,
        language: Language,
    ) -> Self {
        if player.is_imposter {
            RoleCard::Imposter {
                message: language.imposter_instructions().to_string(),
                hint: hint_visible.then(|| secret.category.clone()),
            }
        } else {
            RoleCard::Citizen {
                word: secret.word.clone(),
                category: secret.category.clone(),
            }
        }
    }
}

/// Outcome of handing the device on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealProgress {
    /// Next player's card, hidden
    Next(usize),
    /// Everyone has seen their role
    Exhausted,
}

#[derive(Debug, Clone, Default)]
pub struct RevealSequencer {
    state: RevealState,
    player_count: usize,
    exhausted: bool,
}

impl RevealSequencer {
    /// Start at `hidden(0)`
    pub fn new(player_count: usize) -> Self {
        Self {
            state: RevealState::default(),
            player_count,
            exhausted: player_count == 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.state.current_player_index
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn is_shown(&self) -> bool {
        self.state.is_card_flipped
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// `hidden(i) -> shown(i)`. Confirming an already flipped card is a no-op.
    pub fn confirm(&mut self) -> Result<usize, GameError> {
        if self.exhausted {
            return Err(GameError::RevealExhausted);
        }
        self.state.is_card_flipped = true;
        Ok(self.state.current_player_index)
    }

    /// `shown(i) -> hidden(i + 1)`, or exhaustion after the last player
    pub fn acknowledge(&mut self) -> Result<RevealProgress, GameError> {
        if self.exhausted {
            return Err(GameError::RevealExhausted);
        }
        if !self.state.is_card_flipped {
            return Err(GameError::CardNotShown);
        }

        let next = self.state.current_player_index + 1;
        if next >= self.player_count {
            self.state.is_card_flipped = false;
            self.exhausted = true;
            return Ok(RevealProgress::Exhausted);
        }

        self.state = RevealState {
            current_player_index: next,
            is_card_flipped: false,
        };
        Ok(RevealProgress::Next(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visits_every_player_once_in_order() {
        let mut seq = RevealSequencer::new(4);
        assert_eq!(seq.player_count(), 4);
        let mut visited = Vec::new();

        loop {
            assert!(!seq.is_shown(), "each player starts hidden");
            visited.push(seq.confirm().unwrap());
            assert!(seq.is_shown());
            match seq.acknowledge().unwrap() {
                RevealProgress::Next(i) => assert_eq!(i, visited.len()),
                RevealProgress::Exhausted => break,
            }
        }

        assert_eq!(visited, vec![0, 1, 2, 3]);
        assert!(seq.is_exhausted());
        assert_eq!(seq.current_index(), 3, "never moves past the last player");
    }

    #[test]
    fn test_acknowledge_requires_flipped_card() {
        let mut seq = RevealSequencer::new(3);
        assert!(matches!(seq.acknowledge(), Err(GameError::CardNotShown)));

        seq.confirm().unwrap();
        seq.confirm().unwrap();
        assert_eq!(seq.acknowledge().unwrap(), RevealProgress::Next(1));
        assert!(matches!(seq.acknowledge(), Err(GameError::CardNotShown)));
    }

    #[test]
    fn test_exhausted_sequencer_rejects_actions() {
        let mut seq = RevealSequencer::new(1);
        seq.confirm().unwrap();
        assert_eq!(seq.acknowledge().unwrap(), RevealProgress::Exhausted);
        assert!(matches!(seq.confirm(), Err(GameError::RevealExhausted)));
        assert!(matches!(seq.acknowledge(), Err(GameError::RevealExhausted)));

        let mut empty = RevealSequencer::new(0);
        assert!(empty.is_exhausted());
        assert!(empty.confirm().is_err());
    }

    #[test]
    fn test_role_cards() {
        let secret = SecretData::new("Lighthouse", "Places");
        let citizen = Player::new("Alice");
        let mut imposter = Player::new("Bob");
        imposter.is_imposter = true;

        assert_eq!(
            RoleCard::for_player(&citizen, &secret, false, Language::En),
            RoleCard::Citizen {
                word: "Lighthouse".to_string(),
                category: "Places".to_string(),
            }
        );

        match RoleCard::for_player(&imposter, &secret, false, Language::En) {
            RoleCard::Imposter { message, hint } => {
                assert!(!message.contains("Lighthouse"));
                assert!(hint.is_none());
            }
            other => panic!("expected imposter card, got {:?}", other),
        }

        match RoleCard::for_player(&imposter, &secret, true, Language::Cs) {
            RoleCard::Imposter { message, hint } => {
                assert_eq!(message, Language::Cs.imposter_instructions());
                assert_eq!(hint.as_deref(), Some("Places"));
            }
            other => panic!("expected imposter card, got {:?}", other),
        }
    }

    #[test]
    fn test_imposter_card_never_serializes_word() {
        let secret = SecretData::new("Lighthouse", "Places");
        let mut imposter = Player::new("Bob");
        imposter.is_imposter = true;

        let json = serde_json::to_string(&RoleCard::for_player(
            &imposter,
            &secret,
            false,
            Language::En,
        ))
        .unwrap();
        assert!(!json.contains("Lighthouse"));
        assert!(!json.contains("Places"));
        assert!(json.contains("\"role\":\"imposter\""));
    }
}
