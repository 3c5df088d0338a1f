//! The game session and its phase machine
//!
//! `GameSession` owns everything about the current game. Only the controller
//! methods here mutate it; the async layer in `game.rs` only sequences them
//! around the secret provider call.

use rand::Rng;

use super::reveal::{RevealProgress, RevealSequencer, RoleCard};
use super::roles::assign_roles;
use super::GameError;
use crate::types::*;

/// What the loading phase needs from the session to fetch a secret
#[derive(Debug, Clone)]
pub struct LoadingTicket {
    pub topic: String,
    pub recent_words: Vec<String>,
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    pub id: String,
    pub round_no: u32,
    phase: GamePhase,
    settings: GameSettings,
    players: Vec<Player>,
    secret: Option<SecretData>,
    reveal: RevealSequencer,
    starting_player_index: usize,
    /// Newest first, capped at `RECENT_WORDS_CAP`
    recent_words: Vec<String>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            round_no: 0,
            phase: GamePhase::Setup,
            settings: GameSettings::default(),
            players: Vec::new(),
            secret: None,
            reveal: RevealSequencer::default(),
            starting_player_index: 0,
            recent_words: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn secret(&self) -> Option<&SecretData> {
        self.secret.as_ref()
    }

    pub fn reveal(&self) -> &RevealSequencer {
        &self.reveal
    }

    pub fn recent_words(&self) -> &[String] {
        &self.recent_words
    }

    pub fn starting_player(&self) -> Option<&Player> {
        self.players.get(self.starting_player_index)
    }

    /// Names to pre-fill the setup form with
    pub fn prefill_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    /// Check if a phase transition is valid
    pub fn is_valid_phase_transition(from: GamePhase, to: GamePhase) -> bool {
        use GamePhase::*;

        matches!(
            (from, to),
            (Setup, Loading)
                | (Loading, Reveal)
                // Game start failed
                | (Loading, Setup)
                | (Reveal, Playing)
                | (Playing, Finished)
                // Restart
                | (Playing, Setup)
                | (Finished, Setup)
        )
    }

    fn transition(&mut self, to: GamePhase) -> Result<(), GameError> {
        if !Self::is_valid_phase_transition(self.phase, to) {
            return Err(GameError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        tracing::info!("Game {} phase {:?} -> {:?}", self.id, self.phase, to);
        self.phase = to;
        Ok(())
    }

    fn require_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Setup -> Loading. Takes already validated names.
    pub fn begin_loading(
        &mut self,
        names: Vec<String>,
        settings: GameSettings,
    ) -> Result<LoadingTicket, GameError> {
        if self.phase == GamePhase::Loading {
            return Err(GameError::StartInProgress);
        }
        self.transition(GamePhase::Loading)?;

        self.players = names.into_iter().map(Player::new).collect();
        self.settings = settings;
        self.secret = None;
        self.reveal = RevealSequencer::default();
        self.starting_player_index = 0;

        Ok(LoadingTicket {
            topic: self.settings.topic.clone(),
            recent_words: self.recent_words.clone(),
            language: self.settings.language,
        })
    }

    /// Loading -> Reveal once the secret is known
    pub fn complete_loading<R: Rng + ?Sized>(
        &mut self,
        secret: SecretData,
        rng: &mut R,
    ) -> Result<(), GameError> {
        self.require_phase(GamePhase::Loading)?;
        if self.players.is_empty() {
            return Err(GameError::EmptyRoster);
        }

        let assignment = assign_roles(std::mem::take(&mut self.players), &self.settings, rng);
        tracing::info!(
            "Assigned {} imposter(s) among {} players",
            assignment.imposter_count,
            assignment.players.len()
        );

        self.remember_word(&secret.word);
        self.secret = Some(secret);
        self.reveal = RevealSequencer::new(assignment.players.len());
        self.starting_player_index = assignment.starting_player_index;
        self.players = assignment.players;
        self.round_no += 1;

        self.transition(GamePhase::Reveal)
    }

    /// Loading -> Setup after a failed start. The roster names are kept.
    pub fn fail_loading(&mut self) -> Result<(), GameError> {
        self.transition(GamePhase::Setup)?;
        self.clear_round();
        Ok(())
    }

    /// Flip the current player's card
    pub fn reveal_role(&mut self) -> Result<RoleCard, GameError> {
        self.require_phase(GamePhase::Reveal)?;
        let index = self.reveal.confirm()?;
        self.current_card(index)
    }

    /// Card for the player at `index`, given the round's secret and settings
    fn current_card(&self, index: usize) -> Result<RoleCard, GameError> {
        let player = self.players.get(index).ok_or(GameError::EmptyRoster)?;
        let secret = self.secret.as_ref().ok_or(GameError::MissingSecret)?;
        Ok(RoleCard::for_player(
            player,
            secret,
            self.settings.hint_visible,
            self.settings.language,
        ))
    }

    /// Card currently displayed, if the card is flipped
    pub fn shown_card(&self) -> Option<RoleCard> {
        if self.phase != GamePhase::Reveal || !self.reveal.is_shown() {
            return None;
        }
        self.current_card(self.reveal.current_index()).ok()
    }

    /// Hand the device to the next player; after the last one, open discussion
    pub fn pass_device(&mut self) -> Result<RevealProgress, GameError> {
        self.require_phase(GamePhase::Reveal)?;
        let index = self.reveal.current_index();
        let progress = self.reveal.acknowledge()?;

        if let Some(player) = self.players.get_mut(index) {
            player.has_seen_role = true;
        }

        if progress == RevealProgress::Exhausted {
            self.transition(GamePhase::Playing)?;
        }
        Ok(progress)
    }

    /// Playing -> Finished: show everyone's role
    pub fn reveal_identities(&mut self) -> Result<(), GameError> {
        self.transition(GamePhase::Finished)
    }

    /// Back to Setup. Clears the secret and roles but keeps the names.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.transition(GamePhase::Setup)?;
        self.clear_round();
        Ok(())
    }

    fn clear_round(&mut self) {
        self.secret = None;
        self.reveal = RevealSequencer::default();
        self.starting_player_index = 0;
        for player in self.players.iter_mut() {
            player.is_imposter = false;
            player.has_seen_role = false;
        }
    }

    fn remember_word(&mut self, word: &str) {
        self.recent_words.insert(0, word.to_string());
        self.recent_words.truncate(RECENT_WORDS_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn started(list: &[&str], settings: GameSettings) -> GameSession {
        let mut session = GameSession::new();
        session.begin_loading(names(list), settings).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        session
            .complete_loading(SecretData::new("Lighthouse", "Places"), &mut rng)
            .unwrap();
        session
    }

    #[test]
    fn test_phase_transition_table() {
        use GamePhase::*;
        assert!(GameSession::is_valid_phase_transition(Setup, Loading));
        assert!(GameSession::is_valid_phase_transition(Loading, Setup));
        assert!(GameSession::is_valid_phase_transition(Finished, Setup));
        assert!(!GameSession::is_valid_phase_transition(Setup, Reveal));
        assert!(!GameSession::is_valid_phase_transition(Reveal, Setup));
        assert!(!GameSession::is_valid_phase_transition(Setup, Finished));
        assert!(!GameSession::is_valid_phase_transition(Finished, Playing));
    }

    #[test]
    fn test_second_start_while_loading_is_rejected() {
        let mut session = GameSession::new();
        session
            .begin_loading(names(&["A", "B", "C"]), GameSettings::default())
            .unwrap();
        let result = session.begin_loading(names(&["D", "E", "F"]), GameSettings::default());
        assert!(matches!(result, Err(GameError::StartInProgress)));
        assert_eq!(session.prefill_names(), names(&["A", "B", "C"]));
    }

    #[test]
    fn test_full_round() {
        let mut session = started(&["A", "B", "C", "D"], GameSettings::default());
        assert_eq!(session.phase(), GamePhase::Reveal);
        assert_eq!(session.round_no, 1);
        assert_eq!(session.players().iter().filter(|p| p.is_imposter).count(), 1);
        assert_eq!(session.recent_words(), &["Lighthouse".to_string()]);

        let order: Vec<String> = session.players().iter().map(|p| p.id.clone()).collect();
        let mut visited = Vec::new();
        loop {
            assert!(session.shown_card().is_none());
            let card = session.reveal_role().unwrap();
            let player = &session.players()[session.reveal().current_index()];
            visited.push(player.id.clone());
            assert_eq!(matches!(card, RoleCard::Imposter { .. }), player.is_imposter);
            assert_eq!(session.shown_card(), Some(card));

            if session.pass_device().unwrap() == RevealProgress::Exhausted {
                break;
            }
        }

        assert_eq!(visited, order);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(session.players().iter().all(|p| p.has_seen_role));
        assert!(session.starting_player().is_some());

        session.reveal_identities().unwrap();
        assert_eq!(session.phase(), GamePhase::Finished);

        session.restart().unwrap();
        assert_eq!(session.phase(), GamePhase::Setup);
        assert!(session.secret().is_none());
        assert!(session.players().iter().all(|p| !p.is_imposter && !p.has_seen_role));
        let mut kept = session.prefill_names();
        kept.sort();
        assert_eq!(kept, names(&["A", "B", "C", "D"]));
    }

    #[test]
    fn test_restart_directly_from_playing() {
        let mut session = started(&["A", "B", "C"], GameSettings::default());
        for _ in 0..3 {
            session.reveal_role().unwrap();
            session.pass_device().unwrap();
        }
        assert_eq!(session.phase(), GamePhase::Playing);
        session.restart().unwrap();
        assert_eq!(session.phase(), GamePhase::Setup);
    }

    #[test]
    fn test_actions_outside_their_phase_fail() {
        let mut session = GameSession::new();
        assert!(matches!(
            session.reveal_role(),
            Err(GameError::WrongPhase { .. })
        ));
        assert!(matches!(
            session.restart(),
            Err(GameError::InvalidTransition { .. })
        ));
        assert!(session.reveal_identities().is_err());

        let mut rng = StdRng::seed_from_u64(1);
        assert!(session
            .complete_loading(SecretData::new("x", "y"), &mut rng)
            .is_err());
    }

    #[test]
    fn test_failed_loading_keeps_names() {
        let mut session = GameSession::new();
        session
            .begin_loading(names(&["A", "B", "C"]), GameSettings::default())
            .unwrap();
        session.fail_loading().unwrap();
        assert_eq!(session.phase(), GamePhase::Setup);
        assert_eq!(session.prefill_names(), names(&["A", "B", "C"]));
    }

    #[test]
    fn test_empty_roster_fails_loading() {
        let mut session = GameSession::new();
        session
            .begin_loading(Vec::new(), GameSettings::default())
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let result = session.complete_loading(SecretData::new("x", "y"), &mut rng);
        assert!(matches!(result, Err(GameError::EmptyRoster)));
        assert_eq!(session.phase(), GamePhase::Loading);
    }

    #[test]
    fn test_recent_words_are_capped_newest_first() {
        let mut session = GameSession::new();
        let mut rng = StdRng::seed_from_u64(5);
        for i in 0..25 {
            session
                .begin_loading(names(&["A", "B", "C"]), GameSettings::default())
                .unwrap();
            session
                .complete_loading(SecretData::new(format!("w{}", i), "c"), &mut rng)
                .unwrap();
            for _ in 0..3 {
                session.reveal_role().unwrap();
                session.pass_device().unwrap();
            }
            session.restart().unwrap();
        }

        assert_eq!(session.recent_words().len(), RECENT_WORDS_CAP);
        assert_eq!(session.recent_words()[0], "w24");
        assert_eq!(session.recent_words()[RECENT_WORDS_CAP - 1], "w5");
        assert_eq!(session.round_no, 25);
    }
}
