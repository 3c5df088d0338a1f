use super::GameSession;
use crate::protocol::{RoleSummary, ScreenView};
use crate::types::{GamePhase, MAX_PLAYERS, MIN_PLAYERS};

impl GameSession {
    /// Build the shared screen for the current phase
    pub fn screen(&self) -> ScreenView {
        match self.phase() {
            GamePhase::Setup => ScreenView::Setup {
                prefill_names: self.prefill_names(),
                settings: self.settings().clone(),
                min_players: MIN_PLAYERS,
                max_players: MAX_PLAYERS,
            },
            GamePhase::Loading => ScreenView::Loading,
            GamePhase::Reveal => {
                let index = self.reveal().current_index();
                ScreenView::Reveal {
                    player_index: index,
                    player_count: self.reveal().player_count(),
                    player_name: self
                        .players()
                        .get(index)
                        .map(|p| p.name.clone())
                        .unwrap_or_default(),
                    card: self.shown_card(),
                }
            }
            GamePhase::Playing => ScreenView::Playing {
                players: self.prefill_names(),
                starting_player: self.starting_player_name(),
            },
            GamePhase::Finished => ScreenView::Finished {
                secret: self.secret().cloned().unwrap_or_default(),
                players: self
                    .players()
                    .iter()
                    .map(|p| RoleSummary {
                        id: p.id.clone(),
                        name: p.name.clone(),
                        is_imposter: p.is_imposter,
                    })
                    .collect(),
                starting_player: self.starting_player_name(),
            },
        }
    }

    fn starting_player_name(&self) -> String {
        self.starting_player()
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }
}
