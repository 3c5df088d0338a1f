use super::{validate_setup, AppState, GameError};
use crate::protocol::{ScreenView, ServerMessage};
use crate::types::{GamePhase, GameSettings};

impl AppState {
    /// Current shared screen
    pub async fn screen(&self) -> ScreenView {
        self.session.read().await.screen()
    }

    /// Current phase
    pub async fn phase(&self) -> GamePhase {
        self.session.read().await.phase()
    }

    /// Setup -> Loading -> Reveal.
    ///
    /// The session lock is released while the secret is fetched; a second
    /// start during that time is rejected because the phase is Loading. If
    /// anything goes wrong the game returns to Setup with the names kept.
    pub async fn start_game(
        &self,
        names: Vec<String>,
        settings: GameSettings,
    ) -> Result<ScreenView, GameError> {
        let names = validate_setup(&names, &settings)?;

        let ticket = {
            let mut session = self.session.write().await;
            let ticket = session.begin_loading(names, settings)?;
            tracing::info!(
                "Starting round {} with {} players",
                session.round_no + 1,
                session.players().len()
            );
            ticket
        };
        self.broadcast_to_all(ServerMessage::screen(ScreenView::Loading));

        // A panic inside the provider surfaces as a JoinError instead of taking the
        // connection down with it
        let secrets = self.secrets.clone();
        let secret = tokio::spawn(async move {
            secrets
                .provide(&ticket.topic, &ticket.recent_words, ticket.language)
                .await
        })
        .await
        .map_err(|e| GameError::SecretUnavailable(e.to_string()));

        let mut session = self.session.write().await;
        let result = secret.and_then(|secret| {
            let mut rng = rand::rng();
            session.complete_loading(secret, &mut rng)
        });

        if let Err(e) = result {
            tracing::error!("Failed to start game: {}", e);
            if let Err(reset) = session.fail_loading() {
                tracing::error!("Could not return to setup: {}", reset);
            }
            let screen = session.screen();
            drop(session);
            self.broadcast_to_all(ServerMessage::screen(screen));
            return Err(e);
        }

        let screen = session.screen();
        drop(session);
        self.broadcast_to_all(ServerMessage::screen(screen.clone()));
        Ok(screen)
    }

    /// Flip the current player's card
    pub async fn reveal_role(&self) -> Result<ScreenView, GameError> {
        self.apply(|session| session.reveal_role().map(|_| ())).await
    }

    /// Hand the device on; after the last player the discussion opens
    pub async fn pass_device(&self) -> Result<ScreenView, GameError> {
        self.apply(|session| session.pass_device().map(|_| ())).await
    }

    /// Playing -> Finished
    pub async fn reveal_identities(&self) -> Result<ScreenView, GameError> {
        self.apply(|session| session.reveal_identities()).await
    }

    /// Back to Setup, keeping the names
    pub async fn restart(&self) -> Result<ScreenView, GameError> {
        self.apply(|session| session.restart()).await
    }

    /// Run one controller action under the lock and broadcast the new screen
    async fn apply<F>(&self, action: F) -> Result<ScreenView, GameError>
    where
        F: FnOnce(&mut super::GameSession) -> Result<(), GameError>,
    {
        let screen = {
            let mut session = self.session.write().await;
            action(&mut *session)?;
            session.screen()
        };
        self.broadcast_to_all(ServerMessage::screen(screen.clone()));
        Ok(screen)
    }
}
