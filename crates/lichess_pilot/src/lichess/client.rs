//! Lichess REST client.

use tracing::{debug, info, instrument};

use super::error::TransportError;
use super::wire::NowPlaying;
use crate::controller::{GameStateSource, MoveSubmitter};
use crate::game::GameSnapshot;

/// Authenticated client for the account and board endpoints.
#[derive(Clone)]
pub struct LichessClient {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for LichessClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LichessClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl LichessClient {
    /// Creates a client for `base_url` authenticated with `api_token`.
    #[instrument(skip_all)]
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating Lichess client");
        Self {
            base_url,
            api_token: api_token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the games the account is currently playing.
    #[instrument(skip(self))]
    pub async fn now_playing(&self) -> Result<NowPlaying, TransportError> {
        let url = format!("{}/api/account/playing", self.base_url);
        debug!(url = %url, "Fetching ongoing games");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::http(status.as_u16(), &body));
        }

        let playing: NowPlaying = response.json().await?;
        debug!(games = playing.now_playing.len(), "Got ongoing games");
        Ok(playing)
    }

    /// Plays `uci` in game `game_id` through the board API.
    #[instrument(skip(self))]
    pub async fn play_move(&self, game_id: &str, uci: &str) -> Result<(), TransportError> {
        info!("Playing move");
        let url = format!("{}/api/board/game/{}/move/{}", self.base_url, game_id, uci);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::http(status.as_u16(), &body));
        }

        debug!("Move accepted");
        Ok(())
    }
}

#[async_trait::async_trait]
impl GameStateSource for LichessClient {
    async fn fetch_current(&mut self) -> Result<Option<GameSnapshot>, TransportError> {
        Ok(self.now_playing().await?.current())
    }
}

#[async_trait::async_trait]
impl MoveSubmitter for LichessClient {
    async fn submit(&mut self, game_id: &str, uci: &str) -> Result<(), TransportError> {
        self.play_move(game_id, uci).await
    }
}
