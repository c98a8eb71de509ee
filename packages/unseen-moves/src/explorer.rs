//! Lichess masters explorer: candidate lookup around a year and PGN export.

use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use tracing::{debug, info};
use unseen_moves_domain::{EpisodeError, Result};

use crate::pgn::GameRecord;

pub const DEFAULT_EXPLORER_URL: &str = "https://explorer.lichess.ovh";
/// First year drawn for an episode.
pub const EARLIEST_YEAR: u16 = 1953;
/// Last year drawn for an episode.
pub const LATEST_YEAR: u16 = 2022;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of the explorer's `topGames` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameSummary {
    pub id: String,
    pub white: PlayerSummary,
    pub black: PlayerSummary,
    pub year: u16,
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    #[serde(default)]
    pub rating: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MastersResponse {
    #[serde(default)]
    top_games: Vec<GameSummary>,
}

/// Where master games come from.
#[allow(async_fn_in_trait)]
pub trait GameSource {
    /// Top games played between `since` and `until`, both inclusive.
    async fn candidate_games(&self, since: u16, until: u16) -> Result<Vec<GameSummary>>;

    /// Raw PGN of a single game.
    async fn game_pgn(&self, game_id: &str) -> Result<String>;
}

impl<T: GameSource> GameSource for &T {
    async fn candidate_games(&self, since: u16, until: u16) -> Result<Vec<GameSummary>> {
        (**self).candidate_games(since, until).await
    }

    async fn game_pgn(&self, game_id: &str) -> Result<String> {
        (**self).game_pgn(game_id).await
    }
}

/// HTTP settings for [`ExplorerClient`]
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Scheme and host, without a trailing path
    pub base_url: String,
    /// Applied to every request, connect included
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXPLORER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("unseen-moves/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ExplorerClient {
    inner: reqwest::Client,
    base_url: String,
}

impl ExplorerClient {
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| EpisodeError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, request: reqwest::RequestBuilder, what: &str) -> Result<String> {
        let resp = request
            .send()
            .await
            .map_err(|e| EpisodeError::Network(format!("{what} request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EpisodeError::Network(format!(
                "{what} request returned {status}"
            )));
        }

        resp.text()
            .await
            .map_err(|e| EpisodeError::Network(format!("{what} body could not be read: {e}")))
    }
}

impl GameSource for ExplorerClient {
    async fn candidate_games(&self, since: u16, until: u16) -> Result<Vec<GameSummary>> {
        let url = format!("{}/masters", self.base_url);
        debug!(%url, since, until, "Querying masters explorer");

        let request = self
            .inner
            .get(&url)
            .query(&[("since", since), ("until", until)]);
        let body = self.get_text(request, "masters lookup").await?;

        let parsed: MastersResponse = serde_json::from_str(&body).map_err(|e| {
            EpisodeError::FetchFailure(format!("masters lookup returned unreadable JSON: {e}"))
        })?;
        Ok(parsed.top_games)
    }

    async fn game_pgn(&self, game_id: &str) -> Result<String> {
        let url = format!("{}/masters/pgn/{game_id}", self.base_url);
        debug!(%url, "Fetching game PGN");
        self.get_text(self.inner.get(&url), "PGN export").await
    }
}

/// A year uniformly drawn from [`EARLIEST_YEAR`, `LATEST_YEAR`].
pub fn pick_target_year<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    rng.random_range(EARLIEST_YEAR..=LATEST_YEAR)
}

/// Games played within a year either side of `year`.
pub async fn fetch_candidate_games<G: GameSource>(source: &G, year: u16) -> Result<Vec<GameSummary>> {
    let games = source
        .candidate_games(year.saturating_sub(1), year.saturating_add(1))
        .await?;
    if games.is_empty() {
        return Err(EpisodeError::DataUnavailable(format!(
            "no master games recorded around {year}"
        )));
    }
    info!(year, candidates = games.len(), "Found candidate games");
    Ok(games)
}

pub fn select_game<'a, R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &'a [GameSummary],
) -> Result<&'a GameSummary> {
    candidates
        .choose(rng)
        .ok_or_else(|| EpisodeError::DataUnavailable("no candidate games to choose from".into()))
}

/// Download and parse one game.
pub async fn fetch_game_record<G: GameSource>(source: &G, game_id: &str) -> Result<GameRecord> {
    let pgn = source.game_pgn(game_id).await?;
    debug!(game_id, %pgn, "Fetched PGN");
    GameRecord::from_pgn(game_id, &pgn)
}
