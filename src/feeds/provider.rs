use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Game, RawStatsPayload};

/// Source of raw per-team statistics.
#[async_trait]
pub trait TeamStatsProvider: Send + Sync {
    /// Fetch the raw stats payload for one team. A `null` payload counts as
    /// "no data" for the caller.
    async fn fetch_team_stats(&self, team: &str) -> Result<RawStatsPayload>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Source of upcoming and live games.
#[async_trait]
pub trait GameCatalogProvider: Send + Sync {
    /// Games for `league`, or all leagues when `None`. Failures are logged by
    /// the implementation and reported as an empty list.
    async fn fetch_games(&self, league: Option<&str>) -> Vec<Game>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
