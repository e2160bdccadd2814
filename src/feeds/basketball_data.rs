use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::provider::{GameCatalogProvider, TeamStatsProvider};
use crate::models::{Game, GameStatus, RawStatsPayload};

/// REST client for the basketball-data feed.
///
/// Endpoints:
/// - `GET {base}/games/upcoming[?league=..]` → `{"games": [{team1, team2, status, start_time}]}`
/// - `GET {base}/team/stats?team=..` → raw stats object
#[derive(Clone)]
pub struct BasketballDataClient {
    http: Client,
    base_url: Url,
}

impl BasketballDataClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        // `Url::join` drops the last path segment unless the base ends in '/'
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)
            .with_context(|| format!("Invalid basketball-data base URL: {}", base_url))?;
        Ok(BasketballDataClient { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Failed to build URL for {}", path))
    }

    async fn get_json(&self, url: Url) -> Result<serde_json::Value> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("basketball-data error {}: {}", status, body);
        }

        resp.json()
            .await
            .context("Failed to parse basketball-data response")
    }

    async fn try_fetch_games(&self, league: Option<&str>) -> Result<Vec<Game>> {
        let mut url = self.endpoint("games/upcoming")?;
        if let Some(league) = league_filter(league) {
            url.query_pairs_mut().append_pair("league", league);
        }
        let raw = self.get_json(url).await?;
        Ok(parse_games_response(&raw))
    }
}

#[async_trait]
impl GameCatalogProvider for BasketballDataClient {
    fn name(&self) -> &str {
        "basketball-data"
    }

    async fn fetch_games(&self, league: Option<&str>) -> Vec<Game> {
        match self.try_fetch_games(league).await {
            Ok(games) => {
                debug!("Fetched {} game(s) (league={:?})", games.len(), league);
                games
            }
            Err(e) => {
                warn!("Game catalog fetch failed: {:#}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl TeamStatsProvider for BasketballDataClient {
    fn name(&self) -> &str {
        "basketball-data"
    }

    async fn fetch_team_stats(&self, team: &str) -> Result<RawStatsPayload> {
        let mut url = self.endpoint("team/stats")?;
        url.query_pairs_mut().append_pair("team", team);
        self.get_json(url)
            .await
            .with_context(|| format!("Failed to fetch stats for {}", team))
    }
}

/// Selector values that mean "every league".
const ALL_LEAGUES: &[&str] = &["all", "todas"];

/// `None`, an empty string, "All" and "Todas" all mean "no league filter".
pub fn league_filter(league: Option<&str>) -> Option<&str> {
    league.map(str::trim).filter(|l| {
        !l.is_empty() && !ALL_LEAGUES.iter().any(|all| l.eq_ignore_ascii_case(all))
    })
}

fn parse_games_response(raw: &serde_json::Value) -> Vec<Game> {
    let games = match raw["games"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    games
        .iter()
        .filter_map(|g| {
            let team1 = g["team1"].as_str().map(str::trim).filter(|s| !s.is_empty())?;
            let team2 = g["team2"].as_str().map(str::trim).filter(|s| !s.is_empty())?;
            let status = g["status"]
                .as_str()
                .map(GameStatus::from_feed)
                .unwrap_or(GameStatus::Scheduled);

            Some(Game {
                team1: team1.to_string(),
                team2: team2.to_string(),
                status,
                start_time: parse_start_time(&g["start_time"]),
            })
        })
        .collect()
}

fn parse_start_time(v: &serde_json::Value) -> Option<DateTime<Utc>> {
    if let Some(s) = v.as_str() {
        return DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }
    v.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}
