use futures_util::future::join;
use tracing::debug;

use super::error::PredictionError;
use super::formula::{pick_winner, validate_profile, NoiseSource, ScoreFormula};
use super::normalizer::normalize;
use crate::feeds::TeamStatsProvider;
use crate::models::{Game, PredictionResult, RawStatsPayload, TeamProfile};

/// Runs one matchup prediction: fetch both teams, normalize, score, pick a winner.
///
/// Holds no per-request state; the same engine can serve any number of
/// predictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionEngine {
    formula: ScoreFormula,
}

impl PredictionEngine {
    pub fn new(formula: ScoreFormula) -> Self {
        PredictionEngine { formula }
    }

    pub async fn predict(
        &self,
        game: &Game,
        stats: &dyn TeamStatsProvider,
        noise: &mut dyn NoiseSource,
    ) -> Result<PredictionResult, PredictionError> {
        if game.team1.trim().is_empty() || game.team2.trim().is_empty() {
            return Err(PredictionError::InsufficientData(
                "game is missing a team name".to_string(),
            ));
        }

        debug!(
            "Fetching stats for {} and {} from {}",
            game.team1,
            game.team2,
            stats.name()
        );
        let (raw1, raw2) = join(
            stats.fetch_team_stats(&game.team1),
            stats.fetch_team_stats(&game.team2),
        )
        .await;

        // Both fetches must succeed before anything is scored.
        let raw1 = require_payload(&game.team1, raw1)?;
        let raw2 = require_payload(&game.team2, raw2)?;

        let p1 = profile_for(&game.team1, &raw1)?;
        let p2 = profile_for(&game.team2, &raw2)?;
        debug!("{} profile: {:?}", game.team1, p1);
        debug!("{} profile: {:?}", game.team2, p2);

        let (score1, score2) = self.formula.predict(&p1, &p2, noise)?;
        let winner = pick_winner(&game.team1, &game.team2, score1, score2).to_string();

        Ok(PredictionResult {
            team1: game.team1.clone(),
            team2: game.team2.clone(),
            score1,
            score2,
            winner,
        })
    }
}

fn require_payload(
    team: &str,
    fetched: anyhow::Result<RawStatsPayload>,
) -> Result<RawStatsPayload, PredictionError> {
    match fetched {
        Ok(raw) if raw.is_null() => Err(PredictionError::MissingStats {
            team: team.to_string(),
            reason: "provider returned no data".to_string(),
        }),
        Ok(raw) => Ok(raw),
        Err(e) => Err(PredictionError::MissingStats {
            team: team.to_string(),
            reason: format!("{:#}", e),
        }),
    }
}

fn profile_for(team: &str, raw: &RawStatsPayload) -> Result<TeamProfile, PredictionError> {
    let profile = normalize(raw).map_err(|e| match e {
        PredictionError::InsufficientData(msg) => {
            PredictionError::InsufficientData(format!("{}: {}", team, msg))
        }
        other => other,
    })?;
    validate_profile(team, &profile)?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameStatus;
    use crate::predict::formula::{FixedNoise, NoiseRange, SeededNoise};
    use crate::predict::selector::resolve;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory stats feed; teams without an entry fail to fetch.
    struct StaticStats {
        payloads: HashMap<String, Value>,
        calls: AtomicUsize,
    }

    impl StaticStats {
        fn new(entries: &[(&str, Value)]) -> Self {
            StaticStats {
                payloads: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TeamStatsProvider for StaticStats {
        async fn fetch_team_stats(&self, team: &str) -> anyhow::Result<RawStatsPayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads
                .get(team)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("timed out fetching {}", team))
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    fn lakers_celtics() -> Game {
        Game {
            team1: "Lakers".into(),
            team2: "Celtics".into(),
            status: GameStatus::Scheduled,
            start_time: None,
        }
    }

    fn lakers_stats() -> Value {
        json!({
            "offensive_rating": 110, "defensive_rating": 105, "pace": 100,
            "last_5_games": [115, 115, 115, 115, 115],
            "last_5_games_against": [108, 108, 108, 108, 108]
        })
    }

    fn celtics_stats() -> Value {
        json!({
            "offensive_rating": 108, "defensive_rating": 107, "pace": 98,
            "recent_games": [
                { "points_for": 110, "points_against": 112 },
                { "points_for": 114, "points_against": 108 }
            ]
        })
    }

    #[tokio::test]
    async fn test_lakers_celtics_fixed_noise() {
        let stats = StaticStats::new(&[("Lakers", lakers_stats()), ("Celtics", celtics_stats())]);
        let engine = PredictionEngine::default();
        let result = engine
            .predict(&lakers_celtics(), &stats, &mut FixedNoise(1.0))
            .await
            .unwrap();

        // Lakers: 115 × 1.00 × (110 + 107) / 200 = 124.775 → 125
        // Celtics: 112 × 0.98 × (108 + 105) / 200 = 116.894 → 117
        assert_eq!(
            result,
            PredictionResult {
                team1: "Lakers".into(),
                team2: "Celtics".into(),
                score1: 125,
                score2: 117,
                winner: "Lakers".into(),
            }
        );
        assert_eq!(
            result.to_string(),
            "Predicted score: Lakers 125 x 117 Celtics (winner: Lakers)"
        );
    }

    #[tokio::test]
    async fn test_one_failed_fetch_is_missing_stats() {
        let stats = StaticStats::new(&[("Lakers", lakers_stats())]);
        let engine = PredictionEngine::default();
        let err = engine
            .predict(&lakers_celtics(), &stats, &mut FixedNoise(1.0))
            .await
            .unwrap_err();
        match err {
            PredictionError::MissingStats { team, reason } => {
                assert_eq!(team, "Celtics");
                assert!(reason.contains("timed out"));
            }
            other => panic!("expected MissingStats, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_null_payload_is_missing_stats() {
        let stats = StaticStats::new(&[("Lakers", Value::Null), ("Celtics", celtics_stats())]);
        let err = PredictionEngine::default()
            .predict(&lakers_celtics(), &stats, &mut FixedNoise(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::MissingStats { ref team, .. } if team == "Lakers"));
    }

    #[tokio::test]
    async fn test_empty_object_payload_uses_neutral_defaults() {
        let stats = StaticStats::new(&[("Lakers", json!({})), ("Celtics", json!({}))]);
        let result = PredictionEngine::default()
            .predict(&lakers_celtics(), &stats, &mut FixedNoise(1.0))
            .await
            .unwrap();
        assert_eq!((result.score1, result.score2), (100, 100));
        assert_eq!(result.winner, "Lakers");
    }

    #[tokio::test]
    async fn test_array_payload_is_insufficient_data_not_missing() {
        let stats = StaticStats::new(&[("Lakers", json!([])), ("Celtics", celtics_stats())]);
        let err = PredictionEngine::default()
            .predict(&lakers_celtics(), &stats, &mut FixedNoise(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::InsufficientData(_)));
    }

    #[tokio::test]
    async fn test_unparseable_payload_names_team() {
        let stats =
            StaticStats::new(&[("Lakers", json!("<html>502</html>")), ("Celtics", celtics_stats())]);
        let err = PredictionEngine::default()
            .predict(&lakers_celtics(), &stats, &mut FixedNoise(1.0))
            .await
            .unwrap_err();
        match err {
            PredictionError::InsufficientData(msg) => assert!(msg.starts_with("Lakers:")),
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_profile_names_team() {
        let stats = StaticStats::new(&[
            ("Lakers", lakers_stats()),
            ("Celtics", json!({ "pace": 0 })),
        ]);
        let err = PredictionEngine::default()
            .predict(&lakers_celtics(), &stats, &mut FixedNoise(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::InvalidProfile { ref team, .. } if team == "Celtics"));
    }

    #[tokio::test]
    async fn test_empty_team_name_skips_fetch() {
        let stats = StaticStats::new(&[]);
        let game = Game {
            team2: String::new(),
            ..lakers_celtics()
        };
        let err = PredictionEngine::default()
            .predict(&game, &stats, &mut FixedNoise(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::InsufficientData(_)));
        assert_eq!(stats.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_identical_teams_tie_goes_to_team1() {
        let stats = StaticStats::new(&[("Home", json!({})), ("Away", json!({}))]);
        let game = Game {
            team1: "Home".into(),
            team2: "Away".into(),
            status: GameStatus::Live,
            start_time: None,
        };
        let result = PredictionEngine::default()
            .predict(&game, &stats, &mut FixedNoise(1.0))
            .await
            .unwrap();
        assert_eq!((result.score1, result.score2), (100, 100));
        assert_eq!(result.winner, "Home");
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let stats = StaticStats::new(&[("Lakers", lakers_stats()), ("Celtics", celtics_stats())]);
        let engine = PredictionEngine::new(ScoreFormula::new(NoiseRange::new(0.95, 1.05).unwrap()));
        let a = engine
            .predict(&lakers_celtics(), &stats, &mut SeededNoise::from_seed(2024))
            .await
            .unwrap();
        let b = engine
            .predict(&lakers_celtics(), &stats, &mut SeededNoise::from_seed(2024))
            .await
            .unwrap();
        assert_eq!(a, b);
        assert!(a.winner == "Lakers" || a.winner == "Celtics");
    }

    #[test]
    fn test_empty_catalog_yields_no_prediction() {
        let games: Vec<Game> = Vec::new();
        let err = resolve("Lakers vs Celtics (scheduled)", &games).unwrap_err();
        assert!(matches!(err, PredictionError::NotFound(_)));
    }
}
