use tracing::warn;

use super::error::PredictionError;
use crate::models::Game;

/// User-facing label for a game: `"{team1} vs {team2} ({status})"`.
pub fn build_label(game: &Game) -> String {
    format!("{} vs {} ({})", game.team1, game.team2, game.status)
}

/// Labels for every game, in catalog order.
pub fn labels(games: &[Game]) -> Vec<String> {
    games.iter().map(build_label).collect()
}

/// Resolve a selected label back to its game by exact label equality.
///
/// Substring matching is deliberately not supported: "Lakers vs Lakers B"
/// must never resolve to "Lakers vs Lakers B2". A label shared by two
/// different games (team names containing " vs ") resolves to nothing.
pub fn resolve<'a>(label: &str, games: &'a [Game]) -> Result<&'a Game, PredictionError> {
    let wanted = label.trim();
    let mut matches = games.iter().filter(|g| build_label(g) == wanted);
    let first = matches
        .next()
        .ok_or_else(|| PredictionError::NotFound(wanted.to_string()))?;
    if matches.any(|other| other != first) {
        warn!("Label '{}' matches more than one game", wanted);
        return Err(PredictionError::NotFound(wanted.to_string()));
    }
    Ok(first)
}
