pub mod basketball_data;
pub mod provider;

pub use basketball_data::BasketballDataClient;
pub use provider::{GameCatalogProvider, TeamStatsProvider};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::Game;

/// Spawns a background task that re-fetches the game catalog every
/// `interval` and sends each snapshot through the returned channel.
///
/// The first snapshot is sent immediately. The task stops once the receiver
/// is dropped. Predictions are never run here; the consumer re-invokes the
/// stateless engine per snapshot.
pub fn start_catalog_refresh(
    catalog: Arc<dyn GameCatalogProvider>,
    league: Option<String>,
    interval: Duration,
) -> mpsc::Receiver<Vec<Game>> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        info!(
            "Catalog refresh started (provider={}, league={:?}, interval={:?})",
            catalog.name(),
            league,
            interval
        );
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let games = catalog.fetch_games(league.as_deref()).await;
            debug!("Catalog refresh: {} game(s)", games.len());
            if tx.send(games).await.is_err() {
                info!("Catalog refresh receiver dropped, stopping");
                break;
            }
        }
    });

    rx
}
