use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

mod config;
mod feeds;
mod models;
mod predict;

use config::Config;
use feeds::{start_catalog_refresh, BasketballDataClient, GameCatalogProvider, TeamStatsProvider};
use models::{Game, PredictionResult};
use predict::{selector, FixedNoise, NoiseSource, PredictionEngine, ScoreFormula, SeededNoise};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let client = Arc::new(BasketballDataClient::new(
        &config.api_url,
        Duration::from_secs(config.http_timeout_secs),
    )?);
    let engine = PredictionEngine::new(ScoreFormula::new(config.noise_range()?));

    let mut noise: Box<dyn NoiseSource> = match (config.fixed_noise, config.seed) {
        (Some(factor), _) => {
            info!("Using constant noise factor {}", factor);
            Box::new(FixedNoise(factor))
        }
        (None, Some(seed)) => {
            info!("Using fixed noise seed {}", seed);
            Box::new(SeededNoise::from_seed(seed))
        }
        (None, None) => Box::new(SeededNoise::from_entropy()),
    };

    let league = config.league_filter();

    if config.refresh_secs == 0 {
        let games = client.fetch_games(league.as_deref()).await;
        handle_snapshot(&config, &engine, client.as_ref(), &games, noise.as_mut()).await;
        return Ok(());
    }

    let mut rx = start_catalog_refresh(
        client.clone(),
        league,
        Duration::from_secs(config.refresh_secs),
    );

    loop {
        tokio::select! {
            snapshot = rx.recv() => match snapshot {
                Some(games) => {
                    handle_snapshot(&config, &engine, client.as_ref(), &games, noise.as_mut()).await;
                }
                None => {
                    warn!("Catalog refresh stopped unexpectedly");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Display one catalog snapshot: either the selectable games or the
/// prediction for the configured game. Every failure ends as a message.
async fn handle_snapshot(
    config: &Config,
    engine: &PredictionEngine,
    stats: &dyn TeamStatsProvider,
    games: &[Game],
    noise: &mut dyn NoiseSource,
) {
    if games.is_empty() {
        println!("No games found (or the games API is unavailable).");
    }

    let label = match &config.game {
        Some(label) => label,
        None => {
            if !games.is_empty() {
                println!("Live and upcoming games:");
                for (game, label) in games.iter().zip(selector::labels(games)) {
                    match game.start_time {
                        Some(t) => println!("  {}  [{}]", label, t.format("%Y-%m-%d %H:%M UTC")),
                        None => println!("  {}", label),
                    }
                }
            }
            return;
        }
    };

    let game = match selector::resolve(label, games) {
        Ok(game) => game,
        Err(e) => {
            println!("No prediction possible: {}", e);
            return;
        }
    };

    info!(
        "Predicting {} vs {} ({})",
        game.team1, game.team2, game.status
    );
    match engine.predict(game, stats, noise).await {
        Ok(result) => render(&result, config.json),
        Err(e) => {
            warn!("Prediction failed: {}", e);
            println!("No prediction possible: {}", e);
        }
    }
}

fn render(result: &PredictionResult, json: bool) {
    if !json {
        println!("{}", result);
        return;
    }
    match serde_json::to_string(result) {
        Ok(s) => println!("{}", s),
        Err(e) => error!("Failed to serialize prediction: {}", e),
    }
}
