use clap::Parser;
use url::Url;

use crate::predict::NoiseRange;

/// Basketball matchup score predictor
#[derive(Parser, Debug, Clone)]
#[command(name = "matchup-predictor", version, about)]
pub struct Config {
    /// Basketball-data API base URL
    #[arg(
        long,
        env = "BASKETBALL_API_URL",
        default_value = "https://api.basketballdata.com"
    )]
    pub api_url: String,

    /// League filter (e.g. NBA, EuroLeague, NBB); "All" lists every league
    #[arg(long, env = "LEAGUE", default_value = "All")]
    pub league: String,

    /// Game label to predict, exactly as listed (e.g. "Lakers vs Celtics (scheduled)").
    /// Without it the available games are listed.
    #[arg(long, env = "GAME")]
    pub game: Option<String>,

    /// Seed for the score noise; omit for a fresh random draw each run
    #[arg(long, env = "SEED")]
    pub seed: Option<u64>,

    /// Use this constant noise multiplier instead of random draws
    #[arg(long, env = "FIXED_NOISE")]
    pub fixed_noise: Option<f64>,

    /// Lower bound of the per-team noise multiplier
    #[arg(long, env = "NOISE_MIN", default_value = "0.90")]
    pub noise_min: f64,

    /// Upper bound of the per-team noise multiplier
    #[arg(long, env = "NOISE_MAX", default_value = "1.10")]
    pub noise_max: f64,

    /// Re-fetch the catalog (and re-predict) every N seconds; 0 runs once
    #[arg(long, env = "REFRESH_SECS", default_value = "0")]
    pub refresh_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,

    /// Print predictions as JSON instead of a sentence
    #[arg(long, env = "JSON_OUTPUT", default_value = "false")]
    pub json: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| anyhow::anyhow!("api_url is not a valid URL: {}", e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("api_url must use http or https");
        }
        self.noise_range()?;
        if let Some(fixed) = self.fixed_noise {
            if !fixed.is_finite() || fixed <= 0.0 {
                anyhow::bail!("fixed_noise must be a positive number");
            }
            if self.seed.is_some() {
                anyhow::bail!("fixed_noise and seed are mutually exclusive");
            }
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be positive");
        }
        if let Some(game) = &self.game {
            if game.trim().is_empty() {
                anyhow::bail!("game label must not be empty");
            }
        }
        Ok(())
    }

    pub fn noise_range(&self) -> anyhow::Result<NoiseRange> {
        NoiseRange::new(self.noise_min, self.noise_max)
    }

    /// League to send to the catalog, if any.
    pub fn league_filter(&self) -> Option<String> {
        crate::feeds::basketball_data::league_filter(Some(&self.league)).map(str::to_string)
    }
}
