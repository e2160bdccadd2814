//! Score formula: pace-scaled recent scoring blended with offense vs. the
//! opponent's defense, times a bounded per-team noise factor.
//!
//!   base  = recent_avg_points_for × pace / 100
//!   score = round(base × (own_offensive_rating + opp_defensive_rating) / 200 × noise)
//!
//! Rounding is round-half-up (`f64::round` on a non-negative value).
//! Ties go to team1.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::PredictionError;
use crate::models::TeamProfile;

/// Default noise bounds: ±10% around the deterministic estimate.
pub const DEFAULT_NOISE_MIN: f64 = 0.90;
pub const DEFAULT_NOISE_MAX: f64 = 1.10;

/// Inclusive bounds of the uniform noise multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseRange {
    min: f64,
    max: f64,
}

impl NoiseRange {
    pub fn new(min: f64, max: f64) -> anyhow::Result<Self> {
        anyhow::ensure!(
            min.is_finite() && max.is_finite(),
            "noise bounds must be finite"
        );
        anyhow::ensure!(min > 0.0, "noise_min must be positive (got {})", min);
        anyhow::ensure!(
            min <= max,
            "noise_min ({}) must not exceed noise_max ({})",
            min,
            max
        );
        Ok(NoiseRange { min, max })
    }
}

impl Default for NoiseRange {
    fn default() -> Self {
        NoiseRange {
            min: DEFAULT_NOISE_MIN,
            max: DEFAULT_NOISE_MAX,
        }
    }
}

/// Source of per-team noise multipliers.
pub trait NoiseSource: Send {
    /// Draw one multiplier inside `range`.
    fn sample(&mut self, range: &NoiseRange) -> f64;
}

/// Uniform noise from a `StdRng`, optionally seeded for reproducible runs.
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    pub fn from_seed(seed: u64) -> Self {
        SeededNoise {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        SeededNoise {
            rng: StdRng::from_entropy(),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn sample(&mut self, range: &NoiseRange) -> f64 {
        if range.min == range.max {
            return range.min;
        }
        self.rng.gen_range(range.min..=range.max)
    }
}

/// Always yields the same multiplier (clamped into the range).
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn sample(&mut self, range: &NoiseRange) -> f64 {
        self.0.clamp(range.min, range.max)
    }
}

/// Reject profiles the formula cannot use.
pub fn validate_profile(team: &str, profile: &TeamProfile) -> Result<(), PredictionError> {
    match profile.first_invalid_field() {
        Some((field, value)) => Err(PredictionError::InvalidProfile {
            team: team.to_string(),
            reason: format!("{} must be positive (got {})", field, value),
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreFormula {
    noise: NoiseRange,
}

impl ScoreFormula {
    pub fn new(noise: NoiseRange) -> Self {
        ScoreFormula { noise }
    }

    /// Predict `(score1, score2)`. Noise is drawn for team1 first, then team2.
    pub fn predict(
        &self,
        p1: &TeamProfile,
        p2: &TeamProfile,
        noise: &mut dyn NoiseSource,
    ) -> Result<(u32, u32), PredictionError> {
        validate_profile("team1", p1)?;
        validate_profile("team2", p2)?;

        let n1 = noise.sample(&self.noise);
        let n2 = noise.sample(&self.noise);

        let score1 = round_score(expected_points(p1, p2) * n1);
        let score2 = round_score(expected_points(p2, p1) * n2);
        Ok((score1, score2))
    }
}

/// Noise-free points estimate for `own` playing against `opp`.
pub fn expected_points(own: &TeamProfile, opp: &TeamProfile) -> f64 {
    let base = own.recent_avg_points_for * (own.pace / 100.0);
    base * (own.offensive_rating + opp.defensive_rating) / 200.0
}

fn round_score(raw: f64) -> u32 {
    // `as` saturates, and NaN maps to 0
    raw.max(0.0).round() as u32
}

/// team1 wins iff `score1 >= score2`; exact ties go to team1.
pub fn pick_winner<'a>(team1: &'a str, team2: &'a str, score1: u32, score2: u32) -> &'a str {
    if score1 >= score2 {
        team1
    } else {
        team2
    }
}
