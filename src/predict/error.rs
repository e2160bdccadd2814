use thiserror::Error;

/// Recoverable failures of the prediction core. None of these should ever
/// take the process down; the display layer turns them into a message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Insufficient data to predict: {0}")]
    InsufficientData(String),

    #[error("Invalid statistics for {team}: {reason}")]
    InvalidProfile { team: String, reason: String },

    #[error("Team statistics unavailable for {team}: {reason}")]
    MissingStats { team: String, reason: String },

    #[error("No game matches '{0}'")]
    NotFound(String),
}
