use thiserror::Error;

/// A rejected guess. Recoverable: nothing about the session changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    #[error("{value} is outside the range {min}-{max}")]
    OutOfRange { value: String, min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Misuse of the command surface, e.g. guessing while the opponent is thinking.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The opponent's bound collapsed before it found the target.
    #[error("search exhausted: low bound {low} is above high bound {high}")]
    SearchExhausted { low: i64, high: i64 },
}

impl GameError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        GameError::InvalidState(msg.into())
    }

    /// Only validation errors are meant to be shown to the player.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, GameError::Validation(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("min ({min}) must be strictly below max ({max})")]
    EmptyRange { min: i64, max: i64 },

    #[error("at least one attempt is required")]
    NoAttempts,
}
