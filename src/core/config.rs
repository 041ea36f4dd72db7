//! Game parameters, fixed for the lifetime of a controller.

use std::time::Duration;

use serde::Serialize;

use crate::core::error::ConfigError;

pub const DEFAULT_MIN: i64 = 1;
pub const DEFAULT_MAX: i64 = 100;
pub const DEFAULT_ATTEMPTS: u32 = 12;
pub const DEFAULT_THINK_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    min_number: i64,
    max_number: i64,
    max_attempts: u32,
    #[serde(skip)]
    think_delay: Duration,
}

impl GameConfig {
    /// Validates the range and attempt budget. Bad values are rejected here,
    /// never later as an in-game error.
    pub fn new(min_number: i64, max_number: i64, max_attempts: u32) -> Result<Self, ConfigError> {
        if min_number <= 0 {
            return Err(ConfigError::NonPositive { field: "min", value: min_number });
        }
        if max_number <= 0 {
            return Err(ConfigError::NonPositive { field: "max", value: max_number });
        }
        if min_number >= max_number {
            return Err(ConfigError::EmptyRange { min: min_number, max: max_number });
        }
        if max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }

        Ok(Self {
            min_number,
            max_number,
            max_attempts,
            think_delay: DEFAULT_THINK_DELAY,
        })
    }

    pub fn with_think_delay(mut self, delay: Duration) -> Self {
        self.think_delay = delay;
        self
    }

    pub fn min_number(&self) -> i64 {
        self.min_number
    }

    pub fn max_number(&self) -> i64 {
        self.max_number
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn think_delay(&self) -> Duration {
        self.think_delay
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min_number..=self.max_number).contains(&value)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_number: DEFAULT_MIN,
            max_number: DEFAULT_MAX,
            max_attempts: DEFAULT_ATTEMPTS,
            think_delay: DEFAULT_THINK_DELAY,
        }
    }
}
