//! The computer opponent: a binary search over its own bound.
//!
//! The bound only narrows from feedback on the agent's own guesses. The
//! human's guesses never move it, so the agent needs at most
//! `ceil(log2(max - min + 1))` of its own turns to hit the target.

use tracing::{debug, warn};

use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::games::rand_num::game::Hint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSearchAgent {
    low: i64,
    high: i64,
    history: Vec<i64>,
}

impl RangeSearchAgent {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            low: config.min_number(),
            high: config.max_number(),
            history: Vec::new(),
        }
    }

    pub fn bounds(&self) -> (i64, i64) {
        (self.low, self.high)
    }

    /// Own past guesses, most recent last.
    pub fn history(&self) -> &[i64] {
        &self.history
    }

    /// Narrows the bound with the hint about the previous guess (if any),
    /// then guesses the midpoint and records it.
    pub fn next_guess(&mut self, hint: Option<Hint>) -> Result<i64, GameError> {
        if let Some(hint) = hint {
            let Some(&previous) = self.history.last() else {
                warn!(?hint, "hint received before the agent ever guessed");
                return Err(GameError::SearchExhausted { low: self.low, high: self.high });
            };
            match hint {
                Hint::TooLow => self.low = previous + 1,
                Hint::TooHigh => self.high = previous - 1,
            }
        }

        if self.low > self.high {
            warn!(low = self.low, high = self.high, "agent bound collapsed");
            return Err(GameError::SearchExhausted { low: self.low, high: self.high });
        }

        let guess = self.low + (self.high - self.low) / 2;
        self.history.push(guess);
        debug!(low = self.low, high = self.high, guess, "agent picked midpoint");
        Ok(guess)
    }
}
