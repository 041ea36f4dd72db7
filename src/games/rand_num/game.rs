use std::num::IntErrorKind;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::config::GameConfig;
use crate::core::error::{GameError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Party {
    Human,
    Agent,
}

impl Party {
    pub fn other(self) -> Self {
        match self {
            Party::Human => Party::Agent,
            Party::Agent => Party::Human,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Party::Human => "Player",
            Party::Agent => "Computer",
        }
    }
}

/// Result of one accepted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    TooLow,
    TooHigh,
    Win,
    Loss,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, Outcome::Win | Outcome::Loss)
    }

    /// The directional feedback, if the guess missed and the game goes on.
    pub fn hint(self) -> Option<Hint> {
        match self {
            Outcome::TooLow => Some(Hint::TooLow),
            Outcome::TooHigh => Some(Hint::TooHigh),
            Outcome::Win | Outcome::Loss => None,
        }
    }
}

/// Directional feedback about a wrong guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hint {
    TooLow,
    TooHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    InProgress,
    WonByHuman,
    WonByAgent,
    LostByAttrition,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::InProgress)
    }

    fn won_by(party: Party) -> Self {
        match party {
            Party::Human => Status::WonByHuman,
            Party::Agent => Status::WonByAgent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub party: Party,
    pub guessed_value: i64,
    pub outcome: Outcome,
}

/// One play-through. Never reset in place: a new game builds a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    config: GameConfig,
    target: i64,
    attempts_used: u32,
    active_party: Party,
    status: Status,
    log: Vec<LogEntry>,
}

impl GameSession {
    /// Draws the secret number uniformly from the configured range.
    pub fn new(config: GameConfig) -> Self {
        let mut rng = rand::rng();
        let target = rng.random_range(config.min_number()..=config.max_number());
        Self::fresh(config, target)
    }

    pub fn with_target(config: GameConfig, target: i64) -> Result<Self, GameError> {
        if !config.contains(target) {
            return Err(ValidationError::OutOfRange {
                value: target.to_string(),
                min: config.min_number(),
                max: config.max_number(),
            }
            .into());
        }
        Ok(Self::fresh(config, target))
    }

    fn fresh(config: GameConfig, target: i64) -> Self {
        Self {
            config,
            target,
            attempts_used: 0,
            active_party: Party::Human,
            status: Status::InProgress,
            log: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts()
    }

    pub fn attempts_left(&self) -> u32 {
        self.config.max_attempts() - self.attempts_used
    }

    pub fn active_party(&self) -> Party {
        self.active_party
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Entries appended after the first `cursor` ones.
    pub fn log_since(&self, cursor: usize) -> &[LogEntry] {
        &self.log[cursor.min(self.log.len())..]
    }

    /// The secret number, but only once the game is over.
    pub fn revealed_target(&self) -> Option<i64> {
        self.status.is_terminal().then_some(self.target)
    }
}

/// Validates and scores guesses. Sessions go in by reference and a new
/// session comes out, so a rejected guess cannot leave a half-applied state.
pub struct GuessEngine;

impl GuessEngine {
    /// Trims and parses raw input against the session's range.
    pub fn parse_guess(config: &GameConfig, raw: &str) -> Result<i64, ValidationError> {
        let trimmed = raw.trim();
        let value = trimmed.parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ValidationError::OutOfRange {
                value: trimmed.to_string(),
                min: config.min_number(),
                max: config.max_number(),
            },
            _ => ValidationError::NotANumber(trimmed.to_string()),
        })?;

        if !config.contains(value) {
            return Err(ValidationError::OutOfRange {
                value: value.to_string(),
                min: config.min_number(),
                max: config.max_number(),
            });
        }
        Ok(value)
    }

    pub fn apply_guess(
        session: &GameSession,
        party: Party,
        raw: &str,
    ) -> Result<(GameSession, Outcome), GameError> {
        Self::check_turn(session, party)?;
        let value = Self::parse_guess(&session.config, raw)?;
        Self::score(session, party, value)
    }

    /// Same as [`GuessEngine::apply_guess`] for an already-numeric guess.
    pub fn apply_value(
        session: &GameSession,
        party: Party,
        value: i64,
    ) -> Result<(GameSession, Outcome), GameError> {
        Self::check_turn(session, party)?;
        if !session.config.contains(value) {
            return Err(ValidationError::OutOfRange {
                value: value.to_string(),
                min: session.config.min_number(),
                max: session.config.max_number(),
            }
            .into());
        }
        Self::score(session, party, value)
    }

    fn check_turn(session: &GameSession, party: Party) -> Result<(), GameError> {
        if session.status.is_terminal() {
            return Err(GameError::invalid_state(format!(
                "session already finished ({:?})",
                session.status
            )));
        }
        if session.active_party != party {
            return Err(GameError::invalid_state(format!(
                "{:?} guessed during {:?}'s turn",
                party, session.active_party
            )));
        }
        Ok(())
    }

    fn score(
        session: &GameSession,
        party: Party,
        value: i64,
    ) -> Result<(GameSession, Outcome), GameError> {
        let mut next = session.clone();
        next.attempts_used += 1;

        // A correct guess wins even on the last attempt.
        let outcome = if value == next.target {
            next.status = Status::won_by(party);
            Outcome::Win
        } else if next.attempts_used >= next.config.max_attempts() {
            next.status = Status::LostByAttrition;
            Outcome::Loss
        } else {
            next.active_party = party.other();
            if value < next.target {
                Outcome::TooLow
            } else {
                Outcome::TooHigh
            }
        };

        next.log.push(LogEntry { party, guessed_value: value, outcome });

        debug!(?party, value, ?outcome, attempts = next.attempts_used, "guess scored");
        if outcome.is_terminal() {
            info!(status = ?next.status, attempts = next.attempts_used, target = next.target, "game over");
        }
        Ok((next, outcome))
    }
}
