use serde::Serialize;

use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::games::rand_num::agent::RangeSearchAgent;
use crate::games::rand_num::game::{GameSession, LogEntry, Outcome, Party};

/// Result of letting the computer play alone against a fixed target.
#[derive(Debug, Clone, Serialize)]
pub struct SoloReport {
    pub config: GameConfig,
    pub target: i64,
    pub found: bool,
    pub guesses: Vec<LogEntry>,
}

/// Agent-only play: every attempt in the budget goes to the computer.
pub fn solo_run(config: GameConfig, target: i64) -> Result<SoloReport, GameError> {
    // validates the target against the range
    GameSession::with_target(config, target)?;

    let mut agent = RangeSearchAgent::new(&config);
    let mut guesses = Vec::new();
    let mut hint = None;

    for attempt in 1..=config.max_attempts() {
        let guess = agent.next_guess(hint)?;
        let outcome = if guess == target {
            Outcome::Win
        } else if attempt == config.max_attempts() {
            Outcome::Loss
        } else if guess < target {
            Outcome::TooLow
        } else {
            Outcome::TooHigh
        };
        guesses.push(LogEntry { party: Party::Agent, guessed_value: guess, outcome });
        if outcome.is_terminal() {
            break;
        }
        hint = outcome.hint();
    }

    let found = guesses.last().is_some_and(|e| e.outcome == Outcome::Win);
    Ok(SoloReport { config, target, found, guesses })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_target_in_seven() {
        for target in 1..=100 {
            let report = solo_run(GameConfig::default(), target).unwrap();
            assert!(report.found, "missed {target}");
            assert!(report.guesses.len() <= 7);
        }
    }

    #[test]
    fn small_budget_ends_in_loss() {
        let config = GameConfig::new(1, 100, 2).unwrap();
        let report = solo_run(config, 1).unwrap();
        assert!(!report.found);
        let outcomes: Vec<_> = report.guesses.iter().map(|e| e.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::TooHigh, Outcome::Loss]);
    }

    #[test]
    fn report_serializes() {
        let report = solo_run(GameConfig::default(), 75).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["target"], 75);
        assert_eq!(json["config"]["max_attempts"], 12);
        assert_eq!(json["guesses"][1]["outcome"], "Win");
    }
}
