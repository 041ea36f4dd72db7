use std::io::{self, Write};

use crate::core::error::ValidationError;
use crate::core::terminal::{TerminalColor, TerminalContext};
use crate::games::rand_num::game::{GameSession, LogEntry, Outcome, Party, Status};

/// Text front end for the duel. Only reads game state, never changes it.
pub struct NumberRenderer<W: Write> {
    term: TerminalContext<W>,
    cursor: usize,
}

impl<W: Write> NumberRenderer<W> {
    pub fn new(term: TerminalContext<W>) -> Self {
        Self { term, cursor: 0 }
    }

    pub fn intro(&mut self, session: &GameSession) -> io::Result<()> {
        self.cursor = 0;
        let config = session.config();
        self.term.empty_line()?;
        self.term.print_colored_line("=== Game Log ===", TerminalColor::Cyan)?;
        self.term.print_line(&format!(
            "Guess the number between {} and {}. Attempts Left: {}",
            config.min_number(),
            config.max_number(),
            session.attempts_left()
        ))?;
        self.term.print_line("Type a number, 'new' for a new game, 'quit' to leave.")?;
        self.term.flush()
    }

    /// Prints log entries added since the last call.
    pub fn log_updates(&mut self, session: &GameSession) -> io::Result<()> {
        for entry in session.log_since(self.cursor) {
            self.entry(entry, session)?;
        }
        self.cursor = session.log().len();

        match session.status() {
            Status::InProgress => {
                let turn = match session.active_party() {
                    Party::Human => "Player Turn",
                    Party::Agent => "Computer Turn (thinking...)",
                };
                self.term.print_line(&format!("{turn}  |  Attempts Left: {}", session.attempts_left()))?;
            }
            _ => self.game_over()?,
        }
        self.term.flush()
    }

    fn entry(&mut self, entry: &LogEntry, session: &GameSession) -> io::Result<()> {
        let who = entry.party.label();
        self.term.print_line(&format!("{who} guessed: {}", entry.guessed_value))?;
        match entry.outcome {
            Outcome::TooLow => self.term.print_line("Too low!"),
            Outcome::TooHigh => self.term.print_line("Too high!"),
            Outcome::Win => self.term.print_colored_line(&format!("{who} wins!"), TerminalColor::Green),
            Outcome::Loss => {
                let target = session
                    .revealed_target()
                    .map_or_else(|| "hidden".to_string(), |t| t.to_string());
                self.term.print_colored_line(
                    &format!("Game Over! The correct number was {target}"),
                    TerminalColor::Red,
                )
            }
        }
    }

    pub fn invalid_guess(&mut self, err: &ValidationError) -> io::Result<()> {
        self.term.print_colored_line(&format!("Please try again: {err}"), TerminalColor::Red)?;
        self.term.flush()
    }

    pub fn agent_thinking(&mut self) -> io::Result<()> {
        self.term
            .print_colored_line("The computer is thinking, wait for your turn.", TerminalColor::Yellow)?;
        self.term.flush()
    }

    pub fn game_over(&mut self) -> io::Result<()> {
        self.term
            .print_colored_line("Game Over! Type 'new' to start again", TerminalColor::Yellow)?;
        self.term.flush()
    }

    pub fn search_aborted(&mut self) -> io::Result<()> {
        self.term.print_colored_line(
            "The computer lost track. Type 'new' to start again",
            TerminalColor::Red,
        )?;
        self.term.flush()
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        self.term.print("> ")?;
        self.term.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.term.print_colored_line(text, TerminalColor::Default)?;
        self.term.flush()
    }

    pub fn into_inner(self) -> W {
        self.term.into_inner()
    }
}
