use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::core::config::{GameConfig, DEFAULT_ATTEMPTS, DEFAULT_MAX, DEFAULT_MIN};
use crate::core::error::GameError;
use crate::core::logging::init_logging;
use crate::core::terminal::TerminalContext;
use crate::games::rand_num::{solo_run, NumberRenderer, Phase, SessionController};

#[derive(Parser)]
#[command(name = "number-duel")]
#[command(about = "Guess the number before the computer does")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub game: GameArgs,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// Lowest possible secret number
    #[arg(long, default_value_t = DEFAULT_MIN, global = true)]
    pub min: i64,

    /// Highest possible secret number
    #[arg(long, default_value_t = DEFAULT_MAX, global = true)]
    pub max: i64,

    /// Guesses shared by both sides before the game is lost
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS, global = true)]
    pub attempts: u32,

    /// How long the computer "thinks" before guessing, in milliseconds
    #[arg(long, default_value_t = 2000, global = true)]
    pub think_ms: u64,
}

impl GameArgs {
    pub fn to_config(&self) -> Result<GameConfig> {
        let config = GameConfig::new(self.min, self.max, self.attempts)
            .context("invalid game configuration")?
            .with_think_delay(Duration::from_millis(self.think_ms));
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play against the computer (default)
    Play {
        /// Fix the secret number instead of drawing one
        #[arg(long)]
        target: Option<i64>,
    },
    /// Let the computer play alone and show how it narrows down the target
    Simulate {
        /// Secret number to search for (random if omitted)
        #[arg(long)]
        target: Option<i64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.game.to_config()?;
    info!(?config, "configuration loaded");

    match cli.command {
        None => play(config, None).await,
        Some(Commands::Play { target }) => play(config, target).await,
        Some(Commands::Simulate { target, json }) => simulate(config, target, json),
    }
}

fn start(controller: &mut SessionController, target: Option<i64>) -> Result<()> {
    match target {
        Some(target) => {
            controller
                .start_with_target(target)
                .context("--target must lie inside the configured range")?;
        }
        None => {
            controller.start_new_game();
        }
    }
    Ok(())
}

/// What the interactive loop should do after one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Continue,
    Quit,
}

/// Handles one line typed by the player. Guesses are only forwarded while
/// it is the player's turn; other phases get a status message instead.
pub fn handle_line<W: Write>(
    controller: &mut SessionController,
    renderer: &mut NumberRenderer<W>,
    line: &str,
    target: Option<i64>,
) -> Result<LineAction> {
    match line.trim() {
        "quit" | "exit" => return Ok(LineAction::Quit),
        "new" => {
            start(controller, target)?;
            if let Some(session) = controller.session() {
                renderer.intro(session)?;
            }
        }
        input => match controller.phase() {
            Phase::Idle => {}
            Phase::AgentThinking => renderer.agent_thinking()?,
            Phase::Terminal => renderer.game_over()?,
            Phase::AwaitingHumanGuess => match controller.submit_guess(input) {
                Ok(_) => {
                    if let Some(session) = controller.session() {
                        renderer.log_updates(session)?;
                    }
                }
                Err(e) => report_error(renderer, &e)?,
            },
        },
    }
    Ok(LineAction::Continue)
}

/// Shows validation problems to the player; everything else goes to the log.
fn report_error<W: Write>(renderer: &mut NumberRenderer<W>, err: &GameError) -> Result<()> {
    match err {
        GameError::Validation(e) => renderer.invalid_guess(e)?,
        GameError::SearchExhausted { .. } => {
            warn!(error = %err, "computer search aborted");
            renderer.search_aborted()?;
        }
        GameError::InvalidState(_) => warn!(error = %err, "unexpected controller state"),
    }
    Ok(())
}

async fn play(config: GameConfig, target: Option<i64>) -> Result<()> {
    let mut controller = SessionController::new(config);
    let mut renderer = NumberRenderer::new(TerminalContext::new());

    start(&mut controller, target)?;
    if let Some(session) = controller.session() {
        renderer.intro(session)?;
    }
    renderer.prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if handle_line(&mut controller, &mut renderer, &line, target)? == LineAction::Quit {
                    break;
                }
                renderer.prompt()?;
            }

            Some(event) = controller.next_event() => {
                match controller.handle_event(event) {
                    Ok(Some(_)) => {
                        renderer.line("")?;
                        if let Some(session) = controller.session() {
                            renderer.log_updates(session)?;
                        }
                        renderer.prompt()?;
                    }
                    Ok(None) => {}
                    Err(e) => report_error(&mut renderer, &e)?,
                }
            }
        }
    }

    renderer.line("Goodbye!")?;
    Ok(())
}

fn simulate(config: GameConfig, target: Option<i64>, json: bool) -> Result<()> {
    let target = target.unwrap_or_else(|| {
        rand::rng().random_range(config.min_number()..=config.max_number())
    });
    let report = solo_run(config, target).context("simulation failed")?;

    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Target: {}", report.target)?;
    for (i, entry) in report.guesses.iter().enumerate() {
        writeln!(out, "{:>2}. guessed {:>4} -> {:?}", i + 1, entry.guessed_value, entry.outcome)?;
    }
    if report.found {
        writeln!(out, "Found in {} guesses", report.guesses.len())?;
    } else {
        writeln!(out, "Ran out of attempts")?;
    }
    Ok(())
}
