use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::config::GameConfig;
use crate::core::error::GameError;
use crate::games::rand_num::agent::RangeSearchAgent;
use crate::games::rand_num::game::{GameSession, GuessEngine, Hint, LogEntry, Outcome, Party, Status};

/// Identity of one play-through, increasing with every new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingHumanGuess,
    AgentThinking,
    Terminal,
}

/// Events produced by the controller's own timer.
///
/// `turn` counts the agent moves scheduled within one session, so only the
/// most recently scheduled timer can play the agent's move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    AgentTimerFired { session: SessionId, turn: u64 },
}

/// The opponent's move once its thinking delay ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentTurn {
    pub guess: i64,
    pub outcome: Outcome,
}

/// Drives turn order between the player and the computer.
///
/// Every method that can schedule the computer's move (`submit_guess`) must
/// run inside a tokio runtime. The move itself arrives as a
/// [`ControllerEvent`] from [`SessionController::next_event`] and is applied
/// by [`SessionController::handle_event`], so all state changes happen on the
/// caller's task.
pub struct SessionController {
    config: GameConfig,
    session_id: SessionId,
    session: Option<GameSession>,
    agent: RangeSearchAgent,
    agent_hint: Option<Hint>,
    phase: Phase,
    agent_turns: u64,
    pending_timer: Option<JoinHandle<()>>,
    timer_tx: mpsc::UnboundedSender<ControllerEvent>,
    timer_rx: mpsc::UnboundedReceiver<ControllerEvent>,
}

impl SessionController {
    pub fn new(config: GameConfig) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            agent: RangeSearchAgent::new(&config),
            config,
            session_id: SessionId(0),
            session: None,
            agent_hint: None,
            phase: Phase::Idle,
            agent_turns: 0,
            pending_timer: None,
            timer_tx,
            timer_rx,
        }
    }

    /// Throws away whatever game was running and starts a fresh one.
    pub fn start_new_game(&mut self) -> SessionId {
        self.install(GameSession::new(self.config))
    }

    /// Like [`SessionController::start_new_game`] with a known secret number.
    pub fn start_with_target(&mut self, target: i64) -> Result<SessionId, GameError> {
        let session = GameSession::with_target(self.config, target)?;
        Ok(self.install(session))
    }

    fn install(&mut self, session: GameSession) -> SessionId {
        if let Some(timer) = self.pending_timer.take() {
            debug!(session = ?self.session_id, "cancelling pending agent timer");
            timer.abort();
        }

        self.session_id = SessionId(self.session_id.0 + 1);
        self.session = Some(session);
        self.agent = RangeSearchAgent::new(&self.config);
        self.agent_hint = None;
        self.agent_turns = 0;
        self.phase = Phase::AwaitingHumanGuess;

        info!(
            session = ?self.session_id,
            min = self.config.min_number(),
            max = self.config.max_number(),
            attempts = self.config.max_attempts(),
            "new game started"
        );
        self.session_id
    }

    /// Applies the player's guess. Validation errors leave everything as it was.
    pub fn submit_guess(&mut self, raw: &str) -> Result<Outcome, GameError> {
        if self.phase != Phase::AwaitingHumanGuess {
            return Err(GameError::invalid_state(format!(
                "cannot submit a guess while {:?}",
                self.phase
            )));
        }
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| GameError::invalid_state("no game in progress"))?;

        let (next, outcome) = GuessEngine::apply_guess(session, Party::Human, raw)?;
        let agent_to_move = next.active_party() == Party::Agent;
        self.session = Some(next);

        if outcome.is_terminal() {
            self.phase = Phase::Terminal;
        } else if agent_to_move {
            self.schedule_agent();
        }
        Ok(outcome)
    }

    fn schedule_agent(&mut self) {
        self.phase = Phase::AgentThinking;
        self.agent_turns += 1;

        let event = ControllerEvent::AgentTimerFired {
            session: self.session_id,
            turn: self.agent_turns,
        };
        let delay = self.config.think_delay();
        let tx = self.timer_tx.clone();
        debug!(?event, ?delay, "agent thinking");

        self.pending_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // receiver lives as long as the controller
            let _ = tx.send(event);
        }));
    }

    /// Waits for the next timer event.
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.timer_rx.recv().await
    }

    /// Returns a timer event that has already fired, without waiting.
    pub fn try_next_event(&mut self) -> Option<ControllerEvent> {
        self.timer_rx.try_recv().ok()
    }

    /// Plays the computer's move if the event belongs to the timer scheduled
    /// last in the running game. Any other event is dropped and yields `Ok(None)`.
    pub fn handle_event(&mut self, event: ControllerEvent) -> Result<Option<AgentTurn>, GameError> {
        match event {
            ControllerEvent::AgentTimerFired { session, turn } => {
                if session != self.session_id
                    || turn != self.agent_turns
                    || self.phase != Phase::AgentThinking
                {
                    debug!(
                        stale = ?session,
                        stale_turn = turn,
                        current = ?self.session_id,
                        current_turn = self.agent_turns,
                        "discarding stale agent timer"
                    );
                    return Ok(None);
                }
                if let Some(timer) = self.pending_timer.take() {
                    timer.abort();
                }
                self.play_agent_turn().map(Some)
            }
        }
    }

    /// Waits out the thinking delay and plays the computer's move.
    /// Returns `Ok(None)` right away when the computer is not thinking.
    pub async fn wait_for_agent(&mut self) -> Result<Option<AgentTurn>, GameError> {
        while self.phase == Phase::AgentThinking {
            let Some(event) = self.next_event().await else {
                break;
            };
            if let Some(turn) = self.handle_event(event)? {
                return Ok(Some(turn));
            }
        }
        Ok(None)
    }

    fn play_agent_turn(&mut self) -> Result<AgentTurn, GameError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| GameError::invalid_state("agent timer fired without a game"))?;

        let applied = self
            .agent
            .next_guess(self.agent_hint)
            .and_then(|guess| GuessEngine::apply_value(session, Party::Agent, guess).map(|r| (guess, r)));

        let (guess, (next, outcome)) = match applied {
            Ok(applied) => applied,
            Err(e) => {
                warn!(session = ?self.session_id, error = %e, "aborting session");
                self.phase = Phase::Terminal;
                return Err(e);
            }
        };

        self.agent_hint = outcome.hint();
        self.phase = if outcome.is_terminal() {
            Phase::Terminal
        } else {
            Phase::AwaitingHumanGuess
        };
        self.session = Some(next);

        info!(session = ?self.session_id, guess, ?outcome, "agent moved");
        Ok(AgentTurn { guess, outcome })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn agent(&self) -> &RangeSearchAgent {
        &self.agent
    }

    pub fn active_party(&self) -> Option<Party> {
        self.session.as_ref().map(GameSession::active_party)
    }

    pub fn attempts_used(&self) -> u32 {
        self.session.as_ref().map_or(0, GameSession::attempts_used)
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts()
    }

    /// Status of the current session. A session aborted because the agent's
    /// search ran out keeps `InProgress` here; check [`SessionController::phase`]
    /// for `Terminal` to know no more guesses are taken.
    pub fn status(&self) -> Option<Status> {
        self.session.as_ref().map(GameSession::status)
    }

    pub fn log(&self) -> &[LogEntry] {
        self.session.as_ref().map(GameSession::log).unwrap_or_default()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(timer) = self.pending_timer.take() {
            timer.abort();
        }
    }
}
