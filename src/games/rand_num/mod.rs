/// Number duel: the player against a range-search opponent
pub mod agent;
pub mod game;
pub mod renderer;
pub mod session;
pub mod simulate;

pub use agent::RangeSearchAgent;
pub use game::{GameSession, GuessEngine, Hint, LogEntry, Outcome, Party, Status};
pub use renderer::NumberRenderer;
pub use session::{AgentTurn, ControllerEvent, Phase, SessionController, SessionId};
pub use simulate::{solo_run, SoloReport};
