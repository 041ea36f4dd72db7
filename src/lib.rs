pub mod cli;
pub mod core;
pub mod games;

// Re-export for convenience
pub use crate::core::config::GameConfig;
pub use crate::core::error::{ConfigError, GameError, ValidationError};
pub use crate::games::rand_num::{
    GameSession, GuessEngine, Outcome, Party, Phase, RangeSearchAgent, SessionController, Status,
};
