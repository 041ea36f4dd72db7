pub mod config;
pub mod error;
pub mod logging;
pub mod terminal; // Line-oriented terminal output
