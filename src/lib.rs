//! Warroom combat-order compiler.
//!
//! Reads every species' combat orders for a turn and assembles the battle
//! rosters the tactical resolver runs on: who fights whom in each sector,
//! with what stance, withdrawal limits, and retreat havens.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod galaxy;
pub mod pass;
pub mod protocol;
pub mod resolver;
pub mod roster;
pub mod transcript;
pub mod turn;

pub use config::CompileConfig;
pub use error::{CompileError, OrderError};
pub use turn::{compile_rosters, run_turn, TurnReport};
