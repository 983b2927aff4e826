//! Passes that run over the assembled battle records.
//!
//! `surprise` and `haven` finish the rosters after every species' orders
//! have been dispatched; `enmity` runs on the tactical resolver's output.

pub mod enmity;
pub mod haven;
pub mod surprise;

pub use enmity::{declare_enmity, Betrayal, BetrayalLedger};
pub use haven::{assign_havens, neighbour};
pub use surprise::include_bystanders;
