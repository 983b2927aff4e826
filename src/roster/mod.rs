//! Battle rosters.
//!
//! The data handed to the tactical resolver, the registry that builds it,
//! and the per-order slot mutations.

pub mod battle;
pub mod registry;
pub mod slot;

pub use battle::{
    BattleRecord, EnemyRef, EngageOption, Intent, ParticipantSlot, Stance, StrategicTarget,
    WithdrawThresholds, ALL_STANCES, MAX_ENGAGE_CODE, MAX_PLANET, MAX_STRIKE_ENGAGE_CODE,
};
pub use registry::{BattleRegistry, SlotHandle, DEFAULT_MAX_BATTLES};
pub use slot::{DEFAULT_MAX_ENEMIES, DEFAULT_MAX_ENGAGE_OPTIONS};
