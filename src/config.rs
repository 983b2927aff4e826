//! Compiler configuration.

use crate::roster::{
    DEFAULT_MAX_BATTLES, DEFAULT_MAX_ENEMIES, DEFAULT_MAX_ENGAGE_OPTIONS, MAX_ENGAGE_CODE,
    MAX_STRIKE_ENGAGE_CODE,
};

/// Settings for compiling one turn's combat orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
    /// New slots start in summary-only mode.
    pub default_summary: bool,
    /// Compile the strike section (`START STRIKES`) instead of `START COMBAT`.
    pub strike_phase: bool,
    /// Maximum distinct battle locations per turn.
    pub max_battles: usize,
    /// Maximum engage options per participant.
    pub max_engage_options: usize,
    /// Maximum enemy entries per participant.
    pub max_enemies: usize,
    /// Seed for haven placement (None = entropy).
    pub seed: Option<u64>,
}

impl CompileConfig {
    /// Highest engage code accepted in the configured phase.
    pub fn max_engage_code(&self) -> u8 {
        if self.strike_phase {
            MAX_STRIKE_ENGAGE_CODE
        } else {
            MAX_ENGAGE_CODE
        }
    }

    /// Section name that opens this phase's orders.
    pub fn section(&self) -> &'static str {
        if self.strike_phase {
            "STRIKES"
        } else {
            "COMBAT"
        }
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        CompileConfig {
            default_summary: false,
            strike_phase: false,
            max_battles: DEFAULT_MAX_BATTLES,
            max_engage_options: DEFAULT_MAX_ENGAGE_OPTIONS,
            max_enemies: DEFAULT_MAX_ENEMIES,
            seed: None,
        }
    }
}
