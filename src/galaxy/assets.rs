//! Ships and colonies.
//!
//! Only the fields the combat compiler needs are modelled: ownership,
//! position, status, and visibility.

use serde::{Deserialize, Serialize};

use super::sector::Sector;
use super::species::SpeciesId;

/// Where a ship is and what it is doing this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipStatus {
    UnderConstruction,
    /// Landed on a planet's surface.
    OnSurface,
    InOrbit,
    InDeepSpace,
    /// Jumped out during an earlier combat round this turn.
    JumpedInCombat,
    /// Forced to jump out by an earlier combat this turn.
    ForcedJump,
}

impl ShipStatus {
    /// Returns true if a ship with this status takes part in combat.
    pub const fn can_fight(self) -> bool {
        !matches!(
            self,
            ShipStatus::UnderConstruction
                | ShipStatus::OnSurface
                | ShipStatus::JumpedInCombat
                | ShipStatus::ForcedJump
        )
    }
}

/// A ship record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    /// Class abbreviation, e.g. `BC` or `TR5`.
    pub class: String,
    pub name: String,
    pub owner: SpeciesId,
    pub sector: Sector,
    #[serde(default)]
    pub planet: Option<u8>,
    pub status: ShipStatus,
    /// Kept out of combat by a HIDE order.
    #[serde(default)]
    pub hidden: bool,
}

impl Ship {
    /// Returns `"<class> <name>"`, the form used in order files.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.class, self.name)
    }

    /// Case-insensitive match against either the bare name or the
    /// class-qualified name.
    pub fn answers_to(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query) || self.full_name().eq_ignore_ascii_case(query)
    }
}

/// A colony on a numbered planet of a star system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colony {
    pub name: String,
    pub owner: SpeciesId,
    pub sector: Sector,
    pub planet: u8,
    #[serde(default)]
    pub population: u32,
    #[serde(default)]
    pub hidden: bool,
}

impl Colony {
    pub fn is_populated(&self) -> bool {
        self.population > 0
    }
}
