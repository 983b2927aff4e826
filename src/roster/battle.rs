//! Battle records and participant slots.
//!
//! A `BattleRecord` describes one sector's battle for the turn: which species
//! fight there and, for each, its stance, withdrawal limits, retreat haven,
//! and declared enemies. Records are handed to the tactical resolver as-is.

use serde::{Deserialize, Serialize};

use crate::galaxy::{Sector, SpeciesId};

/// Highest engage code in the combat phase.
pub const MAX_ENGAGE_CODE: u8 = 7;

/// Highest engage code in the strike phase.
pub const MAX_STRIKE_ENGAGE_CODE: u8 = 4;

/// Highest planet number in a star system.
pub const MAX_PLANET: u8 = 9;

/// A tactical stance, by engage code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stance {
    DefendInPlace = 0,
    DeepSpaceDefense = 1,
    PlanetDefense = 2,
    DeepSpaceFight = 3,
    PlanetAttack = 4,
    PlanetBombardment = 5,
    GermWarfare = 6,
    Siege = 7,
}

/// All stances in code order.
pub const ALL_STANCES: [Stance; 8] = [
    Stance::DefendInPlace,
    Stance::DeepSpaceDefense,
    Stance::PlanetDefense,
    Stance::DeepSpaceFight,
    Stance::PlanetAttack,
    Stance::PlanetBombardment,
    Stance::GermWarfare,
    Stance::Siege,
];

impl Stance {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Stance> {
        ALL_STANCES.get(code as usize).copied()
    }

    /// Returns true for planet defense and the planet attack through siege
    /// range, the stances that name a target planet.
    pub const fn needs_planet(self) -> bool {
        matches!(
            self,
            Stance::PlanetDefense
                | Stance::PlanetAttack
                | Stance::PlanetBombardment
                | Stance::GermWarfare
                | Stance::Siege
        )
    }
}

/// A stance, with its target planet when the stance needs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngageOption {
    pub stance: Stance,
    pub planet: Option<u8>,
}

impl EngageOption {
    /// The option every new slot starts with.
    pub const fn hold() -> Self {
        EngageOption {
            stance: Stance::DefendInPlace,
            planet: None,
        }
    }

    pub const fn defend_planet(planet: u8) -> Self {
        EngageOption {
            stance: Stance::PlanetDefense,
            planet: Some(planet),
        }
    }

    /// Returns true if this option is planet-bound and aimed at `planet`.
    pub fn targets_planet(&self, planet: u8) -> bool {
        self.stance.needs_planet() && self.planet == Some(planet)
    }
}

/// Preferred class of enemy target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StrategicTarget {
    Warships = 1,
    Transports = 2,
    Starbases = 3,
    PlanetaryDefenses = 4,
}

impl StrategicTarget {
    pub fn from_code(code: u8) -> Option<StrategicTarget> {
        match code {
            1 => Some(StrategicTarget::Warships),
            2 => Some(StrategicTarget::Transports),
            3 => Some(StrategicTarget::Starbases),
            4 => Some(StrategicTarget::PlanetaryDefenses),
            _ => None,
        }
    }
}

/// What a species means to do to a named enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Attack,
    Hijack,
}

/// An entry in a participant's enemy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyRef {
    pub species: SpeciesId,
    pub intent: Intent,
}

/// Age and loss limits that make a participant's ships withdraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawThresholds {
    /// Transports at least this age (%) withdraw.
    pub transport_age: u8,
    /// Warships at least this age (%) withdraw.
    pub warship_age: u8,
    /// The whole fleet withdraws after losing this share (%).
    pub fleet_percent: u8,
}

impl Default for WithdrawThresholds {
    fn default() -> Self {
        WithdrawThresholds {
            transport_age: 0,
            warship_age: 100,
            fleet_percent: 100,
        }
    }
}

/// One species' part in one battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSlot {
    pub species: SpeciesId,
    pub target: Option<StrategicTarget>,
    pub withdraw: WithdrawThresholds,
    /// Retreat sector; filled in after dispatch when left unset.
    pub haven: Option<Sector>,
    pub engage: Vec<EngageOption>,
    pub summary_only: bool,
    /// Swept in without orders, so open to ambush.
    pub can_be_surprised: bool,
    pub hijacker: bool,
    pub enemies: Vec<EnemyRef>,
}

impl ParticipantSlot {
    /// Creates the slot a BATTLE order opens.
    pub fn new(species: SpeciesId, summary_only: bool) -> Self {
        ParticipantSlot {
            species,
            target: None,
            withdraw: WithdrawThresholds::default(),
            haven: None,
            engage: vec![EngageOption::hold()],
            summary_only,
            can_be_surprised: false,
            hijacker: false,
            enemies: Vec::new(),
        }
    }

    /// Creates the slot for a species swept in without orders.
    pub fn surprised(species: SpeciesId, summary_only: bool) -> Self {
        ParticipantSlot {
            can_be_surprised: true,
            ..ParticipantSlot::new(species, summary_only)
        }
    }

    /// Returns true if the enemy list names `species` with either intent.
    pub fn names_enemy(&self, species: SpeciesId) -> bool {
        self.enemies.iter().any(|e| e.species == species)
    }

    /// Returns true if this participant names `species` as an enemy and
    /// holds a planet-bound option aimed at `planet`.
    pub fn threatens_planet(&self, species: SpeciesId, planet: u8) -> bool {
        self.names_enemy(species) && self.engage.iter().any(|o| o.targets_planet(planet))
    }
}

/// All participants in one sector's battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub sector: Sector,
    pub slots: Vec<ParticipantSlot>,
}

impl BattleRecord {
    pub fn new(sector: Sector) -> Self {
        BattleRecord {
            sector,
            slots: Vec::new(),
        }
    }

    pub fn slot_index(&self, species: SpeciesId) -> Option<usize> {
        self.slots.iter().position(|s| s.species == species)
    }

    pub fn slot(&self, species: SpeciesId) -> Option<&ParticipantSlot> {
        self.slots.iter().find(|s| s.species == species)
    }

    pub fn has_participant(&self, species: SpeciesId) -> bool {
        self.slot_index(species).is_some()
    }

    /// Returns the participating species in slot order.
    pub fn participants(&self) -> Vec<SpeciesId> {
        self.slots.iter().map(|s| s.species).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stance_codes_roundtrip() {
        for stance in ALL_STANCES {
            assert_eq!(Stance::from_code(stance.code()), Some(stance));
        }
        assert_eq!(Stance::from_code(8), None);
    }

    #[test]
    fn planet_bound_stances() {
        let bound: Vec<u8> = ALL_STANCES
            .iter()
            .filter(|s| s.needs_planet())
            .map(|s| s.code())
            .collect();
        assert_eq!(bound, vec![2, 4, 5, 6, 7]);
    }

    #[test]
    fn new_slot_defaults() {
        let slot = ParticipantSlot::new(SpeciesId(3), true);
        assert_eq!(slot.target, None);
        assert_eq!(slot.withdraw.transport_age, 0);
        assert_eq!(slot.withdraw.warship_age, 100);
        assert_eq!(slot.withdraw.fleet_percent, 100);
        assert_eq!(slot.haven, None);
        assert_eq!(slot.engage, vec![EngageOption::hold()]);
        assert!(slot.summary_only);
        assert!(!slot.can_be_surprised);
        assert!(!slot.hijacker);
        assert!(slot.enemies.is_empty());
    }

    #[test]
    fn surprised_slot_differs_only_in_flag() {
        let a = ParticipantSlot::new(SpeciesId(1), false);
        let b = ParticipantSlot::surprised(SpeciesId(1), false);
        assert!(b.can_be_surprised);
        assert_eq!(
            ParticipantSlot {
                can_be_surprised: false,
                ..b
            },
            a
        );
    }

    #[test]
    fn threatens_planet_needs_enemy_and_option() {
        let mut slot = ParticipantSlot::new(SpeciesId(1), false);
        slot.engage.push(EngageOption {
            stance: Stance::Siege,
            planet: Some(3),
        });
        assert!(!slot.threatens_planet(SpeciesId(2), 3));

        slot.enemies.push(EnemyRef {
            species: SpeciesId(2),
            intent: Intent::Hijack,
        });
        assert!(slot.threatens_planet(SpeciesId(2), 3));
        assert!(!slot.threatens_planet(SpeciesId(2), 4));
    }

    #[test]
    fn deep_space_fight_never_targets_planet() {
        let opt = EngageOption {
            stance: Stance::DeepSpaceFight,
            planet: Some(3),
        };
        assert!(!opt.targets_planet(3));
    }
}
