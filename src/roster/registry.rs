//! Battle roster registry.
//!
//! Maps sectors to their battle records for the turn. Records are created on
//! the first accepted BATTLE order for a sector and are never merged.

use crate::error::{CompileError, OrderError, OrderFault};
use crate::galaxy::{Galaxy, Sector, SpeciesId};

use super::battle::{BattleRecord, ParticipantSlot};

/// Default cap on distinct battle locations per turn.
pub const DEFAULT_MAX_BATTLES: usize = 50;

/// Locates one participant slot inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    pub battle: usize,
    pub slot: usize,
}

/// The turn's battle records, in creation order.
#[derive(Debug, Clone)]
pub struct BattleRegistry {
    battles: Vec<BattleRecord>,
    max_battles: usize,
}

impl BattleRegistry {
    pub fn new(max_battles: usize) -> Self {
        BattleRegistry {
            battles: Vec::new(),
            max_battles,
        }
    }

    /// Returns the index of the record for `sector`, if any.
    pub fn find(&self, sector: Sector) -> Option<usize> {
        self.battles.iter().position(|b| b.sector == sector)
    }

    /// Returns the record for `sector`, creating it if needed.
    ///
    /// Fails fatally once the turn already holds `max_battles` records.
    pub fn get_or_create(&mut self, sector: Sector) -> Result<usize, CompileError> {
        if let Some(idx) = self.find(sector) {
            return Ok(idx);
        }
        if self.battles.len() >= self.max_battles {
            return Err(CompileError::TooManyBattles(self.max_battles));
        }
        self.battles.push(BattleRecord::new(sector));
        tracing::debug!(%sector, battles = self.battles.len(), "battle record created");
        Ok(self.battles.len() - 1)
    }

    /// Puts `species` into the battle at `sector`, reusing its slot if it
    /// already has one.
    ///
    /// The species must have a presence record at exactly that sector;
    /// otherwise the order is rejected and no record is created.
    pub fn join(
        &mut self,
        galaxy: &Galaxy,
        species: SpeciesId,
        sector: Sector,
        summary_only: bool,
    ) -> Result<SlotHandle, OrderFault> {
        if !galaxy.is_present(species, sector) {
            return Err(OrderError::NotPresent(sector).into());
        }
        let battle = self.get_or_create(sector)?;
        let record = &mut self.battles[battle];
        let slot = match record.slot_index(species) {
            Some(i) => i,
            None => {
                record.slots.push(ParticipantSlot::new(species, summary_only));
                record.slots.len() - 1
            }
        };
        Ok(SlotHandle { battle, slot })
    }

    pub fn battle(&self, idx: usize) -> &BattleRecord {
        &self.battles[idx]
    }

    pub fn slot(&self, handle: SlotHandle) -> &ParticipantSlot {
        &self.battles[handle.battle].slots[handle.slot]
    }

    pub fn slot_mut(&mut self, handle: SlotHandle) -> &mut ParticipantSlot {
        &mut self.battles[handle.battle].slots[handle.slot]
    }

    pub fn sector_of(&self, handle: SlotHandle) -> Sector {
        self.battles[handle.battle].sector
    }

    pub fn battles(&self) -> &[BattleRecord] {
        &self.battles
    }

    pub fn battles_mut(&mut self) -> &mut [BattleRecord] {
        &mut self.battles
    }

    pub fn len(&self) -> usize {
        self.battles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    pub fn into_battles(self) -> Vec<BattleRecord> {
        self.battles
    }
}

impl Default for BattleRegistry {
    fn default() -> Self {
        BattleRegistry::new(DEFAULT_MAX_BATTLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::Presence;

    fn galaxy_with(presences: &[(u16, Sector)]) -> Galaxy {
        let mut g = Galaxy::new();
        for &(sp, sector) in presences {
            g.presences.push(Presence {
                species: SpeciesId(sp),
                sector,
                planet: None,
            });
        }
        g
    }

    #[test]
    fn get_or_create_reuses_matching_sector() {
        let mut reg = BattleRegistry::new(4);
        let a = reg.get_or_create(Sector::new(1, 1, 1)).unwrap();
        let b = reg.get_or_create(Sector::new(2, 2, 2)).unwrap();
        let c = reg.get_or_create(Sector::new(1, 1, 1)).unwrap();
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn capacity_overflow_is_fatal() {
        let mut reg = BattleRegistry::new(1);
        reg.get_or_create(Sector::new(1, 1, 1)).unwrap();
        assert_eq!(
            reg.get_or_create(Sector::new(2, 2, 2)),
            Err(CompileError::TooManyBattles(1))
        );
        // An existing sector is still reachable at capacity.
        assert!(reg.get_or_create(Sector::new(1, 1, 1)).is_ok());
    }

    #[test]
    fn join_requires_presence() {
        let here = Sector::new(5, 5, 5);
        let g = galaxy_with(&[(1, Sector::new(6, 6, 6))]);
        let mut reg = BattleRegistry::default();
        assert_eq!(
            reg.join(&g, SpeciesId(1), here, false),
            Err(OrderFault::Rejected(OrderError::NotPresent(here)))
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn join_twice_reuses_slot() {
        let here = Sector::new(5, 5, 5);
        let g = galaxy_with(&[(1, here), (2, here)]);
        let mut reg = BattleRegistry::default();
        let first = reg.join(&g, SpeciesId(1), here, false).unwrap();
        let other = reg.join(&g, SpeciesId(2), here, false).unwrap();
        let again = reg.join(&g, SpeciesId(1), here, true).unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(reg.battle(first.battle).slots.len(), 2);
        // Rejoining does not reset the existing slot.
        assert!(!reg.slot(again).summary_only);
    }
}
