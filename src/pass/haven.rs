//! Default retreat havens.

use rand::Rng;

use crate::galaxy::Sector;
use crate::roster::BattleRecord;

/// Gives every participant without a haven one in a neighbouring sector.
///
/// Returns how many havens were assigned.
pub fn assign_havens<R: Rng + ?Sized>(battle: &mut BattleRecord, rng: &mut R) -> usize {
    let sector = battle.sector;
    let mut assigned = 0;
    for slot in battle.slots.iter_mut().filter(|s| s.haven.is_none()) {
        slot.haven = Some(neighbour(sector, rng));
        assigned += 1;
    }
    assigned
}

/// Picks a random sector adjacent to `sector` (offsets in -1..=1 per axis,
/// never all zero). Offsets that would leave the coordinate range are
/// drawn again.
pub fn neighbour<R: Rng + ?Sized>(sector: Sector, rng: &mut R) -> Sector {
    loop {
        let (dx, dy, dz) = (
            rng.gen_range(-1..=1),
            rng.gen_range(-1..=1),
            rng.gen_range(-1..=1),
        );
        if (dx, dy, dz) == (0, 0, 0) {
            continue;
        }
        if let Some(next) = sector.offset(dx, dy, dz) {
            return next;
        }
    }
}
