//! Auto-inclusion of species that gave no orders.
//!
//! A species present in a battle sector without a slot of its own is swept
//! into the battle if it has something there that can fight or be fought:
//! a ship that is neither landed, under construction, nor already gone from
//! combat, or a populated colony that is not hidden. A hidden colony still
//! counts when some participant names the species as an enemy and aims a
//! planet-bound stance at that colony's planet.

use crate::galaxy::{Colony, Galaxy, SpeciesId};
use crate::roster::{BattleRecord, EngageOption, ParticipantSlot};

/// Adds slots for every qualifying bystander, ascending by species id.
///
/// Returns the species added.
pub fn include_bystanders(
    battle: &mut BattleRecord,
    galaxy: &Galaxy,
    default_summary: bool,
    max_engage_options: usize,
) -> Vec<SpeciesId> {
    let mut added = Vec::new();
    for species in galaxy.species_at(battle.sector) {
        if battle.has_participant(species) {
            continue;
        }

        let armed = galaxy
            .ships_at(battle.sector)
            .any(|s| s.owner == species && s.status.can_fight());
        let colonies: Vec<&Colony> = galaxy
            .colonies_at(battle.sector)
            .filter(|c| c.owner == species && c.is_populated())
            .filter(|c| !c.hidden || exposed(battle, species, c.planet))
            .collect();

        if !armed && colonies.is_empty() {
            continue;
        }

        let mut slot = ParticipantSlot::surprised(species, default_summary);
        for colony in colonies {
            if slot.engage.len() >= max_engage_options {
                break;
            }
            slot.engage.push(EngageOption::defend_planet(colony.planet));
        }
        tracing::debug!(sector = %battle.sector, %species, "species included without orders");
        battle.slots.push(slot);
        added.push(species);
    }
    added
}

/// Returns true if a participant's orders uncover the hidden colony of
/// `species` on `planet`.
fn exposed(battle: &BattleRecord, species: SpeciesId, planet: u8) -> bool {
    battle
        .slots
        .iter()
        .any(|slot| slot.threatens_planet(species, planet))
}
