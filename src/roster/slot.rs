//! Participant slot builder.
//!
//! One function per combat order that changes a slot. Each reads all of its
//! operands before touching the slot, so a rejected order leaves the slot as
//! it was.

use crate::error::{int_in_range, CompileError, OrderError};
use crate::galaxy::{Galaxy, Sector, ShipStatus, SpeciesId};
use crate::protocol::Operands;

use super::battle::{
    EnemyRef, EngageOption, Intent, ParticipantSlot, Stance, StrategicTarget, WithdrawThresholds,
    MAX_PLANET,
};

/// Default cap on engage options per slot.
pub const DEFAULT_MAX_ENGAGE_OPTIONS: usize = 20;

/// Default cap on enemy entries per slot.
pub const DEFAULT_MAX_ENEMIES: usize = 100;

/// `SUMMARY`: the species only wants a summary of the battle.
pub fn set_summary(slot: &mut ParticipantSlot) {
    slot.summary_only = true;
}

/// `WITHDRAW <transport age> <warship age> <fleet %>`.
pub fn set_withdraw(slot: &mut ParticipantSlot, ops: &mut Operands<'_>) -> Result<(), OrderError> {
    let transport_age = int_in_range(ops, "transport withdrawal age", 0, 100)?;
    let warship_age = int_in_range(ops, "warship withdrawal age", 0, 100)?;
    let fleet_percent = int_in_range(ops, "fleet withdrawal percentage", 0, 100)?;
    slot.withdraw = WithdrawThresholds {
        transport_age: transport_age as u8,
        warship_age: warship_age as u8,
        fleet_percent: fleet_percent as u8,
    };
    Ok(())
}

/// Reads a sector as three integer coordinates.
pub fn read_sector(ops: &mut Operands<'_>) -> Result<Sector, OrderError> {
    let x = read_coordinate(ops, "x coordinate")?;
    let y = read_coordinate(ops, "y coordinate")?;
    let z = read_coordinate(ops, "z coordinate")?;
    Ok(Sector::new(x, y, z))
}

fn read_coordinate(ops: &mut Operands<'_>, what: &'static str) -> Result<i32, OrderError> {
    int_in_range(ops, what, i32::MIN as i64, i32::MAX as i64).map(|v| v as i32)
}

/// `HAVEN <x> <y> <z>`.
pub fn set_haven(slot: &mut ParticipantSlot, ops: &mut Operands<'_>) -> Result<(), OrderError> {
    slot.haven = Some(read_sector(ops)?);
    Ok(())
}

/// `ENGAGE <code> [<planet>]`.
///
/// `max_code` is 7 in the combat phase and 4 in the strike phase.
pub fn add_engage(
    slot: &mut ParticipantSlot,
    ops: &mut Operands<'_>,
    max_code: u8,
    max_options: usize,
) -> Result<EngageOption, OrderError> {
    if slot.engage.len() >= max_options {
        return Err(OrderError::TooManyEngageOptions(max_options));
    }
    let code = int_in_range(ops, "engage code", 0, max_code as i64)?;
    let stance = Stance::from_code(code as u8).ok_or(OrderError::OutOfRange {
        what: "engage code",
        value: code,
        min: 0,
        max: max_code as i64,
    })?;
    let planet = if stance.needs_planet() {
        Some(int_in_range(ops, "planet number", 1, MAX_PLANET as i64)? as u8)
    } else {
        None
    };
    let option = EngageOption { stance, planet };
    slot.engage.push(option);
    Ok(option)
}

/// `TARGET <code>`.
pub fn set_target(slot: &mut ParticipantSlot, ops: &mut Operands<'_>) -> Result<(), OrderError> {
    let code = int_in_range(ops, "target code", 1, 4)?;
    slot.target = StrategicTarget::from_code(code as u8);
    Ok(())
}

/// `HIDE <ship>`: keeps a landed ship of `species` out of combat.
///
/// Returns the ship's full name.
pub fn hide_ship(
    galaxy: &mut Galaxy,
    species: SpeciesId,
    ops: &mut Operands<'_>,
) -> Result<String, OrderError> {
    let name = ops.text("ship name")?;
    let ship = galaxy
        .find_ship_mut(species, name)
        .ok_or_else(|| OrderError::NoSuchShip(name.to_string()))?;
    if ship.status != ShipStatus::OnSurface {
        return Err(OrderError::ShipNotLanded(ship.full_name()));
    }
    ship.hidden = true;
    Ok(ship.full_name())
}

/// Appends `enemy` unless the same entry is already listed.
///
/// Returns whether the list grew.
pub fn add_enemy(
    slot: &mut ParticipantSlot,
    enemy: EnemyRef,
    sector: Sector,
    max_enemies: usize,
) -> Result<bool, CompileError> {
    if slot.enemies.contains(&enemy) {
        return Ok(false);
    }
    if slot.enemies.len() >= max_enemies {
        return Err(CompileError::TooManyEnemies {
            species: slot.species,
            sector,
            max: max_enemies,
        });
    }
    slot.enemies.push(enemy);
    Ok(true)
}

/// `ATTACK 0` / `HIJACK 0`: lists every active species the ordering species
/// already counts as an enemy, ascending by id.
///
/// Returns the species added.
pub fn declare_standing_enemies(
    slot: &mut ParticipantSlot,
    galaxy: &Galaxy,
    sector: Sector,
    intent: Intent,
    max_enemies: usize,
) -> Result<Vec<SpeciesId>, CompileError> {
    let me = slot.species;
    let Some(species) = galaxy.species.get(me) else {
        return Ok(Vec::new());
    };
    let mut added = Vec::new();
    for other in galaxy.species.active() {
        if other.id == me || !species.is_enemy(other.id) {
            continue;
        }
        let enemy = EnemyRef {
            species: other.id,
            intent,
        };
        if add_enemy(slot, enemy, sector, max_enemies)? {
            added.push(other.id);
        }
    }
    if intent == Intent::Hijack {
        slot.hijacker = true;
    }
    Ok(added)
}

/// `ATTACK <species>` / `HIJACK <species>` for an already-resolved species.
///
/// The enemy is listed only if it has a presence record at the battle
/// sector. HIJACK marks the slot as a hijacker either way. Returns whether
/// the enemy was listed.
pub fn declare_named_enemy(
    slot: &mut ParticipantSlot,
    galaxy: &Galaxy,
    sector: Sector,
    enemy: EnemyRef,
    max_enemies: usize,
) -> Result<bool, CompileError> {
    if enemy.intent == Intent::Hijack {
        slot.hijacker = true;
    }
    if !galaxy.is_present(enemy.species, sector) {
        return Ok(false);
    }
    add_enemy(slot, enemy, sector, max_enemies)?;
    Ok(true)
}
