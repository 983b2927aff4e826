//! Turn driver.
//!
//! Compiles every selected species' combat orders into battle rosters,
//! finishes the rosters, hands them to the tactical resolver, and applies
//! the resulting war declarations. All changes are made to a working copy
//! of the galaxy that replaces the caller's only if the commit gate agrees.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::config::CompileConfig;
use crate::dispatch::{Dispatcher, Session};
use crate::error::CompileError;
use crate::galaxy::{Galaxy, SpeciesId};
use crate::pass::{assign_havens, declare_enmity, include_bystanders, BetrayalLedger};
use crate::protocol::tokenize;
use crate::roster::{BattleRecord, BattleRegistry};
use crate::transcript::Transcript;

/// Runs combat on the compiled rosters and reports betrayals.
pub trait TacticalResolver {
    fn resolve(&mut self, battles: &[BattleRecord], galaxy: &Galaxy) -> BetrayalLedger;
}

/// A resolver that replays betrayals recorded by an external run.
#[derive(Debug, Clone, Default)]
pub struct RecordedBetrayals(pub BetrayalLedger);

impl TacticalResolver for RecordedBetrayals {
    fn resolve(&mut self, _battles: &[BattleRecord], _galaxy: &Galaxy) -> BetrayalLedger {
        self.0.clone()
    }
}

/// Decides whether a resolved turn is kept.
pub trait CommitGate {
    fn approve(&mut self, battles: &[BattleRecord], betrayals: &BetrayalLedger) -> bool;
}

/// Keeps every turn.
pub struct AlwaysCommit;

impl CommitGate for AlwaysCommit {
    fn approve(&mut self, _battles: &[BattleRecord], _betrayals: &BetrayalLedger) -> bool {
        true
    }
}

/// What a call to `run_turn` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub battles: Vec<BattleRecord>,
    pub betrayals: usize,
    pub committed: bool,
}

/// Returns every active species, ascending by id.
pub fn default_selection(galaxy: &Galaxy) -> Vec<SpeciesId> {
    galaxy.species.active().map(|s| s.id).collect()
}

/// Builds a haven RNG from the configured seed, or from entropy.
pub fn haven_rng(config: &CompileConfig) -> SmallRng {
    match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Compiles the selected species' orders into finished battle rosters.
///
/// Species are processed in `selection` order. Unknown or eliminated
/// species are skipped; a species with no entry in `orders` simply has no
/// orders. `galaxy` is mutated in place (HIDE marks ships).
pub fn compile_rosters<R: Rng + ?Sized>(
    galaxy: &mut Galaxy,
    orders: &BTreeMap<SpeciesId, String>,
    selection: &[SpeciesId],
    config: &CompileConfig,
    rng: &mut R,
    transcript: &mut dyn Transcript,
) -> Result<Vec<BattleRecord>, CompileError> {
    let mut registry = BattleRegistry::new(config.max_battles);

    for &species in selection {
        if !galaxy.species.is_active(species) {
            warn!(%species, "skipping unknown or inactive species");
            continue;
        }
        let Some(text) = orders.get(&species) else {
            continue;
        };
        let lines = tokenize(text);
        let mut session = Session::new(species, config);
        Dispatcher::new(&mut registry, galaxy, config, transcript).run(&mut session, &lines)?;
    }

    for battle in registry.battles_mut() {
        include_bystanders(battle, galaxy, config.default_summary, config.max_engage_options);
        assign_havens(battle, rng);
        info!(
            sector = %battle.sector,
            participants = ?battle.participants(),
            "battle compiled"
        );
    }

    Ok(registry.into_battles())
}

/// Runs the combat phase of a turn end to end.
///
/// On approval the working copy replaces `galaxy`; otherwise `galaxy` is
/// left exactly as it was. A fatal compile error also leaves it untouched.
pub fn run_turn(
    galaxy: &mut Galaxy,
    orders: &BTreeMap<SpeciesId, String>,
    selection: &[SpeciesId],
    config: &CompileConfig,
    resolver: &mut dyn TacticalResolver,
    gate: &mut dyn CommitGate,
    transcript: &mut dyn Transcript,
) -> Result<TurnReport, CompileError> {
    let mut working = galaxy.clone();
    let mut rng = haven_rng(config);

    let battles = compile_rosters(&mut working, orders, selection, config, &mut rng, transcript)?;
    let ledger = resolver.resolve(&battles, &working);
    let betrayals = declare_enmity(&mut working, &ledger, transcript);

    let committed = gate.approve(&battles, &ledger);
    if committed {
        *galaxy = working;
        info!(battles = battles.len(), betrayals, "turn committed");
    } else {
        warn!("turn aborted; no changes kept");
    }

    Ok(TurnReport {
        battles,
        betrayals,
        committed,
    })
}
