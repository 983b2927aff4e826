//! Enmity declarations after tactical resolution.
//!
//! The tactical resolver reports every surprise attack that broke faith: a
//! victim, the species that attacked it, and the third species whose fight
//! drew the attacker in. Each victim then treats its attacker as a declared
//! enemy from this turn on.

use serde::{Deserialize, Serialize};

use crate::galaxy::{Galaxy, SpeciesId};
use crate::transcript::Transcript;

/// One betrayal reported by the tactical resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Betrayal {
    pub victim: SpeciesId,
    pub attacker: SpeciesId,
    pub betrayed: SpeciesId,
}

/// Betrayals for one run, at most one per (victim, attacker) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetrayalLedger {
    entries: Vec<Betrayal>,
}

impl BetrayalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a betrayal, replacing any earlier one for the same pair.
    pub fn record(&mut self, victim: SpeciesId, attacker: SpeciesId, betrayed: SpeciesId) {
        match self
            .entries
            .iter_mut()
            .find(|b| b.victim == victim && b.attacker == attacker)
        {
            Some(entry) => entry.betrayed = betrayed,
            None => self.entries.push(Betrayal {
                victim,
                attacker,
                betrayed,
            }),
        }
    }

    pub fn entries(&self) -> &[Betrayal] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Betrayal> for BetrayalLedger {
    fn from_iter<I: IntoIterator<Item = Betrayal>>(iter: I) -> Self {
        let mut ledger = BetrayalLedger::new();
        for b in iter {
            ledger.record(b.victim, b.attacker, b.betrayed);
        }
        ledger
    }
}

/// Turns each recorded betrayal into a war declaration by the victim.
///
/// Returns how many declarations were made. Entries naming an unknown
/// victim are skipped with a warning.
pub fn declare_enmity(
    galaxy: &mut Galaxy,
    ledger: &BetrayalLedger,
    transcript: &mut dyn Transcript,
) -> usize {
    let mut declared = 0;
    for b in ledger.entries() {
        let attacker_name = galaxy.species.name_of(b.attacker);
        let betrayed_name = galaxy.species.name_of(b.betrayed);
        let Some(victim) = galaxy.species.get_mut(b.victim) else {
            tracing::warn!(victim = %b.victim, "betrayal names unknown species");
            continue;
        };
        victim.declare_enemy(b.attacker);
        declared += 1;

        tracing::info!(
            victim = %b.victim,
            attacker = %b.attacker,
            betrayed = %b.betrayed,
            "enmity declared"
        );
        transcript.line(
            b.victim,
            &format!(
                "! SP {} betrayed SP {} and attacked you; SP {} is now your enemy.",
                attacker_name, betrayed_name, attacker_name
            ),
        );
    }
    declared
}
