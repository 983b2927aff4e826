//! Species directory.
//!
//! Each species carries its display name, whether it is still in the game,
//! and its enemy/ally/contact relations with every other species. The
//! relations are the only combat-phase state that outlives the turn.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a species. Ids are small positive integers assigned at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u16);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_active() -> bool {
    true
}

/// A species record from the species directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    /// False once the species has been eliminated from the game.
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub enemies: BTreeSet<SpeciesId>,
    #[serde(default)]
    pub allies: BTreeSet<SpeciesId>,
    #[serde(default)]
    pub contacts: BTreeSet<SpeciesId>,
    /// Set when this turn changed the record and it must be written back.
    #[serde(default)]
    pub modified: bool,
}

impl Species {
    /// Creates an active species with no relations.
    pub fn new(id: SpeciesId, name: impl Into<String>) -> Self {
        Species {
            id,
            name: name.into(),
            active: true,
            enemies: BTreeSet::new(),
            allies: BTreeSet::new(),
            contacts: BTreeSet::new(),
            modified: false,
        }
    }

    pub fn is_enemy(&self, other: SpeciesId) -> bool {
        self.enemies.contains(&other)
    }

    pub fn is_ally(&self, other: SpeciesId) -> bool {
        self.allies.contains(&other)
    }

    /// Turns `other` into a declared enemy: drops any alliance, records
    /// contact, and marks the record modified.
    pub fn declare_enemy(&mut self, other: SpeciesId) {
        self.allies.remove(&other);
        self.enemies.insert(other);
        self.contacts.insert(other);
        self.modified = true;
    }
}

/// All species in the game, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Species>", into = "Vec<Species>")]
pub struct SpeciesDirectory {
    species: BTreeMap<SpeciesId, Species>,
}

impl From<Vec<Species>> for SpeciesDirectory {
    fn from(list: Vec<Species>) -> Self {
        SpeciesDirectory {
            species: list.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

impl From<SpeciesDirectory> for Vec<Species> {
    fn from(dir: SpeciesDirectory) -> Self {
        dir.species.into_values().collect()
    }
}

impl SpeciesDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a species record.
    pub fn insert(&mut self, species: Species) {
        self.species.insert(species.id, species);
    }

    pub fn get(&self, id: SpeciesId) -> Option<&Species> {
        self.species.get(&id)
    }

    pub fn get_mut(&mut self, id: SpeciesId) -> Option<&mut Species> {
        self.species.get_mut(&id)
    }

    pub fn contains(&self, id: SpeciesId) -> bool {
        self.species.contains_key(&id)
    }

    pub fn is_active(&self, id: SpeciesId) -> bool {
        self.species.get(&id).is_some_and(|s| s.active)
    }

    /// Iterates every species in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.values()
    }

    /// Iterates the species still in the game, ascending by id.
    pub fn active(&self) -> impl Iterator<Item = &Species> {
        self.species.values().filter(|s| s.active)
    }

    /// Returns the display name, or a numeric placeholder for unknown ids.
    pub fn name_of(&self, id: SpeciesId) -> String {
        match self.species.get(&id) {
            Some(s) => s.name.clone(),
            None => format!("SP{}", id),
        }
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
