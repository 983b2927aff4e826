//! Galaxy snapshot.
//!
//! Bundles the directories the combat compiler consumes: species, the
//! per-sector presence table, ships, and colonies. The snapshot is loaded from
//! and saved to JSON; every other phase of the turn lives outside this crate.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::assets::{Colony, Ship, ShipStatus};
use super::sector::Sector;
use super::species::{SpeciesDirectory, SpeciesId};

/// Errors raised while loading or saving a galaxy snapshot.
#[derive(Debug, Error)]
pub enum GalaxyError {
    #[error("cannot access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed galaxy data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A species' presence in a sector, optionally on a specific planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Presence {
    pub species: SpeciesId,
    pub sector: Sector,
    #[serde(default)]
    pub planet: Option<u8>,
}

/// Everything the combat compiler reads about the current turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Galaxy {
    /// Key that encodes species ids in the `#<hex>` form used by reports.
    #[serde(default)]
    pub obfuscation_key: u32,
    #[serde(default)]
    pub species: SpeciesDirectory,
    #[serde(default)]
    pub presences: Vec<Presence>,
    #[serde(default)]
    pub ships: Vec<Ship>,
    #[serde(default)]
    pub colonies: Vec<Colony>,
}

impl Galaxy {
    /// Creates an empty galaxy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a galaxy from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, GalaxyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the galaxy to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, GalaxyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a galaxy snapshot from disk.
    pub fn load(path: &Path) -> Result<Self, GalaxyError> {
        let text = fs::read_to_string(path).map_err(|source| GalaxyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Writes the galaxy snapshot to disk.
    pub fn save(&self, path: &Path) -> Result<(), GalaxyError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| GalaxyError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Returns true if the presence table places `species` at `sector`.
    pub fn is_present(&self, species: SpeciesId, sector: Sector) -> bool {
        self.presences
            .iter()
            .any(|p| p.species == species && p.sector == sector)
    }

    /// Returns every species with a presence record at `sector`, ascending.
    pub fn species_at(&self, sector: Sector) -> Vec<SpeciesId> {
        let ids: BTreeSet<SpeciesId> = self
            .presences
            .iter()
            .filter(|p| p.sector == sector)
            .map(|p| p.species)
            .collect();
        ids.into_iter().collect()
    }

    pub fn ships_at(&self, sector: Sector) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(move |s| s.sector == sector)
    }

    pub fn colonies_at(&self, sector: Sector) -> impl Iterator<Item = &Colony> {
        self.colonies.iter().filter(move |c| c.sector == sector)
    }

    /// Finds a ship owned by `owner` by bare or class-qualified name.
    pub fn find_ship_mut(&mut self, owner: SpeciesId, name: &str) -> Option<&mut Ship> {
        self.ships
            .iter_mut()
            .find(|s| s.owner == owner && s.answers_to(name))
    }

    /// Rebuilds the presence table from ship and colony positions.
    ///
    /// Ships still under construction do not count. Each (species, sector,
    /// planet) triple appears once.
    pub fn rebuild_presence(&mut self) {
        let mut seen: BTreeSet<(SpeciesId, Sector, Option<u8>)> = BTreeSet::new();
        for ship in &self.ships {
            if ship.status != ShipStatus::UnderConstruction {
                seen.insert((ship.owner, ship.sector, ship.planet));
            }
        }
        for colony in &self.colonies {
            seen.insert((colony.owner, colony.sector, Some(colony.planet)));
        }
        self.presences = seen
            .into_iter()
            .map(|(species, sector, planet)| Presence {
                species,
                sector,
                planet,
            })
            .collect();
    }
}
