//! Galaxy directories and turn state.
//!
//! Contains the species directory, sector coordinates, ships, colonies, and
//! the per-sector presence table that the combat compiler reads and mutates.

pub mod assets;
pub mod sector;
pub mod species;
pub mod state;

pub use assets::{Colony, Ship, ShipStatus};
pub use sector::Sector;
pub use species::{Species, SpeciesDirectory, SpeciesId};
pub use state::{Galaxy, GalaxyError, Presence};
