//! Per-species transcripts.
//!
//! Every species gets a readable log of what happened to its orders: the
//! orders accepted, the ones ignored and why, and any war declarations made
//! on its behalf. The compiler writes through the `Transcript` trait so the
//! caller decides where the text ends up.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::galaxy::SpeciesId;

/// Destination for per-species transcript lines.
pub trait Transcript {
    fn line(&mut self, species: SpeciesId, text: &str);
}

/// Discards everything.
pub struct NullTranscript;

impl Transcript for NullTranscript {
    fn line(&mut self, _species: SpeciesId, _text: &str) {}
}

/// Collects transcript lines in memory, grouped by species.
#[derive(Debug, Default, Clone)]
pub struct MemoryTranscript {
    lines: BTreeMap<SpeciesId, Vec<String>>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lines written for `species`, oldest first.
    pub fn lines_for(&self, species: SpeciesId) -> &[String] {
        self.lines.get(&species).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn species(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.lines.keys().copied()
    }

    /// Appends each species' lines to `<dir>/sp<NN>.log`.
    pub fn append_to_dir(&self, dir: &Path) -> io::Result<()> {
        for (species, lines) in &self.lines {
            let path = dir.join(format!("sp{:02}.log", species.0));
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            for line in lines {
                writeln!(file, "{}", line)?;
            }
        }
        Ok(())
    }
}

impl Transcript for MemoryTranscript {
    fn line(&mut self, species: SpeciesId, text: &str) {
        self.lines.entry(species).or_default().push(text.to_string());
    }
}
