//! Sector coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A star sector, addressed by its three galactic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Sector {
    /// Creates a sector from its coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Sector { x, y, z }
    }

    /// Returns the sector displaced by the given per-axis offset, or `None`
    /// if any coordinate would leave the `i32` range.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Sector {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_each_axis() {
        let s = Sector::new(10, 10, 10).offset(-1, 0, 1);
        assert_eq!(s, Some(Sector::new(9, 10, 11)));
    }

    #[test]
    fn offset_off_the_edge_is_none() {
        let edge = Sector::new(i32::MAX, 0, i32::MIN);
        assert_eq!(edge.offset(1, 0, 0), None);
        assert_eq!(edge.offset(0, 0, -1), None);
        assert_eq!(edge.offset(-1, 1, 1), Some(Sector::new(i32::MAX - 1, 1, i32::MIN + 1)));
    }

    #[test]
    fn display_is_space_separated() {
        assert_eq!(Sector::new(3, -4, 5).to_string(), "3 -4 5");
    }
}
