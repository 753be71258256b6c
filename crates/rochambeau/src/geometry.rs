//! # World Geometry
//!
//! World bounds and the fixed entity footprint. Positions are the top-left
//! corner of the footprint; every entity shares the same footprint, so
//! centering the box instead would give the same overlaps.

use rochambeau_core::Position;
use serde::{Deserialize, Serialize};

/// World size in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Width in grid units.
    pub width: u32,
    /// Height in grid units.
    pub height: u32,
}

impl WorldBounds {
    /// Creates bounds.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest position an entity with `footprint` may occupy:
    /// `(width - footprint.width, height - footprint.height)`, floored at 0.
    #[must_use]
    pub fn max_position(self, footprint: Footprint) -> Position {
        Position::new(
            saturating_i32(self.width.saturating_sub(footprint.width)),
            saturating_i32(self.height.saturating_sub(footprint.height)),
        )
    }

    /// True if `position` lies within `[0, max_position]` on both axes.
    #[must_use]
    pub fn contains(self, position: Position, footprint: Footprint) -> bool {
        let max = self.max_position(footprint);
        (0..=max.x).contains(&position.x) && (0..=max.y).contains(&position.y)
    }
}

/// Axis-aligned box every entity occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    /// Box width.
    pub width: u32,
    /// Box height.
    pub height: u32,
}

impl Footprint {
    /// Creates a footprint.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Strict overlap of two equally sized boxes: touching edges do not count.
    #[must_use]
    pub fn overlaps(self, a: Position, b: Position) -> bool {
        let dx = (i64::from(a.x) - i64::from(b.x)).abs();
        let dy = (i64::from(a.y) - i64::from(b.y)).abs();
        dx < i64::from(self.width) && dy < i64::from(self.height)
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
