use serde::{Deserialize, Serialize};

use crate::core::constants::LEVELS;
use crate::{Error, Result};

/// Grid coordinate of a single tile inside the level×level full-disk grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Zoom level of the tile grid: the full disk is cut into `level × level`
/// tiles of `WIDTH / level` pixels per side. The tile server only publishes
/// the grids listed in [`LEVELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level(u32);

impl Level {
    /// Validates `value` against the published grid sides.
    pub fn new(value: u32) -> Result<Self> {
        if LEVELS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Validation(format!(
                "LEVEL must be one of 4, 8, 16 or 20, got {value}"
            )))
        }
    }

    /// Tiles per grid side.
    pub fn side(self) -> u32 {
        self.0
    }

    /// Total number of tiles in the grid.
    pub fn tile_count(self) -> u32 {
        self.0 * self.0
    }

    /// All grid coordinates in row-major order.
    pub fn coords(self) -> impl Iterator<Item = TileCoord> {
        let side = self.0;
        (0..side).flat_map(move |y| (0..side).map(move |x| TileCoord { x, y }))
    }
}

impl Default for Level {
    /// The coarsest published grid.
    fn default() -> Self {
        Self(4)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_published_levels() {
        for value in [4, 8, 16, 20] {
            assert_eq!(Level::new(value).unwrap().side(), value);
        }
    }

    #[test]
    fn rejects_other_levels() {
        for value in [0, 1, 2, 5, 10, 32] {
            assert!(Level::new(value).is_err());
        }
    }

    #[test]
    fn coords_cover_the_grid_once() {
        let level = Level::new(4).unwrap();
        let coords: Vec<_> = level.coords().collect();
        assert_eq!(coords.len(), 16);
        for y in 0..4 {
            for x in 0..4 {
                assert!(coords.contains(&TileCoord { x, y }));
            }
        }
    }
}
