use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::tiles::{Tile, Tiles};

/// A draw pile visible to every player, refilled at the start of each round.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Factory {
    tiles: Tiles,
}

impl Factory {
    pub fn new(tiles: Tiles) -> Self {
        Self { tiles }
    }

    pub fn fill(&mut self, tiles: Tiles) {
        self.tiles += tiles;
    }

    /// Drafts every `color` tile and empties the factory.
    ///
    /// Returns the drafted count and the remaining tiles, which belong in the
    /// center pool.
    pub fn draft(&mut self, color: Tile) -> (u16, Tiles) {
        let mut rest = std::mem::take(&mut self.tiles);
        let taken = rest.take(color);
        (taken, rest)
    }

    pub fn tiles(&self) -> &Tiles {
        &self.tiles
    }
}

impl Deref for Factory {
    type Target = Tiles;

    fn deref(&self) -> &Tiles {
        &self.tiles
    }
}

impl fmt::Display for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tiles.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", self.tiles)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_splits_colour_from_spill() {
        let mut factory = Factory::new(Tiles::from(Tile::new(0)) + Tile::new(0) + Tile::new(3));
        let (taken, rest) = factory.draft(Tile::new(0));
        assert_eq!(taken, 2);
        assert_eq!(rest, Tiles::from(Tile::new(3)));
        assert!(factory.is_empty());
        assert_eq!(factory.to_string(), "-");
    }
}
