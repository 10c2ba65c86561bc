use serde::{Deserialize, Serialize};

use crate::errors::RulesError;
use crate::tiles::TILE_TYPES;

/// Largest table the engine seats.
pub const MAX_PLAYERS: usize = 8;

/// Immutable game configuration shared by every state built under it.
///
/// A running game holds its rules behind an `Arc`; nothing mutates them once
/// play has begun. Use [`Rules::validate`] before building a game from
/// user-supplied values.
///
/// # Examples
///
/// ```
/// use tessera_engine::rules::Rules;
///
/// let rules = Rules::DEFAULT;
/// assert_eq!(rules.factory_count(), 9);
/// assert_eq!(rules.penalty_for_floor(7), 14);
/// assert!(rules.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rules {
    pub player_count: u8,
    /// Tiles of each colour in the full inventory.
    pub tile_count: u16,
    pub tile_types: u8,
    /// Tiles drawn into each factory at the start of a round.
    pub factory_tiles: u16,
    /// End-of-game bonus per complete wall row.
    pub line_bonus: u16,
    /// End-of-game bonus per complete wall column.
    pub column_bonus: u16,
    /// End-of-game bonus per colour placed on every row.
    pub type_bonus: u16,
    /// Floor slots that carry a penalty; tiles beyond are discarded.
    pub overflow_count: u16,
    /// Largest penalty a single floor slot can carry.
    pub overflow_penalty: u16,
}

impl Rules {
    pub const DEFAULT: Rules = Rules {
        player_count: 4,
        tile_count: 20,
        tile_types: 5,
        factory_tiles: 4,
        line_bonus: 2,
        column_bonus: 7,
        type_bonus: 10,
        overflow_count: 7,
        overflow_penalty: 3,
    };

    pub const MINI: Rules = Rules {
        player_count: 2,
        tile_count: 10,
        tile_types: 3,
        factory_tiles: 3,
        line_bonus: 1,
        column_bonus: 3,
        type_bonus: 5,
        overflow_count: 4,
        overflow_penalty: 2,
    };

    /// Same rules for a table of `player_count`.
    #[must_use]
    pub fn with_player_count(mut self, player_count: u8) -> Self {
        self.player_count = player_count;
        self
    }

    #[must_use]
    pub fn with_tile_types(mut self, tile_types: u8) -> Self {
        self.tile_types = tile_types;
        self
    }

    /// Checks every field against the supported range.
    ///
    /// ```
    /// use tessera_engine::errors::RulesError;
    /// use tessera_engine::rules::Rules;
    ///
    /// let rules = Rules::DEFAULT.with_tile_types(12);
    /// assert!(matches!(rules.validate(), Err(RulesError::TileTypes { value: 12, .. })));
    /// ```
    pub fn validate(&self) -> Result<(), RulesError> {
        if !(2..=TILE_TYPES).contains(&(self.tile_types as usize)) {
            return Err(RulesError::TileTypes {
                value: self.tile_types,
                max: TILE_TYPES,
            });
        }
        if !(2..=MAX_PLAYERS).contains(&(self.player_count as usize)) {
            return Err(RulesError::PlayerCount {
                value: self.player_count as usize,
                max: MAX_PLAYERS,
            });
        }
        if self.factory_tiles == 0 {
            return Err(RulesError::FactoryTiles);
        }
        if self.tile_count == 0 {
            return Err(RulesError::TileCount);
        }
        if self.overflow_count == 0 {
            return Err(RulesError::OverflowCount);
        }
        Ok(())
    }

    pub fn factory_count(&self) -> usize {
        2 * self.player_count as usize + 1
    }

    /// Size of the full inventory across all colours.
    pub fn total_tiles(&self) -> u32 {
        self.tile_count as u32 * self.tile_types as u32
    }

    /// Penalty carried by the 1-based floor slot `slot`.
    ///
    /// Slots come in runs of 2, 3, 4, ... costing 1, 2, 3, ... points, capped at
    /// `overflow_penalty`. Slot 0 and slots past `overflow_count` cost nothing.
    pub fn penalty_at(&self, slot: u16) -> u16 {
        if slot == 0 || slot > self.overflow_count {
            return 0;
        }
        let mut penalty = 1;
        let mut run_start = 1;
        let mut run_len = 2;
        while slot >= run_start + run_len {
            run_start += run_len;
            run_len += 1;
            penalty += 1;
        }
        penalty.min(self.overflow_penalty)
    }

    /// Total penalty for a floor holding `floor` entries.
    pub fn penalty_for_floor(&self, floor: u16) -> u16 {
        (1..=floor.min(self.overflow_count))
            .map(|slot| self.penalty_at(slot))
            .sum()
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules::DEFAULT
    }
}

impl std::fmt::Display for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} players, {} colours x {} tiles, {} per factory, bonuses {}/{}/{}, floor {} (max {})",
            self.player_count,
            self.tile_types,
            self.tile_count,
            self.factory_tiles,
            self.line_bonus,
            self.column_bonus,
            self.type_bonus,
            self.overflow_count,
            self.overflow_penalty
        )
    }
}
