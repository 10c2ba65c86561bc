use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pyramid::Pyramid;
use crate::rules::Rules;
use crate::tiles::{Tile, Tiles};
use crate::wall::Wall;

/// One player's board: pattern lines, wall, score, floor and first-token flag.
///
/// The floor is a penalty counter capped at `overflow_count`. Tiles that land
/// there leave play immediately (the owning state discards them), so a panel
/// only ever holds tiles in its pyramid and on its wall.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Panel {
    rules: Arc<Rules>,
    pyramid: Pyramid,
    wall: Wall,
    score: u16,
    floor: u16,
    first_token: bool,
}

/// What happened to a panel at round end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundScore {
    pub placed: u16,
    pub penalty: u16,
    /// Tiles freed from completed lines (everything but the one moved to the wall).
    pub freed: Tiles,
}

impl Panel {
    pub fn new(rules: Arc<Rules>) -> Self {
        Self {
            pyramid: Pyramid::new(rules.tile_types),
            wall: Wall::new(rules.tile_types),
            rules,
            score: 0,
            floor: 0,
            first_token: false,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn pyramid(&self) -> &Pyramid {
        &self.pyramid
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn score(&self) -> u16 {
        self.score
    }

    pub fn floor(&self) -> u16 {
        self.floor
    }

    pub fn has_first_token(&self) -> bool {
        self.first_token
    }

    /// Whether `color` may be staged on pattern line `line`.
    pub fn can_stage(&self, line: usize, color: Tile) -> bool {
        self.pyramid.accepts(line, color) && !self.wall.has_color(line, color)
    }

    /// Stages `amount` tiles on `line`; the overflow goes to the floor and the
    /// number of overflowing tiles is returned.
    pub fn stage(&mut self, line: usize, color: Tile, amount: u16) -> u16 {
        let overflow = self.pyramid.add(line, color, amount);
        self.add_to_floor(overflow);
        overflow
    }

    /// Counts `amount` tiles towards the floor penalty, up to the cap.
    pub fn add_to_floor(&mut self, amount: u16) {
        self.floor = self
            .floor
            .saturating_add(amount)
            .min(self.rules.overflow_count);
    }

    /// Takes the first-player marker, which occupies one floor slot.
    pub fn take_first_token(&mut self) {
        self.first_token = true;
        self.add_to_floor(1);
    }

    pub fn clear_first_token(&mut self) {
        self.first_token = false;
    }

    /// Moves completed lines to the wall, scores them, then applies and
    /// clears the floor penalty. The score never drops below zero.
    pub fn score_round(&mut self) -> RoundScore {
        let mut result = RoundScore::default();
        for line in 0..self.pyramid.size() {
            if !self.pyramid.is_filled(line) {
                continue;
            }
            let color = self.pyramid.clear_line(line);
            result.placed += self.wall.place(line, color);
            result.freed[color] += Pyramid::capacity(line) - 1;
        }
        result.penalty = self.rules.penalty_for_floor(self.floor);
        self.score = (self.score + result.placed).saturating_sub(result.penalty);
        self.floor = 0;
        result
    }

    /// Applies the end-of-game bonuses and returns how many points they added.
    pub fn score_bonus(&mut self) -> u16 {
        let bonus = self.rules.line_bonus * self.wall.full_rows() as u16
            + self.rules.column_bonus * self.wall.full_columns() as u16
            + self.rules.type_bonus * self.wall.full_colors() as u16;
        self.score += bonus;
        bonus
    }

    /// Tiles held by the panel: staged plus fixed on the wall.
    pub fn tiles(&self) -> Tiles {
        let mut tiles = self.pyramid.tiles();
        for color in Tile::all(self.rules.tile_types) {
            tiles[color] += self.wall.count_of(color);
        }
        tiles
    }

    pub fn has_full_row(&self) -> bool {
        (0..self.wall.size()).any(|row| self.wall.is_row_full(row))
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score {:>3} floor {}{} | {} | {}",
            self.score,
            self.floor,
            if self.first_token { "*" } else { "" },
            self.pyramid,
            self.wall
        )
    }
}
