use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tiles::Tile;

/// Permanent `size x size` grid of placed tiles.
///
/// Each row is a cyclic shift of the colours: the cell at `(row, col)` only
/// accepts colour `(col - row) mod size`, so every colour appears once per
/// row and once per column.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Wall {
    size: usize,
    placed: Vec<bool>,
}

impl Wall {
    pub fn new(size: u8) -> Self {
        let size = size as usize;
        Self {
            size,
            placed: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Colour permitted at `(row, col)`.
    pub fn color_at(&self, row: usize, col: usize) -> Tile {
        Tile::new(((col + self.size - row) % self.size) as u8)
    }

    /// Column that receives `color` in `row`.
    pub fn column_of(&self, row: usize, color: Tile) -> usize {
        (row + color.index()) % self.size
    }

    pub fn is_placed(&self, row: usize, col: usize) -> bool {
        self.placed[row * self.size + col]
    }

    pub fn has_color(&self, row: usize, color: Tile) -> bool {
        self.is_placed(row, self.column_of(row, color))
    }

    /// Places `color` in `row` and returns the points it scores.
    ///
    /// Placing on an occupied cell is an invariant violation.
    pub fn place(&mut self, row: usize, color: Tile) -> u16 {
        let col = self.column_of(row, color);
        let cell = &mut self.placed[row * self.size + col];
        assert!(!*cell, "wall cell ({}, {}) placed twice", row, col);
        *cell = true;
        self.score_at(row, col)
    }

    /// Points for the tile at `(row, col)`: a lone tile scores 1, otherwise
    /// the length of each run longer than 1 through it, summed.
    pub fn score_at(&self, row: usize, col: usize) -> u16 {
        let horizontal = self.run(row, col, 0, 1);
        let vertical = self.run(row, col, 1, 0);
        if horizontal == 1 && vertical == 1 {
            return 1;
        }
        let h = if horizontal > 1 { horizontal } else { 0 };
        let v = if vertical > 1 { vertical } else { 0 };
        h + v
    }

    fn run(&self, row: usize, col: usize, dr: usize, dc: usize) -> u16 {
        let mut len = 1;
        let (mut r, mut c) = (row, col);
        while r >= dr && c >= dc && self.is_placed(r - dr, c - dc) {
            r -= dr;
            c -= dc;
            len += 1;
        }
        let (mut r, mut c) = (row, col);
        while r + dr < self.size && c + dc < self.size && self.is_placed(r + dr, c + dc) {
            r += dr;
            c += dc;
            len += 1;
        }
        len
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        (0..self.size).all(|col| self.is_placed(row, col))
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        (0..self.size).all(|row| self.is_placed(row, col))
    }

    pub fn is_color_full(&self, color: Tile) -> bool {
        (0..self.size).all(|row| self.has_color(row, color))
    }

    pub fn full_rows(&self) -> usize {
        (0..self.size).filter(|&r| self.is_row_full(r)).count()
    }

    pub fn full_columns(&self) -> usize {
        (0..self.size).filter(|&c| self.is_column_full(c)).count()
    }

    pub fn full_colors(&self) -> usize {
        Tile::all(self.size as u8)
            .filter(|&t| self.is_color_full(t))
            .count()
    }

    pub fn placed_count(&self) -> usize {
        self.placed.iter().filter(|&&p| p).count()
    }

    /// Tiles of `color` fixed on this wall.
    pub fn count_of(&self, color: Tile) -> u16 {
        (0..self.size).filter(|&row| self.has_color(row, color)).count() as u16
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if self.is_placed(row, col) {
                    write!(f, "{}", self.color_at(row, col))?;
                } else {
                    write!(f, ".")?;
                }
            }
            if row + 1 < self.size {
                write!(f, "|")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_cell(wall: &mut Wall, row: usize, col: usize) -> u16 {
        let color = wall.color_at(row, col);
        wall.place(row, color)
    }

    #[test]
    fn diagonal_mapping_is_a_latin_square() {
        let wall = Wall::new(5);
        for row in 0..5 {
            for col in 0..5 {
                let color = wall.color_at(row, col);
                assert_eq!(wall.column_of(row, color), col);
            }
        }
        assert_eq!(wall.color_at(0, 0), Tile::new(0));
        assert_eq!(wall.color_at(1, 0), Tile::new(4));
        assert_eq!(wall.color_at(1, 1), Tile::new(0));
    }

    #[test]
    fn isolated_tile_scores_one() {
        let mut wall = Wall::new(5);
        assert_eq!(place_cell(&mut wall, 2, 2), 1);
    }

    #[test]
    fn row_and_column_runs_are_summed() {
        let mut wall = Wall::new(5);
        place_cell(&mut wall, 2, 0);
        place_cell(&mut wall, 2, 1);
        place_cell(&mut wall, 1, 2);
        // three in the row plus two in the column
        assert_eq!(place_cell(&mut wall, 2, 2), 5);
    }

    #[test]
    fn single_axis_run_scores_its_length() {
        let mut wall = Wall::new(5);
        place_cell(&mut wall, 0, 3);
        place_cell(&mut wall, 1, 3);
        assert_eq!(place_cell(&mut wall, 3, 3), 1);
        assert_eq!(place_cell(&mut wall, 2, 3), 4);
        assert_eq!(place_cell(&mut wall, 4, 4), 1);
        assert_eq!(place_cell(&mut wall, 4, 3), 7);
    }

    #[test]
    #[should_panic(expected = "placed twice")]
    fn cell_is_placed_once() {
        let mut wall = Wall::new(3);
        wall.place(0, Tile::new(1));
        wall.place(0, Tile::new(1));
    }

    #[test]
    fn bonus_queries() {
        let mut wall = Wall::new(3);
        for col in 0..3 {
            place_cell(&mut wall, 0, col);
        }
        for row in 1..3 {
            place_cell(&mut wall, row, 0);
        }
        assert!(wall.is_row_full(0));
        assert_eq!(wall.full_rows(), 1);
        assert_eq!(wall.full_columns(), 1);
        assert_eq!(wall.full_colors(), 0);
        assert_eq!(wall.placed_count(), 5);
        assert_eq!(wall.to_string(), "ABC|C..|B..");
    }
}
