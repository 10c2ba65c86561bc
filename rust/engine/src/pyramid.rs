use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tiles::{Tile, Tiles};

/// One pattern line: a single colour and how many of its slots are filled.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub color: Tile,
    pub amount: u16,
}

impl Line {
    const EMPTY: Line = Line {
        color: Tile::NONE,
        amount: 0,
    };
}

/// Triangular staging area: line `i` holds up to `i + 1` tiles of one colour.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pyramid {
    lines: Vec<Line>,
}

impl Pyramid {
    pub fn new(size: u8) -> Self {
        Self {
            lines: vec![Line::EMPTY; size as usize],
        }
    }

    pub fn size(&self) -> usize {
        self.lines.len()
    }

    pub fn capacity(line: usize) -> u16 {
        line as u16 + 1
    }

    pub fn line(&self, line: usize) -> Line {
        self.lines[line]
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_filled(&self, line: usize) -> bool {
        self.lines[line].amount == Self::capacity(line)
    }

    /// How many more tiles `line` accepts.
    pub fn room(&self, line: usize) -> u16 {
        Self::capacity(line) - self.lines[line].amount
    }

    /// Whether `color` may be staged on `line` (ignores the wall).
    pub fn accepts(&self, line: usize, color: Tile) -> bool {
        let current = self.lines[line];
        (current.amount == 0 || current.color == color) && current.amount < Self::capacity(line)
    }

    /// Stages up to `amount` tiles and returns the overflow.
    ///
    /// The caller must have checked [`Pyramid::accepts`].
    pub fn add(&mut self, line: usize, color: Tile, amount: u16) -> u16 {
        debug_assert!(self.accepts(line, color));
        let placed = amount.min(self.room(line));
        let slot = &mut self.lines[line];
        slot.color = color;
        slot.amount += placed;
        amount - placed
    }

    /// Empties a filled line, returning its colour.
    pub fn clear_line(&mut self, line: usize) -> Tile {
        std::mem::replace(&mut self.lines[line], Line::EMPTY).color
    }

    pub fn clear(&mut self) {
        self.lines.fill(Line::EMPTY);
    }

    /// Every staged tile, as a multiset.
    pub fn tiles(&self) -> Tiles {
        let mut tiles = Tiles::ZERO;
        for line in self.lines.iter().filter(|l| l.amount > 0) {
            tiles[line.color] += line.amount;
        }
        tiles
    }

    /// Fraction of pattern slots occupied, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let staged: u32 = self.lines.iter().map(|l| l.amount as u32).sum();
        let n = self.lines.len() as u32;
        staged as f64 / (n * (n + 1) / 2).max(1) as f64
    }
}

impl fmt::Display for Pyramid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            let width = Self::capacity(i);
            for slot in 0..width {
                if slot < width - line.amount {
                    write!(f, ".")?;
                } else {
                    write!(f, "{}", line.color)?;
                }
            }
            if i + 1 < self.lines.len() {
                write!(f, "|")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_fill_to_capacity_and_overflow() {
        let mut pyramid = Pyramid::new(5);
        let b = Tile::new(1);
        assert!(pyramid.accepts(2, b));
        assert_eq!(pyramid.add(2, b, 2), 0);
        assert!(!pyramid.is_filled(2));
        assert_eq!(pyramid.add(2, b, 4), 3);
        assert!(pyramid.is_filled(2));
        assert!(!pyramid.accepts(2, b));
    }

    #[test]
    fn line_holds_one_colour() {
        let mut pyramid = Pyramid::new(3);
        pyramid.add(1, Tile::new(0), 1);
        assert!(!pyramid.accepts(1, Tile::new(2)));
        assert!(pyramid.accepts(1, Tile::new(0)));
    }

    #[test]
    fn clear_resets_to_none() {
        let mut pyramid = Pyramid::new(3);
        pyramid.add(0, Tile::new(2), 1);
        assert_eq!(pyramid.clear_line(0), Tile::new(2));
        assert_eq!(pyramid.line(0).color, Tile::NONE);
        pyramid.add(2, Tile::new(1), 2);
        pyramid.clear();
        assert_eq!(pyramid.tiles(), Tiles::ZERO);
    }

    #[test]
    fn display_right_aligns_lines() {
        let mut pyramid = Pyramid::new(3);
        pyramid.add(1, Tile::new(0), 1);
        pyramid.add(2, Tile::new(2), 3);
        assert_eq!(pyramid.to_string(), ".|.A|CCC");
    }
}
