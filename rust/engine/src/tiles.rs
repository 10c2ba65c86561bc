use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Upper bound on the number of tile colours a [`crate::rules::Rules`] may use.
pub const TILE_TYPES: usize = 8;

/// A tile colour, identified by its index in `[0, tile_types)`.
///
/// [`Tile::NONE`] marks "no colour" (an empty pattern line, an unplaced cell).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Tile(u8);

impl Tile {
    /// Sentinel for "no colour".
    pub const NONE: Tile = Tile(u8::MAX);

    pub const fn new(value: u8) -> Self {
        Tile(value)
    }

    pub fn is_none(self) -> bool {
        self == Tile::NONE
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Parses the letter form used by [`fmt::Display`] (`A` is colour 0).
    ///
    /// ```
    /// use tessera_engine::tiles::Tile;
    ///
    /// assert_eq!(Tile::from_letter('C'), Some(Tile::new(2)));
    /// assert_eq!(Tile::from_letter('.'), Some(Tile::NONE));
    /// assert_eq!(Tile::from_letter('z'), None);
    /// ```
    pub fn from_letter(letter: char) -> Option<Tile> {
        match letter {
            '.' => Some(Tile::NONE),
            'A'..='Z' => {
                let value = letter as u8 - b'A';
                ((value as usize) < TILE_TYPES).then_some(Tile(value))
            }
            _ => None,
        }
    }

    /// Iterates over the first `tile_types` colours.
    pub fn all(tile_types: u8) -> impl Iterator<Item = Tile> {
        (0..tile_types).map(Tile)
    }
}

impl From<u8> for Tile {
    fn from(value: u8) -> Self {
        Tile(value)
    }
}

impl From<Tile> for usize {
    fn from(tile: Tile) -> Self {
        tile.index()
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, ".")
        } else {
            write!(f, "{}", (b'A' + self.0) as char)
        }
    }
}

/// A multiset of tiles: one count per colour.
///
/// Counts never go negative. Subtracting more than is present is a contract
/// violation and panics; use [`Tiles::checked_sub`] when the caller cannot
/// guarantee the precondition.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Tiles([u16; TILE_TYPES]);

impl Tiles {
    pub const ZERO: Tiles = Tiles([0; TILE_TYPES]);

    pub fn new(quantities: [u16; TILE_TYPES]) -> Self {
        Tiles(quantities)
    }

    /// `count` tiles of each of the first `tile_types` colours.
    pub fn filled(tile_types: u8, count: u16) -> Self {
        let mut tiles = Tiles::ZERO;
        for tile in Tile::all(tile_types) {
            tiles[tile] = count;
        }
        tiles
    }

    pub fn quantities(&self) -> &[u16; TILE_TYPES] {
        &self.0
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&q| q as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&q| q == 0)
    }

    /// Colours with at least one tile, in ascending order.
    pub fn colors(&self) -> impl Iterator<Item = Tile> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, q)| **q > 0)
            .map(|(i, _)| Tile(i as u8))
    }

    pub fn checked_sub(&self, other: &Tiles) -> Option<Tiles> {
        let mut out = *self;
        for (q, &o) in out.0.iter_mut().zip(other.0.iter()) {
            *q = q.checked_sub(o)?;
        }
        Some(out)
    }

    /// Removes every tile of `tile`, returning how many there were.
    pub fn take(&mut self, tile: Tile) -> u16 {
        std::mem::take(&mut self.0[tile.index()])
    }
}

impl Index<Tile> for Tiles {
    type Output = u16;

    fn index(&self, tile: Tile) -> &u16 {
        &self.0[tile.index()]
    }
}

impl IndexMut<Tile> for Tiles {
    fn index_mut(&mut self, tile: Tile) -> &mut u16 {
        &mut self.0[tile.index()]
    }
}

impl From<Tile> for Tiles {
    fn from(tile: Tile) -> Self {
        let mut tiles = Tiles::ZERO;
        tiles[tile] = 1;
        tiles
    }
}

impl AddAssign<Tiles> for Tiles {
    fn add_assign(&mut self, other: Tiles) {
        for (q, o) in self.0.iter_mut().zip(other.0) {
            *q += o;
        }
    }
}

impl SubAssign<Tiles> for Tiles {
    fn sub_assign(&mut self, other: Tiles) {
        for (i, (q, o)) in self.0.iter_mut().zip(other.0).enumerate() {
            let value = *q;
            *q = value
                .checked_sub(o)
                .unwrap_or_else(|| panic!("tile underflow on colour {}: {} - {}", i, value, o));
        }
    }
}

impl AddAssign<Tile> for Tiles {
    fn add_assign(&mut self, tile: Tile) {
        self[tile] += 1;
    }
}

impl SubAssign<Tile> for Tiles {
    fn sub_assign(&mut self, tile: Tile) {
        *self -= Tiles::from(tile);
    }
}

impl<T> Add<T> for Tiles
where
    Tiles: AddAssign<T>,
{
    type Output = Tiles;

    fn add(mut self, other: T) -> Tiles {
        self += other;
        self
    }
}

impl<T> Sub<T> for Tiles
where
    Tiles: SubAssign<T>,
{
    type Output = Tiles;

    fn sub(mut self, other: T) -> Tiles {
        self -= other;
        self
    }
}

/// Element-wise partial order: `a <= b` iff no count of `a` exceeds `b`'s.
impl PartialOrd for Tiles {
    fn partial_cmp(&self, other: &Tiles) -> Option<Ordering> {
        let le = self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b);
        let ge = self.0.iter().zip(other.0.iter()).all(|(a, b)| a >= b);
        match (le, ge) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl fmt::Display for Tiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in self.colors() {
            for _ in 0..self[tile] {
                write!(f, "{}", tile)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(values: &[u16]) -> Tiles {
        let mut q = [0; TILE_TYPES];
        q[..values.len()].copy_from_slice(values);
        Tiles::new(q)
    }

    #[test]
    fn tile_letters_round_trip() {
        for tile in Tile::all(5) {
            let letter = tile.to_string().chars().next().unwrap();
            assert_eq!(Tile::from_letter(letter), Some(tile));
        }
        assert_eq!(Tile::NONE.to_string(), ".");
    }

    #[test]
    fn scalar_add_and_sub() {
        let mut t = Tiles::ZERO;
        t += Tile::new(2);
        t += Tile::new(2);
        t = t + Tile::new(0);
        assert_eq!(t, tiles(&[1, 0, 2]));
        t -= Tile::new(2);
        assert_eq!(t.total(), 2);
    }

    #[test]
    fn multiset_add_and_sub() {
        let a = tiles(&[1, 2, 3]);
        let b = tiles(&[1, 1, 0]);
        assert_eq!(a + b, tiles(&[2, 3, 3]));
        assert_eq!(a - b, tiles(&[0, 1, 3]));
    }

    #[test]
    #[should_panic(expected = "tile underflow")]
    fn subtraction_below_zero_panics() {
        let _ = tiles(&[1]) - tiles(&[2]);
    }

    #[test]
    fn checked_sub_reports_underflow() {
        assert_eq!(tiles(&[1, 1]).checked_sub(&tiles(&[0, 2])), None);
        assert_eq!(
            tiles(&[1, 2]).checked_sub(&tiles(&[1, 1])),
            Some(tiles(&[0, 1]))
        );
    }

    #[test]
    fn partial_order_is_element_wise() {
        let small = tiles(&[1, 1, 0]);
        let big = tiles(&[2, 1, 1]);
        let other = tiles(&[0, 3, 0]);
        assert!(small <= big);
        assert!(big >= small);
        assert!(!(small <= other) && !(small >= other));
        assert_eq!(small.partial_cmp(&other), None);
        assert!(small <= small);
    }

    #[test]
    fn take_empties_one_colour() {
        let mut t = tiles(&[3, 1]);
        assert_eq!(t.take(Tile::new(0)), 3);
        assert_eq!(t, tiles(&[0, 1]));
        assert_eq!(t.colors().collect::<Vec<_>>(), vec![Tile::new(1)]);
    }

    #[test]
    fn display_lists_tiles_by_colour() {
        assert_eq!(tiles(&[2, 0, 1]).to_string(), "AAC");
    }
}
