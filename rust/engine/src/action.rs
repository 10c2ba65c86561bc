use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tiles::Tile;

/// Where an action draws its tiles from.
///
/// Factories order before the center, so sorting actions follows the
/// enumeration order of [`crate::game::Game::all_legal`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Pick {
    Factory(u8),
    Center,
}

/// Where the drafted tiles go. Pattern lines order before the floor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Place {
    Line(u8),
    Floor,
}

/// One draft: take every `color` tile from `pick`, stage them on `place`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Action {
    pub pick: Pick,
    pub color: Tile,
    pub place: Place,
}

impl Action {
    pub fn new(pick: Pick, color: Tile, place: Place) -> Self {
        Self { pick, color, place }
    }

    pub fn is_center(&self) -> bool {
        self.pick == Pick::Center
    }

    pub fn is_floor(&self) -> bool {
        self.place == Place::Floor
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pick::Factory(i) => write!(f, "F{}", i),
            Pick::Center => write!(f, "C"),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Line(i) => write!(f, "L{}", i),
            Place::Floor => write!(f, "X"),
        }
    }
}

/// Compact form, e.g. `F2:B>L3` or `C:A>X`.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}>{}", self.pick, self.color, self.place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_source_major() {
        let mut actions = vec![
            Action::new(Pick::Center, Tile::new(0), Place::Line(0)),
            Action::new(Pick::Factory(1), Tile::new(0), Place::Floor),
            Action::new(Pick::Factory(1), Tile::new(0), Place::Line(4)),
            Action::new(Pick::Factory(0), Tile::new(2), Place::Line(0)),
        ];
        actions.sort();
        assert_eq!(
            actions.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
            vec!["F0:C>L0", "F1:A>L4", "F1:A>X", "C:A>L0"]
        );
    }

    #[test]
    fn actions_compare_by_value() {
        let a = Action::new(Pick::Center, Tile::new(1), Place::Floor);
        let b = a;
        assert_eq!(a, b);
        assert!(a.is_center() && a.is_floor());
    }
}
