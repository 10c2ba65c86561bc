use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::Pick;
use crate::factory::Factory;
use crate::panel::Panel;
use crate::rules::Rules;
use crate::tiles::Tiles;

/// A complete snapshot of one game instant.
///
/// Cloning is a deep copy of every panel, factory and pool; only the rules
/// are shared. Search players clone freely and mutate the copy through
/// [`crate::game::Game::apply`].
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct State {
    pub(crate) rules: Arc<Rules>,
    pub(crate) panels: Vec<Panel>,
    pub(crate) factories: Vec<Factory>,
    pub(crate) center: Tiles,
    pub(crate) token_in_center: bool,
    pub(crate) current_player: usize,
    pub(crate) first_player: usize,
    pub(crate) round: u32,
    /// Undrawn tiles.
    pub(crate) bag: Tiles,
    /// Tiles out of play until the bag runs dry.
    pub(crate) discard: Tiles,
}

impl State {
    /// Empty table: full bag, empty factories, no round started.
    pub fn new(rules: Arc<Rules>) -> Self {
        let panels = (0..rules.player_count)
            .map(|_| Panel::new(Arc::clone(&rules)))
            .collect();
        Self {
            panels,
            factories: vec![Factory::default(); rules.factory_count()],
            center: Tiles::ZERO,
            token_in_center: false,
            current_player: 0,
            first_player: 0,
            round: 0,
            bag: Tiles::filled(rules.tile_types, rules.tile_count),
            discard: Tiles::ZERO,
            rules,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn shared_rules(&self) -> &Arc<Rules> {
        &self.rules
    }

    pub fn player_count(&self) -> usize {
        self.panels.len()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, seat: usize) -> &Panel {
        &self.panels[seat]
    }

    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }

    pub fn center(&self) -> &Tiles {
        &self.center
    }

    pub fn token_in_center(&self) -> bool {
        self.token_in_center
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    /// Seat that opened the current round.
    pub fn first_player(&self) -> usize {
        self.first_player
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn bag(&self) -> &Tiles {
        &self.bag
    }

    pub fn discard(&self) -> &Tiles {
        &self.discard
    }

    /// Tiles available from `pick`, or `None` for an unknown factory.
    pub fn source(&self, pick: Pick) -> Option<&Tiles> {
        match pick {
            Pick::Factory(i) => self.factories.get(i as usize).map(|f| f.tiles()),
            Pick::Center => Some(&self.center),
        }
    }

    pub fn is_round_finished(&self) -> bool {
        self.center.is_empty() && self.factories.iter().all(|f| f.is_empty())
    }

    pub fn is_game_finished(&self) -> bool {
        self.panels.iter().any(Panel::has_full_row)
    }

    pub fn scores(&self) -> Vec<u16> {
        self.panels.iter().map(Panel::score).collect()
    }

    /// Every seat holding the top score. Ties are all reported.
    pub fn winning_players(&self) -> Vec<usize> {
        let best = self.panels.iter().map(Panel::score).max().unwrap_or(0);
        self.panels
            .iter()
            .enumerate()
            .filter(|(_, p)| p.score() == best)
            .map(|(seat, _)| seat)
            .collect()
    }

    /// Tiles on the table: factories, center and every panel.
    pub fn tiles_in_play(&self) -> Tiles {
        let mut tiles = self.center;
        for factory in &self.factories {
            tiles += *factory.tiles();
        }
        for panel in &self.panels {
            tiles += panel.tiles();
        }
        tiles
    }

    /// Whether bag, discard and table together still hold exactly the
    /// configured inventory.
    pub fn conservation_holds(&self) -> bool {
        self.bag + self.discard + self.tiles_in_play()
            == Tiles::filled(self.rules.tile_types, self.rules.tile_count)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "round {} player {} (opened by {})",
            self.round, self.current_player, self.first_player
        )?;
        let factories: Vec<String> = self.factories.iter().map(|x| x.to_string()).collect();
        writeln!(f, "factories {}", factories.join(" "))?;
        writeln!(
            f,
            "center {}{}",
            if self.token_in_center { "*" } else { "" },
            self.center
        )?;
        for (seat, panel) in self.panels.iter().enumerate() {
            writeln!(f, "{}{} {}", if seat == self.current_player { ">" } else { " " }, seat, panel)?;
        }
        write!(f, "bag {} discard {}", self.bag.total(), self.discard.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::Tile;

    #[test]
    fn new_state_holds_full_bag() {
        let state = State::new(Arc::new(Rules::DEFAULT));
        assert_eq!(state.player_count(), 4);
        assert_eq!(state.factories().len(), 9);
        assert_eq!(state.bag().total(), 100);
        assert!(state.is_round_finished());
        assert!(!state.is_game_finished());
        assert!(state.conservation_holds());
    }

    #[test]
    fn clone_is_independent() {
        let state = State::new(Arc::new(Rules::MINI));
        let mut copy = state.clone();
        copy.center += Tile::new(0);
        copy.panels[0].take_first_token();
        assert_ne!(state, copy);
        assert!(state.center().is_empty());
        assert_eq!(state.panel(0).floor(), 0);
        assert!(Arc::ptr_eq(state.shared_rules(), copy.shared_rules()));
    }

    #[test]
    fn ties_are_reported() {
        let state = State::new(Arc::new(Rules::MINI));
        assert_eq!(state.winning_players(), vec![0, 1]);
    }

    #[test]
    fn unknown_factory_has_no_source() {
        let state = State::new(Arc::new(Rules::MINI));
        assert!(state.source(Pick::Factory(5)).is_none());
        assert!(state.source(Pick::Factory(4)).is_some());
        assert!(state.source(Pick::Center).is_some());
    }
}
