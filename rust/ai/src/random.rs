//! Random strategies.

use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_engine::action::Action;
use tessera_engine::game::Game;
use tessera_engine::player::Player;
use tessera_engine::state::State;

/// Actions that stage tiles on a pattern line, or all of them when only
/// floor actions remain.
pub(crate) fn prefer_lines(actions: Vec<Action>) -> Vec<Action> {
    if actions.iter().all(Action::is_floor) {
        return actions;
    }
    actions.into_iter().filter(|a| !a.is_floor()).collect()
}

/// Picks uniformly among legal actions.
///
/// The default flavour never throws tiles on the floor while a pattern line
/// can take them; the naive flavour draws from every legal action.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    naive: bool,
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            naive: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn naive(seed: u64) -> Self {
        Self {
            naive: true,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn play(&mut self, state: &State) -> Action {
        let mut actions = Game::all_legal(state);
        if !self.naive {
            actions = prefer_lines(actions);
        }
        actions
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_else(crate::no_move)
    }

    fn player_type(&self) -> String {
        if self.naive { "rn" } else { "r" }.to_string()
    }

    fn copy(&self) -> Box<dyn Player> {
        Box::new(self.clone())
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }
}
