use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_engine::action::Action;
use tessera_engine::game::Game;
use tessera_engine::player::Player;
use tessera_engine::state::State;
use tracing::trace;

use crate::random::prefer_lines;

/// Flat Monte Carlo: every candidate is followed by random play to the end
/// of the round, and the candidate with the best mean score margin wins.
#[derive(Debug, Clone)]
pub struct MonteCarloPlayer {
    rollouts: u32,
    rng: ChaCha8Rng,
}

impl MonteCarloPlayer {
    /// Rollouts per candidate action; a move costs this times the number of legal actions.
    pub const DEFAULT_ROLLOUTS: u32 = 16;

    pub fn new(rollouts: u32, seed: u64) -> Self {
        Self {
            rollouts: rollouts.max(1),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn rollouts(&self) -> u32 {
        self.rollouts
    }

    fn rollout(&mut self, state: &State, me: usize) -> f64 {
        let mut sim = state.clone();
        while !sim.is_round_finished() {
            let actions = prefer_lines(Game::all_legal(&sim));
            let Some(&action) = actions.choose(&mut self.rng) else {
                break;
            };
            if Game::apply(action, &mut sim).is_err() {
                break;
            }
        }
        Game::score_panels(&mut sim);
        let own = sim.panel(me).score() as f64;
        let best_other = sim
            .panels()
            .iter()
            .enumerate()
            .filter(|(s, _)| *s != me)
            .map(|(_, p)| p.score())
            .max()
            .unwrap_or(0) as f64;
        own - best_other
    }
}

impl Default for MonteCarloPlayer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROLLOUTS, 0)
    }
}

impl Player for MonteCarloPlayer {
    fn play(&mut self, state: &State) -> Action {
        let me = state.current_player();
        let candidates = prefer_lines(Game::all_legal(state));
        if candidates.len() == 1 {
            return candidates[0];
        }
        let mut best: Option<(Action, f64)> = None;
        for action in candidates {
            let mut next = state.clone();
            if Game::apply(action, &mut next).is_err() {
                continue;
            }
            let total: f64 = (0..self.rollouts).map(|_| self.rollout(&next, me)).sum();
            let mean = total / self.rollouts as f64;
            let improves = match best {
                None => true,
                Some((_, v)) => mean > v,
            };
            if improves {
                best = Some((action, mean));
            }
        }
        match best {
            Some((action, mean)) => {
                trace!(seat = me, %action, mean, "monte carlo choice");
                action
            }
            None => crate::no_move(),
        }
    }

    fn player_type(&self) -> String {
        format!("mc:{}", self.rollouts)
    }

    fn copy(&self) -> Box<dyn Player> {
        Box::new(self.clone())
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }
}
