//! Depth-limited alpha-beta search.
//!
//! With more than two players the search is paranoid: every opponent is
//! assumed to minimise the searching player's evaluation.

use tessera_engine::action::Action;
use tessera_engine::game::Game;
use tessera_engine::player::Player;
use tessera_engine::rules::Rules;
use tessera_engine::state::State;
use tracing::debug;

/// Weight of pattern-line progress relative to one point of score.
const PROGRESS_WEIGHT: f64 = 2.0;

/// Score margin `seat` would hold if the round ended now: round-end tiling
/// and floor penalties are applied to a copy, then the best opponent score
/// is subtracted and unfinished pattern-line progress is credited.
pub fn evaluate(state: &State, seat: usize) -> f64 {
    let mut scored = state.clone();
    Game::score_panels(&mut scored);
    let own = scored.panel(seat).score() as f64;
    let best_other = scored
        .panels()
        .iter()
        .enumerate()
        .filter(|(s, _)| *s != seat)
        .map(|(_, p)| p.score())
        .max()
        .unwrap_or(0) as f64;
    own - best_other + PROGRESS_WEIGHT * scored.panel(seat).pyramid().progress()
}

#[derive(Debug, Clone, Copy)]
pub struct MinimaxPlayer {
    depth: u32,
}

impl MinimaxPlayer {
    pub const DEFAULT_DEPTH: u32 = 2;

    pub fn new(depth: u32) -> Self {
        Self {
            depth: depth.max(1),
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Best action for the current player, ties broken by enumeration order.
    pub fn search(&self, state: &State) -> Option<Action> {
        let me = state.current_player();
        let mut best: Option<(Action, f64)> = None;
        let mut alpha = f64::NEG_INFINITY;
        for action in Game::all_legal(state) {
            let mut next = state.clone();
            if Game::apply(action, &mut next).is_err() {
                continue;
            }
            let value = alphabeta(&next, self.depth - 1, alpha, f64::INFINITY, me);
            let improves = match best {
                None => true,
                Some((_, v)) => value > v,
            };
            if improves {
                best = Some((action, value));
                alpha = alpha.max(value);
            }
        }
        best.map(|(action, _)| action)
    }
}

impl Default for MinimaxPlayer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DEPTH)
    }
}

fn alphabeta(state: &State, depth: u32, mut alpha: f64, mut beta: f64, me: usize) -> f64 {
    if depth == 0 || state.is_round_finished() {
        return evaluate(state, me);
    }
    let maximizing = state.current_player() == me;
    let mut value = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    for action in Game::all_legal(state) {
        let mut next = state.clone();
        if Game::apply(action, &mut next).is_err() {
            continue;
        }
        let child = alphabeta(&next, depth - 1, alpha, beta, me);
        if maximizing {
            value = value.max(child);
            alpha = alpha.max(value);
        } else {
            value = value.min(child);
            beta = beta.min(value);
        }
        if alpha >= beta {
            break;
        }
    }
    value
}

impl Player for MinimaxPlayer {
    fn play(&mut self, state: &State) -> Action {
        match self.search(state) {
            Some(action) => action,
            None => {
                debug!(seat = state.current_player(), "minimax found no legal action");
                crate::no_move()
            }
        }
    }

    /// Branching grows with the table; deep searches only on small tables.
    fn check_rules(&self, rules: &Rules) -> bool {
        self.depth <= 2 || rules.player_count <= 4
    }

    fn player_type(&self) -> String {
        format!("mm:{}", self.depth)
    }

    fn copy(&self) -> Box<dyn Player> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_one_picks_the_best_immediate_evaluation() {
        let mut game = Game::with_seed(Rules::MINI, 4).unwrap();
        game.start_round().unwrap();
        let state = game.state();
        let me = state.current_player();
        let mut expected = None;
        let mut best = f64::NEG_INFINITY;
        for action in Game::all_legal(state) {
            let mut next = state.clone();
            Game::apply(action, &mut next).unwrap();
            let value = evaluate(&next, me);
            if value > best {
                best = value;
                expected = Some(action);
            }
        }
        assert_eq!(MinimaxPlayer::new(1).search(state), expected);
    }

    #[test]
    fn depth_is_at_least_one() {
        assert_eq!(MinimaxPlayer::new(0).depth(), 1);
        assert_eq!(MinimaxPlayer::default().player_type(), "mm:2");
    }

    #[test]
    fn evaluation_starts_even() {
        let game = Game::with_seed(Rules::DEFAULT, 0).unwrap();
        assert_eq!(evaluate(game.state(), 0), 0.0);
    }
}
