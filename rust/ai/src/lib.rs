//! # tessera-ai: Built-in Strategies
//!
//! Player implementations for the tessera engine, selectable by short
//! identifier for the arena.
//!
//! ## Strategies
//!
//! | id | strategy |
//! |----|----------|
//! | `fl` | [`FirstLegalPlayer`]: first action in enumeration order |
//! | `rn` | [`RandomPlayer::naive`]: uniform over all legal actions |
//! | `r` | [`RandomPlayer`]: uniform, avoiding the floor when possible |
//! | `mc`, `mc:<n>` | [`MonteCarloPlayer`]: `n` random rollouts per candidate action (default 16 per action, not a per-move total) |
//! | `mm`, `mm:<d>` | [`MinimaxPlayer`]: alpha-beta to depth `d` |
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera_ai::create_player;
//! use tessera_engine::game::Game;
//! use tessera_engine::rules::Rules;
//!
//! let mut player = create_player("r").unwrap();
//! let mut game = Game::with_seed(Rules::DEFAULT, 42).unwrap();
//! game.start_round().unwrap();
//!
//! let action = player.play(game.state());
//! assert!(Game::legal(action, game.state()));
//! ```

use tessera_engine::action::{Action, Pick, Place};
use tessera_engine::player::Player;
use tessera_engine::tiles::Tile;
use thiserror::Error;

pub mod first_legal;
pub mod minimax;
pub mod monte_carlo;
pub mod random;

pub use first_legal::FirstLegalPlayer;
pub use minimax::MinimaxPlayer;
pub use monte_carlo::MonteCarloPlayer;
pub use random::RandomPlayer;

/// Identifiers accepted by [`create_player`], without parameters.
pub const PLAYER_IDS: &[&str] = &["fl", "rn", "r", "mc", "mm"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlayerSpecError {
    #[error("Unknown player type '{0}' (expected one of fl, rn, r, mc[:n], mm[:d])")]
    Unknown(String),
    #[error("Invalid parameter '{value}' for player type '{id}'")]
    Parameter { id: String, value: String },
}

/// Builds a strategy from its identifier.
///
/// ```rust
/// use tessera_ai::{create_player, PlayerSpecError};
///
/// assert_eq!(create_player("mc:8").unwrap().player_type(), "mc:8");
/// assert_eq!(create_player("mm").unwrap().player_type(), "mm:2");
/// assert!(matches!(create_player("xx"), Err(PlayerSpecError::Unknown(_))));
/// ```
pub fn create_player(spec: &str) -> Result<Box<dyn Player>, PlayerSpecError> {
    let (id, param) = match spec.split_once(':') {
        Some((id, param)) => (id, Some(param)),
        None => (spec, None),
    };
    let number = |default: u32| -> Result<u32, PlayerSpecError> {
        match param {
            None => Ok(default),
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| PlayerSpecError::Parameter {
                    id: id.to_string(),
                    value: value.to_string(),
                }),
        }
    };
    let player: Box<dyn Player> = match (id, param) {
        ("fl", None) => Box::new(FirstLegalPlayer),
        ("rn", None) => Box::new(RandomPlayer::naive(0)),
        ("r", None) => Box::new(RandomPlayer::new(0)),
        ("mc", _) => Box::new(MonteCarloPlayer::new(
            number(MonteCarloPlayer::DEFAULT_ROLLOUTS)?,
            0,
        )),
        ("mm", _) => Box::new(MinimaxPlayer::new(number(MinimaxPlayer::DEFAULT_DEPTH)?)),
        _ => return Err(PlayerSpecError::Unknown(spec.to_string())),
    };
    Ok(player)
}

/// Reply for a state with no legal action; the engine rejects it.
pub(crate) fn no_move() -> Action {
    Action::new(Pick::Center, Tile::NONE, Place::Floor)
}
