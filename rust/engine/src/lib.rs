//! # tessera-engine: Tile-Drafting Game Engine Core
//!
//! Rules engine for a factory-draft, pattern-line, wall-tiling board game for
//! two or more players, plus the Arena harness that plays strategies against
//! each other at volume on a bounded thread pool.
//!
//! ## Core Modules
//!
//! - [`tiles`] - Tile colours and per-colour tile multisets
//! - [`rules`] - Game configuration, presets and the floor-penalty schedule
//! - [`pyramid`] - Per-player pattern lines
//! - [`wall`] - Per-player permanent grid and placement scoring
//! - [`panel`] - A player's board: pyramid, wall, score, floor
//! - [`factory`] - Shared draw piles
//! - [`state`] - Complete, cloneable game snapshot
//! - [`action`] - Draft actions
//! - [`game`] - Round lifecycle, legality, application, scoring
//! - [`player`] - Player and Observer contracts
//! - [`arena`] - Concurrent tournament harness
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera_engine::game::Game;
//! use tessera_engine::rules::Rules;
//!
//! let mut game = Game::with_seed(Rules::DEFAULT, 42).unwrap();
//! game.start_round().unwrap();
//!
//! let actions = Game::all_legal(game.state());
//! assert!(!actions.is_empty());
//! assert!(actions.iter().all(|&a| Game::legal(a, game.state())));
//! ```
//!
//! ## Deterministic Gameplay
//!
//! The bag is drawn from a ChaCha RNG owned by each [`game::Game`]; the same
//! seed always deals the same factories:
//!
//! ```rust
//! use tessera_engine::game::Game;
//! use tessera_engine::rules::Rules;
//!
//! let mut a = Game::with_seed(Rules::MINI, 7).unwrap();
//! let mut b = Game::with_seed(Rules::MINI, 7).unwrap();
//! a.start_round().unwrap();
//! b.start_round().unwrap();
//! assert_eq!(a.state(), b.state());
//! ```

pub mod action;
pub mod arena;
pub mod errors;
pub mod factory;
pub mod game;
pub mod panel;
pub mod player;
pub mod pyramid;
pub mod rules;
pub mod state;
pub mod tiles;
pub mod wall;

pub use action::{Action, Pick, Place};
pub use arena::{Arena, ArenaMode, ArenaReport, MatchupReport, PlayerStats};
pub use errors::{ArenaError, GameError, IllegalReason, RulesError};
pub use game::{Game, GameOutcome, Phase, MAX_ROUNDS};
pub use player::{Observer, Player};
pub use rules::Rules;
pub use state::State;
pub use tiles::{Tile, Tiles, TILE_TYPES};
