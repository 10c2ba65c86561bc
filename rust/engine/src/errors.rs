use thiserror::Error;

use crate::action::Action;
use crate::game::Phase;

/// Invalid [`crate::rules::Rules`] configuration. Always fatal to the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("tile_types must be between 2 and {max}, got {value}")]
    TileTypes { value: u8, max: usize },
    #[error("player_count must be between 2 and {max}, got {value}")]
    PlayerCount { value: usize, max: usize },
    #[error("factory_tiles must be at least 1")]
    FactoryTiles,
    #[error("tile_count must be at least 1")]
    TileCount,
    #[error("overflow_count must be at least 1")]
    OverflowCount,
}

/// Which legality clause an action failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    NoneColor,
    UnknownSource,
    SourceEmpty,
    ColorAbsent,
    UnknownLine,
    LineColorMismatch,
    LineFull,
    AlreadyOnWall,
}

impl std::fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IllegalReason::NoneColor => "no colour chosen",
            IllegalReason::UnknownSource => "no such factory",
            IllegalReason::SourceEmpty => "source is empty",
            IllegalReason::ColorAbsent => "source holds no tile of that colour",
            IllegalReason::UnknownLine => "no such pattern line",
            IllegalReason::LineColorMismatch => "pattern line holds another colour",
            IllegalReason::LineFull => "pattern line is full",
            IllegalReason::AlreadyOnWall => "colour already placed on that wall row",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid rules: {0}")]
    InvalidRules(#[from] RulesError),
    #[error("Not enough players: expected {expected}, got {actual}")]
    NotEnoughPlayers { expected: usize, actual: usize },
    #[error("Too many players: table seats {expected}")]
    TooManyPlayers { expected: usize },
    #[error("Player {seat} rejected the rules")]
    RulesRejected { seat: usize },
    #[error("Wrong phase: expected {expected:?}, currently {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("Illegal action {action}: {reason}")]
    IllegalAction { action: Action, reason: IllegalReason },
    #[error("Player {seat} forfeited with illegal action {action}: {reason}")]
    PlayerForfeit {
        seat: usize,
        action: Action,
        reason: IllegalReason,
    },
    #[error("Player {seat} panicked")]
    PlayerPanicked { seat: usize },
    #[error("Game panicked outside a player's turn")]
    Panicked,
    #[error("Game exceeded {rounds} rounds")]
    RoundLimit { rounds: u32 },
}

/// Failures that stop an arena run before any game is played.
///
/// Errors inside a single game never surface here; they are recorded as
/// aborts in the report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("Arena needs at least {min} players, got {actual}")]
    NotEnoughPlayers { min: usize, actual: usize },
    #[error("Invalid rules for a table of {players}: {source}")]
    InvalidRules {
        players: usize,
        #[source]
        source: RulesError,
    },
    #[error("Player {player} rejected the rules for a table of {players}")]
    RulesRejected { player: String, players: usize },
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}
