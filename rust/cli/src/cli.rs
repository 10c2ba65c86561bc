//! Command-line definition for `tessera-arena`.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tessera_engine::arena::ArenaMode;
use tessera_engine::rules::Rules;
use tessera_engine::tiles::TILE_TYPES;

/// Roster used when no player is named.
pub const DEFAULT_ROSTER: &[&str] = &["fl", "rn", "r"];

#[derive(Parser, Debug)]
#[command(
    name = "tessera-arena",
    version,
    about = "Play built-in tile-drafting strategies against each other"
)]
pub struct ArenaCli {
    /// Strategies to enter: fl, rn, r, mc[:rollouts], mm[:depth]
    #[arg(value_name = "PLAYER")]
    pub players: Vec<String>,

    /// Pairing: s (every subset), p (every pair), a (all at one table)
    #[arg(short = 'a', long = "arena", value_enum)]
    pub mode: Option<ModeArg>,

    /// Games per matchup
    #[arg(short = 'g', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub games: Option<u32>,

    /// Games played at once
    #[arg(short = 't', long, value_parser = clap::value_parser!(u16).range(1..=1024))]
    pub threads: Option<u16>,

    /// Tile colours (and wall size)
    #[arg(short = 'n', long = "tile-types", value_parser = clap::value_parser!(u8).range(2..=TILE_TYPES as i64))]
    pub tile_types: Option<u8>,

    /// Arena seed; random when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Base rules
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Keep the same seat order in every game of a matchup
    #[arg(long)]
    pub no_rotate: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    #[value(name = "s", alias = "subsets")]
    Subsets,
    #[value(name = "p", alias = "pairs")]
    Pairs,
    #[value(name = "a", alias = "all")]
    All,
}

impl From<ModeArg> for ArenaMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Subsets => ArenaMode::Subsets,
            ModeArg::Pairs => ArenaMode::Pairs,
            ModeArg::All => ArenaMode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Default,
    Mini,
}

impl Preset {
    pub fn rules(self) -> Rules {
        match self {
            Preset::Default => Rules::DEFAULT,
            Preset::Mini => Rules::MINI,
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Preset::Default => "default",
            Preset::Mini => "mini",
        })
    }
}
