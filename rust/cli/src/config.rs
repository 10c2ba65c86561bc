//! Layered arena configuration.
//!
//! Values resolve in order: built-in defaults, the TOML file named by
//! `TESSERA_CONFIG`, environment variables, then command-line flags. Each
//! value remembers which layer set it.

use serde::{Deserialize, Serialize};
use std::fs;
use tessera_engine::arena::{Arena, ArenaMode};
use tessera_engine::rules::Rules;
use tessera_engine::tiles::TILE_TYPES;

use crate::cli::{ArenaCli, Preset};

pub const CONFIG_ENV: &str = "TESSERA_CONFIG";
pub const SEED_ENV: &str = "TESSERA_SEED";
pub const GAMES_ENV: &str = "TESSERA_GAMES";
pub const THREADS_ENV: &str = "TESSERA_THREADS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub games: u32,
    pub threads: usize,
    pub mode: ArenaMode,
    pub seed: Option<u64>,
    pub preset: Preset,
    pub tile_types: Option<u8>,
    pub rotate_seats: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            games: Arena::DEFAULT_COUNT as u32,
            threads: Arena::DEFAULT_THREADS,
            mode: ArenaMode::Pairs,
            seed: None,
            preset: Preset::Default,
            tile_types: None,
            rotate_seats: true,
        }
    }
}

impl Config {
    /// Rules for the arena; the table size is set per matchup.
    pub fn rules(&self) -> Rules {
        let rules = self.preset.rules();
        match self.tile_types {
            Some(n) => rules.with_tile_types(n),
            None => rules,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub games: ValueSource,
    pub threads: ValueSource,
    pub mode: ValueSource,
    pub seed: ValueSource,
    pub preset: ValueSource,
    pub tile_types: ValueSource,
    pub rotate_seats: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            games: ValueSource::Default,
            threads: ValueSource::Default,
            mode: ValueSource::Default,
            seed: ValueSource::Default,
            preset: ValueSource::Default,
            tile_types: ValueSource::Default,
            rotate_seats: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    games: Option<u32>,
    #[serde(default)]
    threads: Option<usize>,
    #[serde(default)]
    mode: Option<ArenaMode>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    preset: Option<Preset>,
    #[serde(default)]
    tile_types: Option<u8>,
    #[serde(default)]
    rotate_seats: Option<bool>,
}

/// Defaults, file and environment layers.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            let s = fs::read_to_string(path)?;
            let f: FileConfig = toml::from_str(&s)?;
            if let Some(v) = f.games {
                cfg.games = v;
                sources.games = ValueSource::File;
            }
            if let Some(v) = f.threads {
                cfg.threads = v;
                sources.threads = ValueSource::File;
            }
            if let Some(v) = f.mode {
                cfg.mode = v;
                sources.mode = ValueSource::File;
            }
            if let Some(v) = f.seed {
                cfg.seed = Some(v);
                sources.seed = ValueSource::File;
            }
            if let Some(v) = f.preset {
                cfg.preset = v;
                sources.preset = ValueSource::File;
            }
            if let Some(v) = f.tile_types {
                cfg.tile_types = Some(v);
                sources.tile_types = ValueSource::File;
            }
            if let Some(v) = f.rotate_seats {
                cfg.rotate_seats = v;
                sources.rotate_seats = ValueSource::File;
            }
        }
    }

    if let Some(seed) = env_value(SEED_ENV) {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", SEED_ENV, seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(games) = env_value(GAMES_ENV) {
        cfg.games = games
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", GAMES_ENV, games)))?;
        sources.games = ValueSource::Env;
    }
    if let Some(threads) = env_value(THREADS_ENV) {
        cfg.threads = threads
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", THREADS_ENV, threads)))?;
        sources.threads = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

/// All layers, command line last.
pub fn resolve(cli: &ArenaCli) -> Result<ConfigResolved, ConfigError> {
    let mut resolved = load_with_sources()?;
    let ConfigResolved { config, sources } = &mut resolved;
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
        sources.mode = ValueSource::Cli;
    }
    if let Some(games) = cli.games {
        config.games = games;
        sources.games = ValueSource::Cli;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads as usize;
        sources.threads = ValueSource::Cli;
    }
    if let Some(n) = cli.tile_types {
        config.tile_types = Some(n);
        sources.tile_types = ValueSource::Cli;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
        sources.seed = ValueSource::Cli;
    }
    if let Some(preset) = cli.preset {
        config.preset = preset;
        sources.preset = ValueSource::Cli;
    }
    if cli.no_rotate {
        config.rotate_seats = false;
        sources.rotate_seats = ValueSource::Cli;
    }
    validate(config)?;
    Ok(resolved)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.games == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: games must be >=1".into(),
        ));
    }
    if cfg.threads == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: threads must be >=1".into(),
        ));
    }
    if let Some(n) = cfg.tile_types {
        if !(2..=TILE_TYPES as u8).contains(&n) {
            return Err(ConfigError::Invalid(format!(
                "Invalid configuration: tile_types must be between 2 and {}",
                TILE_TYPES
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_follow_preset() {
        let mut cfg = Config::default();
        assert_eq!(cfg.rules(), Rules::DEFAULT);
        cfg.preset = Preset::Mini;
        cfg.tile_types = Some(4);
        assert_eq!(cfg.rules(), Rules::MINI.with_tile_types(4));
    }

    #[test]
    fn validate_rejects_zero_games_and_bad_colours() {
        let cfg = Config {
            games: 0,
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
        let cfg = Config {
            tile_types: Some(9),
            ..Config::default()
        };
        assert!(validate(&cfg).is_err());
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn file_config_rejects_unknown_keys() {
        let parsed: Result<FileConfig, _> = toml::from_str("games = 3\nlevel = 2\n");
        assert!(parsed.is_err());
        let parsed: FileConfig = toml::from_str("mode = \"all\"\npreset = \"mini\"\n").unwrap();
        assert_eq!(parsed.mode, Some(ArenaMode::All));
        assert_eq!(parsed.preset, Some(Preset::Mini));
    }
}
