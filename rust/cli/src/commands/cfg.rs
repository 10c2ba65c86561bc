//! `--show-config`: the resolved configuration and where each value came from.
//!
//! # Example Output
//!
//! ```json
//! {
//!   "games": {
//!     "value": 1000,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use std::io::Write;

use crate::cli::{ArenaCli, DEFAULT_ROSTER};
use crate::config;
use crate::error::CliError;

pub fn handle_show_config(cli: &ArenaCli, out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::resolve(cli)?;
    let players: Vec<String> = if cli.players.is_empty() {
        DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect()
    } else {
        cli.players.clone()
    };

    let display = serde_json::json!({
        "players": players,
        "games": {
            "value": config.games,
            "source": sources.games,
        },
        "threads": {
            "value": config.threads,
            "source": sources.threads,
        },
        "mode": {
            "value": config.mode,
            "source": sources.mode,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "preset": {
            "value": config.preset,
            "source": sources.preset,
        },
        "tile_types": {
            "value": config.rules().tile_types,
            "source": sources.tile_types,
        },
        "rotate_seats": {
            "value": config.rotate_seats,
            "source": sources.rotate_seats,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
