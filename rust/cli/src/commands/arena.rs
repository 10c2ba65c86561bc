//! Runs a tournament and prints its report.

use std::io::Write;

use tessera_engine::arena::Arena;
use tessera_engine::player::Player;
use tracing::debug;

use crate::cli::{ArenaCli, DEFAULT_ROSTER};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::formatters;
use crate::ui;

/// Strategy instances for the requested identifiers, in command-line order.
pub fn build_roster(ids: &[String]) -> Result<Vec<Box<dyn Player>>, CliError> {
    let ids: Vec<&str> = if ids.is_empty() {
        DEFAULT_ROSTER.to_vec()
    } else {
        ids.iter().map(String::as_str).collect()
    };
    ids.into_iter()
        .map(|id| tessera_ai::create_player(id).map_err(CliError::from))
        .collect()
}

pub fn handle_arena_command(
    cli: &ArenaCli,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let config::ConfigResolved { config, .. } = config::resolve(cli)?;
    let roster = build_roster(&cli.players)?;

    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            writeln!(err, "Using random seed {}", seed)?;
            seed
        }
    };

    let arena = arena_for(&config, roster, seed);
    if config.rotate_seats {
        let mut sizes: Vec<usize> = arena.matchups().iter().map(Vec::len).collect();
        sizes.sort_unstable();
        sizes.dedup();
        ui::warn_uneven_rotation(err, config.games, &sizes)?;
    }
    debug!(players = ?arena.player_types(), seed, "roster ready");

    let report = arena.run()?;
    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
        writeln!(out, "{}", json)?;
    } else {
        writeln!(out, "seed: {}", seed)?;
        writeln!(out)?;
        write!(out, "{}", formatters::format_report(&report))?;
    }
    if report.total_aborts() > 0 {
        ui::display_warning(
            err,
            &format!(
                "{} of {} games aborted",
                report.total_aborts(),
                report.total_games() + report.total_aborts()
            ),
        )?;
    }
    Ok(())
}

fn arena_for(config: &Config, roster: Vec<Box<dyn Player>>, seed: u64) -> Arena {
    Arena::new(config.rules(), roster)
        .mode(config.mode)
        .count(config.games as usize)
        .thread_limit(config.threads)
        .seed(seed)
        .rotate_seats(config.rotate_seats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roster_uses_defaults() {
        let roster = build_roster(&[]).unwrap();
        let types: Vec<String> = roster.iter().map(|p| p.player_type()).collect();
        assert_eq!(types, vec!["fl", "rn", "r"]);
    }

    #[test]
    fn unknown_player_is_input_error() {
        let result = build_roster(&["fl".to_string(), "zz".to_string()]);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn arena_follows_config() {
        let config = Config {
            games: 3,
            threads: 2,
            ..Config::default()
        };
        let roster = build_roster(&["fl".to_string(), "r".to_string(), "rn".to_string()]).unwrap();
        let arena = arena_for(&config, roster, 5);
        assert_eq!(arena.matchups().len(), 3);
        let report = arena.run().unwrap();
        assert_eq!(report.total_games() + report.total_aborts(), 9);
    }
}
