//! # tessera-cli: Arena Front End
//!
//! Command-line driver for the tessera arena: parses the roster and options,
//! resolves layered configuration, runs the tournament and prints the report.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments and writes to the given streams, so the binary and
//! the tests share one code path.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["tessera-arena", "fl", "r", "-a", "p", "-g", "100", "-t", "4"];
//! let code = tessera_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Configuration
//!
//! Defaults, then the TOML file named by `TESSERA_CONFIG`, then
//! `TESSERA_SEED` / `TESSERA_GAMES` / `TESSERA_THREADS`, then flags.
//! `--show-config` prints the result with the source of each value.

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod logging;
pub mod ui;

use cli::ArenaCli;
use commands::{handle_arena_command, handle_show_config};

pub use error::CliError;

/// Parses `args` and runs the arena.
///
/// # Returns
///
/// [`exit_code::SUCCESS`] when the report was printed (aborted games do not
/// count as failure), [`exit_code::ERROR`] for malformed arguments,
/// unknown strategies, invalid configuration, or rules a strategy rejects.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match ArenaCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    let _ = write!(err, "{}", e);
                    let _ = writeln!(err, "\nFor full help, run: tessera-arena --help");
                    exit_code::ERROR
                }
            };
        }
    };

    let result = if cli.show_config {
        handle_show_config(&cli, out)
    } else {
        handle_arena_command(&cli, out, err)
    };
    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args.iter().copied(), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn help_goes_to_stdout() {
        let (code, out, _) = run_args(&["tessera-arena", "--help"]);
        assert_eq!(code, exit_code::SUCCESS);
        assert!(out.contains("Usage"));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let (code, out, err) = run_args(&["tessera-arena", "--bogus"]);
        assert_eq!(code, exit_code::ERROR);
        assert!(out.is_empty());
        assert!(err.contains("--bogus"));
    }

    #[test]
    fn bad_mode_is_an_error() {
        let (code, _, _) = run_args(&["tessera-arena", "-a", "x"]);
        assert_eq!(code, exit_code::ERROR);
    }

    #[test]
    fn parser_accepts_long_mode_names() {
        let cli = ArenaCli::try_parse_from(["tessera-arena", "--arena", "subsets", "fl", "r"])
            .unwrap();
        assert_eq!(cli.mode, Some(cli::ModeArg::Subsets));
        assert_eq!(cli.players, vec!["fl", "r"]);
    }

    #[test]
    fn parser_rejects_zero_games_and_threads() {
        assert!(ArenaCli::try_parse_from(["tessera-arena", "-g", "0"]).is_err());
        assert!(ArenaCli::try_parse_from(["tessera-arena", "-t", "0"]).is_err());
        assert!(ArenaCli::try_parse_from(["tessera-arena", "-n", "9"]).is_err());
    }
}
