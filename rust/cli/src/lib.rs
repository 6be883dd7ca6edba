//! # Liar CLI Library
//!
//! Command-line front end for the Lying/Cheat engine: batch simulation of
//! bot games, replay verification and narration, and dealing a single table.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the arguments and dispatches to a subcommand, writing to
//! the given streams so tests can capture everything.
//!
//! ```
//! use std::io;
//! let args = vec!["liar", "deal", "--seed", "42", "--players", "4"];
//! let code = liar_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `sim`: Run bot games and print win, placement and challenge statistics
//! - `verify`: Validate a replay file
//! - `replay`: Narrate a replay file and show the resulting state
//! - `deal`: Deal one table for inspection
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;

#[macro_use]
mod macros;

pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{Commands, LiarCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_replay_command, handle_sim_command,
    handle_verify_command,
};

pub use error::{BatchValidationError, CliError};

/// Subcommands listed in the usage text printed after a parse error.
pub const COMMANDS: &[&str] = &["sim", "verify", "replay", "deal", "cfg"];

/// Main entry point for the CLI application.
///
/// Returns the process exit code: `0` on success, `2` on any error. Help and
/// version output go to `out` and count as success.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match LiarCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Lying (Cheat) simulator");
            write_or_exit!(err, "Usage: liar <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for c in COMMANDS {
                write_or_exit!(err, "  {}", c);
            }
            write_or_exit!(err, "\nFor full help, run: liar --help");
            return exit_code::ERROR;
        }
    };

    let result = match cli.cmd {
        Commands::Sim {
            players,
            bots,
            seed,
            games,
            verbose,
            save_replay,
        } => handle_sim_command(players, bots, seed, games, verbose, save_replay, out, err),
        Commands::Verify { input } => handle_verify_command(input, out, err),
        Commands::Replay { input, upto } => handle_replay_command(input, upto, out, err),
        Commands::Deal { seed, players } => handle_deal_command(seed, players, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
