//! Command-line argument definitions.
//!
//! The parser is kept separate from [`crate::run`] so tests can build
//! [`LiarCli`] directly and compare the subcommand list against the
//! usage text printed on errors.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "liar",
    version,
    about = "Lying (Cheat) card game simulator",
    long_about = "Runs bot-only games of Lying (Cheat), records and verifies replays."
)]
pub struct LiarCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate bot games and print a summary
    Sim {
        /// Number of players (2-6)
        #[arg(long)]
        players: Option<usize>,
        /// Bot types per seat, repeated to fill the table (random, heuristic)
        #[arg(long, num_args = 1..)]
        bots: Vec<String>,
        /// Master seed; each game draws its own seed from it
        #[arg(long)]
        seed: Option<u64>,
        /// Number of games to run
        #[arg(long)]
        games: Option<u32>,
        /// Print every event of every game
        #[arg(long)]
        verbose: bool,
        /// Write a replay JSON file per game
        #[arg(long = "save-replay")]
        save_replay: Option<String>,
    },
    /// Check a replay file for consistency
    Verify {
        #[arg(long)]
        input: String,
    },
    /// Narrate a replay file and print the resulting state
    Replay {
        #[arg(long)]
        input: String,
        /// Stop after this many events
        #[arg(long)]
        upto: Option<usize>,
    },
    /// Deal one table and show the hands
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        players: Option<usize>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Sim { .. } => "sim",
            Commands::Verify { .. } => "verify",
            Commands::Replay { .. } => "replay",
            Commands::Deal { .. } => "deal",
            Commands::Cfg => "cfg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_bot_list() {
        let cli = LiarCli::try_parse_from([
            "liar", "sim", "--players", "3", "--bots", "random", "heuristic", "--games", "2",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Sim {
                players,
                bots,
                games,
                verbose,
                ..
            } => {
                assert_eq!(players, Some(3));
                assert_eq!(bots, vec!["random", "heuristic"]);
                assert_eq!(games, Some(2));
                assert!(!verbose);
            }
            other => panic!("unexpected command {}", other.name()),
        }
    }

    #[test]
    fn verify_requires_input() {
        assert!(LiarCli::try_parse_from(["liar", "verify"]).is_err());
    }
}
