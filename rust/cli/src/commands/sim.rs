//! Simulation command handler.
//!
//! Runs a batch of bot-only games and prints aggregate statistics. A master
//! generator seeded from `--seed` (or the configured seed) draws one seed per
//! game, so a batch is reproducible as a whole and every saved replay is
//! reproducible on its own from the seed stored in its metadata.
//!
//! # Examples
//!
//! ```no_run
//! use std::io;
//! let code = liar_cli::run(
//!     ["liar", "sim", "--players", "4", "--bots", "heuristic", "random", "--games", "10"],
//!     &mut io::stdout(),
//!     &mut io::stderr(),
//! );
//! assert_eq!(code, 0);
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use liar_ai::table::Table;
use liar_engine::deck::seeded_rng;
use liar_engine::engine::Engine;
use liar_engine::events::Event;
use rand::Rng;

use crate::config;
use crate::error::CliError;
use crate::formatters::format_event;
use crate::io_utils::{ensure_parent_dir, replay_path};
use crate::ui;
use crate::validation::resolve_seats;

/// Upper bound (inclusive) of the per-game seeds drawn from the master seed.
const MAX_GAME_SEED: u64 = 1_000_000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeTally {
    pub opportunities: usize,
    pub attempts: usize,
    pub successes: usize,
}

/// Aggregates over a batch of finished games, keyed by bot label.
#[derive(Debug, Default)]
pub struct SimSummary {
    pub games: usize,
    pub wins: BTreeMap<String, usize>,
    pub game_lengths: Vec<usize>,
    pub pickup_sizes: Vec<usize>,
    /// place (1-based) -> label -> count
    pub placements: BTreeMap<usize, BTreeMap<String, usize>>,
    pub challenges: BTreeMap<String, ChallengeTally>,
}

impl SimSummary {
    pub fn record(&mut self, engine: &Engine, labels: &[String]) {
        let label = |seat: usize| labels.get(seat).cloned().unwrap_or_else(|| format!("P{seat}"));
        self.games += 1;
        for name in labels {
            self.wins.entry(name.clone()).or_insert(0);
        }
        if let Some(&winner) = engine.placements().first() {
            *self.wins.entry(label(winner)).or_insert(0) += 1;
        }
        self.game_lengths.push(engine.state().turn_count());
        for (i, &seat) in engine.placements().iter().enumerate() {
            *self
                .placements
                .entry(i + 1)
                .or_default()
                .entry(label(seat))
                .or_insert(0) += 1;
        }
        for event in engine.events() {
            match event {
                Event::PickupPile { cards, .. } => self.pickup_sizes.push(cards.len()),
                Event::ChallengeDecision {
                    challenger,
                    challenge,
                } => {
                    let tally = self.challenges.entry(label(*challenger)).or_default();
                    tally.opportunities += 1;
                    if *challenge {
                        tally.attempts += 1;
                    }
                }
                Event::ChallengeResolution {
                    challenger,
                    truthful: false,
                    ..
                } => {
                    self.challenges.entry(label(*challenger)).or_default().successes += 1;
                }
                _ => {}
            }
        }
    }

    pub fn write(&self, out: &mut dyn Write) -> std::io::Result<()> {
        ui::write_header(out, "Summary")?;
        writeln!(out, "Games: {}", self.games)?;
        for (name, count) in &self.wins {
            writeln!(out, "Wins ({}): {}", name, count)?;
        }
        writeln!(
            out,
            "Average game length (plays): {:.2}",
            mean(&self.game_lengths)
        )?;
        writeln!(
            out,
            "Average pile pickup size: {:.2}",
            mean(&self.pickup_sizes)
        )?;
        writeln!(out, "Placement distribution:")?;
        for (place, counts) in &self.placements {
            let entries: Vec<String> = counts
                .iter()
                .map(|(name, count)| format!("{}: {}", name, count))
                .collect();
            writeln!(out, "  Place {}: {}", place, entries.join(", "))?;
        }
        writeln!(out, "Challenge rates:")?;
        for (name, t) in &self.challenges {
            writeln!(
                out,
                "  {}: {}/{} ({:.2}%) challenges, success {:.2}%",
                name,
                t.attempts,
                t.opportunities,
                percent(t.attempts, t.opportunities),
                percent(t.successes, t.attempts)
            )?;
        }
        Ok(())
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Handle the sim command.
///
/// Flags override the configuration file and environment. Any stalled game
/// or rejected bot move aborts the batch with an engine error.
#[allow(clippy::too_many_arguments)]
pub fn handle_sim_command(
    players: Option<usize>,
    bots: Vec<String>,
    seed: Option<u64>,
    games: Option<u32>,
    verbose: bool,
    save_replay: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let resolved = config::load_with_sources()
        .and_then(|r| r.override_with(players, &bots, seed, games))
        .map_err(|e| {
            let msg = e.to_string();
            let _ = ui::write_error(err, &msg);
            CliError::Config(msg)
        })?;
    let cfg = resolved.config;

    let seats = resolve_seats(&cfg.bots, cfg.players).map_err(|msg| {
        let _ = ui::write_error(err, &msg);
        CliError::InvalidInput(msg)
    })?;
    if cfg.bots.len() > 1 && cfg.players % cfg.bots.len() != 0 {
        ui::display_warning(
            err,
            &format!(
                "{} bot types do not divide {} seats evenly; the list is cut short",
                cfg.bots.len(),
                cfg.players
            ),
        )?;
    }

    let base_seed = cfg.seed.unwrap_or_else(rand::random);
    let mut master = seeded_rng(base_seed);
    let total = cfg.games as usize;
    let mut summary = SimSummary::default();

    for index in 0..total {
        let game_seed = master.random_range(0..=MAX_GAME_SEED);
        let mut table = Table::new(game_seed, &seats)?;
        table.run_to_completion()?;
        let labels = table.labels();

        if let Some(base) = save_replay.as_deref() {
            let path = replay_path(base, index, total);
            write_replay(&table, &path)?;
        }
        if verbose {
            ui::write_header(out, &format!("Game {} (seed {})", index + 1, game_seed))?;
            for event in table.engine().events() {
                writeln!(out, "{}", format_event(event, &labels))?;
            }
        }
        summary.record(table.engine(), &labels);
    }

    writeln!(out, "Simulated: {} games (seed {})", total, base_seed)?;
    summary.write(out)?;
    Ok(())
}

fn write_replay(table: &Table, path: &Path) -> Result<(), CliError> {
    let replay = table.replay()?;
    ensure_parent_dir(path).map_err(std::io::Error::other)?;
    let json = serde_json::to_string_pretty(&replay).map_err(std::io::Error::other)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use liar_ai::BotKind;
    use liar_ai::table::SeatKind;

    fn finished(seed: u64, kinds: &[SeatKind]) -> Table {
        let mut table = Table::new(seed, kinds).unwrap();
        table.run_to_completion().unwrap();
        table
    }

    #[test]
    fn summary_counts_one_winner_per_game() {
        let kinds = [
            SeatKind::Bot(BotKind::Heuristic),
            SeatKind::Bot(BotKind::Random),
            SeatKind::Bot(BotKind::Random),
        ];
        let mut summary = SimSummary::default();
        for seed in 0..4 {
            let table = finished(seed, &kinds);
            summary.record(table.engine(), &table.labels());
        }
        assert_eq!(summary.games, 4);
        assert_eq!(summary.wins.values().sum::<usize>(), 4);
        assert_eq!(summary.game_lengths.len(), 4);
        let firsts: usize = summary.placements[&1].values().sum();
        let thirds: usize = summary.placements[&3].values().sum();
        assert_eq!(firsts, 4);
        assert_eq!(thirds, 4);
    }

    #[test]
    fn challenge_tallies_are_consistent() {
        let kinds = [SeatKind::Bot(BotKind::Heuristic); 4];
        let mut summary = SimSummary::default();
        let table = finished(17, &kinds);
        summary.record(table.engine(), &table.labels());
        let tally = summary.challenges["heuristic"];
        assert!(tally.attempts <= tally.opportunities);
        assert!(tally.successes <= tally.attempts);
    }

    #[test]
    fn summary_output_lists_every_section() {
        let kinds = [SeatKind::Bot(BotKind::Random); 2];
        let mut summary = SimSummary::default();
        let table = finished(3, &kinds);
        summary.record(table.engine(), &table.labels());
        let mut out = Vec::new();
        summary.write(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Wins (random): 1"));
        assert!(text.contains("Average game length (plays):"));
        assert!(text.contains("Average pile pickup size:"));
        assert!(text.contains("  Place 2: random: 1"));
        assert!(text.contains("Challenge rates:"));
    }

    #[test]
    fn empty_averages_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(percent(1, 0), 0.0);
        assert!((mean(&[2, 4]) - 3.0).abs() < 1e-9);
    }
}
