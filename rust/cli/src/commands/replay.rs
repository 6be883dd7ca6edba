//! Replay command handler.
//!
//! Narrates the events of a replay file, optionally stopping after `--upto`
//! events, then prints the state the log reduces to at that point.

use std::io::Write;

use liar_engine::replay::ReplayState;

use super::verify::load_replay;
use crate::error::CliError;
use crate::formatters::{format_cards, format_event, seat_name};
use crate::ui;

pub fn handle_replay_command(
    input: String,
    upto: Option<usize>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let replay = load_replay(&input, err)?;
    let labels = replay.metadata.bot_types.clone();
    let limit = upto.unwrap_or(replay.events.len()).min(replay.events.len());

    ui::write_header(
        out,
        &format!(
            "Replay: {} players, seed {}, recorded {}",
            replay.metadata.player_count, replay.metadata.seed, replay.metadata.timestamp
        ),
    )?;
    for (index, event) in replay.events.iter().take(limit).enumerate() {
        writeln!(out, "{:>4}  {}", index, format_event(event, &labels))?;
    }

    let state = replay.reduce(Some(limit)).map_err(|e| {
        let _ = ui::write_error(err, &e.to_string());
        CliError::from(e)
    })?;
    ui::write_header(out, &format!("State after {} of {} events", limit, replay.events.len()))?;
    write_state(out, &state, &labels)?;
    Ok(())
}

fn write_state(out: &mut dyn Write, state: &ReplayState, labels: &[String]) -> std::io::Result<()> {
    for (seat, player) in state.players.iter().enumerate() {
        let place = player
            .placement
            .map(|p| format!(" place {}", p))
            .unwrap_or_default();
        writeln!(
            out,
            "{} hand({}): {}{}",
            seat_name(seat, labels),
            player.hand.len(),
            format_cards(&player.hand),
            place
        )?;
    }
    match state.active_rank {
        Some(rank) => writeln!(out, "Active rank: {}", rank)?,
        None => writeln!(out, "Active rank: none")?,
    }
    writeln!(out, "Pile({}): {}", state.pile.len(), format_cards(&state.pile))?;
    let placements: Vec<String> = state.placements.iter().map(|p| format!("P{}", p)).collect();
    writeln!(out, "Placements: {}", placements.join(", "))?;
    Ok(())
}
