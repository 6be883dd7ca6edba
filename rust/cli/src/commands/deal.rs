//! Deal command handler.
//!
//! Shuffles and deals one table, then shows each hand as dealt together with
//! any four-of-a-kind discarded before the first turn.

use std::io::Write;

use liar_engine::engine::Engine;
use liar_engine::events::Event;

use crate::config;
use crate::error::CliError;
use crate::formatters::{format_cards, format_event};
use crate::ui;

/// Handle the deal command.
///
/// `seed` and `players` fall back to the configured values, and the seed to
/// a random one when nothing is configured.
pub fn handle_deal_command(
    seed: Option<u64>,
    players: Option<usize>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let resolved = config::load_with_sources()
        .and_then(|r| r.override_with(players, &[], seed, None))
        .map_err(|e| {
            let msg = e.to_string();
            let _ = ui::write_error(err, &msg);
            CliError::Config(msg)
        })?;
    let base_seed = resolved.config.seed.unwrap_or_else(rand::random);
    let engine = Engine::new(base_seed, resolved.config.players)?;

    writeln!(out, "Seed: {}", base_seed)?;
    for seat in &engine.initial_snapshot().players {
        let mut hand = seat.hand.clone().unwrap_or_default();
        hand.sort();
        writeln!(out, "P{} ({}): {}", seat.id, hand.len(), format_cards(&hand))?;
    }
    for event in engine.events() {
        if matches!(event, Event::DiscardQuad { .. } | Event::Placement { .. }) {
            writeln!(out, "{}", format_event(event, &[]))?;
        }
    }
    match engine.current_player() {
        Some(seat) => writeln!(out, "P{} opens", seat)?,
        None => writeln!(out, "{}", format_event(&game_end(&engine), &[]))?,
    }
    Ok(())
}

fn game_end(engine: &Engine) -> Event {
    Event::GameEnd {
        placements: engine.placements().to_vec(),
    }
}
