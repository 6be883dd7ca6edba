//! Verify command handler.
//!
//! Loads a replay file and checks it with [`Replay::validate`]: a full
//! 52-card deal without duplicates, every event applicable to the state it
//! follows, and card conservation after each event. Recorded snapshots are
//! compared against a fresh reduction as well.

use std::io::Write;

use liar_engine::replay::Replay;

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::read_text;
use crate::ui;

type VerifyError = BatchValidationError<String>;

pub(crate) fn load_replay(input: &str, err: &mut dyn Write) -> Result<Replay, CliError> {
    let content = read_text(input).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to read {}: {}", input, e));
        CliError::Io(e)
    })?;
    serde_json::from_str(&content).map_err(|e| {
        let msg = format!("{} is not a replay file: {}", input, e);
        let _ = ui::write_error(err, &msg);
        CliError::InvalidInput(msg)
    })
}

/// Handle the verify command.
///
/// Every problem found is written to `err`; the command fails if there was
/// at least one.
pub fn handle_verify_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let replay = load_replay(&input, err)?;
    let mut errors: Vec<VerifyError> = replay
        .validate()
        .into_iter()
        .map(|message| VerifyError {
            item_context: input.clone(),
            message,
        })
        .collect();

    if errors.is_empty() {
        for snapshot in &replay.snapshots {
            match replay.reduce(Some(snapshot.event_index + 1)) {
                Ok(state) if state == snapshot.state => {}
                Ok(_) => errors.push(VerifyError {
                    item_context: input.clone(),
                    message: format!(
                        "snapshot at event {} does not match the event log",
                        snapshot.event_index
                    ),
                }),
                Err(e) => errors.push(VerifyError {
                    item_context: input.clone(),
                    message: e.to_string(),
                }),
            }
        }
    }

    if !errors.is_empty() {
        for e in &errors {
            ui::write_error(err, &e.to_string())?;
        }
        writeln!(out, "Verify: FAIL ({} problems)", errors.len())?;
        return Err(CliError::InvalidInput(format!(
            "{} failed verification",
            input
        )));
    }

    writeln!(
        out,
        "Verify: OK ({} players, {} events, seed {})",
        replay.metadata.player_count,
        replay.events.len(),
        replay.metadata.seed
    )?;
    Ok(())
}
