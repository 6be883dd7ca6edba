//! Seat list resolution for the simulator.
//!
//! Turns the `--bots` list (or its configured equivalent) into one
//! [`SeatKind`] per seat. The list is repeated cyclically when it is shorter
//! than the table; a longer list is rejected.

use liar_ai::BotKind;
use liar_ai::table::SeatKind;

/// Resolve `bots` to exactly `players` seats. An empty list seats random
/// bots everywhere.
///
/// ```rust
/// # use liar_cli::validation::resolve_seats;
/// use liar_ai::BotKind;
/// use liar_ai::table::SeatKind;
///
/// let seats = resolve_seats(&["heuristic".into(), "random".into()], 3).unwrap();
/// assert_eq!(
///     seats,
///     vec![
///         SeatKind::Bot(BotKind::Heuristic),
///         SeatKind::Bot(BotKind::Random),
///         SeatKind::Bot(BotKind::Heuristic),
///     ]
/// );
/// ```
pub fn resolve_seats(bots: &[String], players: usize) -> Result<Vec<SeatKind>, String> {
    if bots.is_empty() {
        return Ok(vec![SeatKind::Bot(BotKind::Random); players]);
    }
    if bots.len() > players {
        return Err(format!(
            "{} bot types given for {} players",
            bots.len(),
            players
        ));
    }
    let kinds = bots
        .iter()
        .map(|b| b.parse::<BotKind>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(kinds
        .iter()
        .cycle()
        .take(players)
        .map(|k| SeatKind::Bot(*k))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_means_random_everywhere() {
        let seats = resolve_seats(&[], 4).unwrap();
        assert_eq!(seats, vec![SeatKind::Bot(BotKind::Random); 4]);
    }

    #[test]
    fn too_many_bots_is_an_error() {
        let bots: Vec<String> = vec!["random".into(); 3];
        let err = resolve_seats(&bots, 2).unwrap_err();
        assert!(err.contains("3 bot types"));
    }

    #[test]
    fn unknown_bot_is_an_error() {
        let err = resolve_seats(&["oracle".into()], 2).unwrap_err();
        assert!(err.contains("oracle"));
    }

    #[test]
    fn exact_list_is_kept_in_order() {
        let bots: Vec<String> = vec!["random".into(), "heuristic".into()];
        assert_eq!(
            resolve_seats(&bots, 2).unwrap(),
            vec![
                SeatKind::Bot(BotKind::Random),
                SeatKind::Bot(BotKind::Heuristic)
            ]
        );
    }
}
