//! Card and event formatters for terminal display.
//!
//! Pure functions that turn cards and log events into the one-line
//! narration used by `sim --verbose` and `replay`. Unicode suit symbols are
//! used where the terminal supports them, with an ASCII fallback.
//!
//! ## Example
//!
//! ```rust
//! use liar_engine::cards::{Card, Rank, Suit};
//! use liar_cli::formatters::{format_card, format_cards};
//!
//! let ace = Card::new(Rank::Ace, Suit::Spades);
//! assert!(format_card(&ace) == "A♠" || format_card(&ace) == "As");
//! assert!(format_cards(&[ace]).starts_with("[A"));
//! ```

use liar_engine::cards::{Card, Suit};
use liar_engine::events::Event;

/// Windows consoles only get Unicode suits inside modern terminals; every
/// other platform is assumed to render them.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: Suit) -> String {
    if supports_unicode() {
        suit.symbol().to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

pub fn format_card(card: &Card) -> String {
    format!("{}{}", card.rank.label(), format_suit(card.suit))
}

/// Cards in bracket notation, `[]` when empty.
pub fn format_cards(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

/// `P2 (heuristic)`, or just `P2` when the seat has no label.
pub fn seat_name(seat: usize, labels: &[String]) -> String {
    match labels.get(seat) {
        Some(label) => format!("P{} ({})", seat, label),
        None => format!("P{}", seat),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("1 {}", word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// One line of narration per event. Played cards are shown face up since
/// the narration is for a spectator who sees everything.
///
/// ```rust
/// use liar_engine::cards::Rank;
/// use liar_engine::events::Event;
/// # use liar_cli::formatters::format_event;
///
/// let labels = vec!["random".to_string(), "heuristic".to_string()];
/// let line = format_event(&Event::SelectRank { player: 1, rank: Rank::Queen }, &labels);
/// assert_eq!(line, "P1 (heuristic) opens a run of Q");
/// ```
pub fn format_event(event: &Event, labels: &[String]) -> String {
    let who = |seat: usize| seat_name(seat, labels);
    match event {
        Event::GameStart => "Game starts".to_string(),
        Event::SelectRank { player, rank } => {
            format!("{} opens a run of {}", who(*player), rank)
        }
        Event::Play {
            player,
            cards,
            claim_rank,
        } => format!(
            "{} plays {} as {} {}",
            who(*player),
            plural(cards.len(), "card"),
            claim_rank,
            format_cards(cards)
        ),
        Event::ChallengeDecision {
            challenger,
            challenge,
        } => {
            let verb = if *challenge { "challenges" } else { "passes" };
            format!("{} {}", who(*challenger), verb)
        }
        Event::ChallengeEval {
            challenger,
            message,
            ..
        } => format!("{} weighs the claim: {}", who(*challenger), message),
        Event::ChallengeResolution {
            truthful, revealed, ..
        } => {
            let verdict = if *truthful { "truthful" } else { "a lie" };
            format!("The claim was {}: {}", verdict, format_cards(revealed))
        }
        Event::PickupPile { player, cards } => {
            format!("{} picks up {}", who(*player), plural(cards.len(), "card"))
        }
        Event::DiscardQuad { player, rank, .. } => {
            format!("{} discards four {}", who(*player), rank)
        }
        Event::Placement { player, place } => {
            format!("{} finishes in place {}", who(*player), place)
        }
        Event::GameEnd { placements } => {
            let order: Vec<String> = placements.iter().map(|p| format!("P{}", p)).collect();
            format!("Game over: {}", order.join(", "))
        }
    }
}
