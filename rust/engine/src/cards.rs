use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Represents one of the four suits in a standard 52-card deck.
/// Suits never matter for claims; they only make every card distinct.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    #[serde(rename = "♣")]
    Clubs,
    /// Diamonds suit (♦)
    #[serde(rename = "♦")]
    Diamonds,
    /// Hearts suit (♥)
    #[serde(rename = "♥")]
    Hearts,
    /// Spades suit (♠)
    #[serde(rename = "♠")]
    Spades,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    fn from_char(c: char) -> Option<Suit> {
        match c {
            '♣' | 'C' | 'c' => Some(Suit::Clubs),
            '♦' | 'D' | 'd' => Some(Suit::Diamonds),
            '♥' | 'H' | 'h' => Some(Suit::Hearts),
            '♠' | 'S' | 's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
/// Claims, active ranks and quad-discards are all expressed in ranks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    #[serde(rename = "2")]
    Two = 2,
    /// Rank 3
    #[serde(rename = "3")]
    Three,
    /// Rank 4
    #[serde(rename = "4")]
    Four,
    /// Rank 5
    #[serde(rename = "5")]
    Five,
    /// Rank 6
    #[serde(rename = "6")]
    Six,
    /// Rank 7
    #[serde(rename = "7")]
    Seven,
    /// Rank 8
    #[serde(rename = "8")]
    Eight,
    /// Rank 9
    #[serde(rename = "9")]
    Nine,
    /// Rank 10
    #[serde(rename = "10")]
    Ten,
    /// Jack
    #[serde(rename = "J")]
    Jack,
    /// Queen
    #[serde(rename = "Q")]
    Queen,
    /// King
    #[serde(rename = "K")]
    King,
    /// Ace
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// Zero-based position of the rank (Two is 0, Ace is 12), used to index
    /// per-rank counters.
    pub fn index(self) -> usize {
        self as usize - 2
    }

    pub fn from_index(i: usize) -> Option<Rank> {
        all_ranks().get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rank {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rank = match s.trim().to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(ParseCardError::Rank(s.to_string())),
        };
        Ok(rank)
    }
}

/// Error returned when a rank or card string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseCardError {
    #[error("unknown rank '{0}'")]
    Rank(String),
    #[error("invalid card '{0}' (expected rank followed by suit, e.g. 10♥ or QS)")]
    Card(String),
}

/// A single playing card. Ordered by rank first so sorted hands group
/// same-rank cards together.
///
/// Cards travel over the wire and in replay files as `"<rank><suit>"`:
///
/// ```
/// use liar_engine::cards::{Card, Rank, Suit};
///
/// let card: Card = "10♥".parse().unwrap();
/// assert_eq!(card, Card::new(Rank::Ten, Suit::Hearts));
/// assert_eq!(card.to_string(), "10♥");
/// assert_eq!("qs".parse::<Card>().unwrap().to_string(), "Q♠");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Card {
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
    /// The suit of the card (Clubs, Diamonds, Hearts, or Spades)
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let suit_char = chars
            .next_back()
            .ok_or_else(|| ParseCardError::Card(s.to_string()))?;
        let suit = Suit::from_char(suit_char).ok_or_else(|| ParseCardError::Card(s.to_string()))?;
        let rank = chars
            .as_str()
            .parse::<Rank>()
            .map_err(|_| ParseCardError::Card(s.to_string()))?;
        Ok(Card { rank, suit })
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

/// The 52 cards in canonical rank-major order (2♣ 2♦ 2♥ 2♠ 3♣ ... A♠).
pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &r in &all_ranks() {
        for &s in &all_suits() {
            v.push(Card { rank: r, suit: s });
        }
    }
    v
}

/// Per-rank counter used for public knowledge (discarded and revealed cards).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankCounts([u8; 13]);

impl RankCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards<'a, I: IntoIterator<Item = &'a Card>>(cards: I) -> Self {
        let mut counts = Self::default();
        for card in cards {
            counts.add(card.rank, 1);
        }
        counts
    }

    pub fn get(&self, rank: Rank) -> u8 {
        self.0[rank.index()]
    }

    pub fn add(&mut self, rank: Rank, n: u8) {
        let slot = &mut self.0[rank.index()];
        *slot = slot.saturating_add(n);
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    /// Ranks with a non-zero count, ascending, paired with the count.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, u8)> + '_ {
        all_ranks()
            .into_iter()
            .map(|r| (r, self.get(r)))
            .filter(|&(_, c)| c > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn full_deck_is_rank_major_and_unique() {
        let deck = full_deck();
        assert_eq!(deck.len(), 52);
        assert_eq!(deck[0], Card::new(Rank::Two, Suit::Clubs));
        assert_eq!(deck[3], Card::new(Rank::Two, Suit::Spades));
        assert_eq!(deck[51], Card::new(Rank::Ace, Suit::Spades));
        let unique: HashSet<_> = deck.iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn card_strings_parse_and_print() {
        for card in full_deck() {
            let text = card.to_string();
            assert_eq!(text.parse::<Card>().unwrap(), card);
        }
        assert_eq!("T♦".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert!("11♣".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
        assert!("7X".parse::<Card>().is_err());
    }

    #[test]
    fn card_serializes_as_string() {
        let card = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(serde_json::to_string(&card).unwrap(), "\"10♥\"");
        let back: Card = serde_json::from_str("\"A♠\"").unwrap();
        assert_eq!(back, Card::new(Rank::Ace, Suit::Spades));
        assert_eq!(serde_json::to_string(&Rank::Queen).unwrap(), "\"Q\"");
    }

    #[test]
    fn rank_index_round_trips() {
        for (i, r) in all_ranks().into_iter().enumerate() {
            assert_eq!(r.index(), i);
            assert_eq!(Rank::from_index(i), Some(r));
        }
        assert_eq!(Rank::from_index(13), None);
    }

    #[test]
    fn rank_counts_track_per_rank_totals() {
        let cards = ["5♣", "5♦", "K♠"].map(|s| s.parse::<Card>().unwrap());
        let counts = RankCounts::from_cards(&cards);
        assert_eq!(counts.get(Rank::Five), 2);
        assert_eq!(counts.get(Rank::King), 1);
        assert_eq!(counts.get(Rank::Ace), 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.iter().count(), 2);
    }
}
