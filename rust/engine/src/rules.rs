use crate::cards::{all_ranks, Card, Rank};
use crate::errors::GameError;

/// Fewest cards a single play may contain.
pub const MIN_PLAY: usize = 1;
/// Most cards a single play may contain.
pub const MAX_PLAY: usize = 3;
/// Copies of each rank in the deck, and the size of a discarded set.
pub const QUAD: usize = 4;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Checks a proposed play against the hand it is drawn from.
///
/// The play must hold between [`MIN_PLAY`] and [`MAX_PLAY`] cards, and every
/// card must be present in `hand`, counted as a multiset (submitting the same
/// card twice needs two copies, which a real deck never has).
///
/// # Errors
///
/// - [`GameError::InvalidCardCount`] - empty play or more than three cards
/// - [`GameError::CardNotInHand`] - the first card that the hand cannot cover
///
/// # Examples
///
/// ```
/// use liar_engine::cards::Card;
/// use liar_engine::errors::GameError;
/// use liar_engine::rules::validate_play;
///
/// let hand: Vec<Card> = ["2♣", "2♦", "9♥", "K♠"].iter().map(|s| s.parse().unwrap()).collect();
///
/// assert!(validate_play(&hand, &hand[..2]).is_ok());
/// assert_eq!(validate_play(&hand, &hand), Err(GameError::InvalidCardCount(4)));
///
/// let foreign: Card = "A♠".parse().unwrap();
/// assert_eq!(validate_play(&hand, &[foreign]), Err(GameError::CardNotInHand(foreign)));
/// ```
pub fn validate_play(hand: &[Card], cards: &[Card]) -> Result<(), GameError> {
    if !(MIN_PLAY..=MAX_PLAY).contains(&cards.len()) {
        return Err(GameError::InvalidCardCount(cards.len()));
    }
    let mut available: Vec<Card> = hand.to_vec();
    for card in cards {
        match available.iter().position(|c| c == card) {
            Some(pos) => {
                available.swap_remove(pos);
            }
            None => return Err(GameError::CardNotInHand(*card)),
        }
    }
    Ok(())
}

/// A play is truthful iff every revealed card has the claimed rank.
///
/// ```
/// use liar_engine::cards::{Card, Rank};
/// use liar_engine::rules::is_truthful;
///
/// let revealed: Vec<Card> = ["7♣", "7♥"].iter().map(|s| s.parse().unwrap()).collect();
/// assert!(is_truthful(Rank::Seven, &revealed));
/// assert!(!is_truthful(Rank::Eight, &revealed));
/// ```
pub fn is_truthful(claim_rank: Rank, revealed: &[Card]) -> bool {
    revealed.iter().all(|c| c.rank == claim_rank)
}

/// Lowest rank held [`QUAD`] times in `hand`, if any.
pub fn find_quad(hand: &[Card]) -> Option<Rank> {
    all_ranks()
        .into_iter()
        .find(|&r| hand.iter().filter(|c| c.rank == r).count() >= QUAD)
}
