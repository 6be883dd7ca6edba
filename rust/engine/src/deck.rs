use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// The single random generator threaded through a game: the shuffle and then
/// every bot decision draw from the same instance.
pub type GameRng = ChaCha20Rng;

pub fn seeded_rng(seed: u64) -> GameRng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Deterministic permutation of `deck` keyed by `seed`.
pub fn shuffle(deck: &[Card], seed: u64) -> Vec<Card> {
    let mut rng = seeded_rng(seed);
    shuffle_with(deck, &mut rng)
}

/// Shuffle with an already-seeded generator, advancing it.
pub fn shuffle_with(deck: &[Card], rng: &mut GameRng) -> Vec<Card> {
    let mut cards = deck.to_vec();
    cards.shuffle(rng);
    cards
}

/// Round-robin deal: card `i` goes to hand `i % n_players`, so hand sizes
/// differ by at most one.
///
/// ```
/// use liar_engine::cards::full_deck;
/// use liar_engine::deck::deal;
///
/// let hands = deal(&full_deck(), 5);
/// let sizes: Vec<usize> = hands.iter().map(|h| h.len()).collect();
/// assert_eq!(sizes, vec![11, 11, 10, 10, 10]);
/// ```
pub fn deal(deck: &[Card], n_players: usize) -> Vec<Vec<Card>> {
    let mut hands = vec![Vec::with_capacity(deck.len() / n_players.max(1) + 1); n_players];
    if n_players == 0 {
        return hands;
    }
    for (i, &card) in deck.iter().enumerate() {
        hands[i % n_players].push(card);
    }
    hands
}
