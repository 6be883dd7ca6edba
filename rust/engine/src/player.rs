use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::errors::GameError;

/// Represents a move a seat can submit to the engine.
/// The claimed rank of a play is always the active rank, so `Play` carries
/// only the cards.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Open a run by binding the active rank
    SelectRank { rank: Rank },
    /// Place 1-3 cards face down, claiming the active rank
    Play { cards: Vec<Card> },
    /// Accept (`false`) or call (`true`) the most recent claim
    Challenge { challenge: bool },
}

/// A seat at the table: the hand it holds, the quads it has discarded and
/// its finishing place once the hand has emptied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: usize,
    hand: Vec<Card>,
    discarded: Vec<Card>,
    placement: Option<usize>,
}

impl Player {
    pub fn new(id: usize, hand: Vec<Card>) -> Self {
        Self {
            id,
            hand,
            discarded: Vec::new(),
            placement: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn discarded(&self) -> &[Card] {
        &self.discarded
    }

    pub fn placement(&self) -> Option<usize> {
        self.placement
    }

    /// Still in the rotation (no placement yet).
    pub fn is_active(&self) -> bool {
        self.placement.is_none()
    }

    pub fn count_rank(&self, rank: Rank) -> usize {
        self.hand.iter().filter(|c| c.rank == rank).count()
    }

    /// Remove `cards` from the hand. Fails without touching the hand if any
    /// card (counted as a multiset) is missing.
    pub fn remove_cards(&mut self, cards: &[Card]) -> Result<(), GameError> {
        let mut remaining = self.hand.clone();
        for card in cards {
            let pos = remaining
                .iter()
                .position(|c| c == card)
                .ok_or(GameError::CardNotInHand(*card))?;
            remaining.remove(pos);
        }
        self.hand = remaining;
        Ok(())
    }

    pub fn take_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.hand.extend(cards);
    }

    /// Move every card of `rank` from the hand to the discard pile and
    /// return them in hand order.
    pub(crate) fn discard_rank(&mut self, rank: Rank) -> Vec<Card> {
        let (quad, keep): (Vec<Card>, Vec<Card>) =
            self.hand.iter().partition(|c| c.rank == rank);
        self.hand = keep;
        self.discarded.extend(quad.iter().copied());
        quad
    }

    pub(crate) fn set_placement(&mut self, place: usize) {
        self.placement = Some(place);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(list: &[&str]) -> Vec<Card> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn remove_cards_is_all_or_nothing() {
        let mut p = Player::new(0, cards(&["2♣", "3♦", "4♥"]));
        let err = p.remove_cards(&cards(&["2♣", "9♠"])).unwrap_err();
        assert_eq!(err, GameError::CardNotInHand("9♠".parse().unwrap()));
        assert_eq!(p.hand_size(), 3);

        p.remove_cards(&cards(&["2♣", "4♥"])).unwrap();
        assert_eq!(p.hand(), cards(&["3♦"]).as_slice());
    }

    #[test]
    fn remove_cards_counts_duplicates() {
        let mut p = Player::new(0, cards(&["2♣", "3♦"]));
        assert!(p.remove_cards(&cards(&["2♣", "2♣"])).is_err());
        assert_eq!(p.hand_size(), 2);
    }

    #[test]
    fn discard_rank_moves_cards_to_discard_pile() {
        let mut p = Player::new(1, cards(&["5♣", "9♦", "5♦", "5♥", "5♠"]));
        let quad = p.discard_rank(Rank::Five);
        assert_eq!(quad.len(), 4);
        assert_eq!(p.hand(), cards(&["9♦"]).as_slice());
        assert_eq!(p.discarded().len(), 4);
        assert_eq!(p.count_rank(Rank::Five), 0);
    }

    #[test]
    fn action_serializes_with_type_tag() {
        let json = serde_json::to_value(Action::SelectRank { rank: Rank::Seven }).unwrap();
        assert_eq!(json["type"], "SELECT_RANK");
        assert_eq!(json["rank"], "7");
        let back: Action =
            serde_json::from_str(r#"{"type":"PLAY","cards":["10♥","2♣"]}"#).unwrap();
        assert_eq!(back, Action::Play { cards: cards(&["10♥", "2♣"]) });
    }
}
