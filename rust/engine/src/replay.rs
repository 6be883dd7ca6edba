//! Replay files: the initial deal plus the full event log, with periodic
//! reduced snapshots so a viewer can jump around without re-running the game.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Card, Rank};
use crate::engine::Engine;
use crate::events::Event;
use crate::game::TableSnapshot;

/// Default number of events between stored snapshots.
pub const SNAPSHOT_INTERVAL: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayMetadata {
    pub seed: u64,
    /// RFC3339 time the replay was recorded
    pub timestamp: String,
    pub player_count: usize,
    pub bot_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayPlayer {
    pub hand: Vec<Card>,
    pub bot: String,
    pub placement: Option<usize>,
    pub discarded: Vec<Card>,
}

/// Fully visible table state rebuilt from events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayState {
    pub players: Vec<ReplayPlayer>,
    pub active_rank: Option<Rank>,
    pub pile: Vec<Card>,
    pub current_player: Option<usize>,
    pub placements: Vec<usize>,
    /// Seat whose claim is still open to challenges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimant: Option<usize>,
}

impl ReplayState {
    pub fn from_snapshot(snapshot: &TableSnapshot, labels: &[String]) -> Self {
        let players = snapshot
            .players
            .iter()
            .map(|p| ReplayPlayer {
                hand: p.hand.clone().unwrap_or_default(),
                bot: labels.get(p.id).cloned().unwrap_or_default(),
                placement: p.placement,
                discarded: p.discarded.clone(),
            })
            .collect();
        Self {
            players,
            active_rank: snapshot.active_rank,
            pile: snapshot.pile.clone().unwrap_or_default(),
            current_player: snapshot.current_player,
            placements: snapshot.placements.clone(),
            claimant: None,
        }
    }

    pub fn total_cards(&self) -> usize {
        self.players
            .iter()
            .map(|p| p.hand.len() + p.discarded.len())
            .sum::<usize>()
            + self.pile.len()
    }

    /// First unplaced seat after `from` in seating order, wrapping round to
    /// `from` itself.
    fn next_unplaced_after(&self, from: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&i| self.players[i].placement.is_none())
    }

    /// Seat offered the open claim after `challenger` passes. Once every
    /// seat has passed, the turn goes to the first seat after the claimant.
    fn next_offer(&mut self, challenger: usize) -> Option<usize> {
        let Some(claimant) = self.claimant else {
            return Some(challenger);
        };
        let n = self.players.len();
        let offers: Vec<usize> = (1..n)
            .map(|step| (claimant + step) % n)
            .filter(|&i| self.players[i].placement.is_none())
            .collect();
        let after = offers
            .iter()
            .position(|&s| s == challenger)
            .and_then(|pos| offers.get(pos + 1));
        match after {
            Some(&next) => Some(next),
            None => {
                self.claimant = None;
                offers.first().copied()
            }
        }
    }

    fn player_mut(&mut self, player: usize) -> Result<&mut ReplayPlayer, ReplayError> {
        self.players
            .get_mut(player)
            .ok_or(ReplayError::UnknownPlayer(player))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySnapshot {
    /// Index of the last event applied to `state`
    pub event_index: usize,
    pub state: ReplayState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub metadata: ReplayMetadata,
    pub initial_state: ReplayState,
    pub events: Vec<Event>,
    #[serde(default)]
    pub snapshots: Vec<ReplaySnapshot>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("unknown player {0}")]
    UnknownPlayer(usize),
    #[error("player {player} does not hold {card}")]
    CardMissing { player: usize, card: Card },
    #[error("{0} does not match the pile")]
    PileMismatch(&'static str),
    #[error("event {index} ({kind}): {source}")]
    AtEvent {
        index: usize,
        kind: &'static str,
        #[source]
        source: Box<ReplayError>,
    },
}

impl Replay {
    /// Capture a finished (or in-progress) game.
    pub fn record(engine: &Engine, seed: u64, bot_types: Vec<String>) -> Result<Self, ReplayError> {
        let initial_state = ReplayState::from_snapshot(engine.initial_snapshot(), &bot_types);
        let mut replay = Self {
            metadata: ReplayMetadata {
                seed,
                timestamp: chrono::Utc::now().to_rfc3339(),
                player_count: engine.player_count(),
                bot_types,
            },
            initial_state,
            events: engine.events().to_vec(),
            snapshots: Vec::new(),
        };
        replay.snapshots = replay.build_snapshots(SNAPSHOT_INTERVAL)?;
        Ok(replay)
    }

    /// State after applying the first `upto` events (all of them when `None`).
    pub fn reduce(&self, upto: Option<usize>) -> Result<ReplayState, ReplayError> {
        let limit = upto.unwrap_or(self.events.len()).min(self.events.len());
        let mut state = self.initial_state.clone();
        for (index, event) in self.events[..limit].iter().enumerate() {
            apply_event_at(&mut state, index, event)?;
        }
        Ok(state)
    }

    /// A snapshot after every `interval`-th event, plus one after the last.
    pub fn build_snapshots(&self, interval: usize) -> Result<Vec<ReplaySnapshot>, ReplayError> {
        let interval = interval.max(1);
        let mut state = self.initial_state.clone();
        let mut snapshots = Vec::new();
        for (index, event) in self.events.iter().enumerate() {
            apply_event_at(&mut state, index, event)?;
            if (index + 1) % interval == 0 || index + 1 == self.events.len() {
                snapshots.push(ReplaySnapshot {
                    event_index: index,
                    state: state.clone(),
                });
            }
        }
        Ok(snapshots)
    }

    /// Check the deal and every event. Returns human-readable problems; an
    /// empty list means the replay is consistent.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let initial = &self.initial_state;

        if initial.players.len() != self.metadata.player_count {
            errors.push(format!(
                "metadata lists {} players but the initial state has {}",
                self.metadata.player_count,
                initial.players.len()
            ));
        }
        let mut seen = HashSet::new();
        let all_cards = initial
            .players
            .iter()
            .flat_map(|p| p.hand.iter().chain(&p.discarded))
            .chain(&initial.pile);
        for card in all_cards {
            if !seen.insert(*card) {
                errors.push(format!("duplicate card {card} in the initial deal"));
            }
        }
        let expected = initial.total_cards();
        if expected != 52 {
            errors.push(format!("initial deal has {expected} cards, expected 52"));
        }

        let mut state = initial.clone();
        for (index, event) in self.events.iter().enumerate() {
            if let Err(e) = apply_event_at(&mut state, index, event) {
                errors.push(e.to_string());
                break;
            }
            let total = state.total_cards();
            if total != expected {
                errors.push(format!(
                    "card conservation broken after event {index} ({}): {total} != {expected}",
                    event.kind()
                ));
                break;
            }
        }
        errors
    }
}

fn apply_event_at(state: &mut ReplayState, index: usize, event: &Event) -> Result<(), ReplayError> {
    apply_event(state, event).map_err(|e| ReplayError::AtEvent {
        index,
        kind: event.kind(),
        source: Box::new(e),
    })
}

fn remove_from(hand: &mut Vec<Card>, player: usize, cards: &[Card]) -> Result<(), ReplayError> {
    for card in cards {
        let pos = hand
            .iter()
            .position(|c| c == card)
            .ok_or(ReplayError::CardMissing {
                player,
                card: *card,
            })?;
        hand.remove(pos);
    }
    Ok(())
}

/// Apply one event to a fully visible state.
pub fn apply_event(state: &mut ReplayState, event: &Event) -> Result<(), ReplayError> {
    match event {
        Event::GameStart | Event::ChallengeEval { .. } => {}
        Event::SelectRank { player, rank } => {
            state.player_mut(*player)?;
            state.active_rank = Some(*rank);
            state.current_player = Some(*player);
            state.claimant = None;
        }
        Event::Play { player, cards, .. } => {
            let p = state.player_mut(*player)?;
            remove_from(&mut p.hand, *player, cards)?;
            state.pile.extend_from_slice(cards);
            state.claimant = Some(*player);
            state.current_player = state.next_unplaced_after(*player).filter(|&s| s != *player);
        }
        Event::ChallengeDecision {
            challenger,
            challenge,
        } => {
            state.player_mut(*challenger)?;
            state.current_player = if *challenge {
                Some(*challenger)
            } else {
                state.next_offer(*challenger)
            };
        }
        Event::ChallengeResolution { revealed, .. } => {
            let start = state.pile.len().checked_sub(revealed.len());
            if start.map(|s| &state.pile[s..]) != Some(revealed.as_slice()) {
                return Err(ReplayError::PileMismatch("revealed cards"));
            }
        }
        Event::PickupPile { player, cards } => {
            if *cards != state.pile {
                return Err(ReplayError::PileMismatch("picked up cards"));
            }
            let pile = std::mem::take(&mut state.pile);
            state.player_mut(*player)?.hand.extend(pile);
            state.active_rank = None;
            state.claimant = None;
            // the recipient's turn is spent; the next seat opens a new run
            state.current_player = state.next_unplaced_after(*player);
        }
        Event::DiscardQuad { player, cards, .. } => {
            let p = state.player_mut(*player)?;
            remove_from(&mut p.hand, *player, cards)?;
            p.discarded.extend_from_slice(cards);
        }
        Event::Placement { player, place } => {
            state.player_mut(*player)?.placement = Some(*place);
            state.placements.push(*player);
            if state.current_player == Some(*player) {
                state.current_player = state.next_unplaced_after(*player);
            }
        }
        Event::GameEnd { .. } => {
            state.active_rank = None;
            state.current_player = None;
            state.claimant = None;
        }
    }
    Ok(())
}
