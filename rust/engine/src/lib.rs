//! # liar-engine: Lying/Cheat Rules Engine
//!
//! A deterministic rules engine for the shedding game Lying (also known as
//! Cheat or "I Doubt It"). Players take turns placing cards face down while
//! claiming the active rank, opponents may challenge, and whoever is wrong
//! takes the whole pile. Four of a kind is discarded on sight; emptying your
//! hand earns the next finishing place.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), the canonical deck and per-rank counters
//! - [`deck`] - Seeded ChaCha20 shuffling and round-robin dealing
//! - [`engine`] - The turn/claim/challenge state machine
//! - [`game`] - Game state, phases, snapshots and per-seat views
//! - [`player`] - Player hands, discard piles, placements and actions
//! - [`rules`] - Play validation, truthfulness and quad detection
//! - [`events`] - The typed event log
//! - [`replay`] - Replay recording, reduction and validation
//! - [`errors`] - Error types for rejected actions
//!
//! ## Quick Start
//!
//! ```rust
//! use liar_engine::cards::Rank;
//! use liar_engine::engine::Engine;
//! use liar_engine::events::Event;
//!
//! // Two players, seat 0 truthfully plays a single two and is challenged
//! let hands = vec![
//!     vec!["2♣".parse().unwrap(), "K♦".parse().unwrap()],
//!     vec!["9♥".parse().unwrap(), "9♠".parse().unwrap()],
//! ];
//! let mut engine = Engine::from_hands(hands).unwrap();
//! engine.select_rank(0, Rank::Two).unwrap();
//! engine.play(0, &["2♣".parse().unwrap()]).unwrap();
//! let events = engine.decide_challenge(1, true).unwrap();
//!
//! assert!(events.iter().any(|e| matches!(e, Event::ChallengeResolution { truthful: true, .. })));
//! assert_eq!(engine.state().players()[1].hand_size(), 3);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! All deals are reproducible from a seed:
//!
//! ```rust
//! use liar_engine::engine::Engine;
//!
//! let a = Engine::new(42, 4).unwrap();
//! let b = Engine::new(42, 4).unwrap();
//! assert_eq!(a.initial_snapshot(), b.initial_snapshot());
//! ```
//!
//! ## Play Validation
//!
//! ```rust
//! use liar_engine::cards::Card;
//! use liar_engine::errors::GameError;
//! use liar_engine::rules::validate_play;
//!
//! let hand: Vec<Card> = ["3♣", "3♦", "3♥", "3♠"].iter().map(|s| s.parse().unwrap()).collect();
//! assert_eq!(validate_play(&hand, &hand), Err(GameError::InvalidCardCount(4)));
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod player;
pub mod replay;
pub mod rules;
