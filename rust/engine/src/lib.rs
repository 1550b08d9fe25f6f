//! # felt-engine: Table Poker Engine Core
//!
//! A deterministic multi-seat Texas Hold'em engine. Owns the per-hand state
//! machine, betting validation, side-pot math and hand evaluation. Everything
//! is synchronous; timers and host integration live in `felt_runtime`.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and two-character codes
//! - [`rng`] - Injectable random sources, including seeded xorshift32
//! - [`deck`] - Standard deck and Fisher-Yates shuffle
//! - [`hand`] - Hand evaluation and strength comparison
//! - [`player`] - Seat state and betting actions
//! - [`rules`] - Legal-action sets and bet sizing validation
//! - [`pot`] - Main pot and side pots, pot splitting
//! - [`game`] - Table state and queries
//! - [`engine`] - Hand transitions: start, act, advance, settle
//! - [`logger`] - Hand history records and JSONL output
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use felt_engine::cards::parse_cards;
//! use felt_engine::hand::{evaluate_hand, Category};
//!
//! let cards = parse_cards("9h Th Jh Qh Kh 2c 3s").unwrap();
//! let strength = evaluate_hand(&cards).unwrap();
//! assert_eq!(strength.category, Category::StraightFlush);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! A seeded source reproduces every card of a hand:
//!
//! ```rust
//! use felt_engine::game::TableState;
//! use felt_engine::rng::Xorshift32;
//! use felt_engine::rules::TableRules;
//!
//! let mut a = TableState::new(4, 1_000, TableRules::default()).unwrap();
//! let mut b = a.clone();
//! a.start_hand(&mut Xorshift32::new(42)).unwrap();
//! b.start_hand(&mut Xorshift32::new(42)).unwrap();
//! assert_eq!(a, b);
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rng;
pub mod rules;
