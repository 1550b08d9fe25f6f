//! # felt-ai: CPU Players for the Felt Table
//!
//! Rule-based opponents that drive CPU seats and autoplaying humans.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`baseline`] - Heuristic strategy with tight and loose profiles
//! - [`equity`] - Monte-Carlo equity estimation
//! - [`create_ai`] - Factory function for creating AI opponents
//!
//! ## Quick Start
//!
//! ```rust
//! use felt_ai::{create_ai, AIOpponent};
//! use felt_engine::game::TableState;
//! use felt_engine::rng::Xorshift32;
//! use felt_engine::rules::TableRules;
//!
//! let ai = create_ai("tight").unwrap();
//! let mut state = TableState::new(4, 5_000, TableRules::default()).unwrap();
//! state.start_hand(&mut Xorshift32::new(42)).unwrap();
//!
//! let seat = state.current_to_act.unwrap();
//! let action = ai.get_action(&state, seat);
//! assert!(state.available_actions().unwrap().allows(&action));
//! ```
//!
//! ## AI Types
//!
//! - `"baseline"` / `"tight"` - Folds most hands, value-bets made hands
//! - `"loose"` - Defends wider, semi-bluffs strong draws

use felt_engine::game::TableState;
use felt_engine::player::PlayerAction;
use thiserror::Error;

pub mod baseline;
pub mod equity;

pub use baseline::{HeuristicAI, Profile, suggest};

/// Trait defining the interface for AI opponents.
///
/// # Example Implementation
///
/// ```rust
/// use felt_ai::AIOpponent;
/// use felt_engine::game::TableState;
/// use felt_engine::player::PlayerAction;
///
/// struct AlwaysCheck;
///
/// impl AIOpponent for AlwaysCheck {
///     fn get_action(&self, _state: &TableState, _seat: usize) -> PlayerAction {
///         PlayerAction::Check
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysCheck"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Decide for `seat` given the current table. Implementations should
    /// return a member of the seat's legal-action set.
    fn get_action(&self, state: &TableState, seat: usize) -> PlayerAction;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown AI type: {0}")]
pub struct UnknownAi(pub String);

/// Factory function to create AI opponents by type string.
///
/// ```rust
/// use felt_ai::create_ai;
///
/// let ai = create_ai("loose").unwrap();
/// assert_eq!(ai.name(), "HeuristicAI(loose)");
/// assert!(create_ai("random").is_err());
/// ```
pub fn create_ai(ai_type: &str) -> Result<Box<dyn AIOpponent>, UnknownAi> {
    let profile: Profile = ai_type.parse().map_err(|_| UnknownAi(ai_type.to_string()))?;
    Ok(Box::new(HeuristicAI::new(profile)))
}
