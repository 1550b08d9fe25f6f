use thiserror::Error;

use crate::player::ActionKind;

/// Reasons the engine refuses a request. A rejected request never mutates
/// table state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("It's not seat {actual}'s turn (expected seat {expected:?})")]
    InvalidActor {
        expected: Option<usize>,
        actual: usize,
    },
    #[error("No betting round is open")]
    InvalidStreetState,
    #[error("Illegal amount {amount}: must be between {minimum} and {maximum}")]
    IllegalSizing {
        amount: u32,
        minimum: u32,
        maximum: u32,
    },
    #[error("{0:?} is not available right now")]
    ActionNotAvailable(ActionKind),
    #[error("Deck is empty")]
    EmptyDeck,
    #[error("No hand in progress")]
    NoActiveHand,
    #[error("At least two seats with chips are required")]
    NotEnoughPlayers,
    #[error("Seat {0} does not exist")]
    InvalidSeat(usize),
    #[error("Hand evaluation needs 5 to 7 cards, got {0}")]
    InvalidCardCount(usize),
    #[error("Invalid card code: {0:?}")]
    InvalidCardCode(String),
    #[error("Table holds {0} chips, more than {max}", max = u32::MAX)]
    TooManyChips(u64),
}

impl GameError {
    /// Stable machine-readable reason code for hosts.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidActor { .. } => "invalid_actor",
            GameError::InvalidStreetState => "invalid_street_state",
            GameError::IllegalSizing { .. } => "illegal_sizing",
            GameError::ActionNotAvailable(_) => "action_not_available",
            GameError::EmptyDeck => "empty_deck",
            GameError::NoActiveHand => "no_active_hand",
            GameError::NotEnoughPlayers => "not_enough_players",
            GameError::InvalidSeat(_) => "invalid_seat",
            GameError::InvalidCardCount(_) => "invalid_card_count",
            GameError::InvalidCardCode(_) => "invalid_card_code",
            GameError::TooManyChips(_) => "too_many_chips",
        }
    }

    /// Setup bugs, as opposed to requests a user could fix by retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::EmptyDeck)
    }
}
