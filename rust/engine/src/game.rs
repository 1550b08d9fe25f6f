use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{best_five, HandStrength};
use crate::player::Seat;
use crate::pot::{compute_pots, Pot};
use crate::rules::{AvailableActions, BettingView, TableRules};

pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 10;
/// Every chip at a table, pots included, has to fit in a `u32`.
pub const MAX_TABLE_CHIPS: u64 = u32::MAX as u64;

/// A betting round, plus the terminal showdown stage.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }

    /// Community cards revealed when this street opens.
    pub fn cards_dealt(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandStatus {
    Idle,
    InHand,
    HandOver,
}

/// What a seat showed down with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownHand {
    pub seat: usize,
    pub strength: HandStrength,
    pub best_five: Vec<Card>,
}

/// Settlement of a finished hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub hand_id: u64,
    pub pots: Vec<Pot>,
    /// Chips paid out per seat, summed over every pot won.
    pub awards: Vec<(usize, u32)>,
    /// Winners of the main pot.
    pub winners: Vec<usize>,
    pub showdown: Vec<ShowdownHand>,
    /// Everyone else folded; no cards were shown.
    pub uncontested: bool,
}

/// Snapshot emitted once blinds are posted and cards are dealt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSetup {
    pub hand_id: u64,
    pub button: usize,
    pub small_blind_seat: usize,
    pub big_blind_seat: usize,
    pub dealt_in: Vec<usize>,
    pub stacks: Vec<u32>,
    pub first_to_act: Option<usize>,
}

/// Authoritative state of one table, mutated in place across hands.
/// All mutation goes through the transitions in [`crate::engine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    /// Incremented by every `start_hand`.
    pub hand_id: u64,
    pub deck: Deck,
    pub community: Vec<Card>,
    pub seats: Vec<Seat>,
    /// `None` until the first hand is dealt.
    pub button_index: Option<usize>,
    pub small_blind_index: Option<usize>,
    pub big_blind_index: Option<usize>,
    pub street: Option<Street>,
    pub status: HandStatus,
    pub current_to_act: Option<usize>,
    pub last_aggressor_index: Option<usize>,
    /// Street commitment level every live seat has to match.
    pub bet_to_call: u32,
    pub last_raise_amount: u32,
    pub rules: TableRules,
    pub game_over: bool,
    /// Actions applied in the current hand.
    pub action_count: u32,
    pub last_result: Option<HandResult>,
}

fn check_chip_total(total: u64) -> Result<(), GameError> {
    if total > MAX_TABLE_CHIPS {
        return Err(GameError::TooManyChips(total));
    }
    Ok(())
}

impl TableState {
    pub fn new(seat_count: usize, starting_stack: u32, rules: TableRules) -> Result<Self, GameError> {
        if seat_count < MIN_SEATS {
            return Err(GameError::NotEnoughPlayers);
        }
        if seat_count > MAX_SEATS {
            return Err(GameError::InvalidSeat(seat_count));
        }
        check_chip_total(seat_count as u64 * starting_stack as u64)?;
        let seats = (0..seat_count)
            .map(|i| Seat::new(i, starting_stack, false))
            .collect();
        Ok(Self {
            hand_id: 0,
            deck: Deck::default(),
            community: Vec::with_capacity(5),
            seats,
            button_index: None,
            small_blind_index: None,
            big_blind_index: None,
            street: None,
            status: HandStatus::Idle,
            current_to_act: None,
            last_aggressor_index: None,
            bet_to_call: 0,
            last_raise_amount: 0,
            rules,
            game_over: false,
            action_count: 0,
            last_result: None,
        })
    }

    /// Seats with explicit stacks, for uneven tables and fixtures.
    pub fn with_stacks(stacks: &[u32], rules: TableRules) -> Result<Self, GameError> {
        check_chip_total(stacks.iter().map(|&s| s as u64).sum())?;
        let mut state = Self::new(stacks.len(), 0, rules)?;
        for (seat, &stack) in state.seats.iter_mut().zip(stacks) {
            seat.stack = stack;
        }
        Ok(state)
    }

    pub fn seat(&self, index: usize) -> Result<&Seat, GameError> {
        self.seats.get(index).ok_or(GameError::InvalidSeat(index))
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn set_seat_cpu(&mut self, index: usize, is_cpu: bool) -> Result<(), GameError> {
        let seat = self
            .seats
            .get_mut(index)
            .ok_or(GameError::InvalidSeat(index))?;
        seat.is_cpu = is_cpu;
        Ok(())
    }

    pub fn is_in_hand(&self) -> bool {
        self.status == HandStatus::InHand
    }

    /// Seats that could be dealt into the next hand.
    pub fn seats_with_chips(&self) -> usize {
        self.seats.iter().filter(|s| s.stack > 0).count()
    }

    pub fn live_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_live()).count()
    }

    pub fn pot_total(&self) -> u32 {
        self.seats.iter().map(|s| s.total_committed).sum()
    }

    pub fn pots(&self) -> Vec<Pot> {
        compute_pots(&self.seats)
    }

    pub fn amount_to_call(&self, index: usize) -> Result<u32, GameError> {
        let seat = self.seat(index)?;
        Ok(self.bet_to_call.saturating_sub(seat.committed_this_street))
    }

    pub fn betting_view(&self, index: usize) -> Result<BettingView, GameError> {
        let seat = self.seat(index)?;
        Ok(BettingView {
            stack: seat.stack,
            committed: seat.committed_this_street,
            bet_to_call: self.bet_to_call,
            last_raise: self.last_raise_amount,
            big_blind: self.rules.big_blind,
        })
    }

    /// Legal actions for the seat to act.
    pub fn available_actions(&self) -> Result<AvailableActions, GameError> {
        if self.status != HandStatus::InHand {
            return Err(GameError::NoActiveHand);
        }
        let seat = self.current_to_act.ok_or(GameError::InvalidStreetState)?;
        Ok(self.betting_view(seat)?.legal_actions())
    }

    /// Best five cards a seat currently holds, once the flop is out.
    pub fn best_hand(&self, index: usize) -> Result<Option<([Card; 5], HandStrength)>, GameError> {
        let seat = self.seat(index)?;
        if seat.hole.len() != 2 || self.community.len() < 3 {
            return Ok(None);
        }
        let mut cards = seat.hole.clone();
        cards.extend_from_slice(&self.community);
        best_five(&cards).map(Some)
    }

    /// Seats in clockwise order starting right after `from`, `from` itself last.
    pub fn seats_after(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        let n = self.seats.len();
        (1..=n).map(move |step| (from + step) % n)
    }

    /// Distance clockwise from the button (1 = small blind seat in ring games).
    pub fn distance_from_button(&self, index: usize) -> Option<usize> {
        let n = self.seats.len();
        self.button_index.map(|b| (index + n - b) % n)
    }

    pub fn setup_snapshot(&self) -> Option<HandSetup> {
        Some(HandSetup {
            hand_id: self.hand_id,
            button: self.button_index?,
            small_blind_seat: self.small_blind_index?,
            big_blind_seat: self.big_blind_index?,
            dealt_in: self
                .seats
                .iter()
                .filter(|s| s.in_hand)
                .map(|s| s.index)
                .collect(),
            stacks: self.seats.iter().map(|s| s.stack).collect(),
            first_to_act: self.current_to_act,
        })
    }

    /// Chips on the table: stacks plus everything committed this hand.
    pub fn chip_total(&self) -> u64 {
        self.seats
            .iter()
            .map(|s| s.stack as u64 + s.total_committed as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_seat_counts() {
        assert_eq!(
            TableState::new(1, 1000, TableRules::default()),
            Err(GameError::NotEnoughPlayers)
        );
        assert_eq!(
            TableState::new(11, 1000, TableRules::default()),
            Err(GameError::InvalidSeat(11))
        );
    }

    #[test]
    fn rejects_tables_whose_chips_overflow_a_pot() {
        let rules = TableRules::default();
        assert_eq!(
            TableState::new(5, 1_000_000_000, rules),
            Err(GameError::TooManyChips(5_000_000_000))
        );
        assert_eq!(
            TableState::with_stacks(&[u32::MAX, 1], rules),
            Err(GameError::TooManyChips(MAX_TABLE_CHIPS + 1))
        );
        assert!(TableState::new(4, u32::MAX / 4, rules).is_ok());
        assert!(TableState::with_stacks(&[u32::MAX, 0], rules).is_ok());
    }

    #[test]
    fn idle_table_has_no_actions() {
        let state = TableState::new(3, 1000, TableRules::default()).unwrap();
        assert_eq!(state.available_actions(), Err(GameError::NoActiveHand));
    }

    #[test]
    fn seats_after_wraps() {
        let state = TableState::new(4, 1000, TableRules::default()).unwrap();
        let order: Vec<usize> = state.seats_after(2).collect();
        assert_eq!(order, vec![3, 0, 1, 2]);
    }

    #[test]
    fn street_progression() {
        assert_eq!(Street::Preflop.next(), Some(Street::Flop));
        assert_eq!(Street::River.next(), Some(Street::Showdown));
        assert_eq!(Street::Flop.cards_dealt(), 3);
        assert_eq!(Street::Turn.cards_dealt(), 1);
    }
}
