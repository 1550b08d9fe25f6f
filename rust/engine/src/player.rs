use crate::cards::Card;
use serde::{Deserialize, Serialize};

/// A betting decision. For `Bet` and `Raise` the amount is the number of
/// chips added to the pot right now, not the new street total.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet(u32),
    Raise(u32),
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Bet(_) => ActionKind::Bet,
            PlayerAction::Raise(_) => ActionKind::Raise,
        }
    }

    pub fn amount(&self) -> Option<u32> {
        match self {
            PlayerAction::Bet(a) | PlayerAction::Raise(a) => Some(*a),
            _ => None,
        }
    }
}

/// Action type without a size, used for legal-action sets.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

/// One chair at the table. Stacks persist across hands; everything else is
/// reset when a hand starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub index: usize,
    pub is_cpu: bool,
    /// Empty between hands, two cards once dealt in.
    pub hole: Vec<Card>,
    pub stack: u32,
    pub committed_this_street: u32,
    pub total_committed: u32,
    pub has_folded: bool,
    pub is_all_in: bool,
    /// Dealt into the current hand.
    pub in_hand: bool,
    /// Has acted since the last bet/raise on this street.
    pub has_acted: bool,
}

impl Seat {
    pub fn new(index: usize, stack: u32, is_cpu: bool) -> Self {
        Self {
            index,
            is_cpu,
            hole: Vec::new(),
            stack,
            committed_this_street: 0,
            total_committed: 0,
            has_folded: false,
            is_all_in: false,
            in_hand: false,
            has_acted: false,
        }
    }

    /// Still contesting the pot.
    pub fn is_live(&self) -> bool {
        self.in_hand && !self.has_folded
    }

    /// Live, not all-in and holding chips.
    pub fn can_act(&self) -> bool {
        self.is_live() && !self.is_all_in && self.stack > 0
    }

    /// Move chips from the stack into the pot, capped at the stack.
    /// Returns what was actually committed.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.committed_this_street += paid;
        self.total_committed += paid;
        if self.stack == 0 && self.in_hand {
            self.is_all_in = true;
        }
        paid
    }

    pub(crate) fn reset_for_hand(&mut self) {
        self.hole.clear();
        self.committed_this_street = 0;
        self.total_committed = 0;
        self.has_folded = false;
        self.is_all_in = false;
        self.in_hand = self.stack > 0;
        self.has_acted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_caps_at_stack_and_flags_all_in() {
        let mut seat = Seat::new(0, 30, false);
        seat.in_hand = true;
        assert_eq!(seat.commit(50), 30);
        assert_eq!(seat.stack, 0);
        assert_eq!(seat.total_committed, 30);
        assert!(seat.is_all_in);
        assert!(!seat.can_act());
    }

    #[test]
    fn busted_seat_sits_out_next_hand() {
        let mut seat = Seat::new(3, 0, true);
        seat.reset_for_hand();
        assert!(!seat.in_hand);
        assert!(!seat.is_live());
    }

    #[test]
    fn actions_serialize_with_type_tag() {
        let json = serde_json::to_string(&PlayerAction::Raise(300)).unwrap();
        assert_eq!(json, r#"{"type":"raise","amount":300}"#);
        let json = serde_json::to_string(&PlayerAction::Check).unwrap();
        assert_eq!(json, r#"{"type":"check"}"#);
    }
}
