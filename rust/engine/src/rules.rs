use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{ActionKind, PlayerAction};

/// Blind structure for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    pub small_blind: u32,
    pub big_blind: u32,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            small_blind: 50,
            big_blind: 100,
        }
    }
}

/// One seat's view of the open betting round: everything needed to decide
/// which actions are legal and how large they may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BettingView {
    pub stack: u32,
    pub committed: u32,
    /// Street commitment every seat must match.
    pub bet_to_call: u32,
    /// Size of the last full bet or raise on this street (0 when none).
    pub last_raise: u32,
    pub big_blind: u32,
}

/// The action a request resolves to, with chip amounts filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call { amount: u32, all_in: bool },
    Bet { amount: u32, all_in: bool },
    /// `increment` is how far the street level rises above the old call level.
    Raise { amount: u32, increment: u32, all_in: bool },
}

impl ValidatedAction {
    /// Chips leaving the stack.
    pub fn chips(&self) -> u32 {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call { amount, .. }
            | ValidatedAction::Bet { amount, .. }
            | ValidatedAction::Raise { amount, .. } => amount,
        }
    }

    pub fn is_all_in(&self) -> bool {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => false,
            ValidatedAction::Call { all_in, .. }
            | ValidatedAction::Bet { all_in, .. }
            | ValidatedAction::Raise { all_in, .. } => all_in,
        }
    }
}

/// Legal actions for the seat to act, with sizing bounds for bet/raise.
/// Amounts are additional chips, matching [`PlayerAction`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailableActions {
    pub kinds: Vec<ActionKind>,
    pub to_call: u32,
    /// Smallest legal bet or raise (already capped at the stack).
    pub min_amount: u32,
    /// Largest legal bet or raise: the whole stack.
    pub max_amount: u32,
}

impl AvailableActions {
    pub fn contains(&self, kind: ActionKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Whether `action` would pass validation, including its size.
    pub fn allows(&self, action: &PlayerAction) -> bool {
        if !self.contains(action.kind()) {
            return false;
        }
        match action.amount() {
            Some(a) => a >= self.min_amount && a <= self.max_amount,
            None => true,
        }
    }
}

impl BettingView {
    pub fn to_call(&self) -> u32 {
        self.bet_to_call.saturating_sub(self.committed)
    }

    /// Standard no-limit rule: a raise must grow the level by at least the
    /// last bet/raise, and never by less than the big blind.
    pub fn min_raise_increment(&self) -> u32 {
        self.last_raise.max(self.big_blind)
    }

    pub fn legal_actions(&self) -> AvailableActions {
        let to_call = self.to_call();
        let mut kinds = Vec::with_capacity(3);
        let mut min_amount = 0;

        if self.stack == 0 {
            return AvailableActions::default();
        }

        if to_call > 0 {
            kinds.push(ActionKind::Fold);
            kinds.push(ActionKind::Call);
            if self.stack > to_call {
                kinds.push(ActionKind::Raise);
                min_amount = (to_call + self.min_raise_increment()).min(self.stack);
            }
        } else {
            kinds.push(ActionKind::Check);
            if self.bet_to_call == 0 {
                kinds.push(ActionKind::Bet);
                min_amount = self.big_blind.min(self.stack);
            } else {
                // option to raise an uncontested level, e.g. the big blind preflop
                kinds.push(ActionKind::Raise);
                min_amount = self.min_raise_increment().min(self.stack);
            }
        }

        AvailableActions {
            kinds,
            to_call,
            min_amount,
            max_amount: self.stack,
        }
    }

    pub fn validate(&self, action: PlayerAction) -> Result<ValidatedAction, GameError> {
        let legal = self.legal_actions();
        let kind = action.kind();
        if !legal.contains(kind) {
            return Err(GameError::ActionNotAvailable(kind));
        }
        let to_call = legal.to_call;

        match action {
            PlayerAction::Fold => Ok(ValidatedAction::Fold),
            PlayerAction::Check => Ok(ValidatedAction::Check),
            PlayerAction::Call => {
                let amount = to_call.min(self.stack);
                Ok(ValidatedAction::Call {
                    amount,
                    all_in: amount == self.stack,
                })
            }
            PlayerAction::Bet(amount) => {
                self.check_size(amount, &legal)?;
                Ok(ValidatedAction::Bet {
                    amount,
                    all_in: amount == self.stack,
                })
            }
            PlayerAction::Raise(amount) => {
                self.check_size(amount, &legal)?;
                Ok(ValidatedAction::Raise {
                    amount,
                    increment: amount - to_call,
                    all_in: amount == self.stack,
                })
            }
        }
    }

    // all-in for less than the minimum is always allowed
    fn check_size(&self, amount: u32, legal: &AvailableActions) -> Result<(), GameError> {
        if amount == 0 || amount > legal.max_amount || amount < legal.min_amount {
            return Err(GameError::IllegalSizing {
                amount,
                minimum: legal.min_amount,
                maximum: legal.max_amount,
            });
        }
        Ok(())
    }
}

/// Validate `action` against a single seat's betting view.
///
/// # Examples
///
/// ```
/// use felt_engine::player::PlayerAction;
/// use felt_engine::rules::{validate_action, BettingView, ValidatedAction};
///
/// let view = BettingView { stack: 1000, committed: 0, bet_to_call: 100, last_raise: 100, big_blind: 100 };
/// assert_eq!(
///     validate_action(&view, PlayerAction::Call),
///     Ok(ValidatedAction::Call { amount: 100, all_in: false })
/// );
/// // raising by less than the last raise is rejected
/// assert!(validate_action(&view, PlayerAction::Raise(150)).is_err());
/// ```
pub fn validate_action(view: &BettingView, action: PlayerAction) -> Result<ValidatedAction, GameError> {
    view.validate(action)
}
