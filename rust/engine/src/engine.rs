//! Hand transitions on [`TableState`].
//!
//! `start_hand` and `apply_action` are the only ways a hand moves forward.
//! Both work on a scratch copy of the table and commit it only on success,
//! so a rejected request leaves the state exactly as it was. Each transition
//! returns the [`EngineEvent`]s it produced, in order.
//!
//! # Examples
//!
//! ```
//! use felt_engine::game::{HandStatus, TableState};
//! use felt_engine::player::PlayerAction;
//! use felt_engine::rng::Xorshift32;
//! use felt_engine::rules::TableRules;
//!
//! let mut table = TableState::new(2, 1_000, TableRules::default()).unwrap();
//! let mut rng = Xorshift32::new(7);
//! table.start_hand(&mut rng).unwrap();
//!
//! // heads-up: the button posts the small blind and acts first
//! let button = table.button_index.unwrap();
//! assert_eq!(table.current_to_act, Some(button));
//! table.apply_action(button, PlayerAction::Fold).unwrap();
//! assert_eq!(table.status, HandStatus::HandOver);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::{HandResult, HandStatus, ShowdownHand, Street, TableState, MIN_SEATS};
use crate::hand::best_five;
use crate::player::{PlayerAction, Seat};
use crate::pot::{split_pot, Pot};
use crate::rng::RandomSource;
use crate::rules::ValidatedAction;

/// Something that happened at the table, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    HandStarted {
        hand_id: u64,
        button: usize,
        small_blind_seat: usize,
        big_blind_seat: usize,
        small_blind: u32,
        big_blind: u32,
    },
    BlindPosted {
        seat: usize,
        amount: u32,
    },
    HoleCardsDealt {
        seat: usize,
        cards: Vec<Card>,
    },
    ActionApplied {
        hand_id: u64,
        seat: usize,
        action: PlayerAction,
        /// Chips that actually left the stack.
        chips: u32,
        /// What the seat was facing before acting.
        amount_to_call: u32,
        street: Street,
        all_in: bool,
    },
    StreetDealt {
        hand_id: u64,
        street: Street,
        cards: Vec<Card>,
    },
    HandFinished {
        hand_id: u64,
        result: HandResult,
    },
}

impl TableState {
    /// Deal a new hand: rotate the button, post blinds, deal hole cards and
    /// hand the action to the first seat preflop.
    pub fn start_hand(&mut self, rng: &mut dyn RandomSource) -> Result<Vec<EngineEvent>, GameError> {
        if self.status == HandStatus::InHand {
            return Err(GameError::InvalidStreetState);
        }
        if self.seats_with_chips() < MIN_SEATS {
            return Err(GameError::NotEnoughPlayers);
        }
        let mut next = self.clone();
        let events = next.deal_new_hand(rng)?;
        *self = next;
        Ok(events)
    }

    /// Apply `action` for `seat`, then move the hand forward as far as it
    /// goes without another decision: next actor, next street, run-out or
    /// settlement.
    pub fn apply_action(&mut self, seat: usize, action: PlayerAction) -> Result<Vec<EngineEvent>, GameError> {
        if self.status != HandStatus::InHand {
            return Err(GameError::InvalidStreetState);
        }
        self.seat(seat)?;
        if self.current_to_act != Some(seat) {
            return Err(GameError::InvalidActor {
                expected: self.current_to_act,
                actual: seat,
            });
        }
        let street = self.street.ok_or(GameError::InvalidStreetState)?;
        let view = self.betting_view(seat)?;
        let validated = view.validate(action)?;

        let mut next = self.clone();
        next.commit_action(seat, validated, view.min_raise_increment());
        let mut events = vec![EngineEvent::ActionApplied {
            hand_id: next.hand_id,
            seat,
            action,
            chips: validated.chips(),
            amount_to_call: view.to_call(),
            street,
            all_in: validated.is_all_in(),
        }];
        next.advance(seat, &mut events)?;
        *self = next;
        Ok(events)
    }

    fn deal_new_hand(&mut self, rng: &mut dyn RandomSource) -> Result<Vec<EngineEvent>, GameError> {
        self.hand_id += 1;
        for seat in &mut self.seats {
            seat.reset_for_hand();
        }
        self.community.clear();
        self.deck = Deck::standard();
        self.deck.shuffle(rng);
        self.street = Some(Street::Preflop);
        self.status = HandStatus::InHand;
        self.current_to_act = None;
        self.last_aggressor_index = None;
        self.bet_to_call = 0;
        self.last_raise_amount = 0;
        self.action_count = 0;
        self.last_result = None;

        let button = match self.button_index {
            Some(prev) => self.next_seat_where(prev, |s| s.in_hand),
            None => self.seats.iter().position(|s| s.in_hand),
        }
        .ok_or(GameError::NotEnoughPlayers)?;
        let dealt_in = self.seats.iter().filter(|s| s.in_hand).count();
        let (sb, bb) = if dealt_in == 2 {
            let other = self
                .next_seat_where(button, |s| s.in_hand)
                .ok_or(GameError::NotEnoughPlayers)?;
            (button, other)
        } else {
            let sb = self
                .next_seat_where(button, |s| s.in_hand)
                .ok_or(GameError::NotEnoughPlayers)?;
            let bb = self
                .next_seat_where(sb, |s| s.in_hand)
                .ok_or(GameError::NotEnoughPlayers)?;
            (sb, bb)
        };
        self.button_index = Some(button);
        self.small_blind_index = Some(sb);
        self.big_blind_index = Some(bb);

        tracing::debug!(hand_id = self.hand_id, button, sb, bb, dealt_in, "starting hand");

        let mut events = vec![EngineEvent::HandStarted {
            hand_id: self.hand_id,
            button,
            small_blind_seat: sb,
            big_blind_seat: bb,
            small_blind: self.rules.small_blind,
            big_blind: self.rules.big_blind,
        }];

        // a short stack posts what it has and is all-in
        let sb_paid = self.seats[sb].commit(self.rules.small_blind);
        events.push(EngineEvent::BlindPosted { seat: sb, amount: sb_paid });
        let bb_paid = self.seats[bb].commit(self.rules.big_blind);
        events.push(EngineEvent::BlindPosted { seat: bb, amount: bb_paid });
        // the level is the full big blind even when the big blind is short;
        // with nobody left to bet against it is only what was posted
        let can_act = self.seats.iter().filter(|s| s.can_act()).count();
        self.bet_to_call = if can_act > 1 {
            self.rules.big_blind.max(sb_paid)
        } else {
            sb_paid.max(bb_paid)
        };
        self.last_raise_amount = self.rules.big_blind;

        // one card at a time, starting left of the button
        let order: Vec<usize> = self
            .seats_after(button)
            .filter(|&i| self.seats[i].in_hand)
            .collect();
        for _ in 0..2 {
            for &i in &order {
                let card = self.deck.draw()?;
                self.seats[i].hole.push(card);
            }
        }
        for &i in &order {
            events.push(EngineEvent::HoleCardsDealt {
                seat: i,
                cards: self.seats[i].hole.clone(),
            });
        }

        self.advance(bb, &mut events)?;
        Ok(events)
    }

    fn commit_action(&mut self, seat: usize, action: ValidatedAction, min_increment: u32) {
        match action {
            ValidatedAction::Fold => self.seats[seat].has_folded = true,
            ValidatedAction::Check => {}
            ValidatedAction::Call { amount, .. } => {
                self.seats[seat].commit(amount);
            }
            ValidatedAction::Bet { amount, .. } | ValidatedAction::Raise { amount, .. } => {
                self.seats[seat].commit(amount);
                let level = self.seats[seat].committed_this_street;
                let increment = level.saturating_sub(self.bet_to_call);
                // an all-in short of a full raise reopens action but leaves the
                // minimum raise where it was
                if increment >= min_increment {
                    self.last_raise_amount = increment;
                }
                self.bet_to_call = self.bet_to_call.max(level);
                self.last_aggressor_index = Some(seat);
                for other in self.seats.iter_mut().filter(|s| s.index != seat) {
                    other.has_acted = false;
                }
            }
        }
        self.seats[seat].has_acted = true;
        self.action_count += 1;
    }

    /// Move the hand forward from `from` until a seat owes a decision or the
    /// hand is over. Streets with nobody left to bet are dealt straight out.
    fn advance(&mut self, from: usize, events: &mut Vec<EngineEvent>) -> Result<(), GameError> {
        let mut from = from;
        loop {
            if self.live_count() <= 1 {
                return self.finish_uncontested(events);
            }
            if let Some(next) = self.next_to_act(from) {
                self.current_to_act = Some(next);
                return Ok(());
            }
            self.current_to_act = None;
            match self.street.and_then(Street::next) {
                Some(Street::Showdown) | None => return self.showdown(events),
                Some(street) => {
                    self.open_street(street, events)?;
                    from = self.button_index.unwrap_or(0);
                }
            }
        }
    }

    /// First seat after `from` that still owes a decision this street.
    fn next_to_act(&self, from: usize) -> Option<usize> {
        let can_act = self.seats.iter().filter(|s| s.can_act()).count();
        self.seats_after(from)
            .find(|&i| self.owes_action(&self.seats[i], can_act))
    }

    // With a single seat able to act there is nobody to bet against, so it
    // only owes a decision when facing chips.
    fn owes_action(&self, seat: &Seat, can_act: usize) -> bool {
        seat.can_act()
            && (seat.committed_this_street < self.bet_to_call || (!seat.has_acted && can_act > 1))
    }

    fn next_seat_where(&self, from: usize, pred: impl Fn(&Seat) -> bool) -> Option<usize> {
        self.seats_after(from).find(|&i| pred(&self.seats[i]))
    }

    fn open_street(&mut self, street: Street, events: &mut Vec<EngineEvent>) -> Result<(), GameError> {
        for seat in &mut self.seats {
            seat.committed_this_street = 0;
            seat.has_acted = false;
        }
        self.bet_to_call = 0;
        self.last_raise_amount = 0;
        self.last_aggressor_index = None;

        self.deck.burn()?;
        let cards = self.deck.draw_n(street.cards_dealt())?;
        self.community.extend_from_slice(&cards);
        self.street = Some(street);
        events.push(EngineEvent::StreetDealt {
            hand_id: self.hand_id,
            street,
            cards,
        });
        Ok(())
    }

    fn finish_uncontested(&mut self, events: &mut Vec<EngineEvent>) -> Result<(), GameError> {
        let winner = self
            .seats
            .iter()
            .find(|s| s.is_live())
            .map(|s| s.index)
            .ok_or(GameError::NotEnoughPlayers)?;
        let pots = self.pots();
        let awards = vec![(winner, self.pot_total())];
        self.settle(pots, awards, vec![winner], Vec::new(), true, events);
        Ok(())
    }

    fn showdown(&mut self, events: &mut Vec<EngineEvent>) -> Result<(), GameError> {
        self.street = Some(Street::Showdown);

        let mut shown = Vec::new();
        for seat in self.seats.iter().filter(|s| s.is_live()) {
            let mut cards = seat.hole.clone();
            cards.extend_from_slice(&self.community);
            let (five, strength) = best_five(&cards)?;
            shown.push(ShowdownHand {
                seat: seat.index,
                strength,
                best_five: five.to_vec(),
            });
        }

        let pots = self.pots();
        let button = self.button_index.unwrap_or(0);
        let mut awards: Vec<(usize, u32)> = Vec::new();
        let mut main_winners = Vec::new();
        for (i, pot) in pots.iter().enumerate() {
            let contenders = shown.iter().filter(|h| pot.eligible.contains(&h.seat));
            let Some(best) = contenders.clone().map(|h| h.strength).max() else {
                continue;
            };
            let winners: Vec<usize> = contenders
                .filter(|h| h.strength == best)
                .map(|h| h.seat)
                .collect();
            for (seat, chips) in split_pot(pot.amount, &winners, button, self.seats.len()) {
                match awards.iter_mut().find(|(s, _)| *s == seat) {
                    Some((_, total)) => *total += chips,
                    None => awards.push((seat, chips)),
                }
            }
            if i == 0 {
                main_winners = winners;
            }
        }

        self.settle(pots, awards, main_winners, shown, false, events);
        Ok(())
    }

    fn settle(
        &mut self,
        pots: Vec<Pot>,
        awards: Vec<(usize, u32)>,
        winners: Vec<usize>,
        showdown: Vec<ShowdownHand>,
        uncontested: bool,
        events: &mut Vec<EngineEvent>,
    ) {
        for &(seat, chips) in &awards {
            self.seats[seat].stack += chips;
        }
        for seat in &mut self.seats {
            seat.committed_this_street = 0;
            seat.total_committed = 0;
        }
        self.status = HandStatus::HandOver;
        self.current_to_act = None;
        self.bet_to_call = 0;
        self.last_raise_amount = 0;
        self.game_over = self.seats_with_chips() < MIN_SEATS;

        tracing::debug!(
            hand_id = self.hand_id,
            uncontested,
            game_over = self.game_over,
            "hand finished"
        );

        let result = HandResult {
            hand_id: self.hand_id,
            pots,
            awards,
            winners,
            showdown,
            uncontested,
        };
        self.last_result = Some(result.clone());
        events.push(EngineEvent::HandFinished {
            hand_id: self.hand_id,
            result,
        });
    }
}
