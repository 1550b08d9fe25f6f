//! Rule-based CPU strategy.
//!
//! Preflop decisions key on a coarse hand category, seat position, effective
//! stack depth and the profile. Postflop decisions classify the made hand and
//! the draws, size bets as a fraction of the pot, and fall back to a
//! Monte-Carlo equity check against the price when facing a bet with a
//! marginal holding. Every suggestion is forced into the legal-action set.

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::AIOpponent;
use crate::equity::{decision_seed, estimate_equity};
use felt_engine::cards::Card;
use felt_engine::game::{Street, TableState};
use felt_engine::hand::{Category, best_five, evaluate_hand};
use felt_engine::player::{ActionKind, PlayerAction};
use felt_engine::rules::AvailableActions;

/// Open size in big blinds.
const OPEN_MULTIPLIER: u32 = 3;
/// Effective stack (in big blinds) at or below which strong hands shove.
const SHOVE_DEPTH_BB: u32 = 20;
const EQUITY_ITERATIONS: usize = 300;

/// How loose the CPU plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Tight,
    Loose,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Tight => "tight",
            Profile::Loose => "loose",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tight" | "baseline" => Ok(Profile::Tight),
            "loose" => Ok(Profile::Loose),
            other => Err(format!("unknown profile {:?} (expected tight or loose)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreflopCategory {
    Trash,
    Speculative,
    Strong,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatPosition {
    Early,
    Middle,
    Late,
    Blinds,
}

/// What the hole cards make together with the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MadeHand {
    Nothing,
    WeakPair,
    TopPair,
    Strong,
    Monster,
}

/// Starting-hand score on a 0-10 scale.
///
/// - 9-10: AA-JJ, AKs
/// - 7-8: TT-99, AK, AQ, AJs, KQs
/// - 4-6: small pairs, suited aces, broadways, suited connectors
/// - 0-3: the rest
pub fn preflop_score(hole: [Card; 2]) -> u8 {
    let r1 = hole[0].rank.value();
    let r2 = hole[1].rank.value();
    let (high, low) = if r1 >= r2 { (r1, r2) } else { (r2, r1) };
    let suited = hole[0].suit == hole[1].suit;
    let pick = |s: u8, o: u8| if suited { s } else { o };

    if high == low {
        return match high {
            13..=14 => 10,
            11..=12 => 9,
            10 => 8,
            9 => 7,
            8 => 6,
            7 => 5,
            _ => 4,
        };
    }

    match (high, low) {
        (14, 13) => pick(10, 8),
        (14, 12) => pick(8, 7),
        (14, 11) => pick(7, 6),
        (14, 10) => pick(6, 5),
        (14, _) => pick(5, 3),
        (13, 12) => pick(7, 6),
        (13, 11) => pick(6, 5),
        (13, 10) => pick(5, 4),
        (12, 11) => pick(6, 5),
        (12, 10) => pick(5, 4),
        _ => {
            if suited && high - low <= 2 {
                if high >= 9 { 5 } else { 4 }
            } else if high >= 11 && low >= 9 {
                4
            } else {
                2
            }
        }
    }
}

pub fn preflop_category(hole: [Card; 2]) -> PreflopCategory {
    match preflop_score(hole) {
        9..=10 => PreflopCategory::Premium,
        7..=8 => PreflopCategory::Strong,
        4..=6 => PreflopCategory::Speculative,
        _ => PreflopCategory::Trash,
    }
}

/// Position from the seat's place in the preflop order. The button is
/// always late; the blinds are their own bucket.
pub fn seat_position(state: &TableState, seat: usize) -> SeatPosition {
    if state.button_index == Some(seat) {
        return SeatPosition::Late;
    }
    if state.small_blind_index == Some(seat) || state.big_blind_index == Some(seat) {
        return SeatPosition::Blinds;
    }
    let (Some(button), Some(bb)) = (state.button_index, state.big_blind_index) else {
        return SeatPosition::Middle;
    };
    // seats acting before the blinds: first after the big blind ... button
    let order: Vec<usize> = state
        .seats_after(bb)
        .take_while(|&i| i != button)
        .chain(std::iter::once(button))
        .filter(|&i| state.seats[i].in_hand)
        .collect();
    let Some(idx) = order.iter().position(|&i| i == seat) else {
        return SeatPosition::Middle;
    };
    let len = order.len();
    let behind = len - 1 - idx;
    if behind <= 1 {
        SeatPosition::Late
    } else if idx * 3 < len - 1 {
        SeatPosition::Early
    } else {
        SeatPosition::Middle
    }
}

/// Smaller of the seat's chips and the deepest opponent still in the hand,
/// counting chips already in front of each player this street.
pub fn effective_stack(state: &TableState, seat: usize) -> u32 {
    let Ok(me) = state.seat(seat) else {
        return 0;
    };
    let mine = me.stack + me.committed_this_street;
    let deepest = state
        .seats
        .iter()
        .filter(|s| s.index != seat && s.is_live())
        .map(|s| s.stack + s.committed_this_street)
        .max()
        .unwrap_or(0);
    mine.min(deepest)
}

pub fn classify_made_hand(hole: [Card; 2], board: &[Card]) -> MadeHand {
    let mut cards = hole.to_vec();
    cards.extend_from_slice(board);
    let Ok((five, strength)) = best_five(&cards) else {
        return MadeHand::Nothing;
    };
    if !five.iter().any(|c| hole.contains(c)) {
        return MadeHand::Nothing;
    }
    if board.len() == 5 && evaluate_hand(board).is_ok_and(|b| b == strength) {
        return MadeHand::Nothing;
    }

    let hole_ranks = [hole[0].rank.value(), hole[1].rank.value()];
    let board_top = board.iter().map(|c| c.rank.value()).max().unwrap_or(0);
    let from_hole = |r: u8| hole_ranks.contains(&r);
    let pocket_pair = hole_ranks[0] == hole_ranks[1];

    match strength.category {
        Category::StraightFlush
        | Category::FourKind
        | Category::FullHouse
        | Category::Flush
        | Category::Straight => MadeHand::Monster,
        Category::ThreeKind => {
            let trips = strength.kickers[0];
            if pocket_pair && from_hole(trips) {
                MadeHand::Monster
            } else if from_hole(trips) {
                MadeHand::Strong
            } else {
                MadeHand::Nothing
            }
        }
        Category::TwoPair => {
            let (high, low) = (strength.kickers[0], strength.kickers[1]);
            match (from_hole(high), from_hole(low)) {
                (true, true) if !pocket_pair => MadeHand::Strong,
                (true, _) if high >= board_top => MadeHand::TopPair,
                (true, _) | (_, true) => MadeHand::WeakPair,
                _ => MadeHand::Nothing,
            }
        }
        Category::Pair => {
            let pair = strength.kickers[0];
            if !from_hole(pair) {
                MadeHand::Nothing
            } else if pair >= board_top {
                MadeHand::TopPair
            } else {
                MadeHand::WeakPair
            }
        }
        Category::HighCard => MadeHand::Nothing,
    }
}

/// Unseen cards that would complete a flush or straight, before the river.
pub fn draw_outs(hole: [Card; 2], board: &[Card]) -> u32 {
    if !(3..=4).contains(&board.len()) {
        return 0;
    }
    let mut outs = 0;

    let mut suit_counts = [0u8; 4];
    for c in hole.iter().chain(board) {
        suit_counts[c.suit as usize] += 1;
    }
    let flush_draw = hole
        .iter()
        .any(|c| suit_counts[c.suit as usize] == 4);
    if flush_draw {
        outs += 9;
    }

    let mask = hole
        .iter()
        .chain(board)
        .fold(0u16, |m, c| m | 1 << c.rank.value());
    if !has_straight(mask) {
        let completing = (2..=14u8)
            .filter(|r| mask & (1 << r) == 0)
            .filter(|&r| has_straight(mask | 1 << r))
            .count() as u32;
        outs += (completing * 4).min(8);
    }
    outs
}

fn has_straight(mask: u16) -> bool {
    let m = if mask & (1 << 14) != 0 { mask | 1 << 1 } else { mask };
    (5..=14u8).any(|high| {
        let window = 0b1_1111u16 << (high - 4);
        m & window == window
    })
}

/// Suggested action for the seat to act. Always a member of the legal set.
pub fn suggest(state: &TableState, profile: Profile) -> PlayerAction {
    match state.current_to_act {
        Some(seat) => suggest_for(state, seat, profile),
        None => PlayerAction::Check,
    }
}

pub fn suggest_for(state: &TableState, seat: usize, profile: Profile) -> PlayerAction {
    let Ok(view) = state.betting_view(seat) else {
        return PlayerAction::Check;
    };
    let legal = view.legal_actions();
    let hole = match state.seat(seat).map(|s| s.hole.as_slice()) {
        Ok([a, b]) => [*a, *b],
        _ => return legalize(PlayerAction::Check, &legal),
    };
    let spot = Spot {
        state,
        seat,
        hole,
        profile,
        committed: view.committed,
        legal: &legal,
    };
    let preferred = match state.street {
        Some(Street::Preflop) | None => spot.preflop(),
        Some(_) => spot.postflop(),
    };
    legalize(preferred, &legal)
}

/// Keep `preferred` if legal, resize an out-of-range bet or raise, otherwise
/// fall back to check, then call, then fold.
pub fn legalize(preferred: PlayerAction, legal: &AvailableActions) -> PlayerAction {
    if legal.allows(&preferred) {
        return preferred;
    }
    if let Some(amount) = preferred.amount() {
        let amount = amount.clamp(legal.min_amount, legal.max_amount);
        if legal.contains(ActionKind::Raise) {
            return PlayerAction::Raise(amount);
        }
        if legal.contains(ActionKind::Bet) {
            return PlayerAction::Bet(amount);
        }
    }
    [
        (ActionKind::Check, PlayerAction::Check),
        (ActionKind::Call, PlayerAction::Call),
        (ActionKind::Fold, PlayerAction::Fold),
    ]
    .into_iter()
    .find(|(kind, _)| legal.contains(*kind))
    .map(|(_, action)| action)
    .unwrap_or(PlayerAction::Check)
}

struct Spot<'a> {
    state: &'a TableState,
    seat: usize,
    hole: [Card; 2],
    profile: Profile,
    committed: u32,
    legal: &'a AvailableActions,
}

impl Spot<'_> {
    fn to_call(&self) -> u32 {
        self.legal.to_call
    }

    /// Put in `add` more chips as a bet or raise, whichever is open.
    fn aggress(&self, add: u32) -> PlayerAction {
        if self.legal.contains(ActionKind::Bet) {
            PlayerAction::Bet(add)
        } else {
            PlayerAction::Raise(add)
        }
    }

    fn raise_to(&self, level: u32) -> PlayerAction {
        self.aggress(level.saturating_sub(self.committed))
    }

    fn shove(&self) -> PlayerAction {
        self.aggress(self.legal.max_amount)
    }

    fn check_or_fold(&self) -> PlayerAction {
        if self.to_call() == 0 {
            PlayerAction::Check
        } else {
            PlayerAction::Fold
        }
    }

    fn preflop(&self) -> PlayerAction {
        let bb = self.state.rules.big_blind.max(1);
        let raised = self.state.bet_to_call > bb;
        let depth_bb = effective_stack(self.state, self.seat) / bb;
        let position = seat_position(self.state, self.seat);
        let loose = self.profile == Profile::Loose;

        match preflop_category(self.hole) {
            PreflopCategory::Premium => {
                if depth_bb <= SHOVE_DEPTH_BB {
                    self.shove()
                } else if raised {
                    self.raise_to(self.state.bet_to_call * OPEN_MULTIPLIER)
                } else {
                    self.raise_to(bb * OPEN_MULTIPLIER)
                }
            }
            PreflopCategory::Strong => {
                if !raised {
                    if depth_bb <= SHOVE_DEPTH_BB {
                        self.shove()
                    } else {
                        self.raise_to(bb * OPEN_MULTIPLIER)
                    }
                } else if loose || self.to_call() <= self.legal.max_amount / 5 {
                    PlayerAction::Call
                } else {
                    PlayerAction::Fold
                }
            }
            PreflopCategory::Speculative => {
                let in_position = position == SeatPosition::Late
                    || (loose && position == SeatPosition::Middle);
                if self.to_call() == 0 {
                    PlayerAction::Check
                } else if !raised && (in_position || position == SeatPosition::Blinds) {
                    PlayerAction::Call
                } else if raised && loose && position == SeatPosition::Late && self.to_call() <= bb * OPEN_MULTIPLIER {
                    PlayerAction::Call
                } else {
                    PlayerAction::Fold
                }
            }
            PreflopCategory::Trash => self.check_or_fold(),
        }
    }

    fn postflop(&self) -> PlayerAction {
        let board = &self.state.community;
        let made = classify_made_hand(self.hole, board);
        let outs = draw_outs(self.hole, board);
        let pot = self.state.pot_total().max(1);
        let stack = self.legal.max_amount;
        // stack-to-pot ratio at or below 1.5
        let low_spr = stack.saturating_mul(2) <= pot.saturating_mul(3);
        let to_call = self.to_call();
        let loose = self.profile == Profile::Loose;

        match made {
            MadeHand::Monster => {
                if low_spr {
                    self.shove()
                } else if to_call == 0 {
                    self.aggress(pot * 3 / 4)
                } else {
                    self.aggress(to_call + (pot + to_call) * 3 / 4)
                }
            }
            MadeHand::Strong => {
                if low_spr {
                    self.shove()
                } else if to_call == 0 {
                    self.aggress(pot * 2 / 3)
                } else {
                    PlayerAction::Call
                }
            }
            MadeHand::TopPair => {
                let ceiling = if loose { pot } else { pot / 2 };
                if to_call == 0 {
                    self.aggress(pot / 2)
                } else if to_call <= ceiling {
                    PlayerAction::Call
                } else {
                    self.call_on_equity(pot)
                }
            }
            MadeHand::WeakPair | MadeHand::Nothing => {
                if to_call == 0 {
                    if loose && outs >= 8 {
                        self.aggress(pot / 2)
                    } else {
                        PlayerAction::Check
                    }
                } else {
                    self.call_on_equity(pot)
                }
            }
        }
    }

    fn call_on_equity(&self, pot: u32) -> PlayerAction {
        let to_call = self.to_call();
        let opponents = self.state.live_count().saturating_sub(1);
        let mut rng = StdRng::seed_from_u64(decision_seed(self.state.hand_id, self.seat));
        let equity = estimate_equity(
            &self.hole,
            &self.state.community,
            opponents,
            EQUITY_ITERATIONS,
            &mut rng,
        );
        let price = to_call as f64 / (pot + to_call) as f64;
        let margin = match self.profile {
            Profile::Tight => 0.05,
            Profile::Loose => 0.0,
        };
        if equity >= price + margin {
            PlayerAction::Call
        } else {
            PlayerAction::Fold
        }
    }
}

/// The rule-based CPU player.
#[derive(Debug, Clone)]
pub struct HeuristicAI {
    profile: Profile,
    name: String,
}

impl HeuristicAI {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            name: format!("HeuristicAI({})", profile),
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }
}

impl Default for HeuristicAI {
    fn default() -> Self {
        Self::new(Profile::Tight)
    }
}

impl AIOpponent for HeuristicAI {
    fn get_action(&self, state: &TableState, seat: usize) -> PlayerAction {
        suggest_for(state, seat, self.profile)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_engine::cards::parse_cards;
    use felt_engine::rng::Xorshift32;
    use felt_engine::rules::{BettingView, TableRules};

    fn two(codes: &str) -> [Card; 2] {
        let v = parse_cards(codes).unwrap();
        [v[0], v[1]]
    }

    #[test]
    fn preflop_categories() {
        assert_eq!(preflop_category(two("Ah As")), PreflopCategory::Premium);
        assert_eq!(preflop_category(two("Ah Ks")), PreflopCategory::Strong);
        assert_eq!(preflop_category(two("9h 8h")), PreflopCategory::Speculative);
        assert_eq!(preflop_category(two("7h 2s")), PreflopCategory::Trash);
    }

    #[test]
    fn made_hand_ignores_the_board_pair() {
        let board = parse_cards("Kd Kc 7s").unwrap();
        assert_eq!(classify_made_hand(two("2h 3h"), &board), MadeHand::Nothing);
        assert_eq!(classify_made_hand(two("Ah 7h"), &board), MadeHand::WeakPair);
        assert_eq!(classify_made_hand(two("7h 7d"), &board), MadeHand::Monster);
    }

    #[test]
    fn top_pair_and_overpair() {
        let board = parse_cards("Qd 8c 3s").unwrap();
        assert_eq!(classify_made_hand(two("Qh Jh"), &board), MadeHand::TopPair);
        assert_eq!(classify_made_hand(two("Ah Ad"), &board), MadeHand::TopPair);
        assert_eq!(classify_made_hand(two("8h 9h"), &board), MadeHand::WeakPair);
    }

    #[test]
    fn counts_flush_and_straight_draws() {
        let board = parse_cards("9h 8h 2c").unwrap();
        // flush draw plus open-ended straight draw
        assert_eq!(draw_outs(two("Th Jh"), &board), 17);
        assert_eq!(draw_outs(two("Ac Kd"), &board), 0);
        let river = parse_cards("9h 8h 2c 3d 4s").unwrap();
        assert_eq!(draw_outs(two("Th Jh"), &river), 0);
    }

    #[test]
    fn legalize_prefers_check_then_call_then_fold() {
        let facing = BettingView {
            stack: 1000,
            committed: 0,
            bet_to_call: 100,
            last_raise: 100,
            big_blind: 100,
        }
        .legal_actions();
        assert_eq!(legalize(PlayerAction::Check, &facing), PlayerAction::Call);
        assert_eq!(legalize(PlayerAction::Bet(300), &facing), PlayerAction::Raise(300));
        assert_eq!(legalize(PlayerAction::Raise(5), &facing), PlayerAction::Raise(200));
        let free = BettingView {
            stack: 1000,
            committed: 0,
            bet_to_call: 0,
            last_raise: 0,
            big_blind: 100,
        }
        .legal_actions();
        assert_eq!(legalize(PlayerAction::Fold, &free), PlayerAction::Check);
    }

    #[test]
    fn premium_hands_open_three_big_blinds() {
        let mut state = TableState::new(6, 10_000, TableRules::default()).unwrap();
        state.start_hand(&mut Xorshift32::new(3)).unwrap();
        let seat = state.current_to_act.unwrap();
        state.seats[seat].hole = parse_cards("Ac Ad").unwrap();
        assert_eq!(suggest(&state, Profile::Tight), PlayerAction::Raise(300));
    }

    #[test]
    fn short_stacks_shove_strong_hands() {
        let mut state = TableState::new(3, 1_500, TableRules::default()).unwrap();
        state.start_hand(&mut Xorshift32::new(3)).unwrap();
        let seat = state.current_to_act.unwrap();
        state.seats[seat].hole = parse_cards("Ac Kd").unwrap();
        assert_eq!(suggest(&state, Profile::Tight), PlayerAction::Raise(1_500));
    }

    #[test]
    fn positions_in_a_full_ring() {
        let mut state = TableState::new(9, 1_000, TableRules::default()).unwrap();
        state.start_hand(&mut Xorshift32::new(1)).unwrap();
        // button 0, blinds 1 and 2, then 3..=8 act before the button
        assert_eq!(seat_position(&state, 0), SeatPosition::Late);
        assert_eq!(seat_position(&state, 1), SeatPosition::Blinds);
        assert_eq!(seat_position(&state, 3), SeatPosition::Early);
        assert_eq!(seat_position(&state, 5), SeatPosition::Middle);
        assert_eq!(seat_position(&state, 8), SeatPosition::Late);
    }

    #[test]
    fn profile_parses_names() {
        assert_eq!("Loose".parse::<Profile>(), Ok(Profile::Loose));
        assert_eq!("baseline".parse::<Profile>(), Ok(Profile::Tight));
        assert!("wild".parse::<Profile>().is_err());
    }
}
