use felt_engine::engine::EngineEvent;
use felt_engine::errors::GameError;
use felt_engine::game::{HandStatus, Street, TableState};
use felt_engine::player::{ActionKind, PlayerAction};
use felt_engine::rng::Xorshift32;
use felt_engine::rules::TableRules;

fn table(seats: usize) -> TableState {
    TableState::new(seats, 2_000, TableRules::default()).unwrap()
}

/// Uniformly random legal action, including random bet/raise sizes.
fn random_action(state: &TableState, rng: &mut Xorshift32) -> PlayerAction {
    let legal = state.available_actions().unwrap();
    let kind = legal.kinds[rng.next_u32() as usize % legal.kinds.len()];
    let size = |rng: &mut Xorshift32| {
        let span = legal.max_amount - legal.min_amount + 1;
        legal.min_amount + rng.next_u32() % span
    };
    match kind {
        ActionKind::Fold => PlayerAction::Fold,
        ActionKind::Check => PlayerAction::Check,
        ActionKind::Call => PlayerAction::Call,
        ActionKind::Bet => PlayerAction::Bet(size(rng)),
        ActionKind::Raise => PlayerAction::Raise(size(rng)),
    }
}

#[test]
fn heads_up_hand_emits_events_in_order() {
    let mut state = table(2);
    let events = state.start_hand(&mut Xorshift32::new(21)).unwrap();
    assert!(matches!(events[0], EngineEvent::HandStarted { hand_id: 1, button: 0, .. }));
    assert!(matches!(events[1], EngineEvent::BlindPosted { seat: 0, amount: 50 }));
    assert!(matches!(events[2], EngineEvent::BlindPosted { seat: 1, amount: 100 }));
    let dealt = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::HoleCardsDealt { .. }))
        .count();
    assert_eq!(dealt, 2);

    // call, check, then check it down
    state.apply_action(0, PlayerAction::Call).unwrap();
    let events = state.apply_action(1, PlayerAction::Check).unwrap();
    match &events[1] {
        EngineEvent::StreetDealt { street, cards, .. } => {
            assert_eq!(*street, Street::Flop);
            assert_eq!(cards.len(), 3);
        }
        other => panic!("expected flop, got {:?}", other),
    }
    // heads-up postflop: big blind acts first
    assert_eq!(state.current_to_act, Some(1));
    while state.is_in_hand() {
        let seat = state.current_to_act.unwrap();
        state.apply_action(seat, PlayerAction::Check).unwrap();
    }
    assert_eq!(state.community.len(), 5);
    assert_eq!(state.status, HandStatus::HandOver);
    assert_eq!(state.chip_total(), 4_000);
}

#[test]
fn first_to_act_follows_the_button() {
    for seats in 3..=6 {
        let mut state = table(seats);
        let mut rng = Xorshift32::new(seats as u32);
        for hand in 0..seats {
            state.start_hand(&mut rng).unwrap();
            let button = state.button_index.unwrap();
            assert_eq!(button, hand % seats);
            assert_eq!(state.small_blind_index, Some((button + 1) % seats));
            assert_eq!(state.big_blind_index, Some((button + 2) % seats));
            assert_eq!(state.current_to_act, Some((button + 3) % seats));
            // fold around to the big blind
            while state.is_in_hand() {
                let seat = state.current_to_act.unwrap();
                state.apply_action(seat, PlayerAction::Fold).unwrap();
            }
        }
    }
}

#[test]
fn postflop_action_starts_left_of_the_button_skipping_folds() {
    let mut state = table(4);
    state.start_hand(&mut Xorshift32::new(8)).unwrap();
    // button 0, sb 1, bb 2, utg 3
    state.apply_action(3, PlayerAction::Call).unwrap();
    state.apply_action(0, PlayerAction::Call).unwrap();
    state.apply_action(1, PlayerAction::Fold).unwrap();
    state.apply_action(2, PlayerAction::Check).unwrap();
    assert_eq!(state.street, Some(Street::Flop));
    assert_eq!(state.current_to_act, Some(2));
}

#[test]
fn legal_actions_are_stable_on_unchanged_state() {
    let mut state = table(5);
    let mut rng = Xorshift32::new(77);
    state.start_hand(&mut rng).unwrap();
    while state.is_in_hand() {
        let first = state.available_actions().unwrap();
        let second = state.available_actions().unwrap();
        assert_eq!(first, second);
        let seat = state.current_to_act.unwrap();
        let action = random_action(&state, &mut rng);
        state.apply_action(seat, action).unwrap();
    }
}

#[test]
fn random_play_conserves_chips_and_keeps_legal_sets_non_empty() {
    for seed in 1..=40u32 {
        let seats = 2 + (seed as usize % 5);
        let mut state = table(seats);
        let total = state.chip_total();
        let mut deck_rng = Xorshift32::new(seed);
        let mut policy = Xorshift32::new(seed.wrapping_mul(7919));
        for _ in 0..10 {
            if state.game_over {
                break;
            }
            state.start_hand(&mut deck_rng).unwrap();
            while state.is_in_hand() {
                let seat = state.current_to_act.expect("someone must be to act");
                assert!(state.seats[seat].can_act());
                assert!(!state.available_actions().unwrap().is_empty());
                let action = random_action(&state, &mut policy);
                state.apply_action(seat, action).unwrap();
                assert_eq!(state.chip_total(), total, "seed {}", seed);
            }
            let result = state.last_result.as_ref().unwrap();
            let paid: u32 = result.awards.iter().map(|(_, c)| c).sum();
            let potted: u32 = result.pots.iter().map(|p| p.amount).sum();
            assert_eq!(paid, potted);
        }
    }
}

#[test]
fn same_seed_and_actions_replay_identically() {
    let run = || {
        let mut state = table(4);
        let mut deck_rng = Xorshift32::new(2024);
        let mut policy = Xorshift32::new(99);
        let mut snapshots = Vec::new();
        for _ in 0..5 {
            if state.game_over {
                break;
            }
            state.start_hand(&mut deck_rng).unwrap();
            snapshots.push(state.clone());
            while state.is_in_hand() {
                let seat = state.current_to_act.unwrap();
                let action = random_action(&state, &mut policy);
                state.apply_action(seat, action).unwrap();
                snapshots.push(state.clone());
            }
        }
        snapshots
    };
    let a = run();
    let b = run();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x, y);
        assert_eq!(serde_json::to_string(x).unwrap(), serde_json::to_string(y).unwrap());
    }
}

#[test]
fn starting_a_hand_mid_hand_is_rejected() {
    let mut state = table(3);
    state.start_hand(&mut Xorshift32::new(1)).unwrap();
    let before = state.clone();
    assert_eq!(
        state.start_hand(&mut Xorshift32::new(2)),
        Err(GameError::InvalidStreetState)
    );
    assert_eq!(state, before);
}

#[test]
fn illegal_sizes_are_reported_with_bounds() {
    let mut state = table(3);
    state.start_hand(&mut Xorshift32::new(1)).unwrap();
    let err = state.apply_action(0, PlayerAction::Raise(5_000)).unwrap_err();
    assert_eq!(
        err,
        GameError::IllegalSizing {
            amount: 5_000,
            minimum: 200,
            maximum: 2_000
        }
    );
    assert_eq!(err.code(), "illegal_sizing");
    assert_eq!(
        state.apply_action(0, PlayerAction::Check),
        Err(GameError::ActionNotAvailable(ActionKind::Check))
    );
}
