use felt_engine::errors::GameError;
use felt_engine::game::TableState;
use felt_engine::player::PlayerAction;
use felt_engine::rng::Xorshift32;
use felt_engine::rules::TableRules;

#[test]
fn busting_a_player_ends_the_game() {
    let mut state = TableState::with_stacks(&[100, 5_000], TableRules::default()).unwrap();
    let mut rng = Xorshift32::new(3);
    state.start_hand(&mut rng).unwrap();
    // heads-up: seat 0 is button and small blind
    state.apply_action(0, PlayerAction::Call).unwrap();
    assert!(state.seats[0].is_all_in);
    // the big blind has matched and nobody else can bet: board runs out
    assert!(!state.is_in_hand());
    assert_eq!(state.community.len(), 5);

    if state.seats[0].stack == 0 {
        assert!(state.game_over);
        let before = state.clone();
        assert_eq!(state.start_hand(&mut rng), Err(GameError::NotEnoughPlayers));
        assert_eq!(state, before);
    } else {
        assert!(!state.game_over);
    }
}

#[test]
fn zero_stack_seat_is_not_dealt_in() {
    let mut state = TableState::with_stacks(&[0, 1_000, 1_000], TableRules::default()).unwrap();
    state.start_hand(&mut Xorshift32::new(5)).unwrap();
    assert!(!state.seats[0].in_hand);
    assert!(state.seats[0].hole.is_empty());
    assert_eq!(state.button_index, Some(1));
    // two live seats: heads-up blinds
    assert_eq!(state.small_blind_index, Some(1));
    assert_eq!(state.big_blind_index, Some(2));
}

#[test]
fn table_without_two_stacks_cannot_deal() {
    let mut state = TableState::with_stacks(&[0, 1_000], TableRules::default()).unwrap();
    assert_eq!(
        state.start_hand(&mut Xorshift32::new(1)),
        Err(GameError::NotEnoughPlayers)
    );
    assert_eq!(state.hand_id, 0);
}
