//! Deal command: one hand dealt by the engine, shown face up.

use crate::config::Config;
use crate::error::CliError;
use crate::ui::card_list;
use felt_engine::errors::GameError;
use felt_engine::game::TableState;
use felt_engine::rng::Xorshift32;
use felt_engine::rules::TableRules;
use std::io::Write;

/// Deal a single hand and print the button, blinds, every seat's hole cards
/// and the board the deck would run out. The same seed always prints the
/// same hand.
pub fn handle_deal_command(
    cfg: &Config,
    seed: Option<u64>,
    seats: Option<usize>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let seats = seats.unwrap_or(cfg.seats);
    let rules = TableRules {
        small_blind: cfg.small_blind,
        big_blind: cfg.big_blind,
    };
    let mut table = TableState::new(seats, cfg.starting_stack, rules)?;
    table.start_hand(&mut Xorshift32::from_u64(seed))?;

    let setup = table
        .setup_snapshot()
        .ok_or(GameError::NoActiveHand)?;
    writeln!(out, "Hand {} (seed {})", setup.hand_id, seed)?;
    writeln!(
        out,
        "Button: seat {}  Blinds: {}/{} (seats {} and {})",
        setup.button,
        table.rules.small_blind,
        table.rules.big_blind,
        setup.small_blind_seat,
        setup.big_blind_seat
    )?;
    for seat in &table.seats {
        writeln!(out, "Seat {}: {}", seat.index, card_list(&seat.hole))?;
    }

    // the board is already in the deck: burn one before each street
    let mut deck = table.deck.clone();
    let mut board = Vec::with_capacity(5);
    for n in [3, 1, 1] {
        deck.burn()?;
        board.extend(deck.draw_n(n)?);
    }
    writeln!(out, "Board: {}", card_list(&board))?;
    if let Some(first) = setup.first_to_act {
        writeln!(out, "First to act: seat {}", first)?;
    }
    Ok(())
}
