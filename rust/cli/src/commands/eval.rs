//! Eval command: rank a hand, or estimate the equity of two hole cards.

use crate::error::CliError;
use crate::ui::card_list;
use felt_ai::equity::estimate_equity;
use felt_engine::cards::{Card, parse_cards};
use felt_engine::hand::{best_five, evaluate_hand};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io::Write;

const MAX_OPPONENTS: usize = 9;

/// Two cards: Monte-Carlo equity against `opponents` random hands on the
/// given `board`. Five to seven cards in total: the best hand they make.
pub fn handle_eval_command(
    cards: &[String],
    board: &[String],
    opponents: usize,
    iterations: usize,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let hole = parse_cards(&cards.join(" "))?;
    let board = parse_cards(&board.join(" "))?;
    if let Some(dup) = first_duplicate(&hole, &board) {
        return Err(CliError::InvalidInput(format!("card {} appears twice", dup)));
    }

    if hole.len() == 2 {
        return write_equity(&hole, &board, opponents, iterations, seed, out);
    }

    let all: Vec<Card> = hole.iter().chain(board.iter()).copied().collect();
    if !(5..=7).contains(&all.len()) {
        return Err(CliError::InvalidInput(format!(
            "expected 2 hole cards or 5 to 7 cards, got {}",
            all.len()
        )));
    }
    let (five, strength) = best_five(&all)?;
    writeln!(out, "Hand: {}", strength.category.label())?;
    writeln!(out, "Best five: {}", card_list(&five))?;
    Ok(())
}

fn write_equity(
    hole: &[Card],
    board: &[Card],
    opponents: usize,
    iterations: usize,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if !matches!(board.len(), 0 | 3 | 4 | 5) {
        return Err(CliError::InvalidInput(format!(
            "board must have 0, 3, 4 or 5 cards, got {}",
            board.len()
        )));
    }
    if !(1..=MAX_OPPONENTS).contains(&opponents) {
        return Err(CliError::InvalidInput(format!(
            "opponents must be between 1 and {}",
            MAX_OPPONENTS
        )));
    }
    if iterations == 0 {
        return Err(CliError::InvalidInput("iterations must be >= 1".into()));
    }

    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let equity = estimate_equity(hole, board, opponents, iterations, &mut rng);

    writeln!(out, "Hole: {}", card_list(hole))?;
    if !board.is_empty() {
        writeln!(out, "Board: {}", card_list(board))?;
        let all: Vec<Card> = hole.iter().chain(board.iter()).copied().collect();
        writeln!(out, "Current hand: {}", evaluate_hand(&all)?.category.label())?;
    }
    writeln!(
        out,
        "Equity vs {} opponent{}: {:.1}% ({} iterations, seed {})",
        opponents,
        if opponents == 1 { "" } else { "s" },
        equity * 100.0,
        iterations,
        seed
    )?;
    Ok(())
}

fn first_duplicate(a: &[Card], b: &[Card]) -> Option<Card> {
    let mut seen = Vec::with_capacity(a.len() + b.len());
    for &card in a.iter().chain(b) {
        if seen.contains(&card) {
            return Some(card);
        }
        seen.push(card);
    }
    None
}
