//! Monte-Carlo equity against random opponent holdings.

use rand::Rng;
use rand::seq::SliceRandom;

use felt_engine::cards::{Card, full_deck};
use felt_engine::hand::evaluate_hand;

/// Share of the pot `hole` wins on average against `opponents` random hands,
/// with ties counted as a fractional win. Unknown board cards are dealt at
/// random each iteration.
///
/// Returns 1.0 when there is nobody to beat and 0.0 when the inputs cannot
/// form a hand (wrong card counts, duplicate cards).
pub fn estimate_equity<R: Rng + ?Sized>(
    hole: &[Card],
    board: &[Card],
    opponents: usize,
    iterations: usize,
    rng: &mut R,
) -> f64 {
    if hole.len() != 2 || board.len() > 5 {
        return 0.0;
    }
    if opponents == 0 {
        return 1.0;
    }
    let mut stub: Vec<Card> = full_deck()
        .into_iter()
        .filter(|c| !hole.contains(c) && !board.contains(c))
        .collect();
    if stub.len() + hole.len() + board.len() != 52 {
        return 0.0;
    }
    let missing = 5 - board.len();
    let needed = missing + opponents * 2;
    if needed > stub.len() || iterations == 0 {
        return 0.0;
    }

    let mut won = 0.0;
    let mut mine = Vec::with_capacity(7);
    let mut theirs = Vec::with_capacity(7);
    for _ in 0..iterations {
        let (drawn, _) = stub.partial_shuffle(rng, needed);
        let (runout, villains) = drawn.split_at(missing);

        mine.clear();
        mine.extend_from_slice(hole);
        mine.extend_from_slice(board);
        mine.extend_from_slice(runout);
        let Ok(ours) = evaluate_hand(&mine) else {
            return 0.0;
        };

        let mut best_other = None;
        let mut tied = 0usize;
        for villain in villains.chunks_exact(2) {
            theirs.clear();
            theirs.extend_from_slice(villain);
            theirs.extend_from_slice(board);
            theirs.extend_from_slice(runout);
            let Ok(s) = evaluate_hand(&theirs) else {
                return 0.0;
            };
            if s == ours {
                tied += 1;
            }
            if best_other.is_none_or(|b| s > b) {
                best_other = Some(s);
            }
        }
        match best_other {
            Some(b) if b > ours => {}
            Some(b) if b == ours => won += 1.0 / (tied as f64 + 1.0),
            _ => won += 1.0,
        }
    }
    won / iterations as f64
}

/// Deterministic per-decision seed so a suggestion only depends on the table.
pub fn decision_seed(hand_id: u64, seat: usize) -> u64 {
    hand_id.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (seat as u64).rotate_left(32)
}
