//! Main pot and side pots, derived on demand from seat commitments.

use serde::{Deserialize, Serialize};

use crate::player::Seat;

/// One tier of the pot and the seats that can win it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u32,
    pub eligible: Vec<usize>,
}

/// Carve the chips committed this hand into tiers.
///
/// Tier boundaries are the distinct `total_committed` levels of seats still
/// contesting the hand. Each tier collects what every seat (folded ones
/// included) put in between the previous boundary and this one, and is
/// eligible to the live seats that reached it. The first pot returned is the
/// main pot.
pub fn compute_pots(seats: &[Seat]) -> Vec<Pot> {
    let mut levels: Vec<u32> = seats
        .iter()
        .filter(|s| s.is_live() && s.total_committed > 0)
        .map(|s| s.total_committed)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::with_capacity(levels.len());
    let mut prev = 0u32;
    for &level in &levels {
        let amount: u32 = seats
            .iter()
            .map(|s| s.total_committed.min(level) - s.total_committed.min(prev))
            .sum();
        let eligible: Vec<usize> = seats
            .iter()
            .filter(|s| s.is_live() && s.total_committed >= level)
            .map(|s| s.index)
            .collect();
        if amount > 0 {
            pots.push(Pot { amount, eligible });
        }
        prev = level;
    }

    // chips a folded seat put in above every live seat's level
    let overflow: u32 = seats
        .iter()
        .map(|s| s.total_committed.saturating_sub(prev))
        .sum();
    if overflow > 0 {
        match pots.last_mut() {
            Some(last) => last.amount += overflow,
            None => {
                let eligible: Vec<usize> =
                    seats.iter().filter(|s| s.is_live()).map(|s| s.index).collect();
                if !eligible.is_empty() {
                    pots.push(Pot {
                        amount: overflow,
                        eligible,
                    });
                }
            }
        }
    }

    pots
}

pub fn total(pots: &[Pot]) -> u32 {
    pots.iter().map(|p| p.amount).sum()
}

/// Split `amount` equally between `winners`. Odd chips go one at a time to
/// the winners closest to the left of the button.
pub fn split_pot(amount: u32, winners: &[usize], button: usize, seat_count: usize) -> Vec<(usize, u32)> {
    if winners.is_empty() || seat_count == 0 {
        return Vec::new();
    }
    let mut ordered = winners.to_vec();
    ordered.sort_by_key(|&seat| (seat + seat_count - button - 1) % seat_count);
    ordered.dedup();

    let n = ordered.len() as u32;
    let share = amount / n;
    let mut remainder = amount % n;
    ordered
        .into_iter()
        .map(|seat| {
            let extra = if remainder > 0 {
                remainder -= 1;
                1
            } else {
                0
            };
            (seat, share + extra)
        })
        .collect()
}
