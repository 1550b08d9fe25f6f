use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::HighCard => "high card",
            Category::Pair => "pair",
            Category::TwoPair => "two pair",
            Category::ThreeKind => "three of a kind",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full house",
            Category::FourKind => "four of a kind",
            Category::StraightFlush => "straight flush",
        }
    }
}

/// Comparable hand value. The derived ordering compares the category first,
/// then the tie-break ranks left to right, so equal values split the pot.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    /// Tie-break ranks ordered high -> low, zero padded.
    pub kickers: [u8; 5],
}

/// Score the best five-card hand contained in `cards` (5 to 7 cards).
pub fn evaluate_hand(cards: &[Card]) -> Result<HandStrength, GameError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(GameError::InvalidCardCount(cards.len()));
    }
    Ok(score(cards))
}

pub fn evaluate_five(cards: &[Card; 5]) -> HandStrength {
    score(cards)
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    a.cmp(b)
}

/// The five cards that make the best hand, for highlighting. Walks every
/// 5-card subset (21 for seven cards) and keeps the strongest.
pub fn best_five(cards: &[Card]) -> Result<([Card; 5], HandStrength), GameError> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return Err(GameError::InvalidCardCount(n));
    }
    let mut best: Option<([Card; 5], HandStrength)> = None;
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let strength = evaluate_five(&five);
                        if best.as_ref().is_none_or(|(_, s)| strength > *s) {
                            best = Some((five, strength));
                        }
                    }
                }
            }
        }
    }
    best.ok_or(GameError::InvalidCardCount(n))
}

fn score(cards: &[Card]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..=14 used
    let mut rank_mask: u16 = 0;
    let mut suit_counts = [0u8; 4];
    let mut by_suit_mask = [0u16; 4];
    for c in cards {
        let r = c.rank.value();
        let s = c.suit.index();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        suit_counts[s] += 1;
        by_suit_mask[s] |= 1 << r;
    }

    let flush_suit = (0..4).find(|&s| suit_counts[s] >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(by_suit_mask[s]) {
            return strength(Category::StraightFlush, &[high]);
        }
    }

    // (count, rank) ordered by count then rank, both descending
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let (top_count, top_rank) = groups[0];

    if top_count == 4 {
        let kicker = highest_excluding(&groups, &[top_rank], 1);
        return strength(Category::FourKind, &[top_rank, kicker[0]]);
    }

    if top_count == 3 {
        if let Some(&(_, pair_rank)) = groups[1..].iter().find(|(count, _)| *count >= 2) {
            return strength(Category::FullHouse, &[top_rank, pair_rank]);
        }
    }

    if let Some(s) = flush_suit {
        let ranks = ranks_from_mask(by_suit_mask[s]);
        return strength(Category::Flush, &ranks[..5]);
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return strength(Category::Straight, &[high]);
    }

    if top_count == 3 {
        let kickers = highest_excluding(&groups, &[top_rank], 2);
        return strength(Category::ThreeKind, &[top_rank, kickers[0], kickers[1]]);
    }

    if top_count == 2 && groups.len() > 1 && groups[1].0 == 2 {
        let (high, low) = (groups[0].1, groups[1].1);
        let kicker = highest_excluding(&groups, &[high, low], 1);
        return strength(Category::TwoPair, &[high, low, kicker[0]]);
    }

    if top_count == 2 {
        let k = highest_excluding(&groups, &[top_rank], 3);
        return strength(Category::Pair, &[top_rank, k[0], k[1], k[2]]);
    }

    let highs: Vec<u8> = groups.iter().map(|&(_, r)| r).take(5).collect();
    strength(Category::HighCard, &highs)
}

fn strength(category: Category, ranks: &[u8]) -> HandStrength {
    let mut kickers = [0u8; 5];
    for (slot, &r) in kickers.iter_mut().zip(ranks) {
        *slot = r;
    }
    HandStrength { category, kickers }
}

/// Up to `n` distinct ranks, high first, skipping `used`.
fn highest_excluding(groups: &[(u8, u8)], used: &[u8], n: usize) -> Vec<u8> {
    let mut ranks: Vec<u8> = groups
        .iter()
        .map(|&(_, r)| r)
        .filter(|r| !used.contains(r))
        .collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    ranks.resize(n.max(ranks.len()), 0);
    ranks.truncate(n);
    ranks
}

fn ranks_from_mask(mask: u16) -> Vec<u8> {
    (2..=14u8).rev().filter(|r| mask & (1 << r) != 0).collect()
}

/// Highest card of the best straight in `mask`, with the wheel (A-2-3-4-5)
/// reported as a five-high straight.
fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    if m & (1 << 14) != 0 {
        m |= 1 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        m & window == window
    })
}
