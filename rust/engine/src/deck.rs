use serde::{Deserialize, Serialize};

use crate::cards::{full_deck, Card};
use crate::errors::GameError;
use crate::rng::{unit_to_index, RandomSource};

/// Remaining cards of a hand, in deal order. The top of the deck is the end
/// of the vector, so drawing is a `pop`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Fresh unshuffled 52-card deck.
    pub fn standard() -> Self {
        Self { cards: full_deck() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Fisher–Yates over the current contents.
    pub fn shuffle(&mut self, rng: &mut dyn RandomSource) {
        shuffle(&mut self.cards, rng);
    }

    /// Take the top card. An empty deck means the hand was set up wrong.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn draw_n(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if n > self.cards.len() {
            return Err(GameError::EmptyDeck);
        }
        Ok((0..n).filter_map(|_| self.cards.pop()).collect())
    }

    /// Discard the top card before a street, as a live dealer does.
    pub fn burn(&mut self) -> Result<(), GameError> {
        self.draw().map(|_| ())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// In-place Fisher–Yates shuffle driven by a unit-interval source.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = unit_to_index(rng.next_f64(), i + 1);
        items.swap(i, j);
    }
}
