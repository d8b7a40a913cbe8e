//! Deck - Ordered cards with a draw cursor

use crate::action::Card;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// A unit's deck
///
/// The cursor always stays within `0..=len`. Drawing at the end reshuffles
/// and resets the cursor instead of failing.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Arc<Card>>,
    cursor: usize,
}

impl Deck {
    pub fn new(cards: Vec<Arc<Card>>) -> Self {
        Deck { cards, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cards left before the next reshuffle
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }

    pub fn cards(&self) -> &[Arc<Card>] {
        &self.cards
    }

    /// New random permutation, cursor back to the top
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.shuffle(rng);
        self.cursor = 0;
    }

    /// Draw the next card.
    ///
    /// Returns `None` when the deck is exhausted; the deck is reshuffled so
    /// the following draw succeeds.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<Arc<Card>> {
        if self.cursor >= self.cards.len() {
            self.shuffle(rng);
            return None;
        }
        let card = self.cards[self.cursor].clone();
        self.cursor += 1;
        Some(card)
    }
}
