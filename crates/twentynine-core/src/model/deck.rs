use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

pub const DECK_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck exhausted: requested {requested} cards with {remaining} remaining")]
    Exhausted { requested: usize, remaining: usize },
}

/// Ordered stack of cards; the top of the deck is the end of the vector.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Pops `count` cards off the top, in the order they come off.
    pub fn draw(&mut self, count: usize) -> Result<Vec<Card>, DeckError> {
        if count > self.cards.len() {
            return Err(DeckError::Exhausted {
                requested: count,
                remaining: self.cards.len(),
            });
        }
        let split = self.cards.len() - count;
        let mut drawn = self.cards.split_off(split);
        drawn.reverse();
        Ok(drawn)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{DECK_SIZE, Deck, DeckError};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_32_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<_> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn standard_deck_carries_28_points() {
        let total: u32 = Deck::standard()
            .cards()
            .iter()
            .map(|c| c.points() as u32)
            .sum();
        assert_eq!(total, 28);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn draw_pops_from_the_top() {
        let mut deck = Deck::from_cards(vec![
            Card::new(Rank::Seven, Suit::Club),
            Card::new(Rank::Eight, Suit::Club),
            Card::new(Rank::Nine, Suit::Club),
        ]);
        let drawn = deck.draw(2).unwrap();
        assert_eq!(
            drawn,
            vec![
                Card::new(Rank::Nine, Suit::Club),
                Card::new(Rank::Eight, Suit::Club),
            ]
        );
        assert_eq!(deck.cards(), &[Card::new(Rank::Seven, Suit::Club)]);
    }

    #[test]
    fn draw_past_the_bottom_fails() {
        let mut deck = Deck::standard();
        deck.draw(30).unwrap();
        assert_eq!(
            deck.draw(4),
            Err(DeckError::Exhausted {
                requested: 4,
                remaining: 2
            })
        );
        assert_eq!(deck.len(), 2);
    }
}
