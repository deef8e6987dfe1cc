use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("invalid twenty-nine card value: {0}")]
    InvalidRank(u8),
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Builds a card from a raw face value (1 for Ace, 7..=13 otherwise).
    pub fn from_value(suit: Suit, value: u8) -> Result<Self, CardError> {
        Rank::from_value(value)
            .map(|rank| Self::new(rank, suit))
            .ok_or(CardError::InvalidRank(value))
    }

    pub const fn points(self) -> u8 {
        self.rank.points()
    }

    pub const fn name(self) -> &'static str {
        self.rank.name()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.suit, self.rank)
    }
}
