use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Club = 0,
    Heart = 1,
    Diamond = 2,
    Spade = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Heart, Suit::Diamond, Suit::Spade];

    /// Order in which suits are offered when the auction winner names trump.
    pub const TRUMP_MENU: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond];

    /// Maps a 1-based trump menu entry to its suit.
    pub const fn from_menu_choice(choice: usize) -> Option<Self> {
        match choice {
            1..=4 => Some(Self::TRUMP_MENU[choice - 1]),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Suit::Club => "\u{2663}",
            Suit::Heart => "\u{2661}",
            Suit::Diamond => "\u{2662}",
            Suit::Spade => "\u{2660}",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Suit::Club => "Club",
            Suit::Heart => "Heart",
            Suit::Diamond => "Diamond",
            Suit::Spade => "Spade",
        }
    }

    /// Human-readable menu, e.g. `1: Spade, 2: Heart, 3: Club, 4: Diamond`.
    pub fn trump_menu_text() -> String {
        Self::TRUMP_MENU
            .iter()
            .enumerate()
            .map(|(idx, suit)| format!("{}: {}", idx + 1, suit.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
