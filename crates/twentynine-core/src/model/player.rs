use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Fixed table seats; East/West and North/South sit as partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::East, Seat::North, Seat::West, Seat::South];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::East),
            1 => Some(Seat::North),
            2 => Some(Seat::West),
            3 => Some(Seat::South),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Seat {
        match self {
            Seat::East => Seat::North,
            Seat::North => Seat::West,
            Seat::West => Seat::South,
            Seat::South => Seat::East,
        }
    }

    pub const fn partner(self) -> Seat {
        match self {
            Seat::East => Seat::West,
            Seat::North => Seat::South,
            Seat::West => Seat::East,
            Seat::South => Seat::North,
        }
    }

    pub const fn team(self) -> Team {
        match self {
            Seat::East | Seat::West => Team::EastWest,
            Seat::North | Seat::South => Team::NorthSouth,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::East => "East",
            Seat::North => "North",
            Seat::West => "West",
            Seat::South => "South",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Team {
    EastWest = 0,
    NorthSouth = 1,
}

impl Team {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opponent(self) -> Team {
        match self {
            Team::EastWest => Team::NorthSouth,
            Team::NorthSouth => Team::EastWest,
        }
    }

    pub const fn seats(self) -> [Seat; 2] {
        match self {
            Team::EastWest => [Seat::East, Seat::West],
            Team::NorthSouth => [Seat::North, Seat::South],
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::EastWest => f.write_str("East/West"),
            Team::NorthSouth => f.write_str("North/South"),
        }
    }
}

/// A named participant. The hand is refilled by every round's deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    hand: Hand,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Hand::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
