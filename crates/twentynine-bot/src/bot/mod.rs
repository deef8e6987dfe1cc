use std::cmp::Reverse;
use std::sync::OnceLock;
use twentynine_core::bidding::MAX_BID;
use twentynine_core::model::hand::Hand;
use twentynine_core::model::rank::Rank;
use twentynine_core::model::suit::Suit;

/// Highest contract in the game: every trick point in the deck.
pub const MAX_CONTRACT: u8 = MAX_BID;

/// Baseline added to a hand's strength to get the highest bid a bot accepts.
const BID_BASE: i16 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    Timid,
    #[default]
    Normal,
    Bold,
}

impl BotDifficulty {
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| match std::env::var("TWENTYNINE_BOT_DIFFICULTY") {
            Ok(raw) => Self::parse(&raw).unwrap_or_default(),
            Err(_) => BotDifficulty::default(),
        })
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "timid" | "easy" => Some(BotDifficulty::Timid),
            "normal" | "default" => Some(BotDifficulty::Normal),
            "bold" | "hard" => Some(BotDifficulty::Bold),
            _ => None,
        }
    }

    pub const fn aggression(self) -> i8 {
        match self {
            BotDifficulty::Timid => -2,
            BotDifficulty::Normal => 0,
            BotDifficulty::Bold => 2,
        }
    }
}

/// Rough value of a hand for bidding purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandStrength {
    pub points: u8,
    pub longest_suit: usize,
    pub jacks: usize,
}

impl HandStrength {
    pub fn evaluate(hand: &Hand) -> Self {
        let longest_suit = Suit::ALL
            .iter()
            .map(|suit| hand.suit_count(*suit))
            .max()
            .unwrap_or(0);
        let jacks = hand.iter().filter(|c| c.rank == Rank::Jack).count();
        Self {
            points: hand.points(),
            longest_suit,
            jacks,
        }
    }

    /// Points, plus one per card of length beyond the first in the longest
    /// suit, plus one per Jack.
    pub fn score(&self) -> i16 {
        let length_bonus = self.longest_suit.saturating_sub(1) as i16;
        self.points as i16 + length_bonus + self.jacks as i16
    }
}

/// Highest bid a bot with this hand is willing to hold.
pub fn bid_ceiling(strength: HandStrength, aggression: i8) -> u8 {
    let ceiling = BID_BASE + strength.score() + aggression as i16;
    ceiling.clamp(0, MAX_CONTRACT as i16) as u8
}

/// Longest suit, ties broken by trick points and then by trump menu order.
pub fn strongest_suit(hand: &Hand) -> Suit {
    Suit::TRUMP_MENU
        .iter()
        .copied()
        .enumerate()
        .max_by_key(|(idx, suit)| {
            (
                hand.suit_count(*suit),
                hand.suit_points(*suit),
                Reverse(*idx),
            )
        })
        .map(|(_, suit)| suit)
        .unwrap_or(Suit::Spade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twentynine_core::model::card::Card;
    use twentynine_core::model::deck::Deck;

    fn hand(cards: &[(Rank, Suit)]) -> Hand {
        Hand::with_cards(cards.iter().map(|(r, s)| Card::new(*r, *s)).collect())
    }

    #[test]
    fn strong_hand_scores_points_length_and_jacks() {
        let cards = hand(&[
            (Rank::Jack, Suit::Heart),
            (Rank::Nine, Suit::Heart),
            (Rank::Ace, Suit::Spade),
            (Rank::Queen, Suit::Club),
        ]);
        let strength = HandStrength::evaluate(&cards);
        assert_eq!(strength.points, 6);
        assert_eq!(strength.longest_suit, 2);
        assert_eq!(strength.jacks, 1);
        assert_eq!(strength.score(), 8);
        assert_eq!(bid_ceiling(strength, 0), 23);
        assert_eq!(bid_ceiling(strength, -2), 21);
    }

    #[test]
    fn blank_hand_never_reaches_opening_bid() {
        let cards = hand(&[
            (Rank::Seven, Suit::Club),
            (Rank::Eight, Suit::Diamond),
            (Rank::Queen, Suit::Spade),
            (Rank::King, Suit::Heart),
        ]);
        assert_eq!(bid_ceiling(HandStrength::evaluate(&cards), 0), 15);
    }

    #[test]
    fn ceiling_is_capped_at_max_contract() {
        let strength = HandStrength {
            points: 20,
            longest_suit: 8,
            jacks: 4,
        };
        assert_eq!(bid_ceiling(strength, 5), MAX_CONTRACT);
    }

    #[test]
    fn max_contract_is_every_point_in_the_deck() {
        let total: u32 = Deck::standard()
            .cards()
            .iter()
            .map(|c| c.points() as u32)
            .sum();
        assert_eq!(total, MAX_CONTRACT as u32);
    }

    #[test]
    fn strongest_suit_prefers_length_then_points() {
        let cards = hand(&[
            (Rank::Seven, Suit::Diamond),
            (Rank::Eight, Suit::Diamond),
            (Rank::Jack, Suit::Club),
            (Rank::Nine, Suit::Club),
        ]);
        assert_eq!(strongest_suit(&cards), Suit::Club);
    }

    #[test]
    fn strongest_suit_ties_follow_menu_order() {
        let cards = hand(&[(Rank::Seven, Suit::Diamond), (Rank::Seven, Suit::Heart)]);
        assert_eq!(strongest_suit(&cards), Suit::Heart);
        assert_eq!(strongest_suit(&Hand::new()), Suit::Spade);
    }

    #[test]
    fn difficulty_parses_aliases() {
        assert_eq!(BotDifficulty::parse("Bold"), Some(BotDifficulty::Bold));
        assert_eq!(BotDifficulty::parse("easy"), Some(BotDifficulty::Timid));
        assert_eq!(BotDifficulty::parse("wild"), None);
        assert_eq!(BotDifficulty::Normal.aggression(), 0);
    }
}
