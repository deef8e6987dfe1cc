use crate::bot::{BotDifficulty, HandStrength, bid_ceiling, strongest_suit};
use tracing::{Level, event};
use twentynine_core::bidding::{
    BidPrompt, BidResponse, DecisionError, DecisionProvider, TrumpPrompt,
};
use twentynine_core::model::suit::Suit;

/// Bids on hand strength and names its longest suit as trump.
#[derive(Debug, Clone)]
pub struct HeuristicPolicy {
    aggression: i8,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self::with_aggression(difficulty.aggression())
    }

    pub fn with_aggression(aggression: i8) -> Self {
        Self { aggression }
    }

    pub fn normal() -> Self {
        Self::new(BotDifficulty::Normal)
    }

    pub fn aggression(&self) -> i8 {
        self.aggression
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::new(BotDifficulty::from_env())
    }
}

impl DecisionProvider for HeuristicPolicy {
    fn decide_bid(&mut self, prompt: &BidPrompt<'_>) -> Result<BidResponse, DecisionError> {
        let strength = HandStrength::evaluate(prompt.hand());
        let ceiling = bid_ceiling(strength, self.aggression);
        let stake = prompt.stake();
        let response = BidResponse::from_yes(stake <= ceiling);

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "twentynine_bot::bid",
                Level::DEBUG,
                seat = %prompt.seat,
                mode = %prompt.mode,
                stake,
                ceiling,
                strength = strength.score(),
                response = ?response
            );
        }

        Ok(response)
    }

    fn choose_trump(&mut self, prompt: &TrumpPrompt<'_>) -> Result<Suit, DecisionError> {
        let suit = strongest_suit(prompt.hand());
        event!(
            target: "twentynine_bot::trump",
            Level::DEBUG,
            seat = %prompt.seat,
            bid = prompt.bid,
            trump = suit.label()
        );
        Ok(suit)
    }
}
