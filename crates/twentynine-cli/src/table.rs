use twentynine_bot::HeuristicPolicy;
use twentynine_core::bidding::{
    BidPrompt, BidResponse, DecisionError, DecisionProvider, TrumpPrompt,
};
use twentynine_core::model::suit::Suit;

use crate::config::{SeatConfig, SeatKind};
use crate::console::Console;

/// Who answers for a seat.
#[derive(Debug, Clone)]
pub enum SeatAgent {
    Human,
    Bot(HeuristicPolicy),
}

impl SeatAgent {
    pub fn from_config(seat: &SeatConfig) -> Self {
        match seat.kind {
            SeatKind::Human => SeatAgent::Human,
            SeatKind::Bot => SeatAgent::Bot(HeuristicPolicy::with_aggression(seat.bot_aggression())),
        }
    }
}

/// Routes each prompt to the agent sitting in the prompted seat. Bot answers
/// are echoed to the console so humans can follow the auction.
pub struct Table {
    console: Console,
    seats: [SeatAgent; 4],
}

impl Table {
    pub fn new(console: Console, seats: [SeatAgent; 4]) -> Self {
        Self { console, seats }
    }

    /// Builds the table from validated seat configs. Missing seats are human.
    pub fn from_config(console: Console, players: &[SeatConfig]) -> Self {
        let seats = std::array::from_fn(|idx| {
            players
                .get(idx)
                .map(SeatAgent::from_config)
                .unwrap_or(SeatAgent::Human)
        });
        Self::new(console, seats)
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }
}

impl DecisionProvider for Table {
    fn decide_bid(&mut self, prompt: &BidPrompt<'_>) -> Result<BidResponse, DecisionError> {
        match &mut self.seats[prompt.seat.index()] {
            SeatAgent::Human => self.console.decide_bid(prompt),
            SeatAgent::Bot(bot) => {
                let response = bot.decide_bid(prompt)?;
                let verdict = match response {
                    BidResponse::Accept => format!("yes ({})", prompt.stake()),
                    BidResponse::Pass => "pass".to_string(),
                };
                self.console
                    .announce(format!("{} -> {verdict}", prompt.question()))?;
                Ok(response)
            }
        }
    }

    fn choose_trump(&mut self, prompt: &TrumpPrompt<'_>) -> Result<Suit, DecisionError> {
        match &mut self.seats[prompt.seat.index()] {
            SeatAgent::Human => self.console.choose_trump(prompt),
            SeatAgent::Bot(bot) => {
                let suit = bot.choose_trump(prompt)?;
                self.console
                    .announce(format!("{} chose {} as trump", prompt.bidder, suit.label()))?;
                Ok(suit)
            }
        }
    }
}
