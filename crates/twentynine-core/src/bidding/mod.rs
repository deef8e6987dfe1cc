pub mod auction;
pub mod decision;
pub mod rotation;

pub use auction::{Auction, AuctionError, AuctionOutcome, AuctionState, BidMode, BidResponse};
pub use decision::{
    BidPrompt, DecisionError, DecisionProvider, InputError, PromptRecord, ScriptedDecisions,
    TimeoutPolicy, TrumpPrompt, ask_until_valid, parse_trump_choice, parse_yes_no,
};
pub use rotation::next_bidder;

/// Opening bid of every auction.
pub const MIN_BID: u8 = 16;

/// Highest contract: every trick point in the deck.
pub const MAX_BID: u8 = 28;
