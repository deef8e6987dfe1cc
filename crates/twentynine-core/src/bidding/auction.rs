use crate::bidding::{MAX_BID, MIN_BID};
use crate::bidding::rotation::next_bidder;
use crate::model::player::Seat;
use core::fmt;
use thiserror::Error;

/// How the active seat is being asked: to raise, or to hold the current bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidMode {
    Bid,
    Stay,
}

impl fmt::Display for BidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BidMode::Bid => f.write_str("Bid"),
            BidMode::Stay => f.write_str("Stay"),
        }
    }
}

/// Answer to the current prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidResponse {
    Accept,
    Pass,
}

impl BidResponse {
    pub const fn from_yes(yes: bool) -> Self {
        if yes {
            BidResponse::Accept
        } else {
            BidResponse::Pass
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionOutcome {
    Won { seat: Seat, bid: u8 },
    NoWinner,
}

impl AuctionOutcome {
    pub const fn winner(self) -> Option<(Seat, u8)> {
        match self {
            AuctionOutcome::Won { seat, bid } => Some((seat, bid)),
            AuctionOutcome::NoWinner => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionState {
    Awaiting { seat: Seat, mode: BidMode },
    Resolved(AuctionOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("auction already resolved")]
    AlreadyResolved,
}

/// Bid/pass/stay state for a single auction. Pure: it only moves when a
/// response is applied.
#[derive(Debug, Clone)]
pub struct Auction {
    eligible: Vec<Seat>,
    active: Seat,
    last_bidder: Option<Seat>,
    current_bid: Option<u8>,
    min_bid: u8,
    mode: BidMode,
    outcome: Option<AuctionOutcome>,
}

impl Auction {
    pub fn new(ordering: [Seat; 4]) -> Self {
        Self {
            eligible: ordering.to_vec(),
            active: ordering[0],
            last_bidder: None,
            current_bid: None,
            min_bid: MIN_BID,
            mode: BidMode::Bid,
            outcome: None,
        }
    }

    pub fn state(&self) -> AuctionState {
        match self.outcome {
            Some(outcome) => AuctionState::Resolved(outcome),
            None => AuctionState::Awaiting {
                seat: self.active,
                mode: self.mode,
            },
        }
    }

    pub fn eligible(&self) -> &[Seat] {
        &self.eligible
    }

    pub fn last_bidder(&self) -> Option<Seat> {
        self.last_bidder
    }

    pub fn current_bid(&self) -> Option<u8> {
        self.current_bid
    }

    pub fn min_bid(&self) -> u8 {
        self.min_bid
    }

    pub fn mode(&self) -> BidMode {
        self.mode
    }

    pub fn outcome(&self) -> Option<AuctionOutcome> {
        self.outcome
    }

    pub fn apply(&mut self, response: BidResponse) -> Result<AuctionState, AuctionError> {
        if self.outcome.is_some() {
            return Err(AuctionError::AlreadyResolved);
        }

        let active = self.active;
        match (response, self.mode) {
            (BidResponse::Pass, _) => {
                self.eligible.retain(|&seat| seat != active);
                self.mode = BidMode::Bid;
                let next = next_bidder(&self.eligible, self.last_bidder);
                self.hand_to(next);
            }
            (BidResponse::Accept, BidMode::Bid) => {
                // The first bid of the auction is still framed as a bid; only
                // a raise over an existing bid hands the other seat a stay.
                self.mode = if self.current_bid.is_some() {
                    BidMode::Stay
                } else {
                    BidMode::Bid
                };
                self.current_bid = Some(self.min_bid);
                self.min_bid += 1;
                self.advance_from(active);
            }
            (BidResponse::Accept, BidMode::Stay) => {
                self.mode = BidMode::Bid;
                self.advance_from(active);
            }
        }

        Ok(self.state())
    }

    fn advance_from(&mut self, bidder: Seat) {
        let next = next_bidder(&self.eligible, Some(bidder));
        self.last_bidder = Some(bidder);
        self.hand_to(next);
    }

    /// Moves the turn to `next`, or resolves when nobody is left to ask. A
    /// raise prompt above [`MAX_BID`] cannot be answered, so it resolves too.
    fn hand_to(&mut self, next: Option<Seat>) {
        let raise_impossible = self.mode == BidMode::Bid && self.min_bid > MAX_BID;
        match next {
            Some(next) if !raise_impossible => self.active = next,
            _ => self.resolve(),
        }
    }

    fn resolve(&mut self) {
        let outcome = match (self.current_bid, self.last_bidder) {
            (Some(bid), Some(seat)) => AuctionOutcome::Won { seat, bid },
            _ => AuctionOutcome::NoWinner,
        };
        self.outcome = Some(outcome);
    }
}
