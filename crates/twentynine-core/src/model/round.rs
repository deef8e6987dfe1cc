use crate::bidding::{
    Auction, AuctionError, AuctionOutcome, AuctionState, BidPrompt, BidResponse, DecisionError,
    DecisionProvider, TimeoutPolicy, TrumpPrompt,
};
use crate::model::deck::{Deck, DeckError};
use crate::model::player::{Player, Seat};
use crate::model::suit::Suit;
use thiserror::Error;
use tracing::{Level, event};

pub const PLAYERS: usize = 4;
pub const CARDS_TO_DEAL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("dealer index should be in range [0, 3], got {0}")]
    InvalidDealerIndex(usize),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("round aborted: {0}")]
    Decision(#[from] DecisionError),
    #[error(transparent)]
    Auction(#[from] AuctionError),
    #[error("trump requested before the auction produced a winner")]
    NoHighestBidder,
}

/// What a finished round leaves behind for the match loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub dealer: Seat,
    pub outcome: AuctionOutcome,
    pub trump: Option<Suit>,
}

/// Turn order for a round: starts left of the dealer and ends with the dealer.
pub const fn player_ordering(dealer: Seat) -> [Seat; 4] {
    let first = dealer.next();
    let second = first.next();
    let third = second.next();
    [first, second, third, dealer]
}

/// One hand of play: a fresh deck, two deals and an auction for trump.
#[derive(Debug)]
pub struct Round<'p> {
    players: &'p mut [Player; PLAYERS],
    dealer: Seat,
    player_ordering: [Seat; 4],
    deck: Deck,
    trump: Option<Suit>,
    highest_bidder: Option<Seat>,
    highest_bid: Option<u8>,
    timeout_policy: TimeoutPolicy,
}

impl<'p> Round<'p> {
    pub fn new<R: rand::Rng + ?Sized>(
        players: &'p mut [Player; PLAYERS],
        dealer: usize,
        rng: &mut R,
    ) -> Result<Self, RoundError> {
        // Validate before touching the rng so a rejected dealer costs no shuffle.
        let dealer_seat = Seat::from_index(dealer).ok_or(RoundError::InvalidDealerIndex(dealer))?;
        Self::build(players, dealer_seat, Deck::shuffled(rng))
    }

    /// Builds a round over a prepared deck; dealing pops from its top.
    pub fn with_deck(
        players: &'p mut [Player; PLAYERS],
        dealer: usize,
        deck: Deck,
    ) -> Result<Self, RoundError> {
        let dealer_seat = Seat::from_index(dealer).ok_or(RoundError::InvalidDealerIndex(dealer))?;
        Self::build(players, dealer_seat, deck)
    }

    fn build(
        players: &'p mut [Player; PLAYERS],
        dealer: Seat,
        deck: Deck,
    ) -> Result<Self, RoundError> {
        for player in players.iter_mut() {
            player.hand_mut().clear();
        }

        Ok(Self {
            players,
            dealer,
            player_ordering: player_ordering(dealer),
            deck,
            trump: None,
            highest_bidder: None,
            highest_bid: None,
            timeout_policy: TimeoutPolicy::default(),
        })
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    pub fn players(&self) -> &[Player; PLAYERS] {
        self.players
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn player_ordering(&self) -> [Seat; 4] {
        self.player_ordering
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub fn highest_bidder(&self) -> Option<Seat> {
        self.highest_bidder
    }

    pub fn highest_bid(&self) -> Option<u8> {
        self.highest_bid
    }

    /// Gives every player `CARDS_TO_DEAL` more cards, starting left of the dealer.
    pub fn deal(&mut self) -> Result<(), RoundError> {
        event!(
            target: "twentynine::round",
            Level::DEBUG,
            dealer = %self.dealer,
            remaining = self.deck.len(),
            "dealing"
        );
        for seat in self.player_ordering {
            let cards = self.deck.draw(CARDS_TO_DEAL)?;
            self.players[seat.index()].hand_mut().extend(cards);
        }
        Ok(())
    }

    /// Runs the auction. Returns whether a bid was placed.
    pub fn bidding<P>(&mut self, provider: &mut P) -> Result<bool, RoundError>
    where
        P: DecisionProvider + ?Sized,
    {
        let mut auction = Auction::new(self.player_ordering);

        let outcome = loop {
            let (seat, mode) = match auction.state() {
                AuctionState::Resolved(outcome) => break outcome,
                AuctionState::Awaiting { seat, mode } => (seat, mode),
            };

            let prompt = BidPrompt {
                seat,
                bidder: &self.players[seat.index()],
                mode,
                current_bid: auction.current_bid(),
                min_bid: auction.min_bid(),
                last_bidder: auction.last_bidder().map(|last| &self.players[last.index()]),
            };

            let response = match provider.decide_bid(&prompt) {
                Ok(response) => response,
                Err(DecisionError::TimedOut { seat })
                    if self.timeout_policy == TimeoutPolicy::Pass =>
                {
                    event!(
                        target: "twentynine::bidding",
                        Level::WARN,
                        seat = %seat,
                        "decision timed out; treating as pass"
                    );
                    BidResponse::Pass
                }
                Err(err) => return Err(RoundError::Decision(err)),
            };

            event!(
                target: "twentynine::bidding",
                Level::INFO,
                seat = %seat,
                mode = %mode,
                stake = prompt.stake(),
                response = ?response
            );

            auction.apply(response)?;
        };

        match outcome {
            AuctionOutcome::Won { seat, bid } => {
                event!(
                    target: "twentynine::bidding",
                    Level::INFO,
                    winner = %seat,
                    bid,
                    "{} will set trump for {}",
                    self.players[seat.index()],
                    bid
                );
                self.highest_bidder = Some(seat);
                self.highest_bid = Some(bid);
                Ok(true)
            }
            AuctionOutcome::NoWinner => {
                event!(
                    target: "twentynine::bidding",
                    Level::INFO,
                    "all players passed; no one will set trump"
                );
                Ok(false)
            }
        }
    }

    /// Asks the auction winner to name trump.
    pub fn choose_trump<P>(&mut self, provider: &mut P) -> Result<Suit, RoundError>
    where
        P: DecisionProvider + ?Sized,
    {
        let (Some(seat), Some(bid)) = (self.highest_bidder, self.highest_bid) else {
            return Err(RoundError::NoHighestBidder);
        };

        let prompt = TrumpPrompt {
            seat,
            bidder: &self.players[seat.index()],
            bid,
        };
        let trump = provider.choose_trump(&prompt)?;

        event!(
            target: "twentynine::round",
            Level::INFO,
            seat = %seat,
            trump = trump.label(),
            "trump chosen"
        );
        self.trump = Some(trump);
        Ok(trump)
    }

    /// Deal, auction, and when someone won: trump and the second deal.
    pub fn play_round<P>(&mut self, provider: &mut P) -> Result<RoundSummary, RoundError>
    where
        P: DecisionProvider + ?Sized,
    {
        event!(
            target: "twentynine::round",
            Level::INFO,
            dealer = %self.dealer,
            "{} will deal the deck this round",
            self.players[self.dealer.index()]
        );
        self.deal()?;

        if !self.bidding(provider)? {
            return Ok(self.summary());
        }

        self.choose_trump(provider)?;
        self.deal()?;
        Ok(self.summary())
    }

    pub fn summary(&self) -> RoundSummary {
        let outcome = match (self.highest_bidder, self.highest_bid) {
            (Some(seat), Some(bid)) => AuctionOutcome::Won { seat, bid },
            _ => AuctionOutcome::NoWinner,
        };
        RoundSummary {
            dealer: self.dealer,
            outcome,
            trump: self.trump,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidding::ScriptedDecisions;
    use std::collections::HashSet;

    fn table() -> [Player; 4] {
        [
            Player::new("E"),
            Player::new("N"),
            Player::new("W"),
            Player::new("S"),
        ]
    }

    fn seats(indices: [usize; 4]) -> [Seat; 4] {
        indices.map(|i| Seat::from_index(i).unwrap())
    }

    #[test]
    fn round_initialization_sets_defaults() {
        let mut players = table();
        let round = Round::with_deck(&mut players, 0, Deck::shuffled_with_seed(1)).unwrap();
        assert_eq!(round.trump(), None);
        assert_eq!(round.dealer(), Seat::East);
        assert_eq!(round.player(round.dealer()).name(), "E");
        assert_eq!(round.player_ordering(), seats([1, 2, 3, 0]));
        assert_eq!(round.highest_bidder(), None);
        assert_eq!(round.highest_bid(), None);
        assert_eq!(round.deck().len(), 32);
    }

    #[test]
    fn ordering_starts_left_of_every_dealer() {
        for dealer in 0..4usize {
            let mut players = table();
            let round = Round::with_deck(&mut players, dealer, Deck::standard()).unwrap();
            let expected = seats([(dealer + 1) % 4, (dealer + 2) % 4, (dealer + 3) % 4, dealer]);
            assert_eq!(round.player_ordering(), expected, "dealer {dealer}");
            assert_eq!(round.dealer().index(), dealer);
        }
    }

    #[test]
    fn dealer_out_of_range_is_rejected() {
        let mut players = table();
        let err = Round::with_deck(&mut players, 4, Deck::standard()).unwrap_err();
        assert_eq!(err, RoundError::InvalidDealerIndex(4));
    }

    #[test]
    fn two_deals_partition_the_deck() {
        let mut players = table();
        let mut round = Round::with_deck(&mut players, 2, Deck::shuffled_with_seed(7)).unwrap();
        round.deal().unwrap();
        round.deal().unwrap();
        assert!(round.deck().is_empty());

        let mut seen = HashSet::new();
        for player in round.players() {
            assert_eq!(player.hand().len(), 8);
            for card in player.hand().iter() {
                assert!(seen.insert(*card), "{card} dealt twice");
            }
        }
        assert_eq!(seen.len(), 32);
    }

    #[test]
    fn third_deal_exhausts_the_deck() {
        let mut players = table();
        let mut round = Round::with_deck(&mut players, 0, Deck::standard()).unwrap();
        round.deal().unwrap();
        round.deal().unwrap();
        assert_eq!(
            round.deal(),
            Err(RoundError::Deck(DeckError::Exhausted {
                requested: 4,
                remaining: 0
            }))
        );
    }

    #[test]
    fn first_deal_goes_left_of_dealer_first() {
        let deck = Deck::standard();
        let top: Vec<_> = deck.cards().iter().rev().take(4).copied().collect();
        let mut players = table();
        let mut round = Round::with_deck(&mut players, 0, deck).unwrap();
        round.deal().unwrap();
        assert_eq!(round.player(Seat::North).hand().cards(), top.as_slice());
    }

    #[test]
    fn new_round_clears_previous_hands() {
        let mut players = table();
        {
            let mut round = Round::with_deck(&mut players, 0, Deck::standard()).unwrap();
            round.deal().unwrap();
        }
        let round = Round::with_deck(&mut players, 1, Deck::standard()).unwrap();
        assert!(round.players().iter().all(|p| p.hand().is_empty()));
    }

    #[test]
    fn all_pass_leaves_trump_unset() {
        let mut players = table();
        let mut round = Round::with_deck(&mut players, 0, Deck::shuffled_with_seed(3)).unwrap();
        let mut provider = ScriptedDecisions::new(["n", "n", "n", "n"]);
        let summary = round.play_round(&mut provider).unwrap();
        assert_eq!(summary.outcome, AuctionOutcome::NoWinner);
        assert_eq!(round.highest_bidder(), None);
        assert_eq!(round.highest_bid(), None);
        assert_eq!(round.trump(), None);
        assert_eq!(round.deck().len(), 16);
    }

    #[test]
    fn trump_requires_an_auction_winner() {
        let mut players = table();
        let mut round = Round::with_deck(&mut players, 0, Deck::standard()).unwrap();
        let mut provider = ScriptedDecisions::new(["1"]);
        assert_eq!(
            round.choose_trump(&mut provider),
            Err(RoundError::NoHighestBidder)
        );
    }

    #[test]
    fn timeout_counts_as_pass_when_configured() {
        struct Silent;
        impl DecisionProvider for Silent {
            fn decide_bid(&mut self, prompt: &BidPrompt<'_>) -> Result<BidResponse, DecisionError> {
                Err(DecisionError::TimedOut { seat: prompt.seat })
            }
            fn choose_trump(&mut self, prompt: &TrumpPrompt<'_>) -> Result<Suit, DecisionError> {
                Err(DecisionError::TimedOut { seat: prompt.seat })
            }
        }

        let mut players = table();
        let mut round = Round::with_deck(&mut players, 0, Deck::standard())
            .unwrap()
            .with_timeout_policy(TimeoutPolicy::Pass);
        assert_eq!(round.bidding(&mut Silent), Ok(false));

        let mut players = table();
        let mut round = Round::with_deck(&mut players, 0, Deck::standard()).unwrap();
        assert_eq!(
            round.bidding(&mut Silent),
            Err(RoundError::Decision(DecisionError::TimedOut {
                seat: Seat::North
            }))
        );
    }
}
