use crate::bidding::{DecisionProvider, TimeoutPolicy};
use crate::model::deck::Deck;
use crate::model::player::{Player, Seat, Team};
use crate::model::round::{PLAYERS, Round, RoundError, RoundSummary};
use crate::model::score::ScoreBoard;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, event};

/// Default seat names, in seat order.
pub const DEFAULT_NAMES: [&str; PLAYERS] = ["E", "N", "W", "S"];

/// A full game: players, partnership score and dealer rotation.
#[derive(Debug, Clone)]
pub struct MatchState {
    players: [Player; PLAYERS],
    scores: ScoreBoard,
    dealer: Seat,
    round_number: u32,
    rng: StdRng,
    seed: u64,
    timeout_policy: TimeoutPolicy,
}

impl MatchState {
    pub fn new(names: [String; PLAYERS]) -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(names, seed)
    }

    pub fn with_seed(names: [String; PLAYERS], seed: u64) -> Self {
        Self::with_seed_round_dealer(names, seed, 1, Seat::East)
    }

    /// Rebuilds a match at `round_number`, replaying one shuffle per earlier
    /// round so the next deck matches an uninterrupted game.
    pub fn with_seed_round_dealer(
        names: [String; PLAYERS],
        seed: u64,
        round_number: u32,
        dealer: Seat,
    ) -> Self {
        let normalized_round = round_number.max(1);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 1..normalized_round {
            let _ = Deck::shuffled(&mut rng);
        }

        Self {
            players: names.map(Player::new),
            scores: ScoreBoard::new(),
            dealer,
            round_number: normalized_round,
            rng,
            seed,
            timeout_policy: TimeoutPolicy::default(),
        }
    }

    pub fn from_snapshot(snapshot: &crate::game::serialization::MatchSnapshot) -> Self {
        snapshot.clone().restore()
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn players(&self) -> &[Player; PLAYERS] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Plays one round with the current dealer, then passes the deal to the
    /// left. An aborted round leaves dealer and round number untouched.
    pub fn play_next_round<P>(&mut self, provider: &mut P) -> Result<RoundSummary, RoundError>
    where
        P: DecisionProvider + ?Sized,
    {
        event!(
            target: "twentynine::match",
            Level::INFO,
            round = self.round_number,
            dealer = %self.dealer,
            "starting round"
        );

        let summary = {
            let mut round = Round::new(&mut self.players, self.dealer.index(), &mut self.rng)?
                .with_timeout_policy(self.timeout_policy);
            round.play_round(provider)?
        };

        self.dealer = self.dealer.next();
        self.round_number += 1;
        Ok(summary)
    }

    /// Settles a round's contract on the score record. Returns the bidding
    /// team, or `None` when nobody bid.
    pub fn record_result(&mut self, summary: &RoundSummary, made: bool) -> Option<Team> {
        let Some((seat, bid)) = summary.outcome.winner() else {
            return None;
        };
        let team = seat.team();
        self.scores.apply_contract(team, made);
        event!(
            target: "twentynine::match",
            Level::INFO,
            team = %team,
            bid,
            made,
            east_west = self.scores.score(Team::EastWest),
            north_south = self.scores.score(Team::NorthSouth),
            "contract settled"
        );
        Some(team)
    }

    pub fn winner(&self) -> Option<Team> {
        self.scores.winner()
    }

    pub fn winning_players(&self) -> Option<[&Player; 2]> {
        self.winner()
            .map(|team| team.seats().map(|seat| &self.players[seat.index()]))
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_NAMES, MatchState};
    use crate::bidding::{AuctionOutcome, ScriptedDecisions};
    use crate::model::player::{Seat, Team};
    use crate::model::round::RoundSummary;
    use crate::model::suit::Suit;

    fn names() -> [String; 4] {
        DEFAULT_NAMES.map(String::from)
    }

    #[test]
    fn new_match_starts_with_east_dealing() {
        let state = MatchState::with_seed(names(), 0);
        assert_eq!(state.round_number(), 1);
        assert_eq!(state.dealer(), Seat::East);
        assert_eq!(state.scores().standings(), &[0, 0]);
        assert_eq!(state.player(Seat::West).name(), "W");
    }

    #[test]
    fn dealer_rotates_after_each_round() {
        let mut state = MatchState::with_seed(names(), 5);
        let mut provider = ScriptedDecisions::new(["n"; 8]);

        let first = state.play_next_round(&mut provider).unwrap();
        assert_eq!(first.dealer, Seat::East);
        assert_eq!(state.dealer(), Seat::North);

        let second = state.play_next_round(&mut provider).unwrap();
        assert_eq!(second.dealer, Seat::North);
        assert_eq!(state.dealer(), Seat::West);
        assert_eq!(state.round_number(), 3);
    }

    #[test]
    fn aborted_round_keeps_dealer() {
        let mut state = MatchState::with_seed(names(), 5);
        let mut provider = ScriptedDecisions::new(["n", "n"]);
        assert!(state.play_next_round(&mut provider).is_err());
        assert_eq!(state.dealer(), Seat::East);
        assert_eq!(state.round_number(), 1);
    }

    #[test]
    fn round_hands_hold_eight_cards_after_a_won_auction() {
        let mut state = MatchState::with_seed(names(), 11);
        let mut provider = ScriptedDecisions::new(["y", "n", "n", "n", "2"]);
        let summary = state.play_next_round(&mut provider).unwrap();
        assert_eq!(
            summary.outcome,
            AuctionOutcome::Won {
                seat: Seat::North,
                bid: 16
            }
        );
        assert_eq!(summary.trump, Some(Suit::Heart));
        assert!(state.players().iter().all(|p| p.hand().len() == 8));
    }

    #[test]
    fn record_result_scores_bidding_team() {
        let mut state = MatchState::with_seed(names(), 0);
        let won = RoundSummary {
            dealer: Seat::East,
            outcome: AuctionOutcome::Won {
                seat: Seat::South,
                bid: 18,
            },
            trump: Some(Suit::Club),
        };
        assert_eq!(state.record_result(&won, true), Some(Team::NorthSouth));
        assert_eq!(state.scores().score(Team::NorthSouth), 1);

        let passed = RoundSummary {
            dealer: Seat::North,
            outcome: AuctionOutcome::NoWinner,
            trump: None,
        };
        assert_eq!(state.record_result(&passed, false), None);
        assert_eq!(state.scores().standings(), &[0, 1]);
    }

    #[test]
    fn winning_players_are_partners() {
        let mut state = MatchState::with_seed(names(), 0);
        assert!(state.winning_players().is_none());
        state.scores_mut().set_totals([0, -6]);
        let winners = state.winning_players().unwrap();
        assert_eq!(winners[0].name(), "E");
        assert_eq!(winners[1].name(), "W");
        assert!(state.is_over());
    }

    #[test]
    fn replayed_round_number_reproduces_the_deck() {
        let mut provider = ScriptedDecisions::new(["n"; 4]);
        let mut uninterrupted = MatchState::with_seed(names(), 99);
        uninterrupted.play_next_round(&mut provider).unwrap();

        let mut provider = ScriptedDecisions::new(["n"; 4]);
        uninterrupted.play_next_round(&mut provider).unwrap();
        let expected: Vec<_> = uninterrupted.players().iter().map(|p| p.hand().clone()).collect();

        let mut resumed = MatchState::with_seed_round_dealer(names(), 99, 2, Seat::North);
        let mut provider = ScriptedDecisions::new(["n"; 4]);
        resumed.play_next_round(&mut provider).unwrap();
        let actual: Vec<_> = resumed.players().iter().map(|p| p.hand().clone()).collect();

        assert_eq!(expected, actual);
    }
}
