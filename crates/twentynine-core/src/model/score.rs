use crate::model::player::Team;

/// Points needed (or lost by the opponents) to take the game.
pub const WINNING_SCORE: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [i32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn set_totals(&mut self, totals: [i32; 2]) {
        self.totals = totals;
    }

    pub fn score(&self, team: Team) -> i32 {
        self.totals[team.index()]
    }

    pub fn standings(&self) -> &[i32; 2] {
        &self.totals
    }

    /// Applies a settled contract: the bidding team gains a point when it
    /// makes its bid and loses one otherwise.
    pub fn apply_contract(&mut self, bidding_team: Team, made: bool) {
        let delta = if made { 1 } else { -1 };
        self.totals[bidding_team.index()] += delta;
    }

    pub fn winner(&self) -> Option<Team> {
        let [east_west, north_south] = self.totals;
        if east_west == WINNING_SCORE || north_south == -WINNING_SCORE {
            Some(Team::EastWest)
        } else if east_west == -WINNING_SCORE || north_south == WINNING_SCORE {
            Some(Team::NorthSouth)
        } else {
            None
        }
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ScoreBoard;
    use crate::model::player::Team;

    #[test]
    fn made_contract_adds_a_point() {
        let mut board = ScoreBoard::new();
        board.apply_contract(Team::NorthSouth, true);
        assert_eq!(board.score(Team::NorthSouth), 1);
        assert_eq!(board.score(Team::EastWest), 0);
    }

    #[test]
    fn failed_contract_subtracts_a_point() {
        let mut board = ScoreBoard::new();
        board.apply_contract(Team::EastWest, false);
        assert_eq!(board.standings(), &[-1, 0]);
    }

    #[test]
    fn no_winner_before_six() {
        let mut board = ScoreBoard::new();
        board.set_totals([5, -5]);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn east_west_win_on_plus_six_or_opponents_minus_six() {
        let mut board = ScoreBoard::new();
        board.set_totals([6, 0]);
        assert_eq!(board.winner(), Some(Team::EastWest));
        board.set_totals([0, -6]);
        assert_eq!(board.winner(), Some(Team::EastWest));
    }

    #[test]
    fn north_south_win_on_plus_six_or_opponents_minus_six() {
        let mut board = ScoreBoard::new();
        board.set_totals([-6, 0]);
        assert_eq!(board.winner(), Some(Team::NorthSouth));
        board.set_totals([2, 6]);
        assert_eq!(board.winner(), Some(Team::NorthSouth));
    }
}
