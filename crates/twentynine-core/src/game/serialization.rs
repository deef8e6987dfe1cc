use super::match_state::MatchState;
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Between-rounds state of a match, enough to resume it later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub seed: u64,
    pub round_number: u32,
    pub dealer: Seat,
    pub scores: [i32; 2],
    pub players: [String; 4],
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        MatchSnapshot {
            seed: state.seed(),
            round_number: state.round_number(),
            dealer: state.dealer(),
            scores: *state.scores().standings(),
            players: state.players().each_ref().map(|p| p.name().to_string()),
        }
    }

    pub fn restore(self) -> MatchState {
        let mut state = MatchState::with_seed_round_dealer(
            self.players,
            self.seed,
            self.round_number,
            self.dealer,
        );
        state.scores_mut().set_totals(self.scores);
        state
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn write_to(state: &MatchState, path: impl AsRef<Path>) -> io::Result<()> {
        let json = Self::to_json(state).map_err(io::Error::other)?;
        fs::write(path, json)
    }

    pub fn read_from(path: impl AsRef<Path>) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}
