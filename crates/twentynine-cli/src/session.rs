use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{Level, event};
use twentynine_core::bidding::{AuctionOutcome, DecisionError};
use twentynine_core::game::match_state::MatchState;
use twentynine_core::game::serialization::MatchSnapshot;
use twentynine_core::model::player::Team;
use twentynine_core::model::round::RoundError;

use crate::table::Table;

/// How a session stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEnd {
    Won(Team),
    Cancelled,
    Aborted(DecisionError),
}

impl MatchEnd {
    /// Process status for the binary: 0 unless a round was aborted.
    pub fn exit_code(&self) -> u8 {
        match self {
            MatchEnd::Won(_) | MatchEnd::Cancelled => 0,
            MatchEnd::Aborted(_) => 2,
        }
    }
}

/// Drives rounds until a team wins or a human walks away.
pub struct Session {
    state: MatchState,
    table: Table,
    snapshot: Option<PathBuf>,
}

impl Session {
    pub fn new(state: MatchState, table: Table, snapshot: Option<PathBuf>) -> Self {
        Self {
            state,
            table,
            snapshot,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn run(&mut self) -> Result<MatchEnd> {
        loop {
            if let Some(team) = self.state.winner() {
                return self.announce_winner(team);
            }

            let summary = match self.state.play_next_round(&mut self.table) {
                Ok(summary) => summary,
                Err(RoundError::Decision(DecisionError::Cancelled)) => {
                    event!(
                        target: "twentynine::session",
                        Level::INFO,
                        round = self.state.round_number(),
                        "match cancelled"
                    );
                    return Ok(MatchEnd::Cancelled);
                }
                Err(RoundError::Decision(err)) => {
                    event!(
                        target: "twentynine::session",
                        Level::WARN,
                        round = self.state.round_number(),
                        error = %err,
                        "round aborted"
                    );
                    return Ok(MatchEnd::Aborted(err));
                }
                Err(err) => return Err(err).context("round failed"),
            };

            let console = self.table.console_mut();
            match summary.outcome {
                AuctionOutcome::NoWinner => {
                    console.announce("Trump not set in this round. Deal again.")?;
                }
                AuctionOutcome::Won { seat, bid } => {
                    for player in self.state.players() {
                        console.announce(format!("{player} - {}", player.hand()))?;
                    }
                    if let Some(trump) = summary.trump {
                        console.announce(format!("Trump: {trump} ({})", trump.label()))?;
                    }

                    let team = seat.team();
                    let question = format!("Did {team} make their bid of {bid}? [Y/N]...");
                    let made = match console.confirm(&question) {
                        Ok(made) => made,
                        Err(DecisionError::Cancelled) => return Ok(MatchEnd::Cancelled),
                        Err(err) => return Err(err).context("reading round result"),
                    };
                    self.state.record_result(&summary, made);
                }
            }

            let [east_west, north_south] = *self.state.scores().standings();
            self.table.console_mut().announce(format!(
                "Score: {} {east_west}, {} {north_south}",
                Team::EastWest,
                Team::NorthSouth
            ))?;
            self.write_snapshot()?;
        }
    }

    fn announce_winner(&mut self, team: Team) -> Result<MatchEnd> {
        let names = team
            .seats()
            .map(|seat| self.state.player(seat).name().to_string())
            .join(" and ");
        event!(
            target: "twentynine::session",
            Level::INFO,
            team = %team,
            rounds = self.state.round_number(),
            "match won"
        );
        self.table
            .console_mut()
            .announce(format!("{names} win the game!"))?;
        Ok(MatchEnd::Won(team))
    }

    fn write_snapshot(&self) -> Result<()> {
        let Some(path) = self.snapshot.as_ref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating snapshot directory {}", dir.display()))?;
        }
        MatchSnapshot::write_to(&self.state, path)
            .with_context(|| format!("writing snapshot to {}", path.display()))
    }
}
