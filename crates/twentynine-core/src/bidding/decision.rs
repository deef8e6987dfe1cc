use crate::bidding::auction::{BidMode, BidResponse};
use crate::model::hand::Hand;
use crate::model::player::{Player, Seat};
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{Level, event};

/// Everything a seat sees when asked to bid, raise or stay.
#[derive(Debug, Clone, Copy)]
pub struct BidPrompt<'a> {
    pub seat: Seat,
    pub bidder: &'a Player,
    pub mode: BidMode,
    pub current_bid: Option<u8>,
    pub min_bid: u8,
    pub last_bidder: Option<&'a Player>,
}

impl<'a> BidPrompt<'a> {
    pub fn hand(&self) -> &'a Hand {
        self.bidder.hand()
    }

    /// Amount the seat commits to by answering yes.
    pub fn stake(&self) -> u8 {
        match (self.mode, self.current_bid) {
            (BidMode::Stay, Some(bid)) => bid,
            _ => self.min_bid,
        }
    }

    pub fn question(&self) -> String {
        let bidder = self.bidder;
        match (self.current_bid, self.last_bidder) {
            (Some(bid), Some(last)) => match self.mode {
                BidMode::Stay => format!(
                    "{bidder}, {last} has put a bid for {bid}. Do you want to stay? [Y/N]..."
                ),
                BidMode::Bid => format!(
                    "{bidder}, {last} has put a bid for {bid}. Do you want to bid for {}? [Y/N]...",
                    self.min_bid
                ),
            },
            _ => format!(
                "{bidder}, Do you want to start bidding with {}? [Y/N]...",
                self.min_bid
            ),
        }
    }
}

/// Request sent to the auction winner to name trump.
#[derive(Debug, Clone, Copy)]
pub struct TrumpPrompt<'a> {
    pub seat: Seat,
    pub bidder: &'a Player,
    pub bid: u8,
}

impl<'a> TrumpPrompt<'a> {
    pub fn hand(&self) -> &'a Hand {
        self.bidder.hand()
    }

    pub fn question(&self) -> String {
        format!(
            "{}, please choose your trump color: [{}]...",
            self.bidder,
            Suit::trump_menu_text()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("decision cancelled")]
    Cancelled,
    #[error("{seat} did not answer in time")]
    TimedOut { seat: Seat },
    #[error("no scripted decisions left")]
    Exhausted,
    #[error("decision input failed: {0}")]
    Io(String),
}

/// Rejected raw answers. These never leave a provider: the provider asks again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("expected Y or N, got {0:?}")]
    MalformedDecision(String),
    #[error("please select an integer between 1 to 4, got {0:?}")]
    InvalidTrumpSelection(String),
}

/// What a round does with a bid prompt that timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    Pass,
    #[default]
    Abort,
}

/// Source of seat decisions during an auction.
pub trait DecisionProvider {
    /// Answer a bid or stay prompt for `prompt.seat`.
    fn decide_bid(&mut self, prompt: &BidPrompt<'_>) -> Result<BidResponse, DecisionError>;

    /// Name trump after winning the auction.
    fn choose_trump(&mut self, prompt: &TrumpPrompt<'_>) -> Result<Suit, DecisionError>;
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for &mut P {
    fn decide_bid(&mut self, prompt: &BidPrompt<'_>) -> Result<BidResponse, DecisionError> {
        (**self).decide_bid(prompt)
    }

    fn choose_trump(&mut self, prompt: &TrumpPrompt<'_>) -> Result<Suit, DecisionError> {
        (**self).choose_trump(prompt)
    }
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for Box<P> {
    fn decide_bid(&mut self, prompt: &BidPrompt<'_>) -> Result<BidResponse, DecisionError> {
        (**self).decide_bid(prompt)
    }

    fn choose_trump(&mut self, prompt: &TrumpPrompt<'_>) -> Result<Suit, DecisionError> {
        (**self).choose_trump(prompt)
    }
}

pub fn parse_yes_no(raw: &str) -> Result<bool, InputError> {
    match raw.trim() {
        "y" | "Y" => Ok(true),
        "n" | "N" => Ok(false),
        other => Err(InputError::MalformedDecision(other.to_string())),
    }
}

pub fn parse_trump_choice(raw: &str) -> Result<Suit, InputError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(Suit::from_menu_choice)
        .ok_or_else(|| InputError::InvalidTrumpSelection(raw.trim().to_string()))
}

/// Keeps asking until `parse` accepts an answer. `ask` receives the previous
/// rejection so it can tell the user what went wrong.
pub fn ask_until_valid<T, A, P>(mut ask: A, parse: P) -> Result<T, DecisionError>
where
    A: FnMut(Option<&InputError>) -> Result<String, DecisionError>,
    P: Fn(&str) -> Result<T, InputError>,
{
    let mut rejection: Option<InputError> = None;
    loop {
        let raw = ask(rejection.as_ref())?;
        match parse(&raw) {
            Ok(value) => return Ok(value),
            Err(err) => {
                event!(
                    target: "twentynine::input",
                    Level::WARN,
                    error = %err,
                    "rejected answer; asking again"
                );
                rejection = Some(err);
            }
        }
    }
}

/// A prompt as seen by [`ScriptedDecisions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub seat: Seat,
    pub mode: BidMode,
    pub current_bid: Option<u8>,
    pub min_bid: u8,
}

/// Replays raw answers through the same validation a console would use.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<String>,
    prompts: Vec<PromptRecord>,
}

impl ScriptedDecisions {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Bid prompts answered so far, in order.
    pub fn prompts(&self) -> &[PromptRecord] {
        &self.prompts
    }

    fn next_answer(answers: &mut VecDeque<String>) -> Result<String, DecisionError> {
        answers.pop_front().ok_or(DecisionError::Exhausted)
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn decide_bid(&mut self, prompt: &BidPrompt<'_>) -> Result<BidResponse, DecisionError> {
        self.prompts.push(PromptRecord {
            seat: prompt.seat,
            mode: prompt.mode,
            current_bid: prompt.current_bid,
            min_bid: prompt.min_bid,
        });
        let answers = &mut self.answers;
        ask_until_valid(|_| Self::next_answer(answers), parse_yes_no).map(BidResponse::from_yes)
    }

    fn choose_trump(&mut self, _prompt: &TrumpPrompt<'_>) -> Result<Suit, DecisionError> {
        let answers = &mut self.answers;
        ask_until_valid(|_| Self::next_answer(answers), parse_trump_choice)
    }
}
