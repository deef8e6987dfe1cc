use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use twentynine_core::bidding::{
    BidPrompt, BidResponse, DecisionError, DecisionProvider, InputError, TrumpPrompt,
    ask_until_valid, parse_trump_choice, parse_yes_no,
};
use twentynine_core::model::player::Seat;
use twentynine_core::model::suit::Suit;

/// Lines typed at the terminal, read on a dedicated thread so a decision can
/// time out without blocking on stdin.
///
/// The reader only reads a line when asked, so answers pair up with requests
/// in order. A request that timed out is still owed a line; that late answer
/// is discarded instead of being handed to the next question.
struct LineSource {
    requests: Sender<()>,
    lines: Receiver<io::Result<String>>,
    timeout: Option<Duration>,
    abandoned: usize,
}

impl LineSource {
    fn spawn<R>(reader: R, timeout: Option<Duration>) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<()>();
        let (line_tx, line_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut lines = reader.lines();
            while request_rx.recv().is_ok() {
                let Some(line) = lines.next() else {
                    break;
                };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self {
            requests: request_tx,
            lines: line_rx,
            timeout,
            abandoned: 0,
        }
    }

    fn next_line(&mut self, seat: Option<Seat>) -> Result<String, DecisionError> {
        self.requests
            .send(())
            .map_err(|_| DecisionError::Cancelled)?;
        let deadline = match (self.timeout, seat) {
            (Some(limit), Some(seat)) => Some((Instant::now() + limit, seat)),
            _ => None,
        };

        let line = loop {
            let received = match deadline {
                Some((at, seat)) => {
                    let left = at.saturating_duration_since(Instant::now());
                    match self.lines.recv_timeout(left) {
                        Ok(received) => received,
                        Err(RecvTimeoutError::Timeout) => {
                            self.abandoned += 1;
                            return Err(DecisionError::TimedOut { seat });
                        }
                        Err(RecvTimeoutError::Disconnected) => {
                            return Err(DecisionError::Cancelled);
                        }
                    }
                }
                None => self.lines.recv().map_err(|_| DecisionError::Cancelled)?,
            };

            if self.abandoned > 0 {
                self.abandoned -= 1;
                continue;
            }
            break received.map_err(|err| DecisionError::Io(err.to_string()))?;
        };

        if matches!(line.trim(), "q" | "Q" | "quit") {
            return Err(DecisionError::Cancelled);
        }
        Ok(line)
    }
}

/// Human seats answering at the terminal.
pub struct Console {
    input: LineSource,
    out: Box<dyn Write + Send>,
}

impl Console {
    pub fn stdin(timeout: Option<Duration>) -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout(), timeout)
    }

    pub fn new<R, W>(reader: R, writer: W, timeout: Option<Duration>) -> Self
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        Self {
            input: LineSource::spawn(reader, timeout),
            out: Box::new(writer),
        }
    }

    pub fn announce(&mut self, message: impl AsRef<str>) -> Result<(), DecisionError> {
        writeln!(self.out, "{}", message.as_ref()).map_err(io_error)
    }

    /// Operator question outside the auction; never times out.
    pub fn confirm(&mut self, question: &str) -> Result<bool, DecisionError> {
        let Self { input, out } = self;
        ask_until_valid(
            |rejection| {
                ask(out, rejection, question)?;
                input.next_line(None)
            },
            parse_yes_no,
        )
    }

    fn ask_seat<T, P>(&mut self, seat: Seat, question: &str, parse: P) -> Result<T, DecisionError>
    where
        P: Fn(&str) -> Result<T, InputError>,
    {
        let Self { input, out } = self;
        ask_until_valid(
            |rejection| {
                ask(out, rejection, question)?;
                input.next_line(Some(seat))
            },
            parse,
        )
    }
}

fn ask(
    out: &mut Box<dyn Write + Send>,
    rejection: Option<&InputError>,
    question: &str,
) -> Result<(), DecisionError> {
    if let Some(err) = rejection {
        writeln!(out, "{err}").map_err(io_error)?;
    }
    write!(out, "{question} ").map_err(io_error)?;
    out.flush().map_err(io_error)
}

fn io_error(err: io::Error) -> DecisionError {
    DecisionError::Io(err.to_string())
}

impl DecisionProvider for Console {
    fn decide_bid(&mut self, prompt: &BidPrompt<'_>) -> Result<BidResponse, DecisionError> {
        self.announce(format!("{}'s cards: {}", prompt.bidder, prompt.hand()))?;
        self.ask_seat(prompt.seat, &prompt.question(), parse_yes_no)
            .map(BidResponse::from_yes)
    }

    fn choose_trump(&mut self, prompt: &TrumpPrompt<'_>) -> Result<Suit, DecisionError> {
        self.announce(format!("{}'s cards: {}", prompt.bidder, prompt.hand()))?;
        self.ask_seat(prompt.seat, &prompt.question(), parse_trump_choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use twentynine_core::bidding::BidMode;
    use twentynine_core::model::player::Player;

    fn console(script: &str, timeout: Option<Duration>) -> Console {
        Console::new(Cursor::new(script.to_string()), io::sink(), timeout)
    }

    fn prompt(bidder: &Player) -> BidPrompt<'_> {
        BidPrompt {
            seat: Seat::West,
            bidder,
            mode: BidMode::Bid,
            current_bid: None,
            min_bid: 16,
            last_bidder: None,
        }
    }

    #[test]
    fn reads_yes_after_rejecting_noise() {
        let bidder = Player::new("W");
        let mut console = console("maybe\nY\n", None);
        assert_eq!(console.decide_bid(&prompt(&bidder)), Ok(BidResponse::Accept));
    }

    #[test]
    fn trump_menu_reprompts_until_valid() {
        let bidder = Player::new("W");
        let mut console = console("0\nfive\n3\n", None);
        let trump = TrumpPrompt {
            seat: Seat::West,
            bidder: &bidder,
            bid: 17,
        };
        assert_eq!(console.choose_trump(&trump), Ok(Suit::Club));
    }

    #[test]
    fn end_of_input_cancels() {
        let bidder = Player::new("W");
        let mut console = console("", None);
        assert_eq!(
            console.decide_bid(&prompt(&bidder)),
            Err(DecisionError::Cancelled)
        );
    }

    #[test]
    fn quit_cancels() {
        let mut console = console("quit\n", None);
        assert_eq!(console.confirm("Continue?"), Err(DecisionError::Cancelled));
    }

    #[cfg(unix)]
    #[test]
    fn silent_seat_times_out() {
        // The reader stays open without ever producing a line.
        let (reader, _writer) = std::os::unix::net::UnixStream::pair().unwrap();
        let bidder = Player::new("W");
        let mut console = Console::new(
            io::BufReader::new(reader),
            io::sink(),
            Some(Duration::from_millis(20)),
        );
        assert_eq!(
            console.decide_bid(&prompt(&bidder)),
            Err(DecisionError::TimedOut { seat: Seat::West })
        );
    }

    #[cfg(unix)]
    #[test]
    fn late_answer_is_not_given_to_the_next_seat() {
        let (reader, mut writer) = std::os::unix::net::UnixStream::pair().unwrap();
        let west = Player::new("W");
        let south = Player::new("S");
        let mut console = Console::new(
            io::BufReader::new(reader),
            io::sink(),
            Some(Duration::from_millis(50)),
        );
        assert_eq!(
            console.decide_bid(&prompt(&west)),
            Err(DecisionError::TimedOut { seat: Seat::West })
        );

        // West answers too late; South then says nothing.
        writer.write_all(b"y\n").unwrap();
        let south_prompt = BidPrompt {
            seat: Seat::South,
            bidder: &south,
            ..prompt(&south)
        };
        assert_eq!(
            console.decide_bid(&south_prompt),
            Err(DecisionError::TimedOut { seat: Seat::South })
        );
    }
}
