use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use twentynine_cli::config::{SeatKind, TableConfig};
use twentynine_cli::console::Console;
use twentynine_cli::logging::init_logging;
use twentynine_cli::session::{MatchEnd, Session};
use twentynine_cli::table::Table;
use twentynine_core::AppInfo;
use twentynine_core::game::match_state::MatchState;
use twentynine_core::game::serialization::MatchSnapshot;

/// Console table for the Twenty-Nine card game.
#[derive(Debug, Parser)]
#[command(
    name = "twentynine",
    author,
    version,
    about = "Deal and bid Twenty-Nine at the terminal"
)]
struct Cli {
    /// Path to a YAML table configuration. Four human seats when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the RNG seed used for every shuffle in the match.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Seconds a seat has to answer before the timeout policy applies.
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Resume from a snapshot written by a previous session.
    #[arg(long, value_name = "FILE")]
    resume: Option<PathBuf>,

    /// Write a snapshot here after every round.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Exit after validating the configuration (no match is played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => TableConfig::from_path(path)?,
        None => TableConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Some(secs) = cli.timeout_secs {
        config.decisions.timeout_secs = Some(secs);
    }

    if let Some(snapshot) = cli.snapshot {
        config.snapshot = Some(snapshot);
    }

    config.validate()?;

    let bots = config
        .players
        .iter()
        .filter(|seat| seat.kind == SeatKind::Bot)
        .count();
    println!(
        "{} {}: loaded table {} ({bots} bot seat{})",
        AppInfo::name(),
        AppInfo::version(),
        config.player_names().join(", "),
        if bots == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging)?;

    if cli.validate_only {
        println!("Validation-only mode: no match played.");
        return Ok(ExitCode::SUCCESS);
    }

    let state = match cli.resume.as_ref() {
        Some(path) => {
            let snapshot = MatchSnapshot::read_from(path)
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            println!(
                "Resuming round {} with {} dealing",
                snapshot.round_number, snapshot.dealer
            );
            MatchState::from_snapshot(&snapshot)
        }
        None => match config.seed {
            Some(seed) => MatchState::with_seed(config.player_names(), seed),
            None => MatchState::new(config.player_names()),
        },
    }
    .with_timeout_policy(config.decisions.on_timeout);

    let console = Console::stdin(config.decisions.timeout());
    let table = Table::from_config(console, &config.players);
    let mut session = Session::new(state, table, config.snapshot.clone());

    let end = session.run()?;
    match &end {
        MatchEnd::Won(team) => println!("Match over: {team} won."),
        MatchEnd::Cancelled => println!("Match cancelled."),
        MatchEnd::Aborted(err) => println!("Match aborted: {err}"),
    }

    // The logging guard must drop before exit to flush buffered lines.
    Ok(ExitCode::from(end.exit_code()))
}
