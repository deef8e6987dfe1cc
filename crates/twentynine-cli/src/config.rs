use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;
use twentynine_bot::BotDifficulty;
use twentynine_core::bidding::TimeoutPolicy;
use twentynine_core::game::match_state::DEFAULT_NAMES;

const SEATS: usize = 4;
const AGGRESSION_RANGE: std::ops::RangeInclusive<i8> = -5..=5;
const DEFAULT_LOG_FILE: &str = "twentynine.log.jsonl";

/// Root table configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableConfig {
    #[serde(default = "default_players")]
    pub players: Vec<SeatConfig>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub decisions: DecisionConfig,
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            seed: None,
            decisions: DecisionConfig::default(),
            snapshot: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl TableConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: TableConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_players(&self.players)?;
        self.decisions.validate()?;
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown tracing level '{}'", self.logging.tracing_level),
            });
        }
        Ok(())
    }

    /// Seat names in seat order. Only meaningful after `validate`.
    pub fn player_names(&self) -> [String; SEATS] {
        std::array::from_fn(|idx| {
            self.players
                .get(idx)
                .map(|seat| seat.name.clone())
                .unwrap_or_else(|| DEFAULT_NAMES[idx].to_string())
        })
    }
}

fn default_players() -> Vec<SeatConfig> {
    DEFAULT_NAMES
        .iter()
        .map(|name| SeatConfig {
            name: name.to_string(),
            kind: SeatKind::Human,
            difficulty: None,
            aggression: None,
        })
        .collect()
}

/// One seat at the table, in seat order East, North, West, South.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SeatConfig {
    pub name: String,
    #[serde(default)]
    pub kind: SeatKind,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub aggression: Option<i8>,
}

impl SeatConfig {
    /// Bot aggression: explicit value first, then the difficulty preset.
    pub fn bot_aggression(&self) -> i8 {
        self.aggression.unwrap_or_else(|| {
            self.difficulty
                .as_deref()
                .and_then(BotDifficulty::parse)
                .unwrap_or_else(BotDifficulty::from_env)
                .aggression()
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    #[default]
    Human,
    Bot,
}

/// Decision timeout block. No timeout waits forever.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DecisionConfig {
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub on_timeout: TimeoutPolicy,
}

impl DecisionConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidField {
                field: "decisions.timeout_secs".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Logging configuration; structured output goes to a JSON lines file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

fn validate_players(players: &[SeatConfig]) -> Result<(), ValidationError> {
    if players.len() != SEATS {
        return Err(ValidationError::InvalidField {
            field: "players".to_string(),
            message: format!("exactly {SEATS} players required, found {}", players.len()),
        });
    }

    let mut seen = HashSet::new();
    for (idx, seat) in players.iter().enumerate() {
        if seat.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("players[{idx}].name"),
                message: "player name must not be empty".to_string(),
            });
        }

        if !seen.insert(seat.name.trim().to_string()) {
            return Err(ValidationError::InvalidField {
                field: "players".to_string(),
                message: format!("player name '{}' defined more than once", seat.name),
            });
        }

        if let Some(aggression) = seat.aggression {
            if !AGGRESSION_RANGE.contains(&aggression) {
                return Err(ValidationError::InvalidField {
                    field: format!("players[{idx}].aggression"),
                    message: format!(
                        "aggression must be between {} and {}",
                        AGGRESSION_RANGE.start(),
                        AGGRESSION_RANGE.end()
                    ),
                });
            }
        }

        if let Some(difficulty) = seat.difficulty.as_deref() {
            if BotDifficulty::parse(difficulty).is_none() {
                return Err(ValidationError::InvalidField {
                    field: format!("players[{idx}].difficulty"),
                    message: format!("unknown difficulty '{difficulty}'"),
                });
            }
        }
    }

    Ok(())
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
