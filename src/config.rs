use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::deck::CARDS_PER_DECK;
use crate::error::SimError;
use crate::game::DEFAULT_RESHUFFLE_THRESHOLD;

pub const CONFIG_FILE: &str = "blackjack.json";
pub const CONFIG_ENV: &str = "BLACKJACK_CONFIG";

pub(crate) fn default_num_decks() -> u8 {
    8
}

pub(crate) fn default_reshuffle_threshold() -> usize {
    DEFAULT_RESHUFFLE_THRESHOLD
}

pub(crate) fn default_dealer_name() -> String {
    "Dealer".to_string()
}

fn default_players() -> Vec<String> {
    ["Steve", "Bill_14", "Bill_15", "Bill_16", "Bill_17"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_strategy_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("blackjack_log.txt")
}

pub(crate) fn default_progress_interval() -> u64 {
    1_000
}

/// Everything about a run except the number of rounds, which is asked for
/// interactively.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default = "default_num_decks")]
    pub num_decks: u8,
    #[serde(default = "default_reshuffle_threshold")]
    pub reshuffle_threshold: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_dealer_name")]
    pub dealer_name: String,
    #[serde(default = "default_players")]
    pub players: Vec<String>,
    /// Holds one sub-directory of strategy tables per player name.
    #[serde(default = "default_strategy_dir")]
    pub strategy_dir: PathBuf,
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_decks: default_num_decks(),
            reshuffle_threshold: default_reshuffle_threshold(),
            seed: None,
            dealer_name: default_dealer_name(),
            players: default_players(),
            strategy_dir: default_strategy_dir(),
            report_path: default_report_path(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl SimulationConfig {
    /// Reads the file named by `BLACKJACK_CONFIG`, else `blackjack.json` in
    /// the working directory if there is one, else the defaults.
    pub fn load() -> Result<Self, SimError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE)),
            None => {
                log::debug!("no {CONFIG_FILE} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| SimError::Config(format!("cannot read {}: {err}", path.display())))?;
        let config = Self::from_json(&text)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let config: SimulationConfig =
            serde_json::from_str(text).map_err(|err| SimError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        validate_table(self.num_decks, self.reshuffle_threshold, &self.players)
    }
}

/// Checks the shape of a table before anything is dealt: at least one deck
/// and one player, unique names, and a threshold the shoe can get above.
pub fn validate_table<S: AsRef<str>>(
    num_decks: u8,
    reshuffle_threshold: usize,
    players: &[S],
) -> Result<(), SimError> {
    if num_decks == 0 {
        return Err(SimError::Config("num_decks must be at least 1".to_string()));
    }
    if players.is_empty() {
        return Err(SimError::Config("at least one player is required".to_string()));
    }
    let mut seen = HashSet::new();
    for name in players.iter().map(AsRef::as_ref) {
        if !seen.insert(name) {
            return Err(SimError::Config(format!("duplicate player name {name:?}")));
        }
    }
    let capacity = num_decks as usize * CARDS_PER_DECK;
    if reshuffle_threshold >= capacity {
        return Err(SimError::Config(format!(
            "reshuffle_threshold {reshuffle_threshold} must be below the shoe size {capacity}"
        )));
    }
    Ok(())
}
