//! Reads strategy tables from disk and seats a table from a configuration.
//!
//! Each player has a directory named after them under the configured
//! strategy directory, holding one JSON file per table.

use std::path::Path;

use crate::{
    config::SimulationConfig,
    dealer::Dealer,
    deck::Shoe,
    error::{SimError, StrategyError},
    game::Game,
    player::Player,
    strategy::{Strategy, StrategyInput},
};

pub const HARD_TOTALS_FILE: &str = "hard_totals.json";
pub const SOFT_TOTALS_FILE: &str = "soft_totals.json";
pub const PAIR_SPLITTING_FILE: &str = "pair_splitting.json";
pub const SURRENDER_FILE: &str = "surrender.json";

pub fn load_strategy(strategy_dir: &Path, name: &str) -> Result<Strategy, StrategyError> {
    let dir = strategy_dir.join(name);
    let input = StrategyInput {
        hard: read_table(&dir.join(HARD_TOTALS_FILE))?,
        soft: read_table(&dir.join(SOFT_TOTALS_FILE))?,
        pairs: read_table(&dir.join(PAIR_SPLITTING_FILE))?,
        // No surrender file: surrender is never offered.
        surrender: match read_table(&dir.join(SURRENDER_FILE)) {
            Err(StrategyError::MissingFile(_)) => serde_json::Value::Null,
            other => other?,
        },
    };
    let strategy = Strategy::from_input(input)?;
    log::debug!("loaded strategy for {} from {}", name, dir.display());
    Ok(strategy)
}

fn read_table(path: &Path) -> Result<serde_json::Value, StrategyError> {
    if !path.is_file() {
        return Err(StrategyError::MissingFile(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| StrategyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StrategyError::Json {
        context: path.display().to_string(),
        source,
    })
}

/// Loads every player's strategy and seats them with a freshly shuffled
/// shoe. Fails before anything is dealt if any strategy is missing.
pub fn build_game(config: &SimulationConfig) -> Result<Game, SimError> {
    config.validate()?;
    let players = config
        .players
        .iter()
        .enumerate()
        .map(|(index, name)| {
            load_strategy(&config.strategy_dir, name)
                .map(|strategy| Player::new(index, name.as_str(), strategy))
                .map_err(|err| SimError::strategy(name.as_str(), err))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let shoe = Shoe::new(config.num_decks, config.seed);
    let dealer = Dealer::new(config.dealer_name.as_str(), shoe);
    Ok(Game::new(dealer, players)
        .with_reshuffle_threshold(config.reshuffle_threshold)
        .with_progress_interval(config.progress_interval))
}
