use serde::{Deserialize, Serialize};

use crate::{
    config::{
        default_dealer_name, default_num_decks, default_progress_interval,
        default_reshuffle_threshold, validate_table,
    },
    dealer::Dealer,
    deck::Shoe,
    error::SimError,
    event::{Discard, Event},
    game::Game,
    player::Player,
    report::{Narrator, Summary},
    strategy::{Strategy, StrategyInput},
};

#[derive(Debug, Deserialize)]
pub struct PlayerInput {
    pub name: String,
    pub strategy: StrategyInput,
}

/// A whole table described in one value, strategies inline. This is what
/// the browser side hands over.
#[derive(Debug, Deserialize)]
pub struct SimulationInput {
    pub rounds: u64,
    #[serde(default = "default_num_decks")]
    pub num_decks: u8,
    #[serde(default = "default_reshuffle_threshold")]
    pub reshuffle_threshold: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_dealer_name")]
    pub dealer_name: String,
    pub players: Vec<PlayerInput>,
    /// Return the narrated log along with the summary.
    #[serde(default)]
    pub include_log: bool,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub rounds: u64,
    pub summary: Summary,
    pub log: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub events: Vec<Event>,
    pub summary: Summary,
}

pub fn run(input: SimulationInput) -> Result<SimulationResult, SimError> {
    run_with_progress(input, |_current, _total| {})
}

pub fn run_with_progress<F>(input: SimulationInput, progress_cb: F) -> Result<SimulationResult, SimError>
where
    F: FnMut(u64, u64),
{
    let rounds = input.rounds;
    let include_log = input.include_log;
    let mut game = build_game(input)?;

    let log = if include_log {
        let mut narrator = Narrator::new(&game);
        game.run(rounds, &mut narrator, progress_cb)?;
        narrator.append_summary(&Summary::from_game(&game));
        Some(narrator.into_lines())
    } else {
        game.run(rounds, &mut Discard, progress_cb)?;
        None
    };

    Ok(SimulationResult {
        rounds: game.round(),
        summary: Summary::from_game(&game),
        log,
    })
}

/// Deals exactly one round and hands back everything that happened in it.
/// `rounds` in the input is ignored.
pub fn play_single_round(input: SimulationInput) -> Result<RoundResult, SimError> {
    let mut game = build_game(input)?;
    let mut events: Vec<Event> = Vec::new();
    game.play_round(&mut events)?;
    Ok(RoundResult {
        events,
        summary: Summary::from_game(&game),
    })
}

pub fn build_game(input: SimulationInput) -> Result<Game, SimError> {
    let names: Vec<&str> = input.players.iter().map(|p| p.name.as_str()).collect();
    validate_table(input.num_decks, input.reshuffle_threshold, &names)?;

    let players = input
        .players
        .into_iter()
        .enumerate()
        .map(|(index, player)| {
            Strategy::from_input(player.strategy)
                .map(|strategy| Player::new(index, player.name.as_str(), strategy))
                .map_err(|err| SimError::strategy(player.name.as_str(), err))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let dealer = Dealer::new(input.dealer_name, Shoe::new(input.num_decks, input.seed));
    Ok(Game::new(dealer, players)
        .with_reshuffle_threshold(input.reshuffle_threshold)
        .with_progress_interval(input.progress_interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn basic_tables() -> serde_json::Value {
        let columns = ["2", "3", "4", "5", "6", "7", "8", "9", "10", "A"];
        let row = |code: &str| -> serde_json::Value {
            columns.iter().map(|c| (c.to_string(), json!(code))).collect()
        };
        let hard: serde_json::Map<String, serde_json::Value> = (4..=21)
            .map(|total| (total.to_string(), row(if total >= 17 { "S" } else { "H" })))
            .collect();
        let soft: serde_json::Map<String, serde_json::Value> = (1..=9)
            .map(|rest| (format!("A,{rest}"), row(if rest >= 7 { "S" } else { "H" })))
            .collect();
        let pairs: serde_json::Map<String, serde_json::Value> =
            ["A", "2", "3", "4", "5", "6", "7", "8", "9", "T"]
                .iter()
                .map(|t| (format!("{t},{t}"), row("N")))
                .collect();
        json!({ "hard": hard, "soft": soft, "pairs": pairs })
    }

    fn input(rounds: u64, include_log: bool) -> SimulationInput {
        serde_json::from_value(json!({
            "rounds": rounds,
            "num_decks": 2,
            "seed": 7,
            "players": [
                { "name": "Steve", "strategy": basic_tables() },
                { "name": "Bill_17", "strategy": basic_tables() },
            ],
            "include_log": include_log,
        }))
        .unwrap()
    }

    #[test]
    fn test_run_tallies_balance() {
        let result = run(input(200, false)).unwrap();
        assert_eq!(result.rounds, 200);
        assert!(result.log.is_none());

        let players = &result.summary.participants[..2];
        let dealer = &result.summary.participants[2];
        let player_wins: f64 = players.iter().map(|p| p.win).sum();
        let player_losses: f64 = players.iter().map(|p| p.loss).sum();
        let player_ties: f64 = players.iter().map(|p| p.tie).sum();
        assert_eq!(dealer.win, player_losses);
        assert_eq!(dealer.loss, player_wins);
        assert_eq!(dealer.tie, player_ties);
        // No splits in these tables, so at least one scored hand per round.
        for p in players {
            assert!(p.win + p.tie + p.loss >= 200.0);
        }
    }

    #[test]
    fn test_same_seed_same_summary() {
        let a = run(input(100, false)).unwrap();
        let b = run(input(100, false)).unwrap();
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn test_log_is_included_on_request() {
        let result = run(input(3, true)).unwrap();
        let log = result.log.unwrap();
        assert!(log[0].starts_with("Game prepared with 2 decks"));
        assert!(log.iter().any(|line| line == "----- round 3 -----"));
        assert!(log.iter().any(|line| line == "results of 3 rounds played"));
    }

    #[test]
    fn test_progress_reports_interval_and_end() {
        let mut seen = Vec::new();
        let mut input = input(25, false);
        input.progress_interval = 10;
        run_with_progress(input, |done, total| seen.push((done, total))).unwrap();
        assert_eq!(seen, vec![(10, 25), (20, 25), (25, 25)]);
    }

    #[test]
    fn test_single_round_returns_events() {
        let result = play_single_round(input(999, false)).unwrap();
        assert_eq!(result.summary.rounds, 1);
        assert!(matches!(result.events.first(), Some(Event::RoundStarted { round: 1 })));
        assert!(matches!(result.events.last(), Some(Event::RoundFinished { round: 1, .. })));
        let outcomes = result
            .events
            .iter()
            .filter(|e| matches!(e, Event::Outcome { .. }))
            .count();
        assert_eq!(outcomes, 2);
    }

    #[test]
    fn test_invalid_strategy_names_player() {
        let mut input = input(1, false);
        input.players[1].strategy.hard = json!({ "16": { "10": "X" } });
        match run(input) {
            Err(SimError::Strategy { player, .. }) => assert_eq!(player, "Bill_17"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let mut input = input(1, false);
        input.players.clear();
        assert!(matches!(run(input), Err(SimError::Config(_))));
    }
}
