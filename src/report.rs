use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::{
    deck::Card,
    error::SimError,
    event::{Event, EventSink, HandResult},
    game::Game,
    hand::Seat,
    player::Tally,
};

/// Turns the event stream into the human-readable run log. Lines are kept
/// in memory and written out once at the end.
pub struct Narrator {
    dealer: String,
    players: Vec<String>,
    lines: Vec<String>,
}

impl Narrator {
    pub fn new(game: &Game) -> Self {
        let dealer = game.dealer().name().to_string();
        let players: Vec<String> = game.players().iter().map(|p| p.name().to_string()).collect();
        let mut narrator = Narrator {
            dealer,
            players,
            lines: Vec::new(),
        };
        narrator.line(format!(
            "Game prepared with {} decks, {} cards in the shoe",
            game.dealer().shoe().deck_count(),
            game.dealer().shoe().remaining()
        ));
        narrator.line("Participants:");
        for name in narrator.players.clone() {
            narrator.line(format!("  player {name}"));
        }
        narrator.line(format!("  dealer {}", narrator.dealer));
        narrator
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Closes the log with the end-of-run statistics.
    pub fn append_summary(&mut self, summary: &Summary) {
        let text = summary.to_string();
        self.lines.extend(text.lines().map(String::from));
    }

    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn write_to(&self, path: &Path) -> Result<(), SimError> {
        std::fs::write(path, self.text()).map_err(|source| SimError::Report {
            path: path.to_path_buf(),
            source,
        })
    }

    fn name(&self, seat: Seat) -> &str {
        match seat {
            Seat::Player(index) => self.players.get(index).map_or("?", String::as_str),
            Seat::Dealer => &self.dealer,
        }
    }

    fn render(&self, event: &Event) -> String {
        match event {
            Event::RoundStarted { round } => format!("----- round {round} -----"),
            Event::Reshuffled {
                deck_count,
                remaining,
                ..
            } => format!("shoe reshuffled: {deck_count} decks, {remaining} cards"),
            Event::HandShown {
                seat,
                hand,
                cards,
                value,
            } => format!(
                "{} hand {}: {} ({})",
                self.name(*seat),
                hand + 1,
                join_cards(cards),
                value
            ),
            Event::Decision {
                seat,
                hand,
                dealer_visible,
                decision,
            } => format!(
                "{} hand {}: {} against {} -> {}",
                self.name(*seat),
                hand + 1,
                decision.descriptor,
                dealer_visible,
                decision.action
            ),
            Event::Split {
                seat,
                hand,
                new_hand,
                kept,
                moved,
            } => format!(
                "{} splits hand {}: keeps {}, {} opens hand {}",
                self.name(*seat),
                hand + 1,
                kept,
                moved,
                new_hand + 1
            ),
            Event::Doubled {
                seat,
                hand,
                card,
                value,
            } => format!(
                "{} doubles hand {}: draws {} for {}, no more cards",
                self.name(*seat),
                hand + 1,
                card,
                value
            ),
            Event::DealerRevealed { cards, value } => {
                format!("{} shows {} ({})", self.dealer, join_cards(cards), value)
            }
            Event::DealerHit { card, value } => {
                format!("{} hits: {} ({})", self.dealer, card, value)
            }
            Event::DealerBust { value } => format!("{} busts with {}", self.dealer, value),
            Event::Outcome {
                seat,
                hand,
                result,
                stake,
                player_value,
                dealer_value,
            } => format!(
                "{} hand {}: {} x{} (P: {}, D: {})",
                self.name(*seat),
                hand + 1,
                result_label(*result),
                stake,
                player_value,
                dealer_value
            ),
            Event::RoundFinished { round, remaining } => {
                format!("round {round} finished, {remaining} cards left")
            }
        }
    }
}

impl EventSink for Narrator {
    fn emit(&mut self, event: Event) {
        let line = self.render(&event);
        self.lines.push(line);
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn result_label(result: HandResult) -> &'static str {
    match result {
        HandResult::Win => "WIN",
        HandResult::Loss => "LOSE",
        HandResult::Bust => "LOSE (bust)",
        HandResult::Tie => "TIE",
        HandResult::Surrender => "SURRENDER",
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Player,
    Dealer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub name: String,
    pub role: Role,
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
    pub net_win: f64,
    pub win_rate_excluding_ties: f64,
    pub win_rate: f64,
}

impl ParticipantSummary {
    fn new(name: &str, role: Role, tally: &Tally) -> Self {
        ParticipantSummary {
            name: name.to_string(),
            role,
            win: tally.win,
            tie: tally.tie,
            loss: tally.loss,
            net_win: tally.net(),
            win_rate_excluding_ties: tally.win_rate_excluding_ties(),
            win_rate: tally.win_rate(),
        }
    }
}

/// End-of-run statistics, one entry per player and a last one for the
/// dealer, built from each participant's own tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub rounds: u64,
    pub participants: Vec<ParticipantSummary>,
}

impl Summary {
    pub fn from_game(game: &Game) -> Self {
        let mut participants: Vec<ParticipantSummary> = game
            .players()
            .iter()
            .map(|player| ParticipantSummary::new(player.name(), Role::Player, &player.tally))
            .collect();
        participants.push(ParticipantSummary::new(
            game.dealer().name(),
            Role::Dealer,
            &game.dealer().tally,
        ));
        Summary {
            rounds: game.round(),
            participants,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "results of {} rounds played", self.rounds)?;
        for p in &self.participants {
            let role = match p.role {
                Role::Player => "player",
                Role::Dealer => "dealer",
            };
            writeln!(
                f,
                "{} {} won: {} tie: {} lose: {}",
                role, p.name, p.win, p.tie, p.loss
            )?;
            writeln!(f, "\tnet win: {}", p.net_win)?;
            writeln!(
                f,
                "\twin rate (ties excluded): {:.2}%",
                p.win_rate_excluding_ties * 100.0
            )?;
            writeln!(f, "\twin rate (ties included): {:.2}%", p.win_rate * 100.0)?;
        }
        Ok(())
    }
}
