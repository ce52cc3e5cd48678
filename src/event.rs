use serde::Serialize;

use crate::decision::Decision;
use crate::deck::Card;
use crate::hand::Seat;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HandResult {
    Win,
    Loss,
    /// Player went over 21; always a loss, whatever the dealer holds.
    Bust,
    Tie,
    Surrender,
}

/// What happened during a round, in order. The game produces these and
/// never formats text itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    RoundStarted {
        round: u64,
    },
    #[serde(rename_all = "camelCase")]
    Reshuffled {
        round: u64,
        deck_count: u8,
        remaining: usize,
    },
    HandShown {
        seat: Seat,
        hand: usize,
        cards: Vec<Card>,
        value: u8,
    },
    #[serde(rename_all = "camelCase")]
    Decision {
        seat: Seat,
        hand: usize,
        dealer_visible: u8,
        decision: Decision,
    },
    #[serde(rename_all = "camelCase")]
    Split {
        seat: Seat,
        hand: usize,
        new_hand: usize,
        kept: Card,
        moved: Card,
    },
    Doubled {
        seat: Seat,
        hand: usize,
        card: Card,
        value: u8,
    },
    DealerRevealed {
        cards: Vec<Card>,
        value: u8,
    },
    DealerHit {
        card: Card,
        value: u8,
    },
    DealerBust {
        value: u8,
    },
    #[serde(rename_all = "camelCase")]
    Outcome {
        seat: Seat,
        hand: usize,
        result: HandResult,
        stake: f64,
        player_value: u8,
        dealer_value: u8,
    },
    RoundFinished {
        round: u64,
        remaining: usize,
    },
}

/// Receiver for the event stream of a run.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: Event) {}
}
