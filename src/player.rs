use std::ops::AddAssign;

use serde::Serialize;

use crate::hand::{HandGroup, Seat};
use crate::strategy::Strategy;

/// Running win/tie/loss counts. Real numbers, since a surrender scores half.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Tally {
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
}

impl Tally {
    pub fn total(&self) -> f64 {
        self.win + self.tie + self.loss
    }

    pub fn net(&self) -> f64 {
        self.win - self.loss
    }

    /// Share of decided hands that were won, ties left out.
    pub fn win_rate_excluding_ties(&self) -> f64 {
        ratio(self.win, self.win + self.loss)
    }

    pub fn win_rate(&self) -> f64 {
        ratio(self.win, self.total())
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.win += other.win;
        self.tie += other.tie;
        self.loss += other.loss;
    }
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole
    } else {
        0.0
    }
}

pub struct Player {
    name: String,
    seat: Seat,
    strategy: Strategy,
    hands: HandGroup,
    pub tally: Tally,
}

impl Player {
    pub fn new(index: usize, name: impl Into<String>, strategy: Strategy) -> Self {
        let seat = Seat::Player(index);
        Player {
            name: name.into(),
            seat,
            strategy,
            hands: HandGroup::new(seat),
            tally: Tally::default(),
        }
    }

    /// Fresh single empty hand for the next round.
    pub fn reset_hands(&mut self) {
        self.hands = HandGroup::new(self.seat);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn hands(&self) -> &HandGroup {
        &self.hands
    }

    pub fn hands_mut(&mut self) -> &mut HandGroup {
        &mut self.hands
    }
}
