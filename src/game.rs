use crate::{
    dealer::Dealer,
    decision::decide,
    error::SimError,
    event::{Event, EventSink, HandResult},
    hand::Hand,
    player::{Player, Tally},
    strategy::Action,
};

/// Reshuffle once the shoe is down to this many cards.
pub const DEFAULT_RESHUFFLE_THRESHOLD: usize = 50;

/// One table: a dealer and the players seated at it, playing round after
/// round from the dealer's shoe.
pub struct Game {
    dealer: Dealer,
    players: Vec<Player>,
    round: u64,
    reshuffle_threshold: usize,
    progress_interval: u64,
}

impl Game {
    pub fn new(dealer: Dealer, players: Vec<Player>) -> Self {
        Game {
            dealer,
            players,
            round: 0,
            reshuffle_threshold: DEFAULT_RESHUFFLE_THRESHOLD,
            progress_interval: 1_000,
        }
    }

    pub fn with_reshuffle_threshold(mut self, threshold: usize) -> Self {
        self.reshuffle_threshold = threshold;
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Plays `rounds` rounds back to back. `progress_cb(done, total)` fires
    /// every `progress_interval` rounds and after the last one.
    pub fn run<S, F>(&mut self, rounds: u64, sink: &mut S, mut progress_cb: F) -> Result<(), SimError>
    where
        S: EventSink,
        F: FnMut(u64, u64),
    {
        log::info!(
            "simulating {} rounds with {} players, {} decks",
            rounds,
            self.players.len(),
            self.dealer.shoe().deck_count()
        );
        for completed in 1..=rounds {
            self.play_round(sink)?;
            if completed % self.progress_interval == 0 || completed == rounds {
                progress_cb(completed, rounds);
            }
        }
        log::info!("simulation finished after {} rounds", self.round);
        Ok(())
    }

    pub fn play_round(&mut self, sink: &mut impl EventSink) -> Result<(), SimError> {
        // Only ever between rounds, never in the middle of one.
        if self.dealer.needs_reshuffle(self.reshuffle_threshold) {
            self.dealer.reshuffle();
            log::info!(
                "reshuffled before round {}: {} cards",
                self.round + 1,
                self.dealer.shoe().remaining()
            );
            sink.emit(Event::Reshuffled {
                round: self.round + 1,
                deck_count: self.dealer.shoe().deck_count(),
                remaining: self.dealer.shoe().remaining(),
            });
        }

        self.round += 1;
        sink.emit(Event::RoundStarted { round: self.round });

        self.deal_initial()?;
        for index in 0..self.players.len() {
            self.play_player(index, sink)?;
        }
        self.dealer.play(sink)?;
        self.settle(sink);

        for player in &mut self.players {
            player.reset_hands();
        }
        self.dealer.reset_hand();

        let remaining = self.dealer.shoe().remaining();
        log::debug!("round {} finished, {} cards left", self.round, remaining);
        sink.emit(Event::RoundFinished {
            round: self.round,
            remaining,
        });
        Ok(())
    }

    /// Two passes round the table, one card per hand per pass, the dealer
    /// last each time. The dealer's first card stays face down.
    fn deal_initial(&mut self) -> Result<(), SimError> {
        for pass in 0..2 {
            for player in &mut self.players {
                for hand in player.hands_mut().hands_mut() {
                    self.dealer.deal_to(hand)?;
                }
            }
            self.dealer.deal_self(pass == 1)?;
        }
        Ok(())
    }

    fn play_player(&mut self, index: usize, sink: &mut impl EventSink) -> Result<(), SimError> {
        let Game {
            dealer, players, ..
        } = self;
        let player = &mut players[index];
        let dealer_visible = dealer.visible_value();

        // Splits append hands while we walk the group.
        let mut hand_index = 0;
        while hand_index < player.hands().len() {
            play_hand(dealer, player, hand_index, dealer_visible, sink)?;
            hand_index += 1;
        }
        Ok(())
    }

    fn settle(&mut self, sink: &mut impl EventSink) {
        let dealer_hand = self.dealer.hand();
        let dealer_value = dealer_hand.value();
        let mut dealer_tally = Tally::default();

        for player in &mut self.players {
            let seat = player.seat();
            let mut player_tally = Tally::default();
            for (hand_index, hand) in player.hands().hands().iter().enumerate() {
                let (result, stake) = resolve(hand, dealer_hand);
                score(result, stake, &mut player_tally, &mut dealer_tally);
                sink.emit(Event::Outcome {
                    seat,
                    hand: hand_index,
                    result,
                    stake,
                    player_value: hand.value(),
                    dealer_value,
                });
            }
            player.tally += player_tally;
        }
        self.dealer.tally += dealer_tally;
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn dealer(&self) -> &Dealer {
        &self.dealer
    }
}

/// Runs one hand to completion: deal a second card to a split-off hand,
/// then ask the strategy until it stands, surrenders, busts or doubles.
fn play_hand(
    dealer: &mut Dealer,
    player: &mut Player,
    hand_index: usize,
    dealer_visible: u8,
    sink: &mut impl EventSink,
) -> Result<(), SimError> {
    let seat = player.seat();

    if player.hands().hands()[hand_index].len() == 1 {
        dealer.deal_to(&mut player.hands_mut().hands_mut()[hand_index])?;
    }
    show_hand(&player.hands().hands()[hand_index], hand_index, sink);

    loop {
        let hand = &player.hands().hands()[hand_index];
        if hand.is_bust() || hand.is_closed() {
            break;
        }
        let decision = decide(hand, dealer_visible, player.strategy())
            .map_err(|err| SimError::strategy(player.name(), err))?;
        log::trace!(
            "{} hand {}: {} vs {} -> {}",
            player.name(),
            hand_index,
            decision.descriptor,
            dealer_visible,
            decision.action
        );
        let action = decision.action;
        player.hands_mut().hands_mut()[hand_index].set_last_decision(action);
        sink.emit(Event::Decision {
            seat,
            hand: hand_index,
            dealer_visible,
            decision,
        });

        match action {
            Action::Stand | Action::Surrender => break,
            Action::Hit => {
                let hand = &mut player.hands_mut().hands_mut()[hand_index];
                dealer.deal_to(hand)?;
                show_hand(hand, hand_index, sink);
            }
            Action::Double => {
                let hand = &mut player.hands_mut().hands_mut()[hand_index];
                if let Some(card) = dealer.deal_to(hand)? {
                    sink.emit(Event::Doubled {
                        seat,
                        hand: hand_index,
                        card,
                        value: hand.value(),
                    });
                }
                hand.close();
                break;
            }
            Action::Split => {
                let group = player.hands_mut();
                let moved = group.hands()[hand_index].cards()[1];
                if let Some(new_hand) = group.split(hand_index) {
                    sink.emit(Event::Split {
                        seat,
                        hand: hand_index,
                        new_hand,
                        kept: group.hands()[hand_index].cards()[0],
                        moved,
                    });
                }
                let hand = &mut group.hands_mut()[hand_index];
                dealer.deal_to(hand)?;
                show_hand(hand, hand_index, sink);
            }
        }
    }
    Ok(())
}

fn show_hand(hand: &Hand, hand_index: usize, sink: &mut impl EventSink) {
    sink.emit(Event::HandShown {
        seat: hand.seat(),
        hand: hand_index,
        cards: hand.cards().to_vec(),
        value: hand.value(),
    });
}

/// Scores a finished player hand against the dealer's final hand.
/// Returns the result and how many units it is worth.
pub fn resolve(hand: &Hand, dealer: &Hand) -> (HandResult, f64) {
    if hand.last_decision() == Some(Action::Surrender) {
        return (HandResult::Surrender, 0.5);
    }
    let stake = if hand.last_decision() == Some(Action::Double) {
        2.0
    } else {
        1.0
    };
    // Player bust is checked first: it loses even if the dealer busts too.
    if hand.is_bust() {
        return (HandResult::Bust, stake);
    }
    if dealer.is_bust() {
        return (HandResult::Win, stake);
    }
    match hand.value().cmp(&dealer.value()) {
        std::cmp::Ordering::Greater => (HandResult::Win, stake),
        std::cmp::Ordering::Less => (HandResult::Loss, stake),
        // A push returns the stake; it counts once even on a double.
        std::cmp::Ordering::Equal => (HandResult::Tie, 1.0),
    }
}

fn score(result: HandResult, stake: f64, player: &mut Tally, dealer: &mut Tally) {
    match result {
        HandResult::Win => {
            player.win += stake;
            dealer.loss += stake;
        }
        HandResult::Loss | HandResult::Bust | HandResult::Surrender => {
            player.loss += stake;
            dealer.win += stake;
        }
        HandResult::Tie => {
            player.tie += stake;
            dealer.tie += stake;
        }
    }
}
