use std::fmt;

use serde::Serialize;

use crate::deck::Card;
use crate::strategy::Action;

const BLACKJACK: u8 = 21;
const ACE_BONUS: u8 = 10;

/// Which participant a hand belongs to. Players are referenced by their
/// index at the table; the hand never owns its participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Seat {
    Player(usize),
    Dealer,
}

/// One hand of cards. The card list is the source of truth; the soft, pair
/// and bust flags are re-derived from it after every change.
#[derive(Clone, Debug)]
pub struct Hand {
    seat: Seat,
    cards: Vec<Card>,
    soft: bool,
    pair: bool,
    bust: bool,
    closed: bool,
    last_decision: Option<Action>,
}

impl Hand {
    pub fn new(seat: Seat) -> Self {
        Hand {
            seat,
            cards: Vec::new(),
            soft: false,
            pair: false,
            bust: false,
            closed: false,
            last_decision: None,
        }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.refresh();
    }

    // Cards are only ever appended or truncated, so "contains an Ace" is the
    // same as "an Ace was added at some point" and soft never flips back.
    fn refresh(&mut self) {
        self.soft = self.cards.iter().any(Card::is_ace);
        self.pair = self.cards.len() == 2 && self.cards[0].value() == self.cards[1].value();
        self.bust = self.value() > BLACKJACK;
    }

    /// Sum of base card values, every Ace counted as 1.
    pub fn hard_total(&self) -> u8 {
        self.cards.iter().map(Card::value).sum()
    }

    /// Best total: one Ace is promoted to 11 when the hand is soft and the
    /// promotion does not bust it.
    pub fn value(&self) -> u8 {
        let total = self.hard_total();
        if self.soft && total + ACE_BONUS <= BLACKJACK {
            total + ACE_BONUS
        } else {
            total
        }
    }

    /// True while an Ace is actually being counted as 11.
    pub fn counts_ace_high(&self) -> bool {
        self.soft && self.hard_total() + ACE_BONUS <= BLACKJACK
    }

    /// Total of the exposed cards only, any exposed Ace counted as 11.
    /// This is what a player reads off the dealer's hand.
    pub fn face_value(&self) -> u8 {
        self.cards
            .iter()
            .filter(|card| card.is_exposed())
            .map(|card| if card.is_ace() { 11 } else { card.value() })
            .sum()
    }

    /// Total with the first Ace left out; every other Ace counts 1.
    pub fn value_except_one_ace(&self) -> u8 {
        let skip = self.cards.iter().position(Card::is_ace);
        self.cards
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, card)| card.value())
            .sum()
    }

    /// Row label in the pair-splitting table, e.g. `"T, T"` or `"A, A"`.
    pub fn pair_descriptor(&self) -> String {
        self.cards
            .iter()
            .map(|card| pair_token(card.value()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Row label in the soft-totals table, e.g. `"A, 6"`.
    pub fn soft_descriptor(&self) -> String {
        format!("A, {}", self.value_except_one_ace())
    }

    /// Keeps the first card and hands back the second. Only a pair can be
    /// split; anything else is left untouched.
    pub fn split(&mut self) -> Option<Card> {
        if !self.pair {
            return None;
        }
        let second = self.cards.pop()?;
        self.refresh();
        Some(second)
    }

    /// Turns every card face up.
    pub fn reveal(&mut self) {
        for card in &mut self.cards {
            card.set_exposed(true);
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn set_last_decision(&mut self, action: Action) {
        self.last_decision = Some(action);
    }

    pub fn last_decision(&self) -> Option<Action> {
        self.last_decision
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_soft(&self) -> bool {
        self.soft
    }

    pub fn is_pair(&self) -> bool {
        self.pair
    }

    pub fn is_bust(&self) -> bool {
        self.bust
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(Card::to_string).collect();
        write!(f, "[{}] = {}", cards.join(" "), self.value())
    }
}

pub(crate) fn pair_token(value: u8) -> String {
    match value {
        1 => "A".to_string(),
        10 => "T".to_string(),
        other => other.to_string(),
    }
}

/// The hands one player holds in a round. Starts with a single hand; splits
/// only ever append.
#[derive(Clone, Debug)]
pub struct HandGroup {
    seat: Seat,
    hands: Vec<Hand>,
}

impl HandGroup {
    pub fn new(seat: Seat) -> Self {
        HandGroup {
            seat,
            hands: vec![Hand::new(seat)],
        }
    }

    /// Splits the hand at `index` and appends the new sibling holding its
    /// second card. Returns the sibling's index.
    pub fn split(&mut self, index: usize) -> Option<usize> {
        let card = self.hands.get_mut(index)?.split()?;
        let mut sibling = Hand::new(self.seat);
        sibling.add(card);
        self.hands.push(sibling);
        Some(self.hands.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn hand(&self, index: usize) -> Option<&Hand> {
        self.hands.get(index)
    }

    pub fn hand_mut(&mut self, index: usize) -> Option<&mut Hand> {
        self.hands.get_mut(index)
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn hands_mut(&mut self) -> &mut [Hand] {
        &mut self.hands
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }
}
