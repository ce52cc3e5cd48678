use std::collections::VecDeque;
use std::fmt;

use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;

use crate::error::SimError;

pub const CARDS_PER_DECK: usize = 52;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spade,
    Clover,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Clover, Suit::Diamond, Suit::Heart];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spade => "♠",
            Suit::Clover => "♣",
            Suit::Diamond => "♦",
            Suit::Heart => "♥",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Base value of the rank. An Ace is always 1 here; counting it as 11 is
    /// the hand's business.
    pub fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Rank> {
        Rank::ALL
            .into_iter()
            .find(|rank| rank.symbol().eq_ignore_ascii_case(symbol.trim()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    exposed: bool,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card {
            rank,
            suit,
            exposed: false,
        }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }

    pub fn is_exposed(&self) -> bool {
        self.exposed
    }

    pub fn set_exposed(&mut self, exposed: bool) {
        self.exposed = exposed;
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

/// Multi-deck supply of cards, dealt from the front.
pub struct Shoe {
    deck_count: u8,
    cards: VecDeque<Card>,
    rng: SmallRng,
}

impl Shoe {
    pub fn new(deck_count: u8, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut shoe = Shoe {
            deck_count,
            cards: VecDeque::new(),
            rng,
        };
        shoe.refill();
        shoe
    }

    /// A shoe holding exactly `cards` in the given order, front first.
    /// Nothing is shuffled until `refill` is called.
    pub fn stacked(deck_count: u8, cards: impl IntoIterator<Item = Card>) -> Self {
        Shoe {
            deck_count,
            cards: cards.into_iter().collect(),
            rng: SmallRng::seed_from_u64(0),
        }
    }

    /// Replaces whatever is left with `deck_count` fresh decks and shuffles them.
    pub fn refill(&mut self) {
        self.cards.clear();
        for _ in 0..self.deck_count {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    self.cards.push_back(Card::new(rank, suit));
                }
            }
        }
        self.shuffle();
    }

    pub fn shuffle(&mut self) {
        self.cards.make_contiguous().shuffle(&mut self.rng);
    }

    pub fn draw(&mut self, exposed: bool) -> Result<Card, SimError> {
        let mut card = self.cards.pop_front().ok_or(SimError::EmptyShoe {
            deck_count: self.deck_count,
        })?;
        card.set_exposed(exposed);
        Ok(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn deck_count(&self) -> u8 {
        self.deck_count
    }

    pub fn capacity(&self) -> usize {
        self.deck_count as usize * CARDS_PER_DECK
    }
}
