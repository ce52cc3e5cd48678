use crate::deck::{Card, Shoe};
use crate::error::SimError;
use crate::event::{Event, EventSink};
use crate::hand::{Hand, Seat};
use crate::player::Tally;

const DEALER_STANDS_ON: u8 = 17;

/// The house: deals from its shoe and plays a single hand by fixed rules.
pub struct Dealer {
    name: String,
    shoe: Shoe,
    hand: Hand,
    pub tally: Tally,
}

impl Dealer {
    pub fn new(name: impl Into<String>, shoe: Shoe) -> Self {
        Dealer {
            name: name.into(),
            shoe,
            hand: Hand::new(Seat::Dealer),
            tally: Tally::default(),
        }
    }

    /// Deals one face-up card into `hand`. A closed hand takes nothing.
    pub fn deal_to(&mut self, hand: &mut Hand) -> Result<Option<Card>, SimError> {
        if hand.is_closed() {
            return Ok(None);
        }
        let card = self.shoe.draw(true)?;
        hand.add(card);
        Ok(Some(card))
    }

    pub fn deal_self(&mut self, exposed: bool) -> Result<Card, SimError> {
        let card = self.shoe.draw(exposed)?;
        self.hand.add(card);
        Ok(card)
    }

    /// Hits everything under 17 and a soft 17; stands on hard 17 and soft
    /// 18 or better.
    pub fn must_hit(&self) -> bool {
        let value = self.hand.value();
        if self.hand.counts_ace_high() {
            value <= DEALER_STANDS_ON
        } else {
            value < DEALER_STANDS_ON
        }
    }

    /// Turns the hole card over and draws until the house rule says stop.
    pub fn play(&mut self, sink: &mut impl EventSink) -> Result<(), SimError> {
        self.hand.reveal();
        sink.emit(Event::DealerRevealed {
            cards: self.hand.cards().to_vec(),
            value: self.hand.value(),
        });
        while self.must_hit() {
            let card = self.deal_self(true)?;
            sink.emit(Event::DealerHit {
                card,
                value: self.hand.value(),
            });
        }
        if self.hand.is_bust() {
            sink.emit(Event::DealerBust {
                value: self.hand.value(),
            });
        }
        Ok(())
    }

    /// Exposed total players read their strategy column from.
    pub fn visible_value(&self) -> u8 {
        self.hand.face_value()
    }

    pub fn needs_reshuffle(&self, threshold: usize) -> bool {
        self.shoe.remaining() <= threshold
    }

    pub fn reshuffle(&mut self) {
        self.shoe.refill();
    }

    pub fn reset_hand(&mut self) {
        self.hand = Hand::new(Seat::Dealer);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Rank, Suit};

    fn cards(ranks: &[Rank]) -> Vec<Card> {
        ranks.iter().map(|&rank| Card::new(rank, Suit::Clover)).collect()
    }

    fn dealer_holding(hand: &[Rank], shoe: &[Rank]) -> Dealer {
        let mut all = cards(hand);
        all.extend(cards(shoe));
        let mut dealer = Dealer::new("Dealer", Shoe::stacked(1, all));
        for (i, _) in hand.iter().enumerate() {
            dealer.deal_self(i > 0).unwrap();
        }
        dealer
    }

    #[test]
    fn test_soft_seventeen_draws() {
        let mut dealer = dealer_holding(&[Rank::Ace, Rank::Six], &[Rank::Two]);
        assert!(dealer.must_hit());
        let mut events: Vec<Event> = Vec::new();
        dealer.play(&mut events).unwrap();
        assert_eq!(dealer.hand().len(), 3);
        assert_eq!(dealer.hand().value(), 19);
    }

    #[test]
    fn test_hard_seventeen_stands() {
        let mut dealer = dealer_holding(&[Rank::Ten, Rank::Seven], &[Rank::Two]);
        assert!(!dealer.must_hit());
        let mut events: Vec<Event> = Vec::new();
        dealer.play(&mut events).unwrap();
        assert_eq!(dealer.hand().len(), 2);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_soft_eighteen_stands() {
        let dealer = dealer_holding(&[Rank::Ace, Rank::Seven], &[]);
        assert!(!dealer.must_hit());
    }

    #[test]
    fn test_ace_counted_low_seventeen_stands() {
        let dealer = dealer_holding(&[Rank::Ace, Rank::Six, Rank::King], &[]);
        assert_eq!(dealer.hand().value(), 17);
        assert!(!dealer.must_hit());
    }

    #[test]
    fn test_sixteen_draws_until_bust() {
        let mut dealer = dealer_holding(&[Rank::Ten, Rank::Six], &[Rank::Nine]);
        let mut events: Vec<Event> = Vec::new();
        dealer.play(&mut events).unwrap();
        assert!(dealer.hand().is_bust());
        assert!(matches!(events.last(), Some(Event::DealerBust { value: 25 })));
    }

    #[test]
    fn test_play_reveals_hole_card() {
        let mut dealer = dealer_holding(&[Rank::King, Rank::Nine], &[]);
        assert_eq!(dealer.visible_value(), 9);
        dealer.play(&mut Vec::<Event>::new()).unwrap();
        assert_eq!(dealer.visible_value(), 19);
    }

    #[test]
    fn test_visible_ace_reads_eleven() {
        let dealer = dealer_holding(&[Rank::Five, Rank::Ace], &[]);
        assert_eq!(dealer.visible_value(), 11);
    }

    #[test]
    fn test_closed_hand_takes_no_card() {
        let mut dealer = Dealer::new("Dealer", Shoe::stacked(1, cards(&[Rank::Two])));
        let mut hand = Hand::new(Seat::Player(0));
        hand.close();
        assert_eq!(dealer.deal_to(&mut hand).unwrap(), None);
        assert_eq!(dealer.shoe().remaining(), 1);
    }

    #[test]
    fn test_reshuffle_threshold() {
        let mut dealer = Dealer::new("Dealer", Shoe::stacked(1, cards(&[Rank::Two; 50])));
        assert!(dealer.needs_reshuffle(50));
        dealer.reshuffle();
        assert!(!dealer.needs_reshuffle(50));
        assert_eq!(dealer.shoe().remaining(), 52);
    }
}
