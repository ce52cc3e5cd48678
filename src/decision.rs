//! Picks the action for a hand from a participant's strategy tables.
//!
//! Rules are tried in order and the first one that applies wins: surrender
//! on a hard 15 or 16, then pair splitting, then the soft or hard totals.

use serde::Serialize;

use crate::error::StrategyError;
use crate::hand::Hand;
use crate::strategy::{Action, Strategy, SurrenderCode};

/// Which table produced a decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Basis {
    Surrender,
    Pair,
    Soft,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub action: Action,
    pub basis: Basis,
    /// Row the hand was looked up under, e.g. `16`, `A, 6` or `T, T`.
    pub descriptor: String,
}

/// Decides what to do with `hand` while the dealer shows `dealer_visible`
/// (exposed total, Ace as 11). Pure: the caller applies the action.
pub fn decide(
    hand: &Hand,
    dealer_visible: u8,
    strategy: &Strategy,
) -> Result<Decision, StrategyError> {
    let value = hand.value();

    // A missing surrender cell just means surrender is not offered.
    if !hand.is_soft() && matches!(value, 15 | 16) {
        if let Some(SurrenderCode::Surrender) = strategy.surrender(value, dealer_visible) {
            return Ok(Decision {
                action: Action::Surrender,
                basis: Basis::Surrender,
                descriptor: value.to_string(),
            });
        }
    }

    if hand.is_pair() {
        let token = hand.cards()[0].value();
        let code = strategy
            .pair(token, dealer_visible)
            .ok_or_else(|| StrategyError::MissingEntry {
                table: "pair splitting",
                row: hand.pair_descriptor(),
                column: dealer_visible,
            })?;
        if code.splits() {
            return Ok(Decision {
                action: Action::Split,
                basis: Basis::Pair,
                descriptor: hand.pair_descriptor(),
            });
        }
    }

    let card_count = hand.len();
    let remainder = hand.value_except_one_ace();
    if hand.is_soft() && remainder < 10 {
        let code = strategy
            .soft(remainder, dealer_visible)
            .ok_or_else(|| StrategyError::MissingEntry {
                table: "soft totals",
                row: hand.soft_descriptor(),
                column: dealer_visible,
            })?;
        return Ok(Decision {
            action: code.resolve(card_count),
            basis: Basis::Soft,
            descriptor: hand.soft_descriptor(),
        });
    }

    let code = strategy
        .hard(value, dealer_visible)
        .ok_or_else(|| StrategyError::MissingEntry {
            table: "hard totals",
            row: value.to_string(),
            column: dealer_visible,
        })?;
    Ok(Decision {
        action: code.resolve(card_count),
        basis: Basis::Hard,
        descriptor: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, Rank, Suit};
    use crate::hand::Seat;
    use crate::strategy::StrategyInput;
    use serde_json::json;

    fn hand_of(ranks: &[Rank]) -> Hand {
        let mut hand = Hand::new(Seat::Player(0));
        for &rank in ranks {
            hand.add(Card::new(rank, Suit::Diamond));
        }
        hand
    }

    fn strategy() -> Strategy {
        Strategy::from_input(StrategyInput {
            hard: json!({
                "9": { "9": "H" },
                "11": { "9": "D" },
                "15": { "10": "H" },
                "16": { "10": "H", "9": "S" },
                "17": { "10": "S" },
                "20": { "10": "S" },
                "21": { "10": "S" },
            }),
            soft: json!({
                "A, 6": { "9": "H", "3": "Ds" },
                "A, 7": { "9": "H", "3": "Ds" },
            }),
            pairs: json!({
                "8, 8": { "10": "Y", "9": "Y/N", "8": "Y" },
                "T, T": { "10": "N" },
                "A, A": { "10": "Y" },
            }),
            surrender: json!({ "16": { "10": "SUR" }, "15": { "10": "NOSUR" } }),
        })
        .unwrap()
    }

    #[test]
    fn test_hard_sixteen_surrenders_against_ten() {
        let hand = hand_of(&[Rank::Ten, Rank::Six]);
        let decision = decide(&hand, 10, &strategy()).unwrap();
        assert_eq!(decision.action, Action::Surrender);
        assert_eq!(decision.basis, Basis::Surrender);
    }

    #[test]
    fn test_surrender_miss_falls_through() {
        let hand = hand_of(&[Rank::Ten, Rank::Six]);
        let decision = decide(&hand, 9, &strategy()).unwrap();
        assert_eq!(decision.action, Action::Stand);
        assert_eq!(decision.basis, Basis::Hard);

        let fifteen = hand_of(&[Rank::Nine, Rank::Six]);
        assert_eq!(decide(&fifteen, 10, &strategy()).unwrap().action, Action::Hit);
    }

    #[test]
    fn test_soft_hand_never_checks_surrender() {
        // Ace counted low, total 16, but the hand has been soft.
        let hand = hand_of(&[Rank::Ace, Rank::Five, Rank::Ten]);
        let decision = decide(&hand, 10, &strategy()).unwrap();
        assert_eq!(decision.basis, Basis::Hard);
        assert_eq!(decision.action, Action::Hit);
    }

    #[test]
    fn test_pair_of_eights_surrenders_before_splitting() {
        // 8,8 is also a hard 16, and surrender is looked at first.
        let hand = hand_of(&[Rank::Eight, Rank::Eight]);
        let decision = decide(&hand, 10, &strategy()).unwrap();
        assert_eq!(decision.action, Action::Surrender);
        assert_eq!(decision.basis, Basis::Surrender);
    }

    #[test]
    fn test_pair_of_eights_splits() {
        let hand = hand_of(&[Rank::Eight, Rank::Eight]);
        let decision = decide(&hand, 8, &strategy()).unwrap();
        assert_eq!(decision.action, Action::Split);
        assert_eq!(decision.basis, Basis::Pair);
        assert_eq!(decision.descriptor, "8, 8");
        assert_eq!(decide(&hand, 9, &strategy()).unwrap().action, Action::Split);
    }

    #[test]
    fn test_declined_pair_uses_totals() {
        let hand = hand_of(&[Rank::King, Rank::Queen]);
        let decision = decide(&hand, 10, &strategy()).unwrap();
        assert_eq!(decision.action, Action::Stand);
        assert_eq!(decision.basis, Basis::Hard);
    }

    #[test]
    fn test_soft_seventeen_hits_against_nine() {
        let hand = hand_of(&[Rank::Ace, Rank::Six]);
        let decision = decide(&hand, 9, &strategy()).unwrap();
        assert_eq!(decision.action, Action::Hit);
        assert_eq!(decision.descriptor, "A, 6");
    }

    #[test]
    fn test_soft_double_only_on_two_cards() {
        let two = hand_of(&[Rank::Ace, Rank::Seven]);
        assert_eq!(decide(&two, 3, &strategy()).unwrap().action, Action::Double);

        let three = hand_of(&[Rank::Ace, Rank::Four, Rank::Three]);
        assert_eq!(decide(&three, 3, &strategy()).unwrap().action, Action::Hit);
    }

    #[test]
    fn test_hard_double_on_two_cards() {
        let hand = hand_of(&[Rank::Six, Rank::Five]);
        assert_eq!(decide(&hand, 9, &strategy()).unwrap().action, Action::Double);

        let three = hand_of(&[Rank::Two, Rank::Four, Rank::Five]);
        assert_eq!(decide(&three, 9, &strategy()).unwrap().action, Action::Hit);
    }

    #[test]
    fn test_soft_hand_with_big_remainder_goes_hard() {
        // A + 5 + 5: the rest is 10, so the hand reads as 21 on the hard table.
        let hand = hand_of(&[Rank::Ace, Rank::Five, Rank::Five]);
        let decision = decide(&hand, 10, &strategy()).unwrap();
        assert_eq!(decision.basis, Basis::Hard);
        assert_eq!(decision.descriptor, "21");
    }

    #[test]
    fn test_missing_hard_entry_names_the_cell() {
        let hand = hand_of(&[Rank::Two, Rank::Three]);
        let err = decide(&hand, 4, &strategy()).unwrap_err();
        match err {
            StrategyError::MissingEntry { table, row, column } => {
                assert_eq!(table, "hard totals");
                assert_eq!(row, "5");
                assert_eq!(column, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_pair_entry_is_an_error() {
        let hand = hand_of(&[Rank::Two, Rank::Two]);
        assert!(matches!(
            decide(&hand, 10, &strategy()),
            Err(StrategyError::MissingEntry { table: "pair splitting", .. })
        ));
    }
}
