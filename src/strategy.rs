use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// Column key used for a dealer Ace.
pub const DEALER_ACE: u8 = 11;

/// Raw tables as they arrive from the outside, one nested JSON object per
/// table: `{ "<row>": { "<dealer card>": "<code>" } }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyInput {
    pub hard: serde_json::Value,
    pub soft: serde_json::Value,
    pub pairs: serde_json::Value,
    #[serde(default)]
    pub surrender: serde_json::Value,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Stand,
    Hit,
    Double,
    Split,
    Surrender,
}

impl Action {
    pub fn as_code(&self) -> &'static str {
        match self {
            Action::Stand => "STAND",
            Action::Hit => "HIT",
            Action::Double => "DOUBLE",
            Action::Split => "SPLIT",
            Action::Surrender => "SURRENDER",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Cell of the hard- and soft-totals tables.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TotalCode {
    Stand,
    Hit,
    Double,
    DoubleOrStand,
}

impl TotalCode {
    pub fn from_code(code: &str) -> Option<TotalCode> {
        match code {
            "S" => Some(TotalCode::Stand),
            "H" => Some(TotalCode::Hit),
            "D" => Some(TotalCode::Double),
            "Ds" => Some(TotalCode::DoubleOrStand),
            _ => None,
        }
    }

    /// Doubling is only on offer for the first two cards; past that every
    /// double code plays as a hit.
    pub fn resolve(self, card_count: usize) -> Action {
        match self {
            TotalCode::Stand => Action::Stand,
            TotalCode::Hit => Action::Hit,
            TotalCode::Double | TotalCode::DoubleOrStand if card_count == 2 => Action::Double,
            TotalCode::Double | TotalCode::DoubleOrStand => Action::Hit,
        }
    }
}

/// Cell of the pair-splitting table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PairCode {
    Split,
    SplitIfDoubleAfter,
    NoSplit,
}

impl PairCode {
    pub fn from_code(code: &str) -> Option<PairCode> {
        match code {
            "Y" | "P" => Some(PairCode::Split),
            "Y/N" => Some(PairCode::SplitIfDoubleAfter),
            "N" => Some(PairCode::NoSplit),
            _ => None,
        }
    }

    pub fn splits(self) -> bool {
        matches!(self, PairCode::Split | PairCode::SplitIfDoubleAfter)
    }
}

/// Cell of the surrender table. Blank cells mean surrender is not offered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurrenderCode {
    Surrender,
    NoSurrender,
}

impl SurrenderCode {
    pub fn from_code(code: &str) -> Option<SurrenderCode> {
        match code {
            "SUR" => Some(SurrenderCode::Surrender),
            "NOSUR" | "N" | "" => Some(SurrenderCode::NoSurrender),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table<R, C> {
    rows: HashMap<R, HashMap<u8, C>>,
}

impl<R: Eq + Hash, C: Copy> Table<R, C> {
    pub fn get(&self, row: &R, dealer: u8) -> Option<C> {
        self.rows.get(row).and_then(|cells| cells.get(&dealer)).copied()
    }
}

/// A participant's full playing strategy. Built once and only read after.
#[derive(Debug, Clone)]
pub struct Strategy {
    hard: Table<u8, TotalCode>,
    soft: Table<u8, TotalCode>,
    pairs: Table<u8, PairCode>,
    surrender: Table<u8, SurrenderCode>,
}

impl Strategy {
    pub fn from_input(input: StrategyInput) -> Result<Self, StrategyError> {
        Ok(Strategy {
            hard: value_to_table("hard totals", input.hard, hard_row, TotalCode::from_code)?,
            soft: value_to_table("soft totals", input.soft, soft_row, TotalCode::from_code)?,
            pairs: value_to_table("pair splitting", input.pairs, pair_row, PairCode::from_code)?,
            surrender: value_to_table(
                "surrender",
                input.surrender,
                hard_row,
                SurrenderCode::from_code,
            )?,
        })
    }

    pub fn hard(&self, total: u8, dealer: u8) -> Option<TotalCode> {
        self.hard.get(&total, dealer)
    }

    /// `remainder` is the hand total without its first Ace.
    pub fn soft(&self, remainder: u8, dealer: u8) -> Option<TotalCode> {
        self.soft.get(&remainder, dealer)
    }

    /// `token` is the value of either card of the pair: 1 for Aces, 10 for
    /// any ten-valued card.
    pub fn pair(&self, token: u8, dealer: u8) -> Option<PairCode> {
        self.pairs.get(&token, dealer)
    }

    pub fn surrender(&self, total: u8, dealer: u8) -> Option<SurrenderCode> {
        self.surrender.get(&total, dealer)
    }
}

fn hard_row(key: &str) -> Option<u8> {
    key.parse::<u8>().ok().filter(|total| (2..=31).contains(total))
}

fn soft_row(key: &str) -> Option<u8> {
    key.strip_prefix("A,")?.parse::<u8>().ok()
}

fn pair_row(key: &str) -> Option<u8> {
    let (first, second) = key.split_once(',')?;
    let token = pair_token_value(first)?;
    (token == pair_token_value(second)?).then_some(token)
}

fn pair_token_value(token: &str) -> Option<u8> {
    match token {
        "A" => Some(1),
        "T" | "10" | "J" | "Q" | "K" => Some(10),
        _ => token.parse::<u8>().ok().filter(|value| (2..=9).contains(value)),
    }
}

fn dealer_column(key: &str) -> Option<u8> {
    match key.trim() {
        "A" | "11" => Some(DEALER_ACE),
        other => other.parse::<u8>().ok().filter(|value| (2..=10).contains(value)),
    }
}

fn normalize_row(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

fn value_to_table<R, C>(
    table: &'static str,
    value: serde_json::Value,
    parse_row: fn(&str) -> Option<R>,
    parse_code: fn(&str) -> Option<C>,
) -> Result<Table<R, C>, StrategyError>
where
    R: Eq + Hash,
{
    let mut rows = HashMap::new();
    if value.is_null() {
        return Ok(Table { rows });
    }
    let obj = value.as_object().ok_or(StrategyError::NotATable { table })?;
    for (row_key, row_value) in obj {
        let row = parse_row(&normalize_row(row_key)).ok_or_else(|| StrategyError::InvalidRow {
            table,
            row: row_key.clone(),
        })?;
        let row_obj = row_value
            .as_object()
            .ok_or_else(|| StrategyError::InvalidRow {
                table,
                row: row_key.clone(),
            })?;
        let mut cells = HashMap::new();
        for (column_key, cell) in row_obj {
            let column = dealer_column(column_key).ok_or_else(|| StrategyError::InvalidColumn {
                table,
                row: row_key.clone(),
                column: column_key.clone(),
            })?;
            // Blank spreadsheet cells come through as null.
            let Some(code) = cell.as_str() else {
                if cell.is_null() {
                    continue;
                }
                return Err(StrategyError::InvalidCode {
                    table,
                    row: row_key.clone(),
                    column: column_key.clone(),
                    code: cell.to_string(),
                });
            };
            let parsed = parse_code(code.trim()).ok_or_else(|| StrategyError::InvalidCode {
                table,
                row: row_key.clone(),
                column: column_key.clone(),
                code: code.to_string(),
            })?;
            cells.insert(column, parsed);
        }
        rows.insert(row, cells);
    }
    Ok(Table { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> StrategyInput {
        StrategyInput {
            hard: json!({ "16": { "10": "H", "A": "H", "6": "S" }, "11": { "6": "D" } }),
            soft: json!({ "A, 7": { "3": "Ds", "9": "H" } }),
            pairs: json!({ "T, T": { "6": "N" }, "A,A": { "11": "Y" }, "8, 8": { "10": "Y/N" } }),
            surrender: json!({ "16": { "10": "SUR", "9": null, "8": "" } }),
        }
    }

    #[test]
    fn test_from_input_parses_all_tables() {
        let strategy = Strategy::from_input(input()).unwrap();
        assert_eq!(strategy.hard(16, 10), Some(TotalCode::Hit));
        assert_eq!(strategy.hard(16, DEALER_ACE), Some(TotalCode::Hit));
        assert_eq!(strategy.hard(16, 6), Some(TotalCode::Stand));
        assert_eq!(strategy.soft(7, 3), Some(TotalCode::DoubleOrStand));
        assert_eq!(strategy.pair(10, 6), Some(PairCode::NoSplit));
        assert_eq!(strategy.pair(1, DEALER_ACE), Some(PairCode::Split));
        assert_eq!(strategy.pair(8, 10), Some(PairCode::SplitIfDoubleAfter));
        assert_eq!(strategy.surrender(16, 10), Some(SurrenderCode::Surrender));
        assert_eq!(strategy.surrender(16, 9), None);
        assert_eq!(strategy.surrender(16, 8), Some(SurrenderCode::NoSurrender));
        assert_eq!(strategy.surrender(15, 10), None);
    }

    #[test]
    fn test_missing_surrender_table_is_empty() {
        let strategy = Strategy::from_input(StrategyInput {
            surrender: serde_json::Value::Null,
            ..input()
        })
        .unwrap();
        assert_eq!(strategy.surrender(16, 10), None);
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = Strategy::from_input(StrategyInput {
            hard: json!({ "12": { "4": "X" } }),
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, StrategyError::InvalidCode { table: "hard totals", .. }));
    }

    #[test]
    fn test_bad_column_is_rejected() {
        let err = Strategy::from_input(StrategyInput {
            soft: json!({ "A, 2": { "1": "H" } }),
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, StrategyError::InvalidColumn { .. }));
    }

    #[test]
    fn test_unequal_pair_row_is_rejected() {
        let err = Strategy::from_input(StrategyInput {
            pairs: json!({ "8, 9": { "2": "Y" } }),
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, StrategyError::InvalidRow { .. }));
    }

    #[test]
    fn test_non_object_table_is_rejected() {
        let err = Strategy::from_input(StrategyInput {
            hard: json!(["S"]),
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, StrategyError::NotATable { table: "hard totals" }));
    }

    #[test]
    fn test_double_codes_degrade_after_two_cards() {
        assert_eq!(TotalCode::Double.resolve(2), Action::Double);
        assert_eq!(TotalCode::DoubleOrStand.resolve(2), Action::Double);
        assert_eq!(TotalCode::Double.resolve(3), Action::Hit);
        assert_eq!(TotalCode::DoubleOrStand.resolve(3), Action::Hit);
        assert_eq!(TotalCode::Stand.resolve(3), Action::Stand);
        assert_eq!(TotalCode::Hit.resolve(2), Action::Hit);
    }
}
