use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Match, Outcome};

/// One selected outcome on one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub id: Uuid,

    /// Snapshot of the match at selection time
    #[serde(rename = "match")]
    pub fixture: Match,

    pub outcome: Outcome,

    /// Decimal odd at selection time
    #[serde(with = "rust_decimal::serde::str")]
    pub odd: Decimal,
}

impl Pick {
    pub fn new(fixture: Match, outcome: Outcome, odd: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            fixture,
            outcome,
            odd,
        }
    }
}

/// Final result of a slip, filled in by a settlement process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementResult {
    Won,
    Lost,
    Void,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub result: SettlementResult,
    pub settled_at: DateTime<Utc>,
}

/// A confirmed accumulator wager
///
/// `total_odd` and `potential_win` are frozen when the slip is placed. Amounts
/// are stored as decimal strings so a reloaded slip carries the exact figures
/// it was placed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slip {
    pub id: Uuid,

    /// Legs in the order they were picked
    pub picks: Vec<Pick>,

    #[serde(with = "rust_decimal::serde::str")]
    pub stake: Decimal,

    /// Product of all pick odds
    #[serde(with = "rust_decimal::serde::str")]
    pub total_odd: Decimal,

    /// stake * total_odd
    #[serde(with = "rust_decimal::serde::str")]
    pub potential_win: Decimal,

    #[serde(rename = "date")]
    pub placed_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<Settlement>,
}

impl Slip {
    /// Freeze picks and stake into a slip; `None` if the payout does not fit a `Decimal`
    pub fn place(picks: Vec<Pick>, stake: Decimal, placed_at: DateTime<Utc>) -> Option<Self> {
        let total_odd = accumulator_odd(&picks)?;
        let potential_win = stake.checked_mul(total_odd)?;

        Some(Self {
            id: Uuid::new_v4(),
            picks,
            stake,
            total_odd,
            potential_win,
            placed_at,
            settlement: None,
        })
    }

    /// Break-even win probability encoded by the total odd
    pub fn implied_probability(&self) -> Decimal {
        if self.total_odd.is_zero() {
            return Decimal::ZERO;
        }
        Decimal::ONE / self.total_odd
    }

    /// potential_win * implied_probability - stake
    pub fn expected_value(&self) -> Decimal {
        self.potential_win
            .checked_mul(self.implied_probability())
            .and_then(|v| v.checked_sub(self.stake))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.settlement.is_some()
    }
}

/// Product of the picks' odds, 1 for no picks; `None` on overflow
pub fn accumulator_odd(picks: &[Pick]) -> Option<Decimal> {
    picks
        .iter()
        .try_fold(Decimal::ONE, |acc, p| acc.checked_mul(p.odd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OddsSet;
    use rust_decimal_macros::dec;

    fn fixture(home: &str, away: &str) -> Match {
        Match {
            id: Uuid::new_v4(),
            home: home.to_string(),
            away: away.to_string(),
            kickoff: "20:00".to_string(),
            odds: OddsSet::three_way(dec!(1.80), dec!(3.50), dec!(3.20)),
        }
    }

    #[test]
    fn test_place_freezes_payout() {
        let picks = vec![
            Pick::new(fixture("Ajax", "PSV"), Outcome::Home, dec!(1.80)),
            Pick::new(fixture("Roma", "Lazio"), Outcome::Away, dec!(3.20)),
        ];

        let slip = Slip::place(picks, dec!(50), Utc::now()).unwrap();

        assert_eq!(slip.total_odd, dec!(5.76));
        assert_eq!(slip.potential_win, dec!(288.00));
        assert!(!slip.is_settled());
    }

    #[test]
    fn test_derived_fields() {
        let picks = vec![Pick::new(fixture("Ajax", "PSV"), Outcome::Home, dec!(2.00))];
        let slip = Slip::place(picks, dec!(10), Utc::now()).unwrap();

        assert_eq!(slip.implied_probability(), dec!(0.5));
        assert_eq!(slip.expected_value(), Decimal::ZERO);
    }

    #[test]
    fn test_accumulator_odd_empty_is_one() {
        assert_eq!(accumulator_odd(&[]), Some(Decimal::ONE));
    }

    #[test]
    fn test_place_refuses_overflowing_payout() {
        let huge = vec![
            Pick::new(fixture("Ajax", "PSV"), Outcome::Home, dec!(100000000000000000)),
            Pick::new(fixture("Roma", "Lazio"), Outcome::Away, dec!(100000000000000000)),
        ];
        assert_eq!(accumulator_odd(&huge), None);
        assert!(Slip::place(huge, dec!(1), Utc::now()).is_none());

        // Product fits, stake times product does not
        let big = vec![Pick::new(fixture("Ajax", "PSV"), Outcome::Home, dec!(10000000000000000000000))];
        assert!(Slip::place(big, dec!(1000000000), Utc::now()).is_none());
    }

    #[test]
    fn test_long_accumulator_survives_json_exactly() {
        let odds = [
            dec!(1.23),
            dec!(1.37),
            dec!(2.11),
            dec!(3.47),
            dec!(1.99),
            dec!(2.33),
            dec!(4.51),
            dec!(1.87),
        ];
        let picks = odds
            .iter()
            .map(|odd| Pick::new(fixture("Ajax", "PSV"), Outcome::Home, *odd))
            .collect();
        let slip = Slip::place(picks, dec!(10.37), Utc::now()).unwrap();

        let json = serde_json::to_string(&slip).unwrap();
        let back: Slip = serde_json::from_str(&json).unwrap();

        assert_eq!(back, slip);
        assert_eq!(back.total_odd.to_string(), slip.total_odd.to_string());
        assert_eq!(back.potential_win.to_string(), slip.potential_win.to_string());
    }

    #[test]
    fn test_slip_json_field_names() {
        let picks = vec![Pick::new(fixture("Ajax", "PSV"), Outcome::Draw, dec!(3.50))];
        let slip = Slip::place(picks, dec!(20), Utc::now()).unwrap();

        let json = serde_json::to_value(&slip).unwrap();
        let obj = json.as_object().unwrap();

        for field in ["id", "picks", "stake", "totalOdd", "potentialWin", "date"] {
            assert!(obj.contains_key(field), "missing {}", field);
        }
        assert!(!obj.contains_key("settlement"));
        assert!(json["picks"][0].get("match").is_some());
        assert_eq!(json["potentialWin"], serde_json::json!("70.00"));
        assert_eq!(json["picks"][0]["odd"], serde_json::json!("3.50"));
    }
}
