use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Goal lines offered on the over/under market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GoalLine {
    #[serde(rename = "0.5")]
    Half,
    #[serde(rename = "1.5")]
    OneAndHalf,
    #[serde(rename = "2.5")]
    TwoAndHalf,
    #[serde(rename = "3.5")]
    ThreeAndHalf,
    #[serde(rename = "4.5")]
    FourAndHalf,
}

impl GoalLine {
    pub const ALL: [GoalLine; 5] = [
        GoalLine::Half,
        GoalLine::OneAndHalf,
        GoalLine::TwoAndHalf,
        GoalLine::ThreeAndHalf,
        GoalLine::FourAndHalf,
    ];

    /// Line value in goals (e.g. 2.5)
    pub fn value(&self) -> Decimal {
        match self {
            GoalLine::Half => Decimal::new(5, 1),
            GoalLine::OneAndHalf => Decimal::new(15, 1),
            GoalLine::TwoAndHalf => Decimal::new(25, 1),
            GoalLine::ThreeAndHalf => Decimal::new(35, 1),
            GoalLine::FourAndHalf => Decimal::new(45, 1),
        }
    }
}

impl fmt::Display for GoalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A selectable outcome of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
    /// Double chance 1X
    HomeOrDraw,
    /// Double chance 12
    HomeOrAway,
    /// Double chance X2
    DrawOrAway,
    Over(GoalLine),
    Under(GoalLine),
}

impl Outcome {
    /// Short label as shown on a slip (1, X, 2, 1X, O2.5, ...)
    pub fn label(&self) -> String {
        match self {
            Outcome::Home => "1".to_string(),
            Outcome::Draw => "X".to_string(),
            Outcome::Away => "2".to_string(),
            Outcome::HomeOrDraw => "1X".to_string(),
            Outcome::HomeOrAway => "12".to_string(),
            Outcome::DrawOrAway => "X2".to_string(),
            Outcome::Over(line) => format!("O{}", line),
            Outcome::Under(line) => format!("U{}", line),
        }
    }
}

/// Odds on one goal line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsLine {
    pub line: GoalLine,

    #[serde(with = "rust_decimal::serde::float")]
    pub over: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub under: Decimal,
}

/// Double chance and over/under odds shown on the match detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedOdds {
    #[serde(with = "rust_decimal::serde::float")]
    pub home_or_draw: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub home_or_away: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub draw_or_away: Decimal,

    /// One entry per goal line, ascending
    pub totals: Vec<TotalsLine>,
}

/// Decimal odds offered on a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsSet {
    #[serde(with = "rust_decimal::serde::float")]
    pub home: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub draw: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub away: Decimal,

    /// Absent on three-way-only records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<ExtendedOdds>,
}

impl OddsSet {
    /// Three-way odds without the extended markets
    pub fn three_way(home: Decimal, draw: Decimal, away: Decimal) -> Self {
        Self {
            home,
            draw,
            away,
            extended: None,
        }
    }

    /// Odd offered for an outcome, if this set carries that market
    pub fn odd_for(&self, outcome: Outcome) -> Option<Decimal> {
        match outcome {
            Outcome::Home => Some(self.home),
            Outcome::Draw => Some(self.draw),
            Outcome::Away => Some(self.away),
            Outcome::HomeOrDraw => self.extended.as_ref().map(|e| e.home_or_draw),
            Outcome::HomeOrAway => self.extended.as_ref().map(|e| e.home_or_away),
            Outcome::DrawOrAway => self.extended.as_ref().map(|e| e.draw_or_away),
            Outcome::Over(line) => self.totals_line(line).map(|t| t.over),
            Outcome::Under(line) => self.totals_line(line).map(|t| t.under),
        }
    }

    fn totals_line(&self, line: GoalLine) -> Option<&TotalsLine> {
        self.extended
            .as_ref()
            .and_then(|e| e.totals.iter().find(|t| t.line == line))
    }

    /// Every odd in the set is a valid decimal odd (> 1.0)
    pub fn is_valid(&self) -> bool {
        let one = Decimal::ONE;
        let base = self.home > one && self.draw > one && self.away > one;

        match &self.extended {
            None => base,
            Some(e) => {
                base && e.home_or_draw > one
                    && e.home_or_away > one
                    && e.draw_or_away > one
                    && e.totals.iter().all(|t| t.over > one && t.under > one)
            }
        }
    }
}
