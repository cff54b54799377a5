pub mod fixture;
pub mod odds;
pub mod slip;

pub use fixture::{date_key, Match, MatchCache, DATE_KEY_FORMAT};
pub use odds::{ExtendedOdds, GoalLine, OddsSet, Outcome, TotalsLine};
pub use slip::{accumulator_odd, Pick, Settlement, SettlementResult, Slip};
