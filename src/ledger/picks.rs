use rust_decimal::Decimal;
use uuid::Uuid;

use super::Rejection;
use crate::models::{accumulator_odd, Match, Outcome, Pick};

/// Where an unconfirmed slip stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlipState {
    /// No picks yet
    Empty,
    /// At least one pick, not yet confirmed
    Building,
}

/// Picks on the slip currently being built
#[derive(Debug, Clone, Default)]
pub struct PickSet {
    picks: Vec<Pick>,
}

impl PickSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pick; one pick per match, the first one stays
    pub fn add(&mut self, fixture: &Match, outcome: Outcome, odd: Decimal) -> Result<Uuid, Rejection> {
        if self.contains_match(fixture.id) {
            return Err(Rejection::MatchAlreadyPicked(fixture.id));
        }
        if odd <= Decimal::ONE {
            return Err(Rejection::InvalidOdd(odd));
        }
        if self.total_odd().checked_mul(odd).is_none() {
            return Err(Rejection::OddOverflow(odd));
        }

        let pick = Pick::new(fixture.clone(), outcome, odd);
        let id = pick.id;
        self.picks.push(pick);
        Ok(id)
    }

    /// Remove a pick by id; returns false if it was not on the slip
    pub fn remove(&mut self, pick_id: Uuid) -> bool {
        let before = self.picks.len();
        self.picks.retain(|p| p.id != pick_id);
        self.picks.len() != before
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    pub fn contains_match(&self, match_id: Uuid) -> bool {
        self.picks.iter().any(|p| p.fixture.id == match_id)
    }

    /// Product of the pick odds; 1 means "no bet", not an even-money odd
    pub fn total_odd(&self) -> Decimal {
        // `add` refuses any pick whose odd would overflow the product, and every
        // odd is above 1, so the product of the remaining picks always fits
        accumulator_odd(&self.picks).unwrap_or(Decimal::MAX)
    }

    /// Payout the current picks would return for `stake`, `None` on overflow
    pub fn potential_win(&self, stake: Decimal) -> Option<Decimal> {
        stake.checked_mul(self.total_odd())
    }

    pub fn state(&self) -> SlipState {
        if self.picks.is_empty() {
            SlipState::Empty
        } else {
            SlipState::Building
        }
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Hand over the picks, leaving the set empty
    pub(crate) fn take(&mut self) -> Vec<Pick> {
        std::mem::take(&mut self.picks)
    }
}
