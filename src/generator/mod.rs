pub mod random;

pub use random::RandomMatchGenerator;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::Match;

/// Source of the fixture list for a calendar day
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Matches scheduled on `date`; repeated calls may return different lists
    async fn matches_for(&self, date: NaiveDate) -> Result<Vec<Match>>;
}
