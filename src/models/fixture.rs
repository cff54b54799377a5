use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OddsSet;

/// Format of a match cache key
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A scheduled match with its offered odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,

    /// Home team name
    pub home: String,

    /// Away team name
    pub away: String,

    /// Kickoff time of day, "HH:MM"
    pub kickoff: String,

    pub odds: OddsSet,
}

impl Match {
    /// Kickoff parsed as a time of day
    pub fn kickoff_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.kickoff, "%H:%M").ok()
    }

    /// "Home vs Away"
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home, self.away)
    }
}

/// Cache key for a calendar day (yyyy-MM-dd)
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Match lists indexed by date key
pub type MatchCache = BTreeMap<String, Vec<Match>>;
