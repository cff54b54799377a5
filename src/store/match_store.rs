use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, error, info};

use crate::db::{keys, load_json, save_json, StateStore};
use crate::generator::MatchSource;
use crate::models::{date_key, Match, MatchCache, DATE_KEY_FORMAT};

/// Date-keyed cache of generated fixtures
///
/// The first list produced for a date is kept for good, so a date shows the
/// same schedule across sessions.
pub struct MatchStore {
    source: Box<dyn MatchSource>,
    state: Arc<dyn StateStore>,
    cache: MatchCache,
}

impl MatchStore {
    /// Load the persisted cache; a missing or corrupt entry starts empty
    pub async fn open(source: Box<dyn MatchSource>, state: Arc<dyn StateStore>) -> Self {
        let cache: MatchCache = match load_json(state.as_ref(), keys::SAVED_MATCHES).await {
            Some(cache) => cache,
            None => {
                debug!("No saved matches, starting with an empty cache");
                MatchCache::new()
            }
        };

        info!(
            "Match store opened ({} cached dates, source: {})",
            cache.len(),
            source.name()
        );

        Self {
            source,
            state,
            cache,
        }
    }

    /// Matches for a date, generated and persisted on first request
    pub async fn get(&mut self, date: NaiveDate) -> Result<Vec<Match>> {
        let key = date_key(date);

        if let Some(matches) = self.cache.get(&key) {
            debug!("Match cache hit for {}", key);
            return Ok(matches.clone());
        }

        let matches = self.source.matches_for(date).await?;
        info!(
            "Generated {} matches for {} from {} source",
            matches.len(),
            key,
            self.source.name()
        );

        self.cache.insert(key, matches.clone());

        // Kept in memory even if the write fails so this session stays consistent
        if let Err(e) = self.persist().await {
            error!("Failed to persist match cache: {}", e);
        }

        Ok(matches)
    }

    /// Matches for the local current date
    pub async fn today(&mut self) -> Result<Vec<Match>> {
        self.get(Local::now().date_naive()).await
    }

    /// Dates with a cached schedule, ascending
    pub fn cached_dates(&self) -> Vec<NaiveDate> {
        self.cache
            .keys()
            .filter_map(|k| NaiveDate::parse_from_str(k, DATE_KEY_FORMAT).ok())
            .collect()
    }

    /// Drop schedules for dates before `cutoff`; returns how many were removed
    pub async fn prune_before(&mut self, cutoff: NaiveDate) -> Result<usize> {
        let cutoff_key = date_key(cutoff);
        let before = self.cache.len();

        // Keys are zero-padded yyyy-MM-dd, so string order is date order
        self.cache.retain(|key, _| key.as_str() >= cutoff_key.as_str());

        let removed = before - self.cache.len();
        if removed > 0 {
            info!("Pruned {} cached dates before {}", removed, cutoff_key);
            self.persist().await?;
        }

        Ok(removed)
    }

    async fn persist(&self) -> Result<()> {
        save_json(self.state.as_ref(), keys::SAVED_MATCHES, &self.cache).await
    }
}
