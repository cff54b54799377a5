use std::env;

use anyhow::{bail, Context, Result};

/// Where fixtures come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSourceKind {
    /// Randomly generated schedule
    Random,
    /// The Odds API feed
    Live,
}

impl MatchSourceKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "random" => Ok(MatchSourceKind::Random),
            "live" => Ok(MatchSourceKind::Live),
            other => bail!("MATCH_SOURCE must be 'random' or 'live', got '{}'", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path
    pub database_url: String,

    /// Fixture source
    pub match_source: MatchSourceKind,

    /// The Odds API base URL
    pub odds_api_url: String,

    /// The Odds API key (required for the live source)
    pub odds_api_key: Option<String>,

    /// Sport key for the odds feed
    pub odds_sport_key: String,

    /// Days of cached schedules to keep before today; unset keeps everything
    pub match_retention_days: Option<i64>,

    /// Display name to save on startup
    pub user_name: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/slipbook.db".to_string()),

            match_source: MatchSourceKind::parse(
                &env::var("MATCH_SOURCE").unwrap_or_else(|_| "random".to_string()),
            )?,

            odds_api_url: env::var("ODDS_API_URL")
                .unwrap_or_else(|_| "https://api.the-odds-api.com".to_string()),

            odds_api_key: env::var("ODDS_API_KEY").ok().filter(|k| !k.is_empty()),

            odds_sport_key: env::var("ODDS_SPORT_KEY")
                .unwrap_or_else(|_| "soccer_epl".to_string()),

            match_retention_days: env::var("MATCH_RETENTION_DAYS")
                .ok()
                .map(|v| v.parse())
                .transpose()
                .context("MATCH_RETENTION_DAYS must be a valid number")?,

            user_name: env::var("USER_NAME").ok().filter(|n| !n.is_empty()),
        };

        if config.match_source == MatchSourceKind::Live && config.odds_api_key.is_none() {
            bail!("ODDS_API_KEY is required when MATCH_SOURCE=live");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_source() {
        assert_eq!(MatchSourceKind::parse("random").unwrap(), MatchSourceKind::Random);
        assert_eq!(MatchSourceKind::parse(" LIVE ").unwrap(), MatchSourceKind::Live);
        assert!(MatchSourceKind::parse("oracle").is_err());
    }
}
