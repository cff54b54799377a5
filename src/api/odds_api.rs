use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::generator::MatchSource;
use crate::models::{Match, OddsSet};

const H2H_MARKET: &str = "h2h";
const DRAW_OUTCOME: &str = "Draw";

/// Client for The Odds API (v4)
pub struct OddsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Event with bookmaker odds
#[derive(Debug, Deserialize)]
struct EventResponse {
    id: String,
    commence_time: String,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<BookmakerResponse>,
}

#[derive(Debug, Deserialize)]
struct BookmakerResponse {
    key: String,
    #[serde(default)]
    markets: Vec<MarketResponse>,
}

#[derive(Debug, Deserialize)]
struct MarketResponse {
    key: String,
    #[serde(default)]
    outcomes: Vec<OutcomeResponse>,
}

#[derive(Debug, Deserialize)]
struct OutcomeResponse {
    name: String,
    price: f64,
}

/// A fetched match together with its kickoff instant
#[derive(Debug, Clone)]
pub struct FeedMatch {
    pub fixture: Match,
    pub commence_time: DateTime<Utc>,
}

impl OddsApiClient {
    /// Create a new odds client
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetch upcoming matches with three-way decimal odds for a sport
    pub async fn fetch_matches(&self, sport_key: &str) -> Result<Vec<FeedMatch>> {
        let url = format!(
            "{}/v4/sports/{}/odds?apiKey={}&regions=eu&markets={}&oddsFormat=decimal",
            self.base_url,
            urlencoding::encode(sport_key),
            urlencoding::encode(&self.api_key),
            H2H_MARKET,
        );
        debug!("Fetching odds for sport {}", sport_key);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to fetch odds")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Odds API error: {} - {}", status, text);
        }

        let body = response
            .text()
            .await
            .context("Failed to read odds response")?;

        let matches = parse_events(&body)?;
        info!("Odds API returned {} matches for {}", matches.len(), sport_key);
        Ok(matches)
    }
}

/// Parse an odds response body, skipping events without a full three-way market
fn parse_events(body: &str) -> Result<Vec<FeedMatch>> {
    let events: Vec<EventResponse> =
        serde_json::from_str(body).context("Failed to parse odds response")?;

    Ok(events
        .into_iter()
        .filter_map(|event| {
            let id = event.id.clone();
            let converted = convert_event(event);
            if converted.is_none() {
                warn!("Skipping event {} without complete three-way odds", id);
            }
            converted
        })
        .collect())
}

/// Convert an API event to our model
fn convert_event(event: EventResponse) -> Option<FeedMatch> {
    let commence_time = DateTime::parse_from_rfc3339(&event.commence_time)
        .ok()?
        .with_timezone(&Utc);

    // First bookmaker quoting all three outcomes wins
    let odds = event.bookmakers.iter().find_map(|bookmaker| {
        let market = bookmaker.markets.iter().find(|m| m.key == H2H_MARKET)?;
        let price_of = |name: &str| {
            market
                .outcomes
                .iter()
                .find(|o| o.name == name)
                .and_then(|o| to_odd(o.price))
        };

        let odds = OddsSet::three_way(
            price_of(&event.home_team)?,
            price_of(DRAW_OUTCOME)?,
            price_of(&event.away_team)?,
        );
        debug!("Using {} prices for {}", bookmaker.key, event.id);
        Some(odds)
    })?;

    // Odds API ids are 32 hex digits, which is a valid simple-form UUID
    let id = Uuid::parse_str(&event.id).unwrap_or_else(|_| Uuid::new_v4());

    Some(FeedMatch {
        fixture: Match {
            id,
            home: event.home_team,
            away: event.away_team,
            kickoff: commence_time.format("%H:%M").to_string(),
            odds,
        },
        commence_time,
    })
}

/// Decimal odd rounded to two places; anything not above 1.0 is rejected
fn to_odd(price: f64) -> Option<Decimal> {
    let odd = Decimal::try_from(price).ok()?.round_dp(2);
    (odd > Decimal::ONE).then_some(odd)
}

/// Match source backed by the live odds feed
pub struct LiveFeedSource {
    client: OddsApiClient,
    sport_key: String,
}

impl LiveFeedSource {
    pub fn new(client: OddsApiClient, sport_key: &str) -> Self {
        Self {
            client,
            sport_key: sport_key.to_string(),
        }
    }
}

#[async_trait]
impl MatchSource for LiveFeedSource {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn matches_for(&self, date: NaiveDate) -> Result<Vec<Match>> {
        let matches = self.client.fetch_matches(&self.sport_key).await?;

        Ok(matches
            .into_iter()
            .filter(|m| m.commence_time.date_naive() == date)
            .map(|m| m.fixture)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const BODY: &str = r#"[
        {
            "id": "e912304de2b2ce35b473ce2ecd3d1502",
            "sport_key": "soccer_epl",
            "commence_time": "2024-03-09T15:00:00Z",
            "home_team": "Brentford",
            "away_team": "Chelsea",
            "bookmakers": [
                {
                    "key": "unibet",
                    "title": "Unibet",
                    "markets": [
                        {
                            "key": "h2h",
                            "outcomes": [
                                { "name": "Brentford", "price": 3.1 },
                                { "name": "Chelsea", "price": 2.25 },
                                { "name": "Draw", "price": 3.6 }
                            ]
                        }
                    ]
                }
            ]
        },
        {
            "id": "not-a-uuid",
            "commence_time": "2024-03-10T19:30:00Z",
            "home_team": "Ajax",
            "away_team": "PSV",
            "bookmakers": [
                {
                    "key": "pinnacle",
                    "markets": [
                        {
                            "key": "h2h",
                            "outcomes": [
                                { "name": "Ajax", "price": 2.4 },
                                { "name": "PSV", "price": 2.8 }
                            ]
                        }
                    ]
                }
            ]
        }
    ]"#;

    #[test]
    fn test_parse_events() {
        let matches = parse_events(BODY).unwrap();

        // Second event has no draw price
        assert_eq!(matches.len(), 1);

        let m = &matches[0].fixture;
        assert_eq!(m.id, Uuid::parse_str("e912304de2b2ce35b473ce2ecd3d1502").unwrap());
        assert_eq!(m.home, "Brentford");
        assert_eq!(m.away, "Chelsea");
        assert_eq!(m.kickoff, "15:00");
        assert_eq!(m.odds.home, dec!(3.10));
        assert_eq!(m.odds.draw, dec!(3.60));
        assert_eq!(m.odds.away, dec!(2.25));
        assert!(m.odds.extended.is_none());
    }

    #[test]
    fn test_parse_events_rejects_garbage() {
        assert!(parse_events("{\"message\": \"quota\"}").is_err());
    }

    #[test]
    fn test_to_odd() {
        assert_eq!(to_odd(1.5), Some(dec!(1.50)));
        assert_eq!(to_odd(1.0), None);
        assert_eq!(to_odd(0.8), None);
    }
}
