use std::env;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slipbook::api::OddsApiClient;
use slipbook::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fetch_odds=info,slipbook=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Optional sport key argument overrides ODDS_SPORT_KEY
    let args: Vec<String> = env::args().collect();
    let sport_key = args.get(1).cloned().unwrap_or(config.odds_sport_key);

    let api_key = config
        .odds_api_key
        .context("ODDS_API_KEY must be set to fetch live odds")?;

    info!("Fetching live odds for {}", sport_key);

    let client = OddsApiClient::new(&config.odds_api_url, &api_key);
    let matches = client.fetch_matches(&sport_key).await?;

    for feed_match in &matches {
        let m = &feed_match.fixture;
        info!(
            "{} | {} | 1 {} | X {} | 2 {}",
            feed_match.commence_time.format("%Y-%m-%d %H:%M"),
            m.title(),
            m.odds.home,
            m.odds.draw,
            m.odds.away
        );
    }

    info!("Fetched {} matches", matches.len());
    Ok(())
}
