use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Local};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slipbook::api::{LiveFeedSource, OddsApiClient};
use slipbook::config::{Config, MatchSourceKind};
use slipbook::db::{SqliteStateStore, StateStore};
use slipbook::generator::{MatchSource, RandomMatchGenerator};
use slipbook::ledger::{profile, Ledger};
use slipbook::store::MatchStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slipbook=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting slipbook");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Initialize database
    let state: Arc<dyn StateStore> = Arc::new(SqliteStateStore::new(&config.database_url).await?);
    info!("Database initialized");

    if let Some(name) = &config.user_name {
        profile::set_user_name(state.as_ref(), name).await?;
    }
    let user_name = profile::user_name(state.as_ref()).await;

    let mut match_store = MatchStore::open(build_source(&config), Arc::clone(&state)).await;

    if let Some(days) = config.match_retention_days {
        let cutoff = Local::now().date_naive() - Duration::days(days);
        if let Err(e) = match_store.prune_before(cutoff).await {
            error!("Failed to prune match cache: {}", e);
        }
    }

    // Today's schedule is generated eagerly
    match match_store.today().await {
        Ok(matches) => {
            info!("Today's matches ({}):", matches.len());
            for m in &matches {
                info!(
                    "  {} {} | 1 {} | X {} | 2 {}",
                    m.kickoff,
                    m.title(),
                    m.odds.home,
                    m.odds.draw,
                    m.odds.away
                );
            }
        }
        Err(e) => error!("Failed to load today's matches: {}", e),
    }

    let ledger = Ledger::open(Arc::clone(&state)).await;

    info!(
        "Account {} | balance {} | {} slips",
        user_name,
        ledger.balance().round_dp(2),
        ledger.slips().len()
    );

    for slip in ledger.slips() {
        info!(
            "  {} | {} legs | stake {} | odd {} | win {} | p {:.3} | ev {}",
            slip.placed_at.format("%Y-%m-%d %H:%M"),
            slip.picks.len(),
            slip.stake.round_dp(2),
            slip.total_odd.round_dp(2),
            slip.potential_win.round_dp(2),
            slip.implied_probability(),
            slip.expected_value().round_dp(2)
        );
    }

    info!("Shutting down slipbook");
    Ok(())
}

/// Pick the fixture source named in config
fn build_source(config: &Config) -> Box<dyn MatchSource> {
    match (config.match_source, &config.odds_api_key) {
        (MatchSourceKind::Live, Some(key)) => {
            let client = OddsApiClient::new(&config.odds_api_url, key);
            Box::new(LiveFeedSource::new(client, &config.odds_sport_key))
        }
        _ => Box::new(RandomMatchGenerator::new()),
    }
}
