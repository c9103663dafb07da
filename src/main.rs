use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use pickpulse::config::{Config, Source};
use pickpulse::dashboard::{self, AppState};
use pickpulse::engine::{analyze_live, EngineConfig, PickBoard};
use pickpulse::feeds::{
    load_slate, BallDontLie, EspnScoreboard, SampleSlate, ScheduleProvider, TeamDirectory,
};

/// Number of picks per list printed by `--once`.
const PICK_LIMIT: usize = 3;

type Feeds = (Vec<Arc<dyn ScheduleProvider>>, Option<Arc<dyn TeamDirectory>>);

fn build_feeds(config: &Config) -> Result<Feeds> {
    match config.source {
        Source::Sample => {
            let sample = Arc::new(SampleSlate::embedded()?);
            let schedule: Arc<dyn ScheduleProvider> = sample.clone();
            let directory: Arc<dyn TeamDirectory> = sample;
            Ok((vec![schedule], Some(directory)))
        }
        Source::Espn => {
            let mut sources: Vec<Arc<dyn ScheduleProvider>> =
                vec![Arc::new(EspnScoreboard::new(&config.espn_url)?)];
            for proxy in &config.proxy_urls {
                sources.push(Arc::new(EspnScoreboard::via_proxy(&config.espn_url, proxy)?));
            }
            let directory: Arc<dyn TeamDirectory> =
                Arc::new(BallDontLie::new(&config.teams_url, None)?);
            Ok((sources, Some(directory)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let (sources, directory) = build_feeds(&config)?;
    let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
    info!("Schedule sources (in order): {}", names.join(", "));

    let engine = EngineConfig::default();
    let attempt_timeout = Duration::from_secs(config.source_timeout_secs);

    if config.once {
        let slate = load_slate(&sources, directory, attempt_timeout).await?;
        let predictions = analyze_live(&slate.games, &engine);
        let board = PickBoard::build(&predictions, &engine, PICK_LIMIT, config.wager);
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    let state = Arc::new(AppState::new(engine, config.wager));

    // Refresh loop: on schedule, or early when the API asks for it
    let refresh_state = state.clone();
    let refresh_every = Duration::from_secs(config.refresh_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_every);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = refresh_state.refresh_requested.notified() => {
                    info!("Manual refresh requested");
                    interval.reset();
                }
            }
            let result = load_slate(&sources, directory.clone(), attempt_timeout).await;
            refresh_state.apply_refresh(result).await;
        }
    });

    let app = dashboard::router(state);
    let addr: SocketAddr = config
        .dashboard_addr
        .parse()
        .with_context(|| format!("Invalid dashboard address: {}", config.dashboard_addr))?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
