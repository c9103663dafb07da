pub mod balldontlie;
pub mod espn;
pub mod provider;
pub mod sample;

pub use balldontlie::{BallDontLie, BALLDONTLIE_TEAMS};
pub use espn::{EspnScoreboard, ESPN_NBA_SCOREBOARD};
pub use provider::{ScheduleProvider, TeamDirectory};
pub use sample::SampleSlate;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::FeedError;
use crate::models::{LiveGameData, Team};

/// Append a percent-encoded target URL to a pass-through proxy prefix.
pub fn proxied_url(proxy_prefix: &str, target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{}{}", proxy_prefix, encoded)
}

/// One consistent fetch of the day's games plus the team directory.
#[derive(Debug, Clone)]
pub struct Slate {
    /// Name of the schedule source that answered
    pub source: String,
    pub games: Vec<LiveGameData>,
    /// Directory teams; empty if the directory was unavailable
    pub directory: Vec<Team>,
    pub fetched_at: DateTime<Utc>,
}

impl Slate {
    /// Every team we know about, sorted by id. Teams playing today carry their
    /// live records and override the record-less directory entries.
    pub fn known_teams(&self) -> Vec<Team> {
        let mut by_id: HashMap<String, Team> = self
            .directory
            .iter()
            .map(|t| (t.id.clone(), t.clone()))
            .collect();
        for g in &self.games {
            for team in [&g.home_team, &g.away_team] {
                by_id.insert(team.id.clone(), team.clone());
            }
        }
        let mut teams: Vec<Team> = by_id.into_values().collect();
        teams.sort_by(|a, b| a.id.cmp(&b.id));
        teams
    }
}

/// Try each schedule source in order, giving each at most `attempt_timeout`.
/// The first source to answer wins; later sources are not contacted.
pub async fn fetch_first_success(
    sources: &[Arc<dyn ScheduleProvider>],
    attempt_timeout: Duration,
) -> Result<(String, Vec<LiveGameData>), FeedError> {
    let mut last: Option<(String, String)> = None;

    for source in sources {
        let name = source.name().to_string();
        let error = match tokio::time::timeout(attempt_timeout, source.fetch_slate()).await {
            Ok(Ok(games)) => {
                info!("Fetched {} game(s) from {}", games.len(), name);
                return Ok((name, games));
            }
            Ok(Err(e)) => format!("{:#}", e),
            Err(_) => format!("timed out after {:?}", attempt_timeout),
        };
        warn!("Schedule source '{}' failed: {}", name, error);
        last = Some((name, error));
    }

    match last {
        Some((last_source, last_error)) => Err(FeedError::AllSourcesFailed {
            attempts: sources.len(),
            last_source,
            last_error,
        }),
        None => Err(FeedError::NoSources),
    }
}

/// Fetch the schedule (through the fallback chain) and the team directory
/// concurrently. Only the schedule is required; a directory failure leaves
/// `Slate::directory` empty.
pub async fn load_slate(
    sources: &[Arc<dyn ScheduleProvider>],
    directory: Option<Arc<dyn TeamDirectory>>,
    attempt_timeout: Duration,
) -> Result<Slate, FeedError> {
    let schedule = fetch_first_success(sources, attempt_timeout);
    let teams = async {
        let Some(directory) = directory else {
            return Vec::new();
        };
        match tokio::time::timeout(attempt_timeout, directory.fetch_teams()).await {
            Ok(Ok(teams)) => teams,
            Ok(Err(e)) => {
                warn!(
                    "Team directory '{}' failed, continuing without it: {:#}",
                    directory.name(),
                    e
                );
                Vec::new()
            }
            Err(_) => {
                warn!("Team directory '{}' timed out, continuing without it", directory.name());
                Vec::new()
            }
        }
    };

    let (schedule, directory) = futures_util::future::join(schedule, teams).await;
    let (source, games) = schedule?;

    Ok(Slate {
        source,
        games,
        directory,
        fetched_at: Utc::now(),
    })
}
