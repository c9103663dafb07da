use anyhow::Result;
use async_trait::async_trait;

use crate::models::{LiveGameData, Team};

/// Source of the day's games, each bundled with both teams.
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// Return every game on the current slate.
    async fn fetch_slate(&self) -> Result<Vec<LiveGameData>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Source of static team metadata (no records required).
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn fetch_teams(&self) -> Result<Vec<Team>>;

    fn name(&self) -> &str;
}
