use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{ScheduleProvider, TeamDirectory};
use crate::models::{Game, LiveGameData, Team};

const SAMPLE_SLATE_JSON: &str = include_str!("../../demo/sample_slate.json");

/// Offline slate with full team data (stats, form, splits, series history).
#[derive(Debug, Clone, Deserialize)]
pub struct SampleSlate {
    teams: Vec<Team>,
    games: Vec<Game>,
}

impl SampleSlate {
    /// The slate bundled with the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(SAMPLE_SLATE_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse sample slate")
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Bundle each game with its teams, dropping games that reference unknown ids.
    pub fn bundled(&self) -> Vec<LiveGameData> {
        let by_id: HashMap<&str, &Team> = self.teams.iter().map(|t| (t.id.as_str(), t)).collect();
        self.games
            .iter()
            .filter_map(|game| {
                match (
                    by_id.get(game.home_team_id.as_str()),
                    by_id.get(game.away_team_id.as_str()),
                ) {
                    (Some(home), Some(away)) => Some(LiveGameData {
                        game: game.clone(),
                        home_team: (*home).clone(),
                        away_team: (*away).clone(),
                    }),
                    _ => {
                        debug!("Sample game {} references an unknown team", game.id);
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl ScheduleProvider for SampleSlate {
    fn name(&self) -> &str {
        "sample"
    }

    async fn fetch_slate(&self) -> Result<Vec<LiveGameData>> {
        Ok(self.bundled())
    }
}

#[async_trait]
impl TeamDirectory for SampleSlate {
    fn name(&self) -> &str {
        "sample"
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>> {
        Ok(self.teams.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{analyze_slate, EngineConfig, ScoringPolicy};

    #[test]
    fn test_embedded_slate_parses() {
        let slate = SampleSlate::embedded().unwrap();
        assert_eq!(slate.teams().len(), 10);
        assert_eq!(slate.games().len(), 5);
        assert!(slate.teams().iter().all(|t| t.full_profile().is_some()));
        assert_eq!(slate.bundled().len(), 5);
    }

    #[test]
    fn test_sample_slate_uses_full_policy() {
        let slate = SampleSlate::embedded().unwrap();
        let predictions = analyze_slate(slate.games(), slate.teams(), &EngineConfig::default());
        assert_eq!(predictions.len(), 5);
        assert!(predictions.iter().all(|p| p.policy == ScoringPolicy::Full));
    }

    #[test]
    fn test_unknown_team_dropped_from_bundle() {
        let slate = SampleSlate::from_json(
            r#"{
                "teams": [{"id": "BOS", "name": "Boston Celtics"}],
                "games": [{
                    "id": "G1", "homeTeamId": "BOS", "awayTeamId": "XXX", "time": "7:30 PM EST"
                }]
            }"#,
        )
        .unwrap();
        assert!(slate.bundled().is_empty());
    }
}
