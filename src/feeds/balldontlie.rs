use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::provider::TeamDirectory;
use super::proxied_url;
use crate::models::{Record, Team};

pub const BALLDONTLIE_TEAMS: &str = "https://www.balldontlie.io/api/v1/teams";

/// Team directory backed by the key-less balldontlie teams endpoint.
pub struct BallDontLie {
    http: Client,
    url: String,
}

impl BallDontLie {
    pub fn new(teams_url: &str, proxy_prefix: Option<&str>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        let url = match proxy_prefix {
            Some(prefix) => proxied_url(prefix, teams_url),
            None => teams_url.to_string(),
        };
        Ok(BallDontLie { http, url })
    }
}

#[async_trait]
impl TeamDirectory for BallDontLie {
    fn name(&self) -> &str {
        "balldontlie"
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>> {
        debug!("Fetching team directory from {}", self.url);

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("balldontlie request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("balldontlie error: {}", resp.status());
        }

        let raw: Value = resp
            .json()
            .await
            .context("Failed to parse balldontlie response")?;

        Ok(parse_teams(&raw))
    }
}

fn logo_url(abbreviation: &str) -> String {
    format!(
        "https://www.nba.com/stats/media/img/teams/logos/{}_logo.svg",
        abbreviation
    )
}

/// Directory entries carry no records; every team starts at 0-0.
fn parse_teams(raw: &Value) -> Vec<Team> {
    let items = match raw["data"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    items
        .iter()
        .filter_map(|item| {
            let abbr = item["abbreviation"].as_str()?;
            let name = item["full_name"].as_str().unwrap_or(abbr);
            Some(Team::basic(abbr, name, &logo_url(abbr), Record::default()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_teams() {
        let raw = json!({
            "data": [
                { "id": 14, "abbreviation": "LAL", "full_name": "Los Angeles Lakers" },
                { "id": 2, "abbreviation": "BOS" },
                { "id": 99, "full_name": "No Abbreviation" },
            ]
        });
        let teams = parse_teams(&raw);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].id, "LAL");
        assert_eq!(teams[0].name, "Los Angeles Lakers");
        assert_eq!(teams[0].logo, "https://www.nba.com/stats/media/img/teams/logos/LAL_logo.svg");
        assert_eq!(teams[0].record, Record::default());
        assert_eq!(teams[1].name, "BOS");
    }

    #[test]
    fn test_parse_teams_unexpected_shape() {
        assert!(parse_teams(&json!([1, 2, 3])).is_empty());
    }
}
