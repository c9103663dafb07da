use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::provider::ScheduleProvider;
use super::proxied_url;
use crate::engine::odds::validate_american_odds;
use crate::models::{
    Game, GameOdds, GameStatus, LiveGameData, Moneyline, Record, SpreadLine, Team, TotalLine,
};

pub const ESPN_NBA_SCOREBOARD: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/nba/scoreboard";

/// Odds provider preferred when a game lists several.
const PREFERRED_BOOK: &str = "draftkings";

/// Schedule provider backed by the public ESPN scoreboard endpoint, either
/// called directly or through a pass-through proxy.
pub struct EspnScoreboard {
    http: Client,
    name: String,
    url: String,
}

impl EspnScoreboard {
    pub fn new(scoreboard_url: &str) -> Result<Self> {
        Ok(EspnScoreboard {
            http: build_client()?,
            name: "ESPN".to_string(),
            url: scoreboard_url.to_string(),
        })
    }

    /// Fetch `scoreboard_url` through a proxy that takes the encoded target
    /// appended to `proxy_prefix`, e.g. `https://proxy.example/raw?url=`.
    pub fn via_proxy(scoreboard_url: &str, proxy_prefix: &str) -> Result<Self> {
        let host = url::Url::parse(proxy_prefix)
            .with_context(|| format!("Invalid proxy URL: {}", proxy_prefix))?
            .host_str()
            .unwrap_or("proxy")
            .to_string();
        Ok(EspnScoreboard {
            http: build_client()?,
            name: format!("ESPN via {}", host),
            url: proxied_url(proxy_prefix, scoreboard_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")
}

#[async_trait]
impl ScheduleProvider for EspnScoreboard {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_slate(&self) -> Result<Vec<LiveGameData>> {
        debug!("Fetching scoreboard from {}", self.url);

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("ESPN scoreboard request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("ESPN scoreboard error: {}", resp.status());
        }

        let raw: Value = resp
            .json()
            .await
            .context("Failed to parse ESPN scoreboard response")?;

        Ok(parse_scoreboard(&raw))
    }
}

/// Flatten a scoreboard payload. Events missing a home or away side are skipped.
pub fn parse_scoreboard(raw: &Value) -> Vec<LiveGameData> {
    let events = match raw["events"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    events
        .iter()
        .filter_map(|ev| {
            let parsed = parse_event(ev);
            if parsed.is_none() {
                debug!("Skipping malformed scoreboard event {}", ev["id"]);
            }
            parsed
        })
        .collect()
}

fn parse_event(ev: &Value) -> Option<LiveGameData> {
    let id = ev["id"].as_str()?.to_string();
    let competition = ev["competitions"].get(0)?;
    let competitors = competition["competitors"].as_array()?;

    let home_c = competitors.iter().find(|c| c["homeAway"] == "home")?;
    let away_c = competitors.iter().find(|c| c["homeAway"] == "away")?;
    let home_team = parse_competitor(home_c)?;
    let away_team = parse_competitor(away_c)?;

    let odds = parse_odds(competition);
    let status = ev["status"]["type"]["name"]
        .as_str()
        .map(GameStatus::from_provider)
        .unwrap_or_default();
    let time = ev["date"]
        .as_str()
        .map(kickoff_label)
        .unwrap_or_else(|| "TBD".to_string());

    let game = Game {
        id,
        home_team_id: home_team.id.clone(),
        away_team_id: away_team.id.clone(),
        time,
        status,
        odds,
        // The scoreboard carries no series history.
        h2h: None,
    };

    Some(LiveGameData {
        game,
        home_team,
        away_team,
    })
}

fn parse_competitor(c: &Value) -> Option<Team> {
    let team = &c["team"];
    let id = team["abbreviation"].as_str()?;
    let name = team["displayName"].as_str().unwrap_or(id);
    let logo = team["logo"].as_str().unwrap_or_default();

    let record = c["records"]
        .as_array()
        .and_then(|records| records.iter().find(|r| r["name"] == "overall"))
        .and_then(|r| r["summary"].as_str())
        .and_then(Record::parse_summary)
        .unwrap_or_default();

    Some(Team::basic(id, name, logo, record))
}

fn parse_odds(competition: &Value) -> GameOdds {
    let defaults = GameOdds::default();
    let book = match competition["odds"].as_array() {
        Some(books) => books
            .iter()
            .find(|o| {
                o["provider"]["name"]
                    .as_str()
                    .is_some_and(|n| n.eq_ignore_ascii_case(PREFERRED_BOOK))
            })
            .or_else(|| books.first()),
        None => None,
    };
    let book = match book {
        Some(b) => b,
        None => return defaults,
    };

    let home = &book["homeTeamOdds"];
    let away = &book["awayTeamOdds"];

    // The feed states the spread from the away side; the model keeps it from the home side.
    let line = number(&home["spread"])
        .or_else(|| number(&away["spread"]).map(|l| -l))
        .or_else(|| number(&book["spread"]))
        .unwrap_or(defaults.spread.line);

    GameOdds {
        moneyline: Moneyline {
            home: price(&home["moneyLine"]).unwrap_or(defaults.moneyline.home),
            away: price(&away["moneyLine"]).unwrap_or(defaults.moneyline.away),
        },
        spread: SpreadLine {
            line,
            home: price(&home["spreadOdds"]).unwrap_or(defaults.spread.home),
            away: price(&away["spreadOdds"]).unwrap_or(defaults.spread.away),
        },
        total: TotalLine {
            line: number(&book["overUnder"]).unwrap_or(defaults.total.line),
            over: price(&book["overOdds"]).unwrap_or(defaults.total.over),
            under: price(&book["underOdds"]).unwrap_or(defaults.total.under),
        },
    }
}

/// Numbers arrive either as JSON numbers or as strings like "+130".
fn number(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n: &f64| n.is_finite())
}

/// An American price. "EVEN" is +100; values inside (−100, +100) are dropped
/// so the caller falls back to its default.
fn price(v: &Value) -> Option<f64> {
    if v.as_str().is_some_and(|s| s.trim().eq_ignore_ascii_case("even")) {
        return Some(100.0);
    }
    let odds = number(v)?;
    match validate_american_odds(odds) {
        Ok(odds) => Some(odds),
        Err(e) => {
            debug!("Ignoring scoreboard price: {}", e);
            None
        }
    }
}

/// "2024-04-14T23:30Z" → "11:30 PM UTC". Unparseable dates pass through as-is.
fn kickoff_label(date: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(date)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|n| n.and_utc())
        });
    match parsed {
        Some(d) => d.format("%I:%M %p UTC").to_string(),
        None => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn competitor(home_away: &str, abbr: &str, name: &str, summary: &str) -> Value {
        json!({
            "homeAway": home_away,
            "team": {
                "abbreviation": abbr,
                "displayName": name,
                "logo": format!(
                    "https://a.espncdn.com/i/teamlogos/nba/500/{}.png",
                    abbr.to_lowercase()
                ),
            },
            "records": [
                { "name": "overall", "summary": summary },
                { "name": "Home", "summary": "28-14" },
            ],
        })
    }

    fn scoreboard(odds: Value) -> Value {
        json!({
            "events": [{
                "id": "401585601",
                "date": "2024-04-14T23:30Z",
                "status": { "type": { "name": "STATUS_SCHEDULED" } },
                "competitions": [{
                    "competitors": [
                        competitor("home", "LAL", "Los Angeles Lakers", "47-35"),
                        competitor("away", "GSW", "Golden State Warriors", "46-36"),
                    ],
                    "odds": odds,
                }],
            }]
        })
    }

    #[test]
    fn test_parse_event_teams_and_records() {
        let games = parse_scoreboard(&scoreboard(json!([])));
        assert_eq!(games.len(), 1);
        let g = &games[0];
        assert_eq!(g.game.id, "401585601");
        assert_eq!(g.game.home_team_id, "LAL");
        assert_eq!(g.game.away_team_id, "GSW");
        assert_eq!(g.home_team.record, Record::new(47, 35));
        assert_eq!(g.away_team.name, "Golden State Warriors");
        assert_eq!(g.game.status, GameStatus::Scheduled);
        assert_eq!(g.game.time, "11:30 PM UTC");
        assert_eq!(g.game.h2h, None);
        assert!(g.home_team.full_profile().is_none());
    }

    #[test]
    fn test_missing_odds_use_defaults() {
        let games = parse_scoreboard(&scoreboard(json!([])));
        assert_eq!(games[0].game.odds, GameOdds::default());
    }

    #[test]
    fn test_preferred_book_and_spread_orientation() {
        let odds = json!([
            {
                "provider": { "name": "ESPN BET" },
                "homeTeamOdds": { "moneyLine": -500 },
            },
            {
                "provider": { "name": "DraftKings" },
                "overUnder": 235.5,
                "overOdds": -112,
                "underOdds": "-108",
                "homeTeamOdds": { "moneyLine": -150, "spreadOdds": -110 },
                "awayTeamOdds": { "moneyLine": "+130", "spread": 3.5, "spreadOdds": -110 },
            },
        ]);
        let games = parse_scoreboard(&scoreboard(odds));
        let o = games[0].game.odds;
        assert_eq!(o.moneyline, Moneyline { home: -150.0, away: 130.0 });
        // away +3.5 means the home side gives 3.5
        assert_eq!(o.spread.line, -3.5);
        assert_eq!(o.total, TotalLine { line: 235.5, over: -112.0, under: -108.0 });
    }

    #[test]
    fn test_invalid_prices_fall_back_to_defaults() {
        let odds = json!([{
            "provider": { "name": "DraftKings" },
            "overUnder": 228.5,
            "overOdds": 50,
            "underOdds": "-99.5",
            "homeTeamOdds": { "moneyLine": 0, "spreadOdds": "n/a" },
            "awayTeamOdds": { "moneyLine": "EVEN", "spreadOdds": "even" },
        }]);
        let games = parse_scoreboard(&scoreboard(odds));
        let o = games[0].game.odds;
        assert_eq!(o.moneyline, Moneyline { home: -110.0, away: 100.0 });
        assert_eq!(o.spread.home, -110.0);
        assert_eq!(o.spread.away, 100.0);
        assert_eq!(o.total, TotalLine { line: 228.5, over: -110.0, under: -110.0 });
    }

    #[test]
    fn test_zero_price_never_reaches_the_engine() {
        use crate::engine::{analyze_live, EngineConfig};

        let odds = json!([{ "homeTeamOdds": { "moneyLine": 0 } }]);
        let games = parse_scoreboard(&scoreboard(odds));
        let predictions = analyze_live(&games, &EngineConfig::default());
        let winner = &predictions[0].winner;
        assert!(winner.implied_probability > 0.0 && winner.implied_probability < 100.0);
        assert!(winner.value < winner.probability);
    }

    #[test]
    fn test_first_book_when_no_preferred() {
        let odds = json!([{
            "provider": { "name": "ESPN BET" },
            "homeTeamOdds": { "moneyLine": -500 },
        }]);
        let games = parse_scoreboard(&scoreboard(odds));
        assert_eq!(games[0].game.odds.moneyline.home, -500.0);
        assert_eq!(games[0].game.odds.moneyline.away, -110.0);
    }

    #[test]
    fn test_missing_record_defaults_to_zero() {
        let raw = json!({
            "events": [{
                "id": "1",
                "status": { "type": { "name": "STATUS_FINAL" } },
                "competitions": [{
                    "competitors": [
                        { "homeAway": "home", "team": { "abbreviation": "BOS" } },
                        {
                            "homeAway": "away",
                            "team": { "abbreviation": "MIA" },
                            "records": [{ "name": "overall", "summary": "bad" }],
                        },
                    ],
                }],
            }]
        });
        let games = parse_scoreboard(&raw);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team.record, Record::default());
        assert_eq!(games[0].away_team.record, Record::default());
        assert_eq!(games[0].home_team.name, "BOS");
        assert_eq!(games[0].game.status, GameStatus::Final);
        assert_eq!(games[0].game.time, "TBD");
    }

    #[test]
    fn test_malformed_events_are_skipped() {
        let raw = json!({
            "events": [
                { "id": "no-competitions" },
                {
                    "id": "one-sided",
                    "competitions": [{ "competitors": [
                        { "homeAway": "home", "team": { "abbreviation": "BOS" } },
                    ]}],
                },
            ]
        });
        assert!(parse_scoreboard(&raw).is_empty());
        assert!(parse_scoreboard(&json!({})).is_empty());
    }

    #[test]
    fn test_kickoff_label_formats() {
        assert_eq!(kickoff_label("2024-04-14T17:00Z"), "05:00 PM UTC");
        assert_eq!(kickoff_label("2024-04-14T17:00:00Z"), "05:00 PM UTC");
        assert_eq!(kickoff_label("tonight"), "tonight");
    }

    #[test]
    fn test_via_proxy_encodes_target() {
        let espn =
            EspnScoreboard::via_proxy(ESPN_NBA_SCOREBOARD, "https://api.allorigins.win/raw?url=")
                .unwrap();
        assert_eq!(espn.name(), "ESPN via api.allorigins.win");
        assert!(espn
            .url()
            .starts_with("https://api.allorigins.win/raw?url=https%3A%2F%2Fsite.api.espn.com%2F"));
    }
}
