use serde::{Deserialize, Serialize};

use crate::engine::scoring::ScoringPolicy;

/// Season win/loss tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl Record {
    pub fn new(wins: u32, losses: u32) -> Self {
        Record { wins, losses }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win fraction in [0, 1], or `None` before the first game.
    pub fn win_pct(&self) -> Option<f64> {
        match self.games() {
            0 => None,
            n => Some(self.wins as f64 / n as f64),
        }
    }

    /// Parse a "W-L" summary such as `"47-35"`.
    pub fn parse_summary(summary: &str) -> Option<Self> {
        let (w, l) = summary.trim().split_once('-')?;
        Some(Record {
            wins: w.trim().parse().ok()?,
            losses: l.trim().parse().ok()?,
        })
    }
}

/// Scoring averages per game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    /// Points scored per game
    pub ppg: f64,
    /// Points allowed per game
    pub oppg: f64,
}

impl TeamStats {
    pub fn net_rating(&self) -> f64 {
        self.ppg - self.oppg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Short code, e.g. "LAL"
    pub id: String,
    pub name: String,
    /// Logo URL or glyph
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub record: Record,
    #[serde(default)]
    pub stats: Option<TeamStats>,
    /// Most recent results, oldest first. Empty when unknown.
    #[serde(default)]
    pub form: Vec<FormResult>,
    #[serde(default)]
    pub home_record: Option<Record>,
    #[serde(default)]
    pub away_record: Option<Record>,
}

/// Borrowed view of the optional fields that the full-data scoring policy needs.
#[derive(Debug, Clone, Copy)]
pub struct FullProfile<'a> {
    pub stats: &'a TeamStats,
    pub form: &'a [FormResult],
    pub home_record: &'a Record,
    pub away_record: &'a Record,
}

impl Team {
    /// Record-only team, as produced by live feeds and team directories.
    pub fn basic(id: &str, name: &str, logo: &str, record: Record) -> Self {
        Team {
            id: id.to_string(),
            name: name.to_string(),
            logo: logo.to_string(),
            record,
            stats: None,
            form: Vec::new(),
            home_record: None,
            away_record: None,
        }
    }

    /// Returns the full-data view only when every optional field is present.
    pub fn full_profile(&self) -> Option<FullProfile<'_>> {
        if self.form.is_empty() {
            return None;
        }
        Some(FullProfile {
            stats: self.stats.as_ref()?,
            form: &self.form,
            home_record: self.home_record.as_ref()?,
            away_record: self.away_record.as_ref()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
    Postponed,
}

impl GameStatus {
    /// Map a provider status name (e.g. ESPN's `STATUS_HALFTIME`).
    pub fn from_provider(name: &str) -> Self {
        match name.to_lowercase().trim_start_matches("status_") {
            "in_progress" | "halftime" | "end_period" | "end_of_period" | "delayed" => {
                GameStatus::InProgress
            }
            "final" | "full_time" | "final_ot" => GameStatus::Final,
            "postponed" | "canceled" | "cancelled" | "suspended" => GameStatus::Postponed,
            _ => GameStatus::Scheduled,
        }
    }
}

/// Head-to-head wins over the recent meetings window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub home_wins: u32,
    pub away_wins: u32,
}

impl HeadToHead {
    /// Neutral split shown when the series history is unknown.
    pub const NEUTRAL: HeadToHead = HeadToHead {
        home_wins: 5,
        away_wins: 5,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moneyline {
    pub home: f64,
    pub away: f64,
}

/// Point spread. `line` is from the home team's perspective: negative means
/// the home team is favoured by that many points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadLine {
    pub line: f64,
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalLine {
    pub line: f64,
    pub over: f64,
    pub under: f64,
}

/// Bookmaker prices for one game, all American odds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameOdds {
    pub moneyline: Moneyline,
    pub spread: SpreadLine,
    pub total: TotalLine,
}

impl Default for GameOdds {
    fn default() -> Self {
        GameOdds {
            moneyline: Moneyline {
                home: -110.0,
                away: -110.0,
            },
            spread: SpreadLine {
                line: 0.0,
                home: -110.0,
                away: -110.0,
            },
            total: TotalLine {
                line: 220.0,
                over: -110.0,
                under: -110.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    /// Kickoff label for display, e.g. "10:00 PM EST"
    pub time: String,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub odds: GameOdds,
    /// `None` when the series history is unknown
    #[serde(default)]
    pub h2h: Option<HeadToHead>,
}

impl Game {
    pub fn head_to_head(&self) -> HeadToHead {
        self.h2h.unwrap_or(HeadToHead::NEUTRAL)
    }
}

/// A game flattened together with both of its teams, as live feeds deliver it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameData {
    pub game: Game,
    pub home_team: Team,
    pub away_team: Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalSide {
    Over,
    Under,
}

impl std::fmt::Display for TotalSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalSide::Over => write!(f, "Over"),
            TotalSide::Under => write!(f, "Under"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerPick {
    pub side: Side,
    pub team_id: String,
    pub team_name: String,
    /// Model win probability (0–100)
    pub probability: f64,
    /// Probability implied by the moneyline price (0–100)
    pub implied_probability: f64,
    pub value: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadPick {
    pub side: Side,
    /// e.g. "LAL -3.5"
    pub label: String,
    /// Line from the picked side's perspective
    pub line: f64,
    /// Predicted home-minus-away margin
    pub predicted_margin: f64,
    /// Margin-based confidence proxy; may fall outside 0–100
    pub probability: f64,
    pub implied_probability: f64,
    pub value: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalPick {
    pub pick: TotalSide,
    pub line: f64,
    /// Predicted combined score, when scoring averages were available
    pub predicted_total: Option<f64>,
    pub probability: f64,
    pub implied_probability: f64,
    pub value: f64,
    pub confidence: Confidence,
}

/// Output of one game analysis. Recomputed wholesale whenever inputs change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub game: Game,
    pub home_team: Team,
    pub away_team: Team,
    /// Which weight set produced the composite scores
    pub policy: ScoringPolicy,
    pub home_score: f64,
    pub away_score: f64,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    pub winner: WinnerPick,
    pub spread: SpreadPick,
    pub total: TotalPick,
}

impl Prediction {
    /// Clamp a probability for presentation. The engine itself never clamps.
    pub fn display_probability(probability: f64) -> f64 {
        probability.clamp(0.0, 100.0)
    }

    /// "GSW @ LAL" style matchup label using full names.
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team.name, self.home_team.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_win_pct() {
        assert_eq!(Record::new(0, 0).win_pct(), None);
        assert_eq!(Record::new(3, 1).win_pct(), Some(0.75));
    }

    #[test]
    fn test_parse_summary() {
        assert_eq!(Record::parse_summary("47-35"), Some(Record::new(47, 35)));
        assert_eq!(Record::parse_summary(" 0-0 "), Some(Record::new(0, 0)));
        assert_eq!(Record::parse_summary("47-35-2"), None);
        assert_eq!(Record::parse_summary("n/a"), None);
    }

    #[test]
    fn test_full_profile_requires_every_field() {
        let mut team = Team::basic("LAL", "Los Angeles Lakers", "", Record::new(47, 35));
        assert!(team.full_profile().is_none());

        team.stats = Some(TeamStats {
            ppg: 118.0,
            oppg: 117.4,
        });
        team.form = vec![FormResult::Win, FormResult::Loss];
        team.home_record = Some(Record::new(28, 14));
        assert!(team.full_profile().is_none());

        team.away_record = Some(Record::new(19, 21));
        assert!(team.full_profile().is_some());

        team.form.clear();
        assert!(team.full_profile().is_none());
    }

    #[test]
    fn test_status_from_provider() {
        assert_eq!(GameStatus::from_provider("STATUS_SCHEDULED"), GameStatus::Scheduled);
        assert_eq!(GameStatus::from_provider("STATUS_HALFTIME"), GameStatus::InProgress);
        assert_eq!(GameStatus::from_provider("STATUS_FINAL"), GameStatus::Final);
        assert_eq!(GameStatus::from_provider("STATUS_POSTPONED"), GameStatus::Postponed);
        assert_eq!(GameStatus::from_provider("whatever"), GameStatus::Scheduled);
    }

    #[test]
    fn test_team_deserializes_with_missing_optionals() {
        let team: Team = serde_json::from_str(
            r#"{"id":"BOS","name":"Boston Celtics","record":{"wins":64,"losses":18}}"#,
        )
        .unwrap();
        assert_eq!(team.record, Record::new(64, 18));
        assert!(team.stats.is_none());
        assert!(team.form.is_empty());
    }

    #[test]
    fn test_unknown_h2h_is_neutral() {
        let game: Game = serde_json::from_str(
            r#"{"id":"1","homeTeamId":"A","awayTeamId":"B","time":"Custom"}"#,
        )
        .unwrap();
        assert_eq!(game.h2h, None);
        assert_eq!(game.head_to_head(), HeadToHead::NEUTRAL);
        assert_eq!(game.odds, GameOdds::default());
        assert_eq!(game.status, GameStatus::Scheduled);
    }
}
