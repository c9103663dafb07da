//! Composite team scores for a single matchup.
//!
//! Each team gets a score on a nominal 0–100 scale (the stats component is
//! unbounded, so extreme matchups can land outside it). Two weight sets
//! exist, and exactly one is used for both teams of a game:
//!
//! - **Full**: record 20%, recent form 30%, scoring margin vs opponent 25%,
//!   home/away split 15%, head-to-head 10%. Requires stats, form and
//!   home/away splits on *both* teams plus a known head-to-head series.
//! - **Record only**: record 70%, static location bonus 30%. Used whenever
//!   any of the above is missing, e.g. for live feeds that only carry W-L.

use serde::{Deserialize, Serialize};

use crate::models::{FormResult, FullProfile, Game, HeadToHead, Record, Team, TeamStats};

/// Score used for a team that has not played yet.
pub const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    Full,
    RecordOnly,
}

impl ScoringPolicy {
    /// The policy that [`score_matchup`] will apply to this game.
    pub fn select(game: &Game, home: &Team, away: &Team) -> Self {
        Strategy::select(game, home, away).policy()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullWeights {
    pub record: f64,
    pub form: f64,
    pub stats: f64,
    pub location: f64,
    pub h2h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordOnlyWeights {
    pub record: f64,
    pub location: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub full: FullWeights,
    pub record_only: RecordOnlyWeights,
    /// Static location score for the home side under the record-only policy
    pub home_location_score: f64,
    /// Static location score for the away side under the record-only policy
    pub away_location_score: f64,
    /// Number of recent meetings the head-to-head split covers
    pub h2h_window: u32,
    /// Score points per point of net-rating edge
    pub stats_margin_factor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            full: FullWeights {
                record: 0.20,
                form: 0.30,
                stats: 0.25,
                location: 0.15,
                h2h: 0.10,
            },
            record_only: RecordOnlyWeights {
                record: 0.70,
                location: 0.30,
            },
            home_location_score: 65.0,
            away_location_score: 35.0,
            h2h_window: 10,
            stats_margin_factor: 2.5,
        }
    }
}

/// Per-component scores for one team. Components the policy does not use are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub record: f64,
    pub form: Option<f64>,
    pub stats: Option<f64>,
    pub location: f64,
    pub h2h: Option<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchupScores {
    pub policy: ScoringPolicy,
    pub home: ScoreBreakdown,
    pub away: ScoreBreakdown,
}

/// Win percentage as 0–100, or [`NEUTRAL_SCORE`] with no games played.
pub fn record_score(record: &Record) -> f64 {
    record.win_pct().map_or(NEUTRAL_SCORE, |pct| pct * 100.0)
}

/// Share of wins in the recent-form window, as 0–100.
pub fn form_score(form: &[FormResult]) -> f64 {
    if form.is_empty() {
        return NEUTRAL_SCORE;
    }
    let wins = form.iter().filter(|r| **r == FormResult::Win).count();
    wins as f64 / form.len() as f64 * 100.0
}

/// `50 + factor × (own net rating − opponent net rating)`. Unbounded.
pub fn stats_score(team: &TeamStats, opponent: &TeamStats, factor: f64) -> f64 {
    NEUTRAL_SCORE + factor * (team.net_rating() - opponent.net_rating())
}

/// Head-to-head wins over the window, as 0–100.
pub fn h2h_score(wins: u32, window: u32) -> f64 {
    if window == 0 {
        return NEUTRAL_SCORE;
    }
    wins as f64 / window as f64 * 100.0
}

/// Score both sides of a game with whichever policy the available data allows.
pub fn score_matchup(game: &Game, home: &Team, away: &Team, cfg: &ScoringConfig) -> MatchupScores {
    let strategy = Strategy::select(game, home, away);
    let (home_score, away_score) = match strategy {
        Strategy::Full {
            home: home_profile,
            away: away_profile,
            h2h,
        } => (
            full_score(&home.record, &home_profile, &away_profile, true, h2h.home_wins, cfg),
            full_score(&away.record, &away_profile, &home_profile, false, h2h.away_wins, cfg),
        ),
        Strategy::RecordOnly => (
            record_only_score(&home.record, true, cfg),
            record_only_score(&away.record, false, cfg),
        ),
    };
    MatchupScores {
        policy: strategy.policy(),
        home: home_score,
        away: away_score,
    }
}

/// The chosen policy together with the data it was chosen on.
enum Strategy<'a> {
    Full {
        home: FullProfile<'a>,
        away: FullProfile<'a>,
        h2h: HeadToHead,
    },
    RecordOnly,
}

impl<'a> Strategy<'a> {
    fn select(game: &Game, home: &'a Team, away: &'a Team) -> Self {
        match (home.full_profile(), away.full_profile(), game.h2h) {
            (Some(home), Some(away), Some(h2h)) => Strategy::Full { home, away, h2h },
            _ => Strategy::RecordOnly,
        }
    }

    fn policy(&self) -> ScoringPolicy {
        match self {
            Strategy::Full { .. } => ScoringPolicy::Full,
            Strategy::RecordOnly => ScoringPolicy::RecordOnly,
        }
    }
}

fn full_score(
    record: &Record,
    team: &FullProfile<'_>,
    opponent: &FullProfile<'_>,
    is_home: bool,
    h2h_wins: u32,
    cfg: &ScoringConfig,
) -> ScoreBreakdown {
    let w = &cfg.full;
    let record = record_score(record);
    let form = form_score(team.form);
    let stats = stats_score(team.stats, opponent.stats, cfg.stats_margin_factor);
    let split = if is_home {
        team.home_record
    } else {
        team.away_record
    };
    let location = record_score(split);
    let h2h = h2h_score(h2h_wins, cfg.h2h_window);

    let total = record * w.record
        + form * w.form
        + stats * w.stats
        + location * w.location
        + h2h * w.h2h;

    ScoreBreakdown {
        record,
        form: Some(form),
        stats: Some(stats),
        location,
        h2h: Some(h2h),
        total,
    }
}

fn record_only_score(record: &Record, is_home: bool, cfg: &ScoringConfig) -> ScoreBreakdown {
    let w = &cfg.record_only;
    let record = record_score(record);
    let location = if is_home {
        cfg.home_location_score
    } else {
        cfg.away_location_score
    };

    ScoreBreakdown {
        record,
        form: None,
        stats: None,
        location,
        h2h: None,
        total: record * w.record + location * w.location,
    }
}
