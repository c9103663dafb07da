//! Turns two composite team scores into moneyline, spread and total picks.

use std::collections::HashMap;

use tracing::debug;

use super::odds::{format_signed, implied_probability};
use super::scoring::{score_matchup, ScoringConfig, ScoringPolicy};
use crate::models::{
    Confidence, Game, LiveGameData, Prediction, Side, SpreadPick, Team, TotalPick, TotalSide,
    WinnerPick,
};

/// Probability cut-offs for the confidence tiers. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceTiers {
    pub high_above: f64,
    pub medium_above: f64,
}

impl Default for ConfidenceTiers {
    fn default() -> Self {
        ConfidenceTiers {
            high_above: 65.0,
            medium_above: 55.0,
        }
    }
}

impl ConfidenceTiers {
    pub fn classify(&self, probability: f64) -> Confidence {
        if probability > self.high_above {
            Confidence::High
        } else if probability > self.medium_above {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// Every tunable the engine uses, passed in at call time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub tiers: ConfidenceTiers,
    /// Spread confidence points per point of margin when scoring averages exist
    pub stats_spread_factor: f64,
    /// Coarser spread factor for record-only matchups
    pub record_spread_factor: f64,
    /// Points of predicted margin per 1.0 of win-percentage difference. A team
    /// with no games played counts as .500 here, not as winless.
    pub win_pct_to_points: f64,
    /// Total confidence points per point between predicted total and the line
    pub total_margin_factor: f64,
    /// Total probability used when no scoring averages are available
    pub total_floor_probability: f64,
    /// Minimum winner value for a pick to count as a value bet
    pub value_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            scoring: ScoringConfig::default(),
            tiers: ConfidenceTiers::default(),
            stats_spread_factor: 2.5,
            record_spread_factor: 1.5,
            win_pct_to_points: 40.0,
            total_margin_factor: 1.5,
            total_floor_probability: 51.5,
            value_threshold: 2.0,
        }
    }
}

/// Analyze one game.
///
/// Returns `None` when the supplied teams are not the ones the game refers
/// to, or when the composite scores cannot be normalised.
pub fn analyze_game(
    game: &Game,
    home: &Team,
    away: &Team,
    cfg: &EngineConfig,
) -> Option<Prediction> {
    if home.id != game.home_team_id || away.id != game.away_team_id {
        debug!(
            "Game {}: teams {}/{} do not match {}/{}",
            game.id, home.id, away.id, game.home_team_id, game.away_team_id
        );
        return None;
    }

    let scores = score_matchup(game, home, away, &cfg.scoring);
    let combined = scores.home.total + scores.away.total;
    if !combined.is_finite() || combined <= 0.0 {
        debug!("Game {}: degenerate composite scores ({})", game.id, combined);
        return None;
    }

    let home_win_probability = scores.home.total / combined * 100.0;
    let away_win_probability = 100.0 - home_win_probability;

    let winner = winner_pick(game, home, away, home_win_probability, away_win_probability, cfg);

    // Net-rating edge is only trusted when the full policy was applied.
    let stats = match (scores.policy, home.stats, away.stats) {
        (ScoringPolicy::Full, Some(h), Some(a)) => Some((h, a)),
        _ => None,
    };

    let (predicted_margin, spread_factor) = match stats {
        Some((h, a)) => (h.net_rating() - a.net_rating(), cfg.stats_spread_factor),
        None => {
            let home_pct = home.record.win_pct().unwrap_or(0.5);
            let away_pct = away.record.win_pct().unwrap_or(0.5);
            (
                (home_pct - away_pct) * cfg.win_pct_to_points,
                cfg.record_spread_factor,
            )
        }
    };
    let spread = spread_pick(game, home, away, predicted_margin, spread_factor, cfg);

    let predicted_total = stats.map(|(h, a)| (h.ppg + a.oppg) / 2.0 + (a.ppg + h.oppg) / 2.0);
    let total = total_pick(game, predicted_total, cfg);

    Some(Prediction {
        game: game.clone(),
        home_team: home.clone(),
        away_team: away.clone(),
        policy: scores.policy,
        home_score: scores.home.total,
        away_score: scores.away.total,
        home_win_probability,
        away_win_probability,
        winner,
        spread,
        total,
    })
}

/// Analyze a schedule against a team directory. Games whose teams cannot be
/// resolved are left out.
pub fn analyze_slate(games: &[Game], teams: &[Team], cfg: &EngineConfig) -> Vec<Prediction> {
    let by_id: HashMap<&str, &Team> = teams.iter().map(|t| (t.id.as_str(), t)).collect();

    games
        .iter()
        .filter_map(|game| {
            let home = by_id.get(game.home_team_id.as_str());
            let away = by_id.get(game.away_team_id.as_str());
            match (home, away) {
                (Some(home), Some(away)) => {
                    debug!(
                        "Game {}: {:?} scoring",
                        game.id,
                        ScoringPolicy::select(game, home, away)
                    );
                    analyze_game(game, home, away, cfg)
                }
                _ => {
                    debug!(
                        "Skipping game {}: unresolved team ({} or {})",
                        game.id, game.home_team_id, game.away_team_id
                    );
                    None
                }
            }
        })
        .collect()
}

/// Analyze games that arrive already bundled with their teams.
pub fn analyze_live(slate: &[LiveGameData], cfg: &EngineConfig) -> Vec<Prediction> {
    slate
        .iter()
        .filter_map(|g| analyze_game(&g.game, &g.home_team, &g.away_team, cfg))
        .collect()
}

fn winner_pick(
    game: &Game,
    home: &Team,
    away: &Team,
    home_probability: f64,
    away_probability: f64,
    cfg: &EngineConfig,
) -> WinnerPick {
    // Home keeps the pick unless away is strictly ahead.
    let (side, team, probability, odds) = if away_probability > home_probability {
        (Side::Away, away, away_probability, game.odds.moneyline.away)
    } else {
        (Side::Home, home, home_probability, game.odds.moneyline.home)
    };
    let implied = implied_probability(odds);

    WinnerPick {
        side,
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        probability,
        implied_probability: implied,
        value: probability - implied,
        confidence: cfg.tiers.classify(probability),
    }
}

fn spread_pick(
    game: &Game,
    home: &Team,
    away: &Team,
    predicted_margin: f64,
    factor: f64,
    cfg: &EngineConfig,
) -> SpreadPick {
    let spread = &game.odds.spread;
    // Home covers when it wins by more than it gives away.
    let cover_margin = -spread.line;

    let (side, team, line, odds) = if predicted_margin > cover_margin {
        (Side::Home, home, spread.line, spread.home)
    } else {
        (Side::Away, away, -spread.line, spread.away)
    };

    let probability = 50.0 + factor * (predicted_margin - cover_margin).abs();
    let implied = implied_probability(odds);

    SpreadPick {
        side,
        label: format!("{} {}", team.id, format_signed(line)),
        line,
        predicted_margin,
        probability,
        implied_probability: implied,
        value: probability - implied,
        confidence: cfg.tiers.classify(probability),
    }
}

fn total_pick(game: &Game, predicted_total: Option<f64>, cfg: &EngineConfig) -> TotalPick {
    let total = &game.odds.total;

    let (pick, probability) = match predicted_total {
        Some(predicted) => {
            let pick = if predicted > total.line {
                TotalSide::Over
            } else {
                TotalSide::Under
            };
            (pick, 50.0 + cfg.total_margin_factor * (predicted - total.line).abs())
        }
        None => {
            // Without scoring data, lean to whichever side the book prices shorter.
            let pick = if total.over < total.under {
                TotalSide::Over
            } else {
                TotalSide::Under
            };
            (pick, cfg.total_floor_probability)
        }
    };

    let odds = match pick {
        TotalSide::Over => total.over,
        TotalSide::Under => total.under,
    };
    let implied = implied_probability(odds);

    TotalPick {
        pick,
        line: total.line,
        predicted_total,
        probability,
        implied_probability: implied,
        value: probability - implied,
        confidence: cfg.tiers.classify(probability),
    }
}
