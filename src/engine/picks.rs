//! Ranked pick lists built from a day's predictions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::analyzer::EngineConfig;
use super::parlay::ParlayQuote;
use crate::models::{Confidence, Prediction, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickKind {
    Moneyline,
    Spread,
    Total,
}

/// One row of a pick list, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickCard {
    pub game_id: String,
    pub kind: PickKind,
    /// e.g. "Boston Celtics ML", "BOS -9.5", "Over 210.5"
    pub label: String,
    /// e.g. "Miami Heat @ Boston Celtics"
    pub matchup: String,
    /// Clamped to 0–100; `value` keeps the raw edge
    pub probability: f64,
    pub value: f64,
    pub confidence: Confidence,
    pub is_value: bool,
}

impl PickCard {
    pub fn new(prediction: &Prediction, kind: PickKind, cfg: &EngineConfig) -> Self {
        let (label, probability, value, confidence) = match kind {
            PickKind::Moneyline => (
                format!("{} ML", prediction.winner.team_name),
                prediction.winner.probability,
                prediction.winner.value,
                prediction.winner.confidence,
            ),
            PickKind::Spread => (
                prediction.spread.label.clone(),
                prediction.spread.probability,
                prediction.spread.value,
                prediction.spread.confidence,
            ),
            PickKind::Total => (
                format!("{} {}", prediction.total.pick, prediction.total.line),
                prediction.total.probability,
                prediction.total.value,
                prediction.total.confidence,
            ),
        };
        PickCard {
            game_id: prediction.game.id.clone(),
            kind,
            label,
            matchup: prediction.matchup(),
            probability: Prediction::display_probability(probability),
            value,
            confidence,
            is_value: value > cfg.value_threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlaySuggestion {
    pub legs: Vec<PickCard>,
    /// Combined moneyline price of the legs, if any
    pub quote: Option<ParlayQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickBoard {
    pub top_moneyline: Vec<PickCard>,
    pub top_spread: Vec<PickCard>,
    pub top_total: Vec<PickCard>,
    pub best_value: Vec<PickCard>,
    pub parlay_suggestion: ParlaySuggestion,
}

impl PickBoard {
    /// Rank `predictions` into at most `limit` picks per list, and price the
    /// top moneyline picks as a parlay at `wager`.
    pub fn build(
        predictions: &[Prediction],
        cfg: &EngineConfig,
        limit: usize,
        wager: f64,
    ) -> Self {
        let top_moneyline = top_picks(predictions, PickKind::Moneyline, limit, cfg, |p| {
            p.winner.probability
        });
        let top_spread =
            top_picks(predictions, PickKind::Spread, limit, cfg, |p| p.spread.probability);
        let top_total =
            top_picks(predictions, PickKind::Total, limit, cfg, |p| p.total.probability);

        let mut value: Vec<&Prediction> = predictions
            .iter()
            .filter(|p| p.winner.value > cfg.value_threshold)
            .collect();
        value.sort_by(|a, b| descending(a.winner.value, b.winner.value));
        let best_value = value
            .into_iter()
            .take(limit)
            .map(|p| PickCard::new(p, PickKind::Moneyline, cfg))
            .collect();

        let mut by_winner: Vec<&Prediction> = predictions.iter().collect();
        by_winner.sort_by(|a, b| descending(a.winner.probability, b.winner.probability));
        let parlay_legs: Vec<&Prediction> = by_winner.into_iter().take(limit).collect();
        let quote = ParlayQuote::from_legs(parlay_legs.iter().map(|p| winner_odds(p)), wager);

        PickBoard {
            top_moneyline,
            top_spread,
            top_total,
            best_value,
            parlay_suggestion: ParlaySuggestion {
                legs: parlay_legs
                    .into_iter()
                    .map(|p| PickCard::new(p, PickKind::Moneyline, cfg))
                    .collect(),
                quote,
            },
        }
    }
}

fn top_picks<F>(
    predictions: &[Prediction],
    kind: PickKind,
    limit: usize,
    cfg: &EngineConfig,
    key: F,
) -> Vec<PickCard>
where
    F: Fn(&Prediction) -> f64,
{
    let mut ranked: Vec<&Prediction> = predictions.iter().collect();
    ranked.sort_by(|a, b| descending(key(a), key(b)));
    ranked
        .into_iter()
        .take(limit)
        .map(|p| PickCard::new(p, kind, cfg))
        .collect()
}

fn winner_odds(p: &Prediction) -> f64 {
    match p.winner.side {
        Side::Home => p.game.odds.moneyline.home,
        Side::Away => p.game.odds.moneyline.away,
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyzer::analyze_game;
    use crate::models::{Game, GameOdds, GameStatus, Moneyline, Record, Team};

    fn prediction(id: &str, home_wins: u32, home_ml: f64) -> Prediction {
        let home = Team::basic(
            &format!("H{}", id),
            &format!("Home {}", id),
            "",
            Record::new(home_wins, 82 - home_wins),
        );
        let away = Team::basic(
            &format!("A{}", id),
            &format!("Away {}", id),
            "",
            Record::new(41, 41),
        );
        let game = Game {
            id: id.to_string(),
            home_team_id: home.id.clone(),
            away_team_id: away.id.clone(),
            time: "7:30 PM EST".into(),
            status: GameStatus::Scheduled,
            odds: GameOdds {
                moneyline: Moneyline { home: home_ml, away: 100.0 },
                ..GameOdds::default()
            },
            h2h: None,
        };
        analyze_game(&game, &home, &away, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_moneyline_ranked_by_probability() {
        let preds = vec![
            prediction("G1", 45, -110.0),
            prediction("G2", 70, -110.0),
            prediction("G3", 55, -110.0),
            prediction("G4", 50, -110.0),
        ];
        let board = PickBoard::build(&preds, &EngineConfig::default(), 3, 10.0);

        let ids: Vec<&str> = board.top_moneyline.iter().map(|c| c.game_id.as_str()).collect();
        assert_eq!(ids, vec!["G2", "G3", "G4"]);
        assert_eq!(board.top_moneyline[0].label, "Home G2 ML");
        assert_eq!(board.top_moneyline[0].matchup, "Away G2 @ Home G2");
        assert_eq!(board.top_spread.len(), 3);
        assert_eq!(board.top_total.len(), 3);
    }

    #[test]
    fn test_best_value_filters_on_threshold() {
        // +200 implies 33.3%, far below the model's view of a 70-12 home side.
        let preds = vec![prediction("G1", 70, 200.0), prediction("G2", 70, -1000.0)];
        let board = PickBoard::build(&preds, &EngineConfig::default(), 3, 10.0);

        assert_eq!(board.best_value.len(), 1);
        assert_eq!(board.best_value[0].game_id, "G1");
        assert!(board.best_value[0].is_value);
    }

    #[test]
    fn test_parlay_suggestion_prices_top_legs() {
        let preds = vec![prediction("G1", 60, 150.0), prediction("G2", 70, -200.0)];
        let board = PickBoard::build(&preds, &EngineConfig::default(), 3, 10.0);

        let parlay = &board.parlay_suggestion;
        assert_eq!(parlay.legs.len(), 2);
        let quote = parlay.quote.unwrap();
        approx::assert_relative_eq!(quote.decimal_odds, 1.5 * 2.5, epsilon = 1e-9);
        approx::assert_relative_eq!(quote.payout, 37.5, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_board() {
        let board = PickBoard::build(&[], &EngineConfig::default(), 3, 10.0);
        assert!(board.top_moneyline.is_empty());
        assert!(board.best_value.is_empty());
        assert!(board.parlay_suggestion.quote.is_none());
    }

    #[test]
    fn test_card_probability_clamped_for_display() {
        let home = Team::basic("H", "Home", "", Record::new(82, 0));
        let away = Team::basic("A", "Away", "", Record::new(0, 82));
        let mut game = Game {
            id: "G1".into(),
            home_team_id: home.id.clone(),
            away_team_id: away.id.clone(),
            time: "7:30 PM EST".into(),
            status: GameStatus::Scheduled,
            odds: GameOdds::default(),
            h2h: None,
        };
        game.odds.spread.line = 30.0;
        let cfg = EngineConfig::default();
        let p = analyze_game(&game, &home, &away, &cfg).unwrap();
        // margin 40 against a +30 line: 50 + 1.5 × 70
        assert_eq!(p.spread.probability, 155.0);

        let card = PickCard::new(&p, PickKind::Spread, &cfg);
        assert_eq!(card.probability, 100.0);
        assert_eq!(card.value, p.spread.value);
        assert!(card.value > 100.0 - 52.5);
    }
}
