use super::analyzer::{analyze_game, EngineConfig};
use crate::models::{Game, GameOdds, GameStatus, Moneyline, Prediction, SpreadLine, Team, TotalLine};

/// Id given to the synthetic game built for a simulated matchup.
pub const SIMULATED_GAME_ID: &str = "SIMULATED";

/// Stand-in prices for a matchup that has no real market.
pub fn simulated_odds() -> GameOdds {
    GameOdds {
        moneyline: Moneyline {
            home: -150.0,
            away: 130.0,
        },
        spread: SpreadLine {
            line: -3.5,
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

/// Run the analyzer on an arbitrary pairing, `home` hosting `away`.
///
/// Returns `None` when both sides are the same team.
pub fn simulate_matchup(home: &Team, away: &Team, cfg: &EngineConfig) -> Option<Prediction> {
    if home.id == away.id {
        return None;
    }
    let game = Game {
        id: SIMULATED_GAME_ID.to_string(),
        home_team_id: home.id.clone(),
        away_team_id: away.id.clone(),
        time: "Custom".to_string(),
        status: GameStatus::Scheduled,
        odds: simulated_odds(),
        h2h: None,
    };
    analyze_game(&game, home, away, cfg)
}
