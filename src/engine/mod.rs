pub mod analyzer;
pub mod odds;
pub mod parlay;
pub mod picks;
pub mod scoring;
pub mod simulator;

pub use analyzer::{analyze_game, analyze_live, analyze_slate, ConfidenceTiers, EngineConfig};
pub use parlay::{LegId, ParlayLeg, ParlayQuote, ParlaySlip};
pub use picks::{PickBoard, PickCard, PickKind};
pub use scoring::{ScoringConfig, ScoringPolicy};
pub use simulator::simulate_matchup;
