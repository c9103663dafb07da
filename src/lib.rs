//! NBA pick analytics: odds math, matchup scoring, game predictions, pick
//! boards and parlay payouts, plus the feeds and HTTP API that serve them.

pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod feeds;
pub mod models;
