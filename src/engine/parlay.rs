//! Parlay payout arithmetic.
//!
//! A parlay pays only if every leg wins, so the legs' decimal odds multiply:
//!   combined = Π decimal(legᵢ)
//!   payout   = wager × combined      (stake included)

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::odds::{american_to_decimal, decimal_to_american, format_signed, validate_american_odds};

/// Opaque handle for a leg, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegId(u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayLeg {
    pub id: LegId,
    pub description: String,
    /// American odds
    pub odds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParlayQuote {
    pub decimal_odds: f64,
    pub american_odds: f64,
    /// `american_odds` rounded for display
    pub american_display: i64,
    pub payout: f64,
}

impl ParlayQuote {
    /// Price the given American odds as one parlay. `None` when `odds` is empty.
    pub fn from_legs<I>(odds: I, wager: f64) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut legs = odds.into_iter().peekable();
        legs.peek()?;
        let decimal_odds: f64 = legs.map(american_to_decimal).product();
        let american_odds = decimal_to_american(decimal_odds);
        let wager = if wager.is_finite() { wager.max(0.0) } else { 0.0 };

        Some(ParlayQuote {
            decimal_odds,
            american_odds,
            american_display: american_odds.round() as i64,
            payout: wager * decimal_odds,
        })
    }

    /// Rounded American odds with an explicit sign, e.g. `+320`.
    pub fn format_american(&self) -> String {
        format_signed(self.american_display as f64)
    }
}

/// Ordered list of user-entered legs.
#[derive(Debug, Clone, Default)]
pub struct ParlaySlip {
    legs: Vec<ParlayLeg>,
    next_id: u64,
}

impl ParlaySlip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn legs(&self) -> &[ParlayLeg] {
        &self.legs
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Add a leg from raw form input. Blank descriptions, unparseable odds and
    /// odds inside (−100, +100) are dropped without error.
    pub fn add_leg(&mut self, description: &str, odds_text: &str) -> Option<LegId> {
        let description = description.trim();
        if description.is_empty() {
            debug!("Parlay leg rejected: empty description");
            return None;
        }
        let odds = match odds_text.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                debug!("Parlay leg rejected: odds {:?} not numeric", odds_text);
                return None;
            }
        };
        if let Err(e) = validate_american_odds(odds) {
            debug!("Parlay leg rejected: {}", e);
            return None;
        }

        let id = LegId(self.next_id);
        self.next_id += 1;
        self.legs.push(ParlayLeg {
            id,
            description: description.to_string(),
            odds,
        });
        Some(id)
    }

    /// Remove a leg. Returns `false` if no leg has that id.
    pub fn remove_leg(&mut self, id: LegId) -> bool {
        let before = self.legs.len();
        self.legs.retain(|leg| leg.id != id);
        self.legs.len() != before
    }

    /// Combined price and payout for `wager`. `None` while the slip is empty.
    pub fn quote(&self, wager: f64) -> Option<ParlayQuote> {
        ParlayQuote::from_legs(self.legs.iter().map(|leg| leg.odds), wager)
    }
}
