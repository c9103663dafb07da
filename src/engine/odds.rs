//! Conversions between American odds, decimal odds and implied probability.
//!
//! American odds:
//!   +150 → stake 100 to profit 150
//!   −110 → stake 110 to profit 100
//!
//! Decimal odds are the total return per unit staked (stake included), so
//!   +150 → 2.50,  −110 → 1.909…
//!
//! Implied probability is the break-even win rate for the price, expressed
//! here as a percentage (0–100) to match the model's probability scale.
//! No bookmaker margin is removed.
//!
//! Values in the open interval (−100, +100) are not valid American odds.
//! The raw conversions below do not check for them; use
//! [`validate_american_odds`] on anything user-entered.

use crate::error::OddsError;

/// Convert American odds to decimal odds.
pub fn american_to_decimal(odds: f64) -> f64 {
    if odds >= 100.0 {
        odds / 100.0 + 1.0
    } else {
        100.0 / odds.abs() + 1.0
    }
}

/// Implied probability (0–100) of a decimal price.
pub fn decimal_to_implied_probability(decimal: f64) -> f64 {
    100.0 / decimal
}

/// Implied probability (0–100) of an American price.
pub fn implied_probability(american_odds: f64) -> f64 {
    decimal_to_implied_probability(american_to_decimal(american_odds))
}

/// Convert decimal odds (> 1.0) back to American odds.
///
/// Prices of evens or longer (≥ 2.0) become positive odds, shorter prices
/// become negative odds.
pub fn decimal_to_american(decimal: f64) -> f64 {
    if decimal >= 2.0 {
        (decimal - 1.0) * 100.0
    } else {
        -100.0 / (decimal - 1.0)
    }
}

/// Accept only finite odds with |odds| ≥ 100.
pub fn validate_american_odds(odds: f64) -> Result<f64, OddsError> {
    if !odds.is_finite() {
        return Err(OddsError::NotFinite);
    }
    if odds > -100.0 && odds < 100.0 {
        return Err(OddsError::OutOfRange(odds));
    }
    Ok(odds)
}

/// Render a number with an explicit sign for positives: `+150`, `-110`, `+3.5`.
pub fn format_signed(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value > 0.0 {
        format!("+{}", value)
    } else {
        format!("{}", value)
    }
}
