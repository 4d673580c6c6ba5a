use super::sanitize_eth;
use crate::round2;

/// Above this multiplier an item is priced meaningfully over floor.
static ABOVE_FLOOR_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    AboveFloor,
    BelowFloor,
    AtFloor,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValuationResult {
    pub multiplier: f64,
    pub estimated_value_eth: f64,
    pub band: Band,
}

impl ValuationResult {
    /// Premium over floor in whole percent, e.g. 250 for a 3.5x multiplier.
    pub fn premium_pct(&self) -> i64 {
        ((self.multiplier - 1f64) * 100f64).round() as i64
    }
}

/// Floor multiple for a 0-100 rarity score, highest threshold first.
pub fn valuation_multiplier(rarity_score: f64) -> f64 {
    if rarity_score >= 90f64 {
        3.5
    } else if rarity_score >= 80f64 {
        2.0
    } else if rarity_score >= 60f64 {
        1.3
    } else {
        1.0
    }
}

pub fn band_for(multiplier: f64) -> Band {
    if multiplier > ABOVE_FLOOR_MULTIPLIER {
        Band::AboveFloor
    } else if multiplier < 1f64 {
        Band::BelowFloor
    } else {
        Band::AtFloor
    }
}

/// Estimates an item's value as a multiple of the collection floor.
pub fn estimate_value(rarity_score: f64, floor_price_eth: f64) -> ValuationResult {
    let multiplier = valuation_multiplier(rarity_score);

    ValuationResult {
        multiplier,
        estimated_value_eth: round2(sanitize_eth(floor_price_eth) * multiplier),
        band: band_for(multiplier),
    }
}
