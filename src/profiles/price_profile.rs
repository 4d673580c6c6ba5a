use crate::analyzers::prices::*;
use crate::analyzers::sales::{last_sale, SaleRecord};
use crate::analyzers::sanitize_eth;
use crate::analyzers::scores::RarityResult;
use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceProfile {
    pub floor_price: f64,
    /// False when the valuation below was made from the fallback score.
    pub rarity_available: bool,
    pub valuation_score: u8,
    pub valuation: ValuationResult,
    pub premium_pct: i64,
    pub last_sale: Option<f64>,
    pub last_sale_relative_floor: Option<f64>,
}

impl PriceProfile {
    pub fn make(
        floor_price_eth: f64,
        rarity: &RarityResult,
        sales: &[SaleRecord],
        settings: &Settings,
    ) -> Self {
        let floor_price = sanitize_eth(floor_price_eth);
        let valuation_score = rarity
            .rarity_score
            .unwrap_or(settings.rarity_fallback_score);

        log::info!("Getting valuation");
        let valuation = estimate_value(valuation_score as f64, floor_price);

        log::info!("Getting last_sale");
        let last_sale = last_sale(sales).and_then(|s| s.price);

        Self {
            floor_price,
            rarity_available: rarity.is_available(),
            valuation_score,
            premium_pct: valuation.premium_pct(),
            valuation,
            last_sale,
            last_sale_relative_floor: last_sale
                .filter(|_| floor_price > 0f64)
                .map(|p| crate::round2(p / floor_price)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(price: Option<f64>, block_number: u64) -> SaleRecord {
        SaleRecord {
            marketplace: "seaport".to_string(),
            price,
            price_symbol: "ETH".to_string(),
            buyer: None,
            seller: None,
            block_number: Some(block_number),
            transaction_hash: None,
        }
    }

    #[test]
    fn test_price_profile() {
        let rarity = RarityResult {
            raw_trait_score: Some(93.0),
            rarity_score: Some(92),
            rarity_percentile: Some(92),
        };
        let sales = vec![sale(Some(3.0), 10), sale(Some(5.0), 30), sale(Some(4.0), 20)];

        let profile = PriceProfile::make(2.0, &rarity, &sales, &Settings::default());

        assert!(profile.rarity_available);
        assert_eq!(profile.valuation.estimated_value_eth, 7.0);
        assert_eq!(profile.valuation.band, Band::AboveFloor);
        assert_eq!(profile.premium_pct, 250);
        assert_eq!(profile.last_sale, Some(5.0));
        assert_eq!(profile.last_sale_relative_floor, Some(2.5));
    }

    #[test]
    fn test_fallback_score_when_rarity_missing() {
        let profile = PriceProfile::make(
            1.0,
            &RarityResult::insufficient_data(),
            &[],
            &Settings::default(),
        );

        assert!(!profile.rarity_available);
        assert_eq!(profile.valuation_score, 50);
        assert_eq!(profile.valuation.multiplier, 1.0);
        assert_eq!(profile.valuation.band, Band::AtFloor);
        assert_eq!(profile.last_sale, None);

        let settings = Settings {
            rarity_fallback_score: 85,
            ..Default::default()
        };
        let profile = PriceProfile::make(1.0, &RarityResult::insufficient_data(), &[], &settings);
        assert_eq!(profile.valuation.estimated_value_eth, 2.0);
    }

    #[test]
    fn test_no_floor() {
        let rarity = RarityResult {
            raw_trait_score: Some(40.0),
            rarity_score: Some(18),
            rarity_percentile: Some(18),
        };
        let profile = PriceProfile::make(f64::NAN, &rarity, &[sale(Some(0.4), 1)], &Settings::default());
        assert_eq!(profile.floor_price, 0.0);
        assert_eq!(profile.valuation.estimated_value_eth, 0.0);
        assert_eq!(profile.last_sale_relative_floor, None);
    }
}
