use crate::analyzers::rarities::*;
use crate::analyzers::scores::*;
use crate::analyzers::{RawAttribute, Trait};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraitProfile {
    pub trait_type: String,
    pub value: String,
    pub rarity: Option<f64>,
    pub tier: Option<TraitTier>,
}

impl From<&Trait> for TraitProfile {
    fn from(t: &Trait) -> Self {
        Self {
            trait_type: t.trait_type.clone(),
            value: t.value.clone(),
            rarity: t.rarity,
            tier: t.tier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RarityProfile {
    pub traits: Vec<TraitProfile>,
    pub raw_trait_score: Option<f64>,
    pub rarity_score: Option<u8>,
    pub rarity_percentile: Option<u8>,
    pub rarity_level: Option<RarityLevel>,
    pub top_percentage: Option<u8>,
    pub market_tier: MarketTier,
    pub market_tier_label: String,
    pub rarest_trait: Option<TraitProfile>,
    pub most_common_trait: Option<TraitProfile>,
    pub avg_trait_rarity: Option<f64>,
    pub collection_avg_trait_rarity: Option<f64>,
}

impl RarityProfile {
    pub fn make(
        attributes: &[RawAttribute],
        frequency_table: Option<&FrequencyTable>,
        floor_price_eth: f64,
    ) -> Self {
        log::info!("Getting trait rarities");
        let traits = resolve_trait_rarity(attributes, frequency_table);

        log::info!("Getting rarity score");
        let result = aggregate_score(&traits, floor_price_eth);
        let market_tier = MarketTier::from_floor(floor_price_eth);

        Self {
            raw_trait_score: result.raw_trait_score,
            rarity_score: result.rarity_score,
            rarity_percentile: result.rarity_percentile,
            rarity_level: result.rarity_score.map(RarityLevel::from_score),
            top_percentage: result.rarity_percentile.map(top_percentage),
            market_tier,
            market_tier_label: market_tier.label().to_string(),
            rarest_trait: rarest_trait(&traits).map(TraitProfile::from),
            most_common_trait: most_common_trait(&traits).map(TraitProfile::from),
            avg_trait_rarity: avg_known_rarity(&traits),
            collection_avg_trait_rarity: frequency_table
                .and_then(|t| t.avg_trait_rarity())
                .map(crate::round2),
            traits: traits.iter().map(TraitProfile::from).collect(),
        }
    }

    pub fn result(&self) -> RarityResult {
        RarityResult {
            raw_trait_score: self.raw_trait_score,
            rarity_score: self.rarity_score,
            rarity_percentile: self.rarity_percentile,
        }
    }
}
