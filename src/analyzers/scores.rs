use super::{sanitize_eth, Trait};

/// Lower bound applied to the harmonic mean before taking its log.
pub static MIN_HARMONIC_MEAN: f64 = 0.1;

static SCORE_BASE: f64 = 85f64;
static SCORE_SLOPE: f64 = 35f64;

/// Collection bracket derived from the floor price. Rare traits in a cheap
/// collection are scaled down and capped by their bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTier {
    LowValue,
    Budget,
    MidTier,
    Established,
    BlueChip,
}

impl MarketTier {
    pub fn from_floor(floor_price_eth: f64) -> Self {
        let floor = sanitize_eth(floor_price_eth);
        if floor < 0.5 {
            MarketTier::LowValue
        } else if floor < 1f64 {
            MarketTier::Budget
        } else if floor < 3f64 {
            MarketTier::MidTier
        } else if floor < 10f64 {
            MarketTier::Established
        } else {
            MarketTier::BlueChip
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            MarketTier::LowValue => 0.45,
            MarketTier::Budget => 0.55,
            MarketTier::MidTier => 0.7,
            MarketTier::Established => 0.85,
            MarketTier::BlueChip => 1.0,
        }
    }

    pub fn max_score(&self) -> u8 {
        match self {
            MarketTier::LowValue => 45,
            MarketTier::Budget => 55,
            MarketTier::MidTier => 70,
            MarketTier::Established => 85,
            MarketTier::BlueChip => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketTier::LowValue => "Low Value (< 0.5 ETH)",
            MarketTier::Budget => "Budget (0.5-1 ETH)",
            MarketTier::MidTier => "Mid-Tier (1-3 ETH)",
            MarketTier::Established => "Established (3-10 ETH)",
            MarketTier::BlueChip => "Blue Chip (10+ ETH)",
        }
    }
}

/// Outcome of score aggregation. All three fields are `None` together when
/// no trait had a known, positive prevalence.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RarityResult {
    pub raw_trait_score: Option<f64>,
    pub rarity_score: Option<u8>,
    pub rarity_percentile: Option<u8>,
}

impl RarityResult {
    pub fn insufficient_data() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.rarity_score.is_some()
    }
}

pub fn harmonic_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let reciprocal_sum = values.iter().map(|v| 1f64 / v).sum::<f64>();
    Some(values.len() as f64 / reciprocal_sum)
}

/// Maps a harmonic mean prevalence (percent) onto 0..=100, rarer is higher.
pub fn raw_trait_score(harmonic_mean: f64) -> f64 {
    let log_rarity = f64::max(MIN_HARMONIC_MEAN, harmonic_mean).log10();
    (SCORE_BASE - log_rarity * SCORE_SLOPE).clamp(0f64, 100f64)
}

/// Reduces annotated traits and the collection floor price to one bounded score.
///
/// Traits with unknown or zero prevalence are left out. The percentile mirrors
/// the score; it is not ranked against the rest of the collection.
pub fn aggregate_score(traits: &[Trait], floor_price_eth: f64) -> RarityResult {
    let valid = traits
        .iter()
        .filter_map(|t| t.rarity)
        .filter(|r| *r > 0f64)
        .collect::<Vec<_>>();

    let raw = match harmonic_mean(&valid) {
        Some(mean) => raw_trait_score(mean),
        None => return RarityResult::insufficient_data(),
    };

    let tier = MarketTier::from_floor(floor_price_eth);
    let scaled = (raw * tier.multiplier()).round().clamp(0f64, 100f64) as u8;
    let rarity_score = u8::min(tier.max_score(), scaled);

    RarityResult {
        raw_trait_score: Some(raw),
        rarity_score: Some(rarity_score),
        rarity_percentile: Some(rarity_score),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityLevel {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl RarityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => RarityLevel::Legendary,
            75..=89 => RarityLevel::Epic,
            50..=74 => RarityLevel::Rare,
            25..=49 => RarityLevel::Uncommon,
            _ => RarityLevel::Common,
        }
    }
}

/// "Top N%" figure shown next to a percentile, never below 1.
pub fn top_percentage(percentile: u8) -> u8 {
    u8::max(1, 100u8.saturating_sub(percentile))
}
