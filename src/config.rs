use crate::errors::ProfileError;
use anyhow::Result;
use std::str::FromStr;

pub static DEFAULT_TOTAL_SUPPLY: u64 = 10_000;
pub static DEFAULT_FLOOR_PRICE_ETH: f64 = 0.0;
/// Score fed to valuation when a token's rarity cannot be computed.
pub static RARITY_FALLBACK_SCORE: u8 = 50;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    pub default_total_supply: u64,
    pub frequency_cache_ttl_secs: Option<u64>,
    pub frequency_cache_size: Option<usize>,
    pub rarity_fallback_score: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_total_supply: DEFAULT_TOTAL_SUPPLY,
            frequency_cache_ttl_secs: None,
            frequency_cache_size: None,
            rarity_fallback_score: RARITY_FALLBACK_SCORE,
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => match value.parse::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(_) => Err(ProfileError::InvalidSetting {
                key: key.to_string(),
                value,
            }
            .into()),
        },
        None => Ok(None),
    }
}

fn positive<T: PartialEq + Default + ToString>(key: &str, value: Option<T>) -> Result<Option<T>> {
    match value {
        Some(v) if v == T::default() => Err(ProfileError::InvalidSetting {
            key: key.to_string(),
            value: v.to_string(),
        }
        .into()),
        v => Ok(v),
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_total_supply = positive(
            "DEFAULT_TOTAL_SUPPLY",
            parse("DEFAULT_TOTAL_SUPPLY", lookup("DEFAULT_TOTAL_SUPPLY"))?,
        )?
        .unwrap_or(defaults.default_total_supply);

        let frequency_cache_ttl_secs = positive(
            "FREQUENCY_CACHE_TTL_SECS",
            parse("FREQUENCY_CACHE_TTL_SECS", lookup("FREQUENCY_CACHE_TTL_SECS"))?,
        )?;

        let frequency_cache_size = positive(
            "FREQUENCY_CACHE_SIZE",
            parse("FREQUENCY_CACHE_SIZE", lookup("FREQUENCY_CACHE_SIZE"))?,
        )?;

        let rarity_fallback_score = match parse::<u8>(
            "RARITY_FALLBACK_SCORE",
            lookup("RARITY_FALLBACK_SCORE"),
        )? {
            Some(score) if score > 100 => {
                return Err(ProfileError::InvalidSetting {
                    key: "RARITY_FALLBACK_SCORE".to_string(),
                    value: score.to_string(),
                }
                .into())
            }
            Some(score) => score,
            None => defaults.rarity_fallback_score,
        };

        Ok(Self {
            default_total_supply,
            frequency_cache_ttl_secs,
            frequency_cache_size,
            rarity_fallback_score,
        })
    }
}
