pub mod history_profile;
pub mod price_profile;
pub mod rarity_profile;
pub mod risk_profile;
pub mod token_profile;

use crate::alchemy::NftDataSource;
use crate::analyzers::rarities::FrequencyTable;
use crate::config::{Settings, DEFAULT_FLOOR_PRICE_ETH};
use crate::errors::ProfileError;
use crate::storage::FrequencyCache;
use anyhow::Result;
use std::sync::Arc;

/// Optional profile inputs degrade to a fallback instead of failing the profile.
pub(crate) fn or_degraded<T>(step: &str, result: Result<T>, fallback: T) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            log::warn!("{} unavailable, using fallback: {}", step, e);
            fallback
        }
    }
}

/// Collection floor in ETH from the OpenSea feed, 0 when unknown.
pub async fn get_floor_price(source: &dyn NftDataSource, contract: &str) -> f64 {
    let floor = source
        .floor_price(contract)
        .await
        .map(|f| f.open_sea_floor().unwrap_or(DEFAULT_FLOOR_PRICE_ETH));

    or_degraded("floor_price", floor, DEFAULT_FLOOR_PRICE_ETH)
}

async fn fetch_frequency_table(
    source: &dyn NftDataSource,
    settings: &Settings,
    contract: &str,
) -> Result<FrequencyTable> {
    match source.collection_summary(contract).await {
        Ok(summary) => Ok(FrequencyTable::from_summary(
            &summary.summary,
            summary.total_supply,
            settings.default_total_supply,
        )),
        Err(e) => {
            log::warn!("No attribute summary for {}, sampling items: {}", contract, e);
            let sample = source.collection_sample(contract).await?;
            if sample.is_empty() {
                return Err(ProfileError::MissingData(format!(
                    "trait frequencies for {}",
                    contract
                ))
                .into());
            }
            Ok(FrequencyTable::from_sample(&sample))
        }
    }
}

/// The collection's frequency table, from cache when possible. `None` when
/// neither a summary nor a sample could be fetched; nothing is cached then.
pub async fn get_frequency_table(
    source: &dyn NftDataSource,
    cache: &FrequencyCache,
    settings: &Settings,
    contract: &str,
) -> Option<Arc<FrequencyTable>> {
    let table = cache
        .get_or_load(contract, || fetch_frequency_table(source, settings, contract))
        .await;

    or_degraded("frequency_table", table.map(Some), None)
}
