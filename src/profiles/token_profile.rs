use super::{
    get_floor_price, get_frequency_table, history_profile::resolve_ens_names,
    history_profile::HistoryProfile, or_degraded, price_profile::PriceProfile,
    rarity_profile::RarityProfile, risk_profile::RiskProfile,
};
use crate::alchemy::media::{image_url, thumbnail_url};
use crate::alchemy::NftDataSource;
use crate::analyzers::transfers::shorten_address;
use crate::config::Settings;
use crate::storage::FrequencyCache;
use anyhow::Result;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NftProfile {
    pub contract: String,
    pub token_id: String,
    pub name: String,
    pub collection: String,
    pub description: String,
    pub token_type: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub owner: Option<String>,
    pub owner_display: String,
    pub total_owners: usize,
    pub rarity_profile: RarityProfile,
    pub price_profile: PriceProfile,
    pub history_profile: HistoryProfile,
    pub risk_profile: RiskProfile,
}

impl NftProfile {
    pub async fn make(
        source: &dyn NftDataSource,
        cache: &FrequencyCache,
        settings: &Settings,
        contract: &str,
        token_id: &str,
    ) -> Result<Self> {
        Self::make_at(source, cache, settings, contract, token_id, Utc::now()).await
    }

    /// Builds the profile with holding durations measured up to `now`.
    pub async fn make_at(
        source: &dyn NftDataSource,
        cache: &FrequencyCache,
        settings: &Settings,
        contract: &str,
        token_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        log::info!("Getting nft_metadata");
        let nft = source.nft_metadata(contract, token_id).await?;

        log::info!("Getting contract_metadata");
        let contract_metadata = or_degraded(
            "contract_metadata",
            source.contract_metadata(contract).await,
            Default::default(),
        );

        log::info!("Getting floor_price");
        let floor_price = get_floor_price(source, contract).await;

        log::info!("Getting frequency_table");
        let frequency_table = get_frequency_table(source, cache, settings, contract).await;

        let rarity_profile =
            RarityProfile::make(&nft.attributes(), frequency_table.as_deref(), floor_price);
        let rarity = rarity_profile.result();

        let history_profile = HistoryProfile::make(source, contract, token_id, now).await;

        let price_profile =
            PriceProfile::make(floor_price, &rarity, &history_profile.sales, settings);

        let risk_profile = RiskProfile::make(
            source,
            contract,
            &contract_metadata,
            floor_price,
            rarity.is_available(),
            history_profile.sales.len(),
        )
        .await;

        log::info!("Getting owners");
        let owners = or_degraded("owners", source.owners(contract, token_id).await, vec![]);
        let owner = owners.first().cloned();
        let owner_display = match &owner {
            Some(address) => resolve_ens_names(source, &[address.to_lowercase()])
                .await
                .into_values()
                .next()
                .unwrap_or_else(|| shorten_address(address)),
            None => "Unknown".to_string(),
        };

        let nft_contract = nft.contract.clone().unwrap_or_default();

        Ok(Self {
            contract: nft_contract
                .address
                .clone()
                .unwrap_or_else(|| contract.to_string()),
            token_id: token_id.to_string(),
            name: nft.display_name(token_id),
            collection: contract_metadata
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .or(nft_contract.name)
                .or(nft_contract.symbol)
                .or_else(|| contract_metadata.collection_name())
                .unwrap_or_else(|| "Unknown Collection".to_string()),
            description: nft.description(),
            token_type: nft.token_type.clone(),
            image_url: image_url(&nft),
            thumbnail_url: thumbnail_url(&nft),
            owner,
            owner_display,
            total_owners: owners.len(),
            rarity_profile,
            price_profile,
            history_profile,
            risk_profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alchemy::snapshot::SnapshotSource;
    use crate::analyzers::prices::Band;
    use crate::errors::ProfileError;
    use chrono::TimeZone;
    use serde_json::json;

    fn get_source() -> SnapshotSource {
        SnapshotSource::new(
            serde_json::from_value(json!({
                "collections": {
                    "0xcafe": {
                        "contract": {"isSpam": false},
                        "nfts": [
                            {
                                "tokenId": "1",
                                "contract": {"address": "0xCaFe", "symbol": "CAFE"},
                                "image": {"cachedUrl": "ipfs://QmCafe/1.png"},
                                "raw": {"metadata": {"attributes": [
                                    {"trait_type": "Beans", "value": "Arabica"}
                                ]}}
                            }
                        ],
                        "owners": {"1": ["0x1234567890abcdef1234567890abcdef12345678"]}
                    }
                }
            }))
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_profile_degrades_without_market_data() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let profile = NftProfile::make_at(
            &get_source(),
            &FrequencyCache::default(),
            &Settings::default(),
            "0xcafe",
            "1",
            now,
        )
        .await
        .unwrap();

        assert_eq!(profile.contract, "0xCaFe");
        assert_eq!(profile.name, "NFT #1");
        assert_eq!(profile.collection, "CAFE");
        assert_eq!(profile.image_url.as_deref(), Some("https://ipfs.io/ipfs/QmCafe/1.png"));
        assert_eq!(profile.owner_display, "0x1234...5678");
        assert_eq!(profile.total_owners, 1);

        assert_eq!(profile.rarity_profile.traits[0].rarity, None);
        assert_eq!(profile.rarity_profile.rarity_score, None);
        assert!(!profile.price_profile.rarity_available);
        assert_eq!(profile.price_profile.floor_price, 0.0);
        assert_eq!(profile.price_profile.valuation.band, Band::AtFloor);
        assert!(profile.history_profile.transfers.is_empty());
        // verified -20, no floor +10, no sales +10
        assert_eq!(profile.risk_profile.score, 50);
    }

    #[tokio::test]
    async fn test_missing_token_fails() {
        let e = NftProfile::make(
            &get_source(),
            &FrequencyCache::default(),
            &Settings::default(),
            "0xcafe",
            "2",
        )
        .await
        .unwrap_err();

        assert!(matches!(
            e.downcast_ref::<ProfileError>(),
            Some(ProfileError::UnknownToken { .. })
        ));
    }
}
