use self::types::*;
use crate::analyzers::RawAttribute;

use anyhow::Result;
use async_trait::async_trait;

pub mod media;
pub mod snapshot;
pub mod types;

/// Read access to the NFT provider. Every method maps onto one provider
/// endpoint; callers decide which failures are fatal.
#[async_trait]
pub trait NftDataSource: Send + Sync {
    async fn nft_metadata(&self, contract: &str, token_id: &str) -> Result<NftMetadata>;

    async fn contract_metadata(&self, contract: &str) -> Result<ContractMetadata>;

    /// Attribute counts for the whole collection.
    async fn collection_summary(&self, contract: &str) -> Result<AttributeSummary>;

    /// Attributes of a sample of collection items, used when no summary exists.
    async fn collection_sample(&self, _contract: &str) -> Result<Vec<Vec<RawAttribute>>> {
        Ok(vec![])
    }

    async fn floor_price(&self, contract: &str) -> Result<FloorPriceResponse>;

    async fn owners(&self, contract: &str, token_id: &str) -> Result<Vec<String>>;

    async fn ens_name(&self, address: &str) -> Result<Option<String>>;

    async fn sales(&self, contract: &str, token_id: &str) -> Result<Vec<NftSale>>;

    async fn transfers(&self, contract: &str, token_id: &str) -> Result<Vec<AssetTransfer>>;

    /// Whether the contract source is published. Sources that cannot tell
    /// report verified.
    async fn source_verified(&self, _contract: &str) -> Result<bool> {
        Ok(true)
    }
}
