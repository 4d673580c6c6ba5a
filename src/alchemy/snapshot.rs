use super::types::*;
use super::NftDataSource;
use crate::analyzers::transfers::parse_token_id;
use crate::analyzers::RawAttribute;
use crate::errors::ProfileError;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot {
    #[serde(default)]
    pub contract: ContractMetadata,
    pub summary: Option<AttributeSummary>,
    #[serde(default)]
    pub sample: Vec<Vec<RawAttribute>>,
    pub floor_price: Option<FloorPriceResponse>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub nfts: Vec<NftMetadata>,
    #[serde(default)]
    pub owners: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub sales: HashMap<String, Vec<NftSale>>,
    #[serde(default)]
    pub transfers: Vec<AssetTransfer>,
}

/// Provider responses recorded to a JSON file, keyed by contract address.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub collections: HashMap<String, CollectionSnapshot>,
    #[serde(default)]
    pub ens: HashMap<String, String>,
}

impl Snapshot {
    /// Lower-cases contract and ENS keys so lookups ignore checksum casing.
    fn normalized(self) -> Self {
        Self {
            collections: self
                .collections
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            ens: self
                .ens
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }
}

fn same_token(a: &str, b: &str) -> bool {
    match (parse_token_id(a), parse_token_id(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn by_token<'a, T>(map: &'a HashMap<String, T>, token_id: &str) -> Option<&'a T> {
    map.iter()
        .find(|(k, _)| same_token(k, token_id))
        .map(|(_, v)| v)
}

pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: snapshot.normalized(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_reader(File::open(path)?)?;
        Ok(Self::new(snapshot))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    fn collection(&self, contract: &str) -> Result<&CollectionSnapshot> {
        self.snapshot
            .collections
            .get(&contract.to_lowercase())
            .ok_or_else(|| ProfileError::UnknownCollection(contract.to_string()).into())
    }
}

#[async_trait]
impl NftDataSource for SnapshotSource {
    async fn nft_metadata(&self, contract: &str, token_id: &str) -> Result<NftMetadata> {
        self.collection(contract)?
            .nfts
            .iter()
            .find(|n| same_token(&n.token_id, token_id))
            .cloned()
            .ok_or_else(|| {
                ProfileError::UnknownToken {
                    contract: contract.to_string(),
                    token_id: token_id.to_string(),
                }
                .into()
            })
    }

    async fn contract_metadata(&self, contract: &str) -> Result<ContractMetadata> {
        Ok(self.collection(contract)?.contract.clone())
    }

    async fn collection_summary(&self, contract: &str) -> Result<AttributeSummary> {
        self.collection(contract)?
            .summary
            .clone()
            .ok_or_else(|| ProfileError::MissingData(format!("attribute summary for {}", contract)).into())
    }

    async fn collection_sample(&self, contract: &str) -> Result<Vec<Vec<RawAttribute>>> {
        Ok(self.collection(contract)?.sample.clone())
    }

    async fn floor_price(&self, contract: &str) -> Result<FloorPriceResponse> {
        self.collection(contract)?
            .floor_price
            .clone()
            .ok_or_else(|| ProfileError::MissingData(format!("floor price for {}", contract)).into())
    }

    async fn owners(&self, contract: &str, token_id: &str) -> Result<Vec<String>> {
        Ok(by_token(&self.collection(contract)?.owners, token_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn ens_name(&self, address: &str) -> Result<Option<String>> {
        Ok(self.snapshot.ens.get(&address.to_lowercase()).cloned())
    }

    async fn sales(&self, contract: &str, token_id: &str) -> Result<Vec<NftSale>> {
        Ok(by_token(&self.collection(contract)?.sales, token_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn transfers(&self, contract: &str, _token_id: &str) -> Result<Vec<AssetTransfer>> {
        // the provider returns contract-wide transfers, filtered by the caller
        Ok(self.collection(contract)?.transfers.clone())
    }

    async fn source_verified(&self, contract: &str) -> Result<bool> {
        Ok(self.collection(contract)?.verified.unwrap_or(true))
    }
}
