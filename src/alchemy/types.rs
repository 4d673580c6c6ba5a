use crate::analyzers::RawAttribute;
use chrono::{DateTime, Utc};
use serde_aux::prelude::*;

use std::collections::HashMap;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftContract {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftImage {
    pub cached_url: Option<String>,
    pub original_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub png_url: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RawMetadata {
    pub image: Option<String>,
    pub description: Option<String>,
    pub attributes: Option<Vec<RawAttribute>>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RawNft {
    pub metadata: Option<RawMetadata>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Media {
    pub gateway: Option<String>,
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftMetadata {
    #[serde(deserialize_with = "deserialize_string_from_number")]
    pub token_id: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token_type: Option<String>,
    pub contract: Option<NftContract>,
    pub image: Option<NftImage>,
    pub raw: Option<RawNft>,
    pub raw_metadata: Option<RawMetadata>,
    pub media: Option<Vec<Media>>,
}

impl NftMetadata {
    fn metadata(&self) -> impl Iterator<Item = &RawMetadata> {
        self.raw
            .iter()
            .filter_map(|r| r.metadata.as_ref())
            .chain(self.raw_metadata.iter())
    }

    pub fn attributes(&self) -> Vec<RawAttribute> {
        self.metadata()
            .find_map(|m| m.attributes.clone())
            .unwrap_or_default()
    }

    pub fn display_name(&self, token_id: &str) -> String {
        [&self.name, &self.title]
            .into_iter()
            .flatten()
            .find(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                let collection = self
                    .contract
                    .as_ref()
                    .and_then(|c| c.name.clone())
                    .unwrap_or_else(|| "NFT".to_string());
                format!("{} #{}", collection, token_id)
            })
    }

    pub fn description(&self) -> String {
        self.description
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| self.metadata().find_map(|m| m.description.clone()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSeaMetadata {
    pub floor_price: Option<f64>,
    pub collection_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub safelist_request_status: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub total_supply: Option<u64>,
    pub token_type: Option<String>,
    pub contract_deployer: Option<String>,
    #[serde(alias = "openSea")]
    pub open_sea_metadata: Option<OpenSeaMetadata>,
    pub is_spam: Option<bool>,
    #[serde(default)]
    pub spam_classifications: Vec<String>,
}

impl ContractMetadata {
    pub fn collection_name(&self) -> Option<String> {
        self.name.clone().filter(|n| !n.is_empty()).or_else(|| {
            self.open_sea_metadata
                .as_ref()
                .and_then(|o| o.collection_name.clone())
        })
    }
}

/// Attribute counts for a whole collection: trait type -> value -> count.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSummary {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub total_supply: Option<u64>,
    #[serde(default)]
    pub summary: HashMap<String, HashMap<String, u64>>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceFloor {
    pub floor_price: Option<f64>,
    pub price_currency: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPriceResponse {
    pub open_sea: Option<MarketplaceFloor>,
    pub looks_rare: Option<MarketplaceFloor>,
}

impl FloorPriceResponse {
    pub fn open_sea_floor(&self) -> Option<f64> {
        self.open_sea.as_ref().and_then(|f| f.floor_price)
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct FeeAmount {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub amount: Option<f64>,
    pub symbol: Option<String>,
    pub decimals: Option<u32>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftSale {
    pub marketplace: Option<String>,
    pub buyer_address: Option<String>,
    pub seller_address: Option<String>,
    pub taker: Option<FeeAmount>,
    pub seller_fee: Option<FeeAmount>,
    pub protocol_fee: Option<FeeAmount>,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc1155Metadata {
    pub token_id: String,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMetadata {
    pub block_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransfer {
    pub from: String,
    pub to: Option<String>,
    pub block_num: Option<String>,
    pub hash: Option<String>,
    pub erc721_token_id: Option<String>,
    pub erc1155_metadata: Option<Vec<Erc1155Metadata>>,
    pub metadata: Option<TransferMetadata>,
}

impl AssetTransfer {
    pub fn token_id(&self) -> Option<&str> {
        self.erc721_token_id.as_deref().or_else(|| {
            self.erc1155_metadata
                .as_ref()
                .and_then(|m| m.first())
                .map(|m| m.token_id.as_str())
        })
    }

    /// Block number, sent by the provider as a hex string.
    pub fn block_number(&self) -> Option<u64> {
        let num = self.block_num.as_deref()?;
        let hex = num.strip_prefix("0x").unwrap_or(num);
        u64::from_str_radix(hex, 16).ok()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.metadata.as_ref().and_then(|m| m.block_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nft_metadata_parsing() {
        let nft: NftMetadata = serde_json::from_value(json!({
            "tokenId": "42",
            "contract": {"address": "0xabc", "name": "Moonbirds"},
            "raw": {"metadata": {"attributes": [
                {"trait_type": "Eyes", "value": "Laser"},
                {"trait_type": "Level", "value": 3}
            ]}},
            "rawMetadata": {"attributes": [{"trait_type": "Ignored", "value": "x"}]}
        }))
        .unwrap();

        let attributes = nft.attributes();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[1].value_string(), "3");
        assert_eq!(nft.display_name("42"), "Moonbirds #42");
    }

    #[test]
    fn test_attributes_fall_back_to_raw_metadata() {
        let nft: NftMetadata = serde_json::from_value(json!({
            "tokenId": 7,
            "title": "Seven",
            "rawMetadata": {"description": "old style", "attributes": [{"trait_type": "Hat", "value": "Cap"}]}
        }))
        .unwrap();

        assert_eq!(nft.token_id, "7");
        assert_eq!(nft.attributes()[0].trait_type(), "Hat");
        assert_eq!(nft.display_name("7"), "Seven");
        assert_eq!(nft.description(), "old style");
    }

    #[test]
    fn test_summary_supply_as_string() {
        let summary: AttributeSummary = serde_json::from_value(json!({
            "totalSupply": "10000",
            "summary": {"Eyes": {"Laser": 120}}
        }))
        .unwrap();
        assert_eq!(summary.total_supply, Some(10000));

        let summary: AttributeSummary = serde_json::from_value(json!({"summary": {}})).unwrap();
        assert_eq!(summary.total_supply, None);
    }

    #[test]
    fn test_contract_metadata_open_sea_alias() {
        let meta: ContractMetadata = serde_json::from_value(json!({
            "openSea": {"collectionName": "Azuki", "floorPrice": 4.2},
            "isSpam": false
        }))
        .unwrap();
        assert_eq!(meta.collection_name(), Some("Azuki".to_string()));
        assert_eq!(meta.spam_classifications.len(), 0);
    }

    #[test]
    fn test_transfer_helpers() {
        let transfer: AssetTransfer = serde_json::from_value(json!({
            "from": "0x0000000000000000000000000000000000000000",
            "to": "0xdef",
            "blockNum": "0x10",
            "erc1155Metadata": [{"tokenId": "0x2a", "value": "0x1"}],
            "metadata": {"blockTimestamp": "2022-01-01T00:00:00.000Z"}
        }))
        .unwrap();

        assert_eq!(transfer.token_id(), Some("0x2a"));
        assert_eq!(transfer.block_number(), Some(16));
        assert!(transfer.timestamp().is_some());
    }
}
