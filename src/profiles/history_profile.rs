use super::or_degraded;
use crate::alchemy::NftDataSource;
use crate::analyzers::sales::*;
use crate::analyzers::transfers::*;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistoryProfile {
    pub sales: Vec<SaleRecord>,
    pub last_sale: Option<SaleRecord>,
    pub transfers: Vec<TransferRecord>,
}

/// ENS names for the given lower-cased addresses. Lookups that fail or find
/// nothing are left out.
pub async fn resolve_ens_names(
    source: &dyn NftDataSource,
    addresses: &[String],
) -> HashMap<String, String> {
    let lookups = addresses.iter().map(|address| async move {
        match source.ens_name(address).await {
            Ok(name) => name.map(|n| (address.clone(), n)),
            Err(e) => {
                log::warn!("ENS lookup failed for {}: {}", address, e);
                None
            }
        }
    });

    join_all(lookups).await.into_iter().flatten().collect()
}

impl HistoryProfile {
    pub async fn make(
        source: &dyn NftDataSource,
        contract: &str,
        token_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        log::info!("Getting sales");
        let sales = or_degraded("sales", source.sales(contract, token_id).await, vec![]);
        let sales = sale_records(&sales);

        log::info!("Getting transfers");
        let transfers = or_degraded(
            "transfers",
            source.transfers(contract, token_id).await,
            vec![],
        );

        log::info!("Getting ens_names");
        let addresses = counterparties(&token_transfers(&transfers, token_id));
        let ens_names = resolve_ens_names(source, &addresses).await;

        Self {
            last_sale: last_sale(&sales).cloned(),
            transfers: transfer_history(&transfers, token_id, &ens_names, now),
            sales,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alchemy::snapshot::SnapshotSource;
    use chrono::TimeZone;
    use serde_json::json;

    fn get_source() -> SnapshotSource {
        SnapshotSource::new(
            serde_json::from_value(json!({
                "collections": {
                    "0xc0ffee": {
                        "sales": {"7": [
                            {"marketplace": "seaport", "taker": {"amount": "1000000000000000000"}, "blockNumber": 5},
                            {"marketplace": "blur", "taker": {"amount": "2500000000000000000"}, "blockNumber": 9}
                        ]},
                        "transfers": [
                            {
                                "from": "0x0000000000000000000000000000000000000000",
                                "to": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                                "blockNum": "0x1",
                                "erc721TokenId": "0x7",
                                "metadata": {"blockTimestamp": "2023-01-01T00:00:00Z"}
                            },
                            {
                                "from": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                                "to": "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB",
                                "blockNum": "0x2",
                                "erc721TokenId": "0x7",
                                "metadata": {"blockTimestamp": "2023-01-04T00:00:00Z"}
                            },
                            {
                                "from": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                                "to": "0xcccccccccccccccccccccccccccccccccccccccc",
                                "blockNum": "0x3",
                                "erc721TokenId": "0x8"
                            }
                        ]
                    }
                },
                "ens": {"0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb": "holder.eth"}
            }))
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_history_profile() {
        let now = Utc.with_ymd_and_hms(2023, 3, 4, 0, 0, 0).unwrap();
        let profile = HistoryProfile::make(&get_source(), "0xC0FFEE", "7", now).await;

        assert_eq!(profile.sales.len(), 2);
        assert_eq!(profile.last_sale.unwrap().marketplace, "blur");

        assert_eq!(profile.transfers.len(), 2);
        assert_eq!(profile.transfers[0].to_display.as_deref(), Some("holder.eth"));
        assert_eq!(profile.transfers[0].holding_duration.as_deref(), Some("1 month"));
        assert_eq!(profile.transfers[1].from_display, "Mint");
        assert_eq!(profile.transfers[1].holding_duration.as_deref(), Some("3 days"));
    }

    #[tokio::test]
    async fn test_history_for_unknown_collection_is_empty() {
        let now = Utc.with_ymd_and_hms(2023, 3, 4, 0, 0, 0).unwrap();
        let profile = HistoryProfile::make(&get_source(), "0xnothing", "1", now).await;

        assert!(profile.sales.is_empty());
        assert!(profile.last_sale.is_none());
        assert!(profile.transfers.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_ens_names() {
        let addresses = vec![
            "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
        ];
        let names = resolve_ens_names(&get_source(), &addresses).await;
        assert_eq!(names.len(), 1);
        assert_eq!(names[&addresses[0]], "holder.eth");
    }
}
