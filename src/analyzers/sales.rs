use crate::alchemy::types::{FeeAmount, NftSale};
use crate::from_wei;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SaleRecord {
    pub marketplace: String,
    pub price: Option<f64>,
    pub price_symbol: String,
    pub buyer: Option<String>,
    pub seller: Option<String>,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<String>,
}

fn fees(sale: &NftSale) -> impl Iterator<Item = &FeeAmount> {
    [&sale.taker, &sale.seller_fee, &sale.protocol_fee]
        .into_iter()
        .flatten()
}

impl From<&NftSale> for SaleRecord {
    fn from(sale: &NftSale) -> Self {
        Self {
            marketplace: sale
                .marketplace
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            price: fees(sale).find_map(|f| f.amount).map(from_wei),
            price_symbol: [&sale.taker, &sale.seller_fee]
                .into_iter()
                .flatten()
                .find_map(|f| f.symbol.clone())
                .unwrap_or_else(|| "ETH".to_string()),
            buyer: sale.buyer_address.clone(),
            seller: sale.seller_address.clone(),
            block_number: sale.block_number,
            transaction_hash: sale.transaction_hash.clone(),
        }
    }
}

pub fn sale_records(sales: &[NftSale]) -> Vec<SaleRecord> {
    sales.iter().map(SaleRecord::from).collect()
}

/// The most recent sale, by block number.
pub fn last_sale(records: &[SaleRecord]) -> Option<&SaleRecord> {
    records.iter().max_by_key(|r| r.block_number.unwrap_or_default())
}
