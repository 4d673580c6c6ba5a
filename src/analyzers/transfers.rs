use crate::alchemy::types::AssetTransfer;
use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub static ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Transfers kept per token, newest first.
pub static MAX_TRANSFERS: usize = 10;

/// Parses a token id given either as `0x` hex or as a decimal string.
pub fn parse_token_id(token_id: &str) -> Option<U256> {
    let token_id = token_id.trim();
    match token_id
        .strip_prefix("0x")
        .or_else(|| token_id.strip_prefix("0X"))
    {
        Some("") => None,
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None if token_id.is_empty() => None,
        None => U256::from_str_radix(token_id, 10).ok(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HolderTag {
    #[serde(rename = "OG Holder")]
    OgHolder,
    #[serde(rename = "Diamond Hands")]
    DiamondHands,
    Flipper,
}

impl HolderTag {
    /// `index` counts from the newest transfer, so the last three are the oldest.
    pub fn classify(days_held: Option<i64>, index: usize, total: usize) -> Option<Self> {
        if index + 3 >= total {
            return Some(HolderTag::OgHolder);
        }
        match days_held? {
            d if d >= 365 => Some(HolderTag::DiamondHands),
            d if d < 7 => Some(HolderTag::Flipper),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransferRecord {
    pub from: String,
    pub to: Option<String>,
    pub from_display: String,
    pub to_display: Option<String>,
    pub block_number: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub transaction_hash: Option<String>,
    pub days_held: Option<i64>,
    pub holding_duration: Option<String>,
    pub holder_tag: Option<HolderTag>,
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n > 1 { "s" } else { "" })
}

pub fn format_holding_duration(days: i64) -> String {
    if days >= 365 {
        plural(days / 365, "year")
    } else if days >= 30 {
        plural(days / 30, "month")
    } else if days >= 1 {
        plural(days, "day")
    } else {
        "< 1 day".to_string()
    }
}

/// Whole days between two instants, never negative.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days().max(0)
}

/// `0x1234...abcd`, with the zero address shown as a mint.
pub fn display_address(address: &str, ens_names: &HashMap<String, String>) -> String {
    if address.eq_ignore_ascii_case(ZERO_ADDRESS) {
        return "Mint".to_string();
    }
    if let Some(name) = ens_names
        .get(&address.to_lowercase())
        .filter(|n| !n.eq_ignore_ascii_case(address))
    {
        return name.clone();
    }
    shorten_address(address)
}

pub fn shorten_address(address: &str) -> String {
    let chars = address.chars().collect::<Vec<_>>();
    if chars.len() <= 10 {
        return address.to_string();
    }
    format!(
        "{}...{}",
        chars[..6].iter().collect::<String>(),
        chars[chars.len() - 4..].iter().collect::<String>()
    )
}

/// Transfers of one token, newest first, capped at [`MAX_TRANSFERS`].
pub fn token_transfers<'a>(
    transfers: &'a [AssetTransfer],
    token_id: &str,
) -> Vec<&'a AssetTransfer> {
    let wanted = match parse_token_id(token_id) {
        Some(id) => id,
        None => return vec![],
    };

    let mut matching = transfers
        .iter()
        .filter(|t| t.token_id().and_then(parse_token_id) == Some(wanted))
        .collect::<Vec<_>>();

    matching.sort_by(|a, b| b.block_number().cmp(&a.block_number()));
    matching.truncate(MAX_TRANSFERS);
    matching
}

/// Builds the ownership timeline. Each holder's time is measured up to the
/// next newer transfer, or up to `now` for the current holder.
pub fn transfer_history(
    transfers: &[AssetTransfer],
    token_id: &str,
    ens_names: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Vec<TransferRecord> {
    let ordered = token_transfers(transfers, token_id);
    let total = ordered.len();

    ordered
        .iter()
        .enumerate()
        .map(|(index, transfer)| {
            let until = match index {
                0 => Some(now),
                _ => ordered[index - 1].timestamp(),
            };
            let days_held = match (transfer.timestamp(), until) {
                (Some(from), Some(to)) => Some(days_between(from, to)),
                _ => None,
            };

            TransferRecord {
                from: transfer.from.clone(),
                to: transfer.to.clone(),
                from_display: display_address(&transfer.from, ens_names),
                to_display: transfer.to.as_deref().map(|a| display_address(a, ens_names)),
                block_number: transfer.block_number(),
                timestamp: transfer.timestamp(),
                transaction_hash: transfer.hash.clone(),
                days_held,
                holding_duration: days_held.map(format_holding_duration),
                holder_tag: HolderTag::classify(days_held, index, total),
            }
        })
        .collect()
}

/// Every distinct non-zero address in a timeline, lower-cased.
pub fn counterparties(transfers: &[&AssetTransfer]) -> Vec<String> {
    let mut addresses = transfers
        .iter()
        .flat_map(|t| std::iter::once(t.from.as_str()).chain(t.to.as_deref()))
        .filter(|a| !a.eq_ignore_ascii_case(ZERO_ADDRESS))
        .map(|a| a.to_lowercase())
        .collect::<Vec<_>>();
    addresses.sort();
    addresses.dedup();
    addresses
}
