use super::{RawAttribute, Trait};
use crate::round2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraitFrequency {
    pub count: u64,
    pub percentage: f64,
}

/// Per collection prevalence of every (trait type, value) pair.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrequencyTable {
    traits: HashMap<String, HashMap<String, TraitFrequency>>,
}

impl FrequencyTable {
    /// Builds the table from the provider's attribute summary (raw counts per value).
    /// A missing or zero `total_supply` falls back to `default_total_supply`.
    /// Counts above the supply are capped at 100%.
    pub fn from_summary(
        summary: &HashMap<String, HashMap<String, u64>>,
        total_supply: Option<u64>,
        default_total_supply: u64,
    ) -> Self {
        let supply = total_supply
            .filter(|s| *s > 0)
            .unwrap_or(default_total_supply)
            .max(1) as f64;

        let traits = summary
            .iter()
            .map(|(trait_type, values)| {
                let values = values
                    .iter()
                    .map(|(value, count)| {
                        (
                            value.clone(),
                            TraitFrequency {
                                count: *count,
                                percentage: (*count as f64 / supply * 100f64).min(100f64),
                            },
                        )
                    })
                    .collect();
                (trait_type.clone(), values)
            })
            .collect();

        Self { traits }
    }

    /// Builds the table by counting attributes over a sample of collection items.
    /// An item repeating the same pair counts once.
    pub fn from_sample(items: &[Vec<RawAttribute>]) -> Self {
        let mut counts = HashMap::<String, HashMap<String, u64>>::new();
        for attributes in items {
            let pairs = attributes
                .iter()
                .map(|attr| (attr.trait_type(), attr.value_string()))
                .collect::<HashSet<_>>();
            for (trait_type, value) in pairs {
                *counts
                    .entry(trait_type)
                    .or_default()
                    .entry(value)
                    .or_default() += 1;
            }
        }

        if items.is_empty() {
            return Self::default();
        }
        Self::from_summary(&counts, Some(items.len() as u64), items.len() as u64)
    }

    pub fn get(&self, trait_type: &str, value: &str) -> Option<&TraitFrequency> {
        self.traits.get(trait_type).and_then(|v| v.get(value))
    }

    /// Number of distinct (trait type, value) pairs.
    pub fn len(&self) -> usize {
        self.traits.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mean prevalence over every pair in the collection.
    pub fn avg_trait_rarity(&self) -> Option<f64> {
        let percentages = self
            .traits
            .values()
            .flat_map(|v| v.values().map(|f| f.percentage))
            .collect::<Vec<_>>();

        if percentages.is_empty() {
            None
        } else {
            Some(percentages.iter().sum::<f64>() / percentages.len() as f64)
        }
    }
}

/// Annotates each attribute with its prevalence in the collection.
///
/// Pairs missing from the table get `rarity: None`, and so does every
/// attribute when no table could be fetched at all. Output order follows input order.
pub fn resolve_trait_rarity(
    attributes: &[RawAttribute],
    frequency_table: Option<&FrequencyTable>,
) -> Vec<Trait> {
    attributes
        .iter()
        .map(|attr| {
            let trait_type = attr.trait_type();
            let value = attr.value_string();
            let rarity = frequency_table
                .and_then(|t| t.get(&trait_type, &value))
                .map(|f| round2(f.percentage));

            Trait {
                trait_type,
                value,
                rarity,
            }
        })
        .collect()
}

pub fn rarest_trait(traits: &[Trait]) -> Option<&Trait> {
    traits
        .iter()
        .filter(|t| t.rarity.is_some())
        .min_by(|a, b| a.rarity.partial_cmp(&b.rarity).unwrap_or(std::cmp::Ordering::Equal))
}

pub fn most_common_trait(traits: &[Trait]) -> Option<&Trait> {
    traits
        .iter()
        .filter(|t| t.rarity.is_some())
        .max_by(|a, b| a.rarity.partial_cmp(&b.rarity).unwrap_or(std::cmp::Ordering::Equal))
}

/// Average prevalence of the traits whose prevalence is known.
pub fn avg_known_rarity(traits: &[Trait]) -> Option<f64> {
    let known = traits.iter().filter_map(|t| t.rarity).collect::<Vec<_>>();
    if known.is_empty() {
        None
    } else {
        Some(round2(known.iter().sum::<f64>() / known.len() as f64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitTier {
    UltraRare,
    Rare,
    Uncommon,
    Common,
}

impl TraitTier {
    pub fn from_rarity(rarity: f64) -> Self {
        if rarity < 1f64 {
            TraitTier::UltraRare
        } else if rarity < 5f64 {
            TraitTier::Rare
        } else if rarity < 15f64 {
            TraitTier::Uncommon
        } else {
            TraitTier::Common
        }
    }
}
