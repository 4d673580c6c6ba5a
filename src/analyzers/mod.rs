pub mod prices;
pub mod rarities;
pub mod risk;
pub mod sales;
pub mod scores;
pub mod transfers;

use serde_json::Value;

/// Trait type used when the provider gives neither `trait_type` nor `name`.
pub static DEFAULT_TRAIT_TYPE: &str = "Property";

/// An attribute as it appears in token metadata, before any rarity lookup.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawAttribute {
    #[serde(default)]
    pub trait_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl RawAttribute {
    pub fn new(trait_type: &str, value: impl Into<Value>) -> Self {
        Self {
            trait_type: Some(trait_type.to_string()),
            name: None,
            value: value.into(),
        }
    }

    pub fn trait_type(&self) -> String {
        [&self.trait_type, &self.name]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_TRAIT_TYPE.to_string())
    }

    pub fn value_string(&self) -> String {
        value_to_string(&self.value)
    }
}

/// An attribute annotated with its prevalence in the collection, in percent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trait {
    pub trait_type: String,
    pub value: String,
    pub rarity: Option<f64>,
}

impl Trait {
    pub fn tier(&self) -> Option<rarities::TraitTier> {
        self.rarity.map(rarities::TraitTier::from_rarity)
    }
}

/// String form of an attribute value. Metadata values arrive as strings,
/// numbers, booleans or null; lookups and output always use this form.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            // 5.0 prints as "5", the way metadata authors write it
            Some(f) if n.is_f64() && f.fract() == 0f64 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Floor prices that are negative, NaN or infinite count as no floor at all.
pub fn sanitize_eth(price: f64) -> f64 {
    if price.is_finite() && price > 0f64 {
        price
    } else {
        0f64
    }
}
