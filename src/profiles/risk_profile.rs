use super::or_degraded;
use crate::alchemy::types::ContractMetadata;
use crate::alchemy::NftDataSource;
use crate::analyzers::risk::*;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RiskProfile {
    pub score: u8,
    pub level: RiskLevel,
    pub label: String,
    pub factors: Vec<RiskFactor>,
    pub spam_classifications: Vec<String>,
}

impl RiskProfile {
    pub async fn make(
        source: &dyn NftDataSource,
        contract: &str,
        contract_metadata: &ContractMetadata,
        floor_price_eth: f64,
        has_rarity_data: bool,
        sales_count: usize,
    ) -> Self {
        log::info!("Getting source_verified");
        let verified = or_degraded(
            "source_verified",
            source.source_verified(contract).await,
            true,
        );

        let assessment = assess_risk(&RiskInputs {
            verified,
            spam: contract_metadata.is_spam.unwrap_or(false),
            floor_price_eth,
            has_rarity_data,
            sales_count,
        });

        Self {
            score: assessment.score,
            level: assessment.level,
            label: assessment.level.label().to_string(),
            factors: assessment.factors,
            spam_classifications: contract_metadata.spam_classifications.clone(),
        }
    }
}
