use super::sanitize_eth;

static NEUTRAL_RISK: i32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RiskInputs {
    pub verified: bool,
    pub spam: bool,
    pub floor_price_eth: f64,
    pub has_rarity_data: bool,
    pub sales_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=30 => RiskLevel::Low,
            31..=60 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RiskFactor {
    pub positive: bool,
    pub text: String,
}

impl RiskFactor {
    fn new(positive: bool, text: impl Into<String>) -> Self {
        Self {
            positive,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub factors: Vec<RiskFactor>,
}

/// Heuristic investment risk, 0 (safest) to 100.
pub fn assess_risk(inputs: &RiskInputs) -> RiskAssessment {
    let floor = sanitize_eth(inputs.floor_price_eth);
    let mut score = NEUTRAL_RISK;

    score += if inputs.verified { -20 } else { 20 };
    if inputs.spam {
        score += 40;
    }

    if floor > 1f64 {
        score -= 15;
    } else if floor > 0.1 {
        score -= 5;
    } else if floor == 0f64 {
        score += 10;
    }

    if inputs.has_rarity_data {
        score -= 10;
    }

    if inputs.sales_count > 5 {
        score -= 10;
    } else if inputs.sales_count == 0 {
        score += 10;
    }

    let score = score.clamp(0, 100) as u8;

    let mut factors = vec![if inputs.verified {
        RiskFactor::new(true, "Verified contract")
    } else {
        RiskFactor::new(false, "Unverified contract")
    }];
    if inputs.spam {
        factors.push(RiskFactor::new(false, "Flagged as spam"));
    }
    if floor > 0.5 {
        factors.push(RiskFactor::new(true, "Established floor price"));
    }
    if inputs.sales_count > 3 {
        factors.push(RiskFactor::new(
            true,
            format!("{} recorded sales", inputs.sales_count),
        ));
    } else if inputs.sales_count == 0 {
        factors.push(RiskFactor::new(false, "No recorded sales"));
    }

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        factors,
    }
}
