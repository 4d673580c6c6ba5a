use derive_more::Display;

#[derive(Debug, Display)]
pub enum ProfileError {
    #[display(fmt = "Unknown collection: {}", _0)]
    UnknownCollection(String),

    #[display(fmt = "Unknown token: {} #{}", contract, token_id)]
    UnknownToken { contract: String, token_id: String },

    #[display(fmt = "Missing data: {}", _0)]
    MissingData(String),

    #[display(fmt = "Invalid setting {}={}", key, value)]
    InvalidSetting { key: String, value: String },
}

impl std::error::Error for ProfileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = ProfileError::UnknownToken {
            contract: "0xabc".to_string(),
            token_id: "7".to_string(),
        };
        assert_eq!(e.to_string(), "Unknown token: 0xabc #7");

        let e: anyhow::Error = ProfileError::MissingData("floor price".to_string()).into();
        assert!(e.downcast_ref::<ProfileError>().is_some());
    }
}
