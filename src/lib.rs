extern crate dotenv;

pub mod alchemy;
pub mod analyzers;
pub mod config;
pub mod errors;
pub mod profiles;
pub mod storage;

pub fn from_wei(f: f64) -> f64 {
    f / 10f64.powf(18f64)
}

/// Rounds to two decimal places, the precision prices and trait percentages are reported with.
pub fn round2(f: f64) -> f64 {
    (f * 100f64).round() / 100f64
}
