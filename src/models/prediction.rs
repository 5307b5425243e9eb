use serde::{Deserialize, Serialize};

use super::enums::{RiskLevel, Trend};

/// One disease's derived probability, risk level, trend, and advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseasePrediction {
    pub name: String,
    /// Percent, always within 0..=100.
    pub probability: u8,
    pub risk_level: RiskLevel,
    pub trend: Trend,
    pub prevention_tips: Vec<String>,
}
