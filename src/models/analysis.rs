use serde::{Deserialize, Serialize};

use super::environment::EnvironmentalInput;
use super::prediction::DiseasePrediction;

/// Immutable record of one completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub location: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub env_data: EnvironmentalInput,
    /// Sorted by probability, highest first.
    pub predictions: Vec<DiseasePrediction>,
    pub ai_insights: String,
    pub risk_score: u8,
}

impl AnalysisResult {
    /// The highest-probability prediction.
    pub fn top_prediction(&self) -> Option<&DiseasePrediction> {
        self.predictions.first()
    }

    pub fn disease_names(&self) -> Vec<String> {
        self.predictions.iter().map(|p| p.name.clone()).collect()
    }
}
