//! Data model for environmental inputs, predictions, and analysis records.

pub mod analysis;
pub mod enums;
pub mod environment;
pub mod historical;
pub mod prediction;

pub use analysis::AnalysisResult;
pub use enums::{DiseaseCategory, RiskLevel, Trend};
pub use environment::EnvironmentalInput;
pub use historical::{baseline_historical_data, HistoricalEntry};
pub use prediction::DiseasePrediction;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
