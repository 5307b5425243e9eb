//! Dashboard overview: stat cards, recent analyses, and the risk gauge.
//!
//! Everything here is derived from a `StoreSnapshot` on each request;
//! nothing is cached between calls.

use serde::Serialize;

use crate::models::{AnalysisResult, HistoricalEntry};
use crate::trends::{aggregate_by_year, TrendSeries};

/// Average AQI shown before any analysis has run.
pub const DEFAULT_AVERAGE_AQI: f64 = 45.0;

/// Predictions above this probability count as high-risk alerts.
pub const HIGH_RISK_PROBABILITY: u8 = 60;

/// Results above this score are flagged as elevated in the recent list.
pub const ELEVATED_RISK_SCORE: u8 = 60;

/// Number of analyses shown in the recent list.
pub const RECENT_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Colour band of the risk gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeBand {
    /// Below 30.
    Low,
    /// 30 to 69.
    Elevated,
    /// 70 and above.
    High,
}

impl GaugeBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=29 => Self::Low,
            30..=69 => Self::Elevated,
            _ => Self::High,
        }
    }
}

/// A row in the recent analyses list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAnalysis {
    pub id: String,
    pub location: String,
    pub timestamp: String,
    pub risk_score: u8,
    pub elevated: bool,
    pub diseases: Vec<String>,
}

impl From<&AnalysisResult> for RecentAnalysis {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            id: result.id.clone(),
            location: result.location.clone(),
            timestamp: result.timestamp.clone(),
            risk_score: result.risk_score,
            elevated: result.risk_score > ELEVATED_RISK_SCORE,
            diseases: result.disease_names(),
        }
    }
}

/// Gauge state for the newest analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskGauge {
    pub score: u8,
    pub band: GaugeBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_historical_cases: u64,
    /// Rounded to one decimal.
    pub average_aqi: f64,
    pub high_risk_alerts: usize,
    pub analyses_run: usize,
    pub latest_gauge: Option<RiskGauge>,
    pub recent: Vec<RecentAnalysis>,
    pub trend: TrendSeries,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

impl DashboardSummary {
    /// `results` must be newest first.
    pub fn build(results: &[AnalysisResult], historical: &[HistoricalEntry]) -> Self {
        let latest = results.first();

        Self {
            total_historical_cases: historical.iter().map(|e| u64::from(e.cases)).sum(),
            average_aqi: average_aqi(results),
            high_risk_alerts: latest.map(high_risk_count).unwrap_or(0),
            analyses_run: results.len(),
            latest_gauge: latest.map(|r| RiskGauge {
                score: r.risk_score,
                band: GaugeBand::for_score(r.risk_score),
            }),
            recent: results.iter().take(RECENT_LIMIT).map(RecentAnalysis::from).collect(),
            trend: aggregate_by_year(historical),
        }
    }
}

fn average_aqi(results: &[AnalysisResult]) -> f64 {
    if results.is_empty() {
        return DEFAULT_AVERAGE_AQI;
    }
    // Divide each term first so large readings cannot overflow the sum.
    let n = results.len() as f64;
    let mean: f64 = results.iter().map(|r| r.env_data.aqi / n).sum();
    let scaled = mean * 10.0;
    if scaled.is_finite() {
        scaled.round() / 10.0
    } else {
        mean
    }
}

fn high_risk_count(result: &AnalysisResult) -> usize {
    result
        .predictions
        .iter()
        .filter(|p| p.probability > HIGH_RISK_PROBABILITY)
        .count()
}
