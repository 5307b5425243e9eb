//! Scoring rule records and the built-in disease table.
//!
//! Each rule maps an `EnvironmentalInput` to a raw probability and a risk
//! level. The raw value is floored and clamped to the rule's ceiling when
//! evaluated, so a rule function never needs to clamp itself.

use crate::models::{DiseaseCategory, DiseasePrediction, EnvironmentalInput, RiskLevel, Trend};

/// Raw (unfloored, unclamped) probability in percent.
pub type ProbabilityFn = fn(&EnvironmentalInput) -> f64;

/// Qualitative classification of the same input.
pub type RiskClassifier = fn(&EnvironmentalInput) -> RiskLevel;

/// Ceiling applied to every built-in rule.
pub const DEFAULT_CEILING: u8 = 95;

/// Hard upper bound for any rule ceiling.
pub const MAX_PROBABILITY: u8 = 100;

/// One modeled disease: how to score it and what to advise.
#[derive(Debug, Clone)]
pub struct ScoringRule {
    pub name: String,
    pub category: DiseaseCategory,
    pub probability: ProbabilityFn,
    pub risk_level: RiskClassifier,
    pub trend: Trend,
    pub prevention_tips: Vec<String>,
    ceiling: u8,
}

impl ScoringRule {
    pub fn new(
        name: impl Into<String>,
        category: DiseaseCategory,
        probability: ProbabilityFn,
        risk_level: RiskClassifier,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            probability,
            risk_level,
            trend: Trend::Stable,
            prevention_tips: Vec::new(),
            ceiling: DEFAULT_CEILING,
        }
    }

    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }

    pub fn with_tips(mut self, tips: &[&str]) -> Self {
        self.prevention_tips = tips.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Values above 100 are capped at 100.
    pub fn with_ceiling(mut self, ceiling: u8) -> Self {
        self.ceiling = ceiling.min(MAX_PROBABILITY);
        self
    }

    pub fn ceiling(&self) -> u8 {
        self.ceiling
    }

    pub fn evaluate(&self, env: &EnvironmentalInput) -> DiseasePrediction {
        DiseasePrediction {
            name: self.name.clone(),
            probability: clamp_probability((self.probability)(env), self.ceiling),
            risk_level: (self.risk_level)(env),
            trend: self.trend,
            prevention_tips: self.prevention_tips.clone(),
        }
    }
}

/// `min(ceiling, floor(raw))`, never below zero. NaN scores as zero.
pub fn clamp_probability(raw: f64, ceiling: u8) -> u8 {
    let floored = raw.floor();
    if floored.is_nan() {
        return 0;
    }
    floored.clamp(0.0, f64::from(ceiling)) as u8
}

// ── Built-in table ──────────────────────────────────────────

fn dengue_probability(env: &EnvironmentalInput) -> f64 {
    env.rainfall / 3.0 + env.humidity / 2.0
}

fn dengue_risk(env: &EnvironmentalInput) -> RiskLevel {
    if env.rainfall > 200.0 {
        RiskLevel::Critical
    } else {
        RiskLevel::High
    }
}

fn respiratory_probability(env: &EnvironmentalInput) -> f64 {
    env.aqi * 1.5
}

fn respiratory_risk(env: &EnvironmentalInput) -> RiskLevel {
    if env.aqi > 100.0 {
        RiskLevel::High
    } else {
        RiskLevel::Moderate
    }
}

fn typhoid_probability(env: &EnvironmentalInput) -> f64 {
    env.temperature + env.rainfall / 10.0
}

fn typhoid_risk(_env: &EnvironmentalInput) -> RiskLevel {
    RiskLevel::Moderate
}

/// Dengue, respiratory distress, and typhoid, in table order.
pub fn builtin_rules() -> Vec<ScoringRule> {
    vec![
        ScoringRule::new(
            "Dengue",
            DiseaseCategory::VectorBorne,
            dengue_probability,
            dengue_risk,
        )
        .with_trend(Trend::Up)
        .with_tips(&[
            "Clear stagnant water",
            "Use mosquito repellents",
            "Wear long sleeves",
        ]),
        ScoringRule::new(
            "Respiratory Distress",
            DiseaseCategory::Respiratory,
            respiratory_probability,
            respiratory_risk,
        )
        .with_trend(Trend::Up)
        .with_tips(&[
            "Avoid outdoor activity during peak smog",
            "Use N95 masks",
            "Use air purifiers indoors",
        ]),
        ScoringRule::new(
            "Typhoid",
            DiseaseCategory::WaterBorne,
            typhoid_probability,
            typhoid_risk,
        )
        .with_trend(Trend::Stable)
        .with_tips(&[
            "Boil drinking water",
            "Maintain personal hygiene",
            "Avoid street food",
        ]),
    ]
}
