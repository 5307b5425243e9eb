//! Risk scoring: environmental input → ranked predictions + aggregate score.
//!
//! Pure and synchronous. The set of modeled diseases lives in a `RuleSet`,
//! so new diseases are added by pushing rules, not by touching the
//! analysis orchestration.

pub mod rules;

pub use rules::{builtin_rules, clamp_probability, ScoringRule, DEFAULT_CEILING};

use serde::Serialize;

use crate::models::{DiseasePrediction, EnvironmentalInput};

/// Predictions sorted by probability (highest first) and their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOutcome {
    pub predictions: Vec<DiseasePrediction>,
    pub risk_score: u8,
}

impl ScoringOutcome {
    pub fn top(&self) -> Option<&DiseasePrediction> {
        self.predictions.first()
    }
}

/// Ordered table of scoring rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ScoringRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: ScoringRule) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: ScoringRule) -> Self {
        self.push(rule);
        self
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule, rank, and aggregate.
    pub fn score(&self, env: &EnvironmentalInput) -> ScoringOutcome {
        let mut predictions: Vec<DiseasePrediction> =
            self.rules.iter().map(|rule| rule.evaluate(env)).collect();
        rank_predictions(&mut predictions);
        let risk_score = risk_score(&predictions);
        ScoringOutcome {
            predictions,
            risk_score,
        }
    }
}

/// Sort highest probability first. Stable: ties keep table order.
pub fn rank_predictions(predictions: &mut [DiseasePrediction]) {
    predictions.sort_by(|a, b| b.probability.cmp(&a.probability));
}

/// Floor of the mean probability; 0 for an empty set.
pub fn risk_score(predictions: &[DiseasePrediction]) -> u8 {
    if predictions.is_empty() {
        return 0;
    }
    let total: u32 = predictions.iter().map(|p| u32::from(p.probability)).sum();
    (total / predictions.len() as u32) as u8
}
