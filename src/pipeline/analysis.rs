//! Analysis orchestration: validate → score → enrich → record.
//!
//! Scoring runs first because the insight prompt embeds the ranked
//! predictions. The result only becomes visible in the store once the
//! insight has resolved (generated, unavailable, or fallback), and it is
//! published together with its synthetic historical entry.

use std::time::Duration;

use chrono::{Datelike, SecondsFormat, Utc};
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::analysis_tracker::AnalysisTracker;
use crate::models::{AnalysisResult, EnvironmentalInput, HistoricalEntry};
use crate::pipeline::insight::{generate_insight, InsightGenerator};
use crate::pipeline::scoring::RuleSet;
use crate::store::{AnalysisStore, StoreError};

/// Exclusive upper bound for synthetic case counts.
pub const SYNTHETIC_CASES_MAX: u32 = 500;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Please enter a location")]
    EmptyLocation,

    #[error("Invalid value for {0}: must be a finite number")]
    InvalidMetric(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AnalysisError {
    /// User-input errors are reported back verbatim; the rest are internal.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::EmptyLocation | Self::InvalidMetric(_))
    }
}

/// One analysis request as submitted by the dashboard form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub env_data: EnvironmentalInput,
}

/// Borrowed view of everything an analysis touches.
pub struct AnalysisPipeline<'a> {
    pub rules: &'a RuleSet,
    pub generator: &'a dyn InsightGenerator,
    pub store: &'a AnalysisStore,
    pub tracker: &'a AnalysisTracker,
    pub insight_timeout: Duration,
}

impl AnalysisPipeline<'_> {
    /// Run one analysis end to end and record it.
    ///
    /// Fails before any scoring or network call when the location is blank
    /// or a metric is not finite.
    pub async fn run(
        &self,
        location: &str,
        env: EnvironmentalInput,
    ) -> Result<AnalysisResult, AnalysisError> {
        let location = location.trim();
        if location.is_empty() {
            tracing::info!("Analysis rejected: empty location");
            return Err(AnalysisError::EmptyLocation);
        }
        if let Some(field) = env.first_non_finite() {
            tracing::info!(field, "Analysis rejected: non-finite metric");
            return Err(AnalysisError::InvalidMetric(field.to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("analysis", id = %id, location = %location);
        self.run_validated(id, location, env).instrument(span).await
    }

    async fn run_validated(
        &self,
        id: String,
        location: &str,
        env: EnvironmentalInput,
    ) -> Result<AnalysisResult, AnalysisError> {
        let _pending = self.tracker.begin(&id, location);

        let outcome = self.rules.score(&env);
        tracing::debug!(
            risk_score = outcome.risk_score,
            predictions = outcome.predictions.len(),
            "Scored environmental input"
        );

        let insight = generate_insight(
            self.generator,
            location,
            &env,
            &outcome.predictions,
            self.insight_timeout,
        )
        .await;
        let insight_generated = insight.is_generated();

        let result = AnalysisResult {
            id,
            location: location.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            env_data: env,
            predictions: outcome.predictions,
            ai_insights: insight.into_text(),
            risk_score: outcome.risk_score,
        };

        let entry = synthetic_entry(&result, Utc::now().year(), random_case_count());
        self.store.record(result.clone(), entry)?;

        tracing::info!(
            risk_score = result.risk_score,
            top = result.top_prediction().map(|p| p.name.as_str()).unwrap_or("none"),
            insight_generated,
            "Analysis recorded"
        );

        Ok(result)
    }
}

/// Historical entry derived from a completed analysis: its top disease in
/// `year`. `None` when the analysis produced no predictions.
pub fn synthetic_entry(result: &AnalysisResult, year: i32, cases: u32) -> Option<HistoricalEntry> {
    result
        .top_prediction()
        .map(|top| HistoricalEntry::new(year, top.name.clone(), cases))
}

/// Uniform in `0..SYNTHETIC_CASES_MAX`.
pub fn random_case_count() -> u32 {
    rand::thread_rng().gen_range(0..SYNTHETIC_CASES_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use crate::pipeline::insight::{
        InsightError, MockInsightGenerator, INSIGHT_FALLBACK, INSIGHT_UNAVAILABLE,
    };
    use crate::pipeline::scoring::ScoringRule;

    struct Fixture {
        rules: RuleSet,
        store: AnalysisStore,
        tracker: AnalysisTracker,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                rules: RuleSet::builtin(),
                store: AnalysisStore::new(),
                tracker: AnalysisTracker::new(),
            }
        }

        fn pipeline<'a>(&'a self, generator: &'a dyn InsightGenerator) -> AnalysisPipeline<'a> {
            AnalysisPipeline {
                rules: &self.rules,
                generator,
                store: &self.store,
                tracker: &self.tracker,
                insight_timeout: Duration::from_secs(5),
            }
        }
    }

    fn mumbai_env() -> EnvironmentalInput {
        EnvironmentalInput {
            aqi: 45.0,
            temperature: 28.0,
            humidity: 65.0,
            rainfall: 120.0,
            population_density: 1200.0,
        }
    }

    #[tokio::test]
    async fn mumbai_analysis_records_result_and_entry() {
        let fx = Fixture::new();
        let mock = MockInsightGenerator::new("Monsoon rain drives dengue.");
        let results_before = fx.store.result_count().unwrap();
        let historical_before = fx.store.historical_count().unwrap();

        let result = fx.pipeline(&mock).run("Mumbai", mumbai_env()).await.unwrap();

        assert_eq!(result.location, "Mumbai");
        assert_eq!(result.predictions[0].name, "Dengue");
        assert_eq!(result.predictions[0].probability, 72);
        assert_eq!(result.predictions[0].risk_level, RiskLevel::High);
        assert_eq!(result.risk_score, 59);
        assert_eq!(result.ai_insights, "Monsoon rain drives dengue.");
        assert!(!result.id.is_empty());

        assert_eq!(fx.store.result_count().unwrap(), results_before + 1);
        assert_eq!(fx.store.historical_count().unwrap(), historical_before + 1);

        let entry = fx.store.historical().unwrap().pop().unwrap();
        assert_eq!(entry.disease, result.predictions[0].name);
        assert_eq!(entry.year, Utc::now().year());
        assert!(entry.cases < SYNTHETIC_CASES_MAX);

        assert_eq!(fx.store.latest().unwrap().unwrap(), result);
        assert_eq!(fx.tracker.pending_count(), 0);
    }

    #[tokio::test]
    async fn empty_location_never_scores_or_calls_out() {
        let fx = Fixture::new();
        let mock = MockInsightGenerator::new("unused");

        for location in ["", "   ", "\t\n"] {
            let err = fx
                .pipeline(&mock)
                .run(location, mumbai_env())
                .await
                .unwrap_err();
            assert!(matches!(err, AnalysisError::EmptyLocation));
            assert!(err.is_user_error());
        }

        assert_eq!(mock.calls(), 0);
        assert_eq!(fx.store.result_count().unwrap(), 0);
        assert_eq!(fx.store.historical_count().unwrap(), 10);
    }

    #[tokio::test]
    async fn non_finite_metric_is_rejected() {
        let fx = Fixture::new();
        let mock = MockInsightGenerator::new("unused");
        let env = EnvironmentalInput {
            rainfall: f64::INFINITY,
            ..mumbai_env()
        };
        let err = fx.pipeline(&mock).run("Lagos", env).await.unwrap_err();
        match err {
            AnalysisError::InvalidMetric(field) => assert_eq!(field, "rainfall"),
            other => panic!("expected invalid metric, got {other:?}"),
        }
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn location_is_trimmed() {
        let fx = Fixture::new();
        let mock = MockInsightGenerator::new("ok");
        let result = fx.pipeline(&mock).run("  Nairobi ", mumbai_env()).await.unwrap();
        assert_eq!(result.location, "Nairobi");
    }

    #[tokio::test]
    async fn failing_insight_still_records_with_fallback_text() {
        let fx = Fixture::new();
        let mock = MockInsightGenerator::failing(|| InsightError::Connection("x".into()));
        let result = fx.pipeline(&mock).run("Dhaka", mumbai_env()).await.unwrap();
        assert_eq!(result.ai_insights, INSIGHT_FALLBACK);
        assert_eq!(fx.store.result_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_insight_records_unavailable_text() {
        let fx = Fixture::new();
        let mock = MockInsightGenerator::new("");
        let result = fx.pipeline(&mock).run("Dhaka", mumbai_env()).await.unwrap();
        assert_eq!(result.ai_insights, INSIGHT_UNAVAILABLE);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_insight_times_out_into_fallback() {
        let fx = Fixture::new();
        let mock = MockInsightGenerator::hanging();
        let result = fx.pipeline(&mock).run("Manila", mumbai_env()).await.unwrap();
        assert_eq!(result.ai_insights, INSIGHT_FALLBACK);
        assert_eq!(fx.store.result_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn each_analysis_gets_a_unique_id() {
        let fx = Fixture::new();
        let mock = MockInsightGenerator::new("ok");
        let a = fx.pipeline(&mock).run("Mumbai", mumbai_env()).await.unwrap();
        let b = fx.pipeline(&mock).run("Mumbai", mumbai_env()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.timestamp <= b.timestamp);

        let ids: Vec<_> = fx.store.results().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn no_rules_means_no_historical_entry() {
        let mut fx = Fixture::new();
        fx.rules = RuleSet::empty();
        let mock = MockInsightGenerator::new("ok");
        let result = fx.pipeline(&mock).run("Quito", mumbai_env()).await.unwrap();
        assert!(result.predictions.is_empty());
        assert_eq!(result.risk_score, 0);
        assert_eq!(fx.store.result_count().unwrap(), 1);
        assert_eq!(fx.store.historical_count().unwrap(), 10);
    }

    #[test]
    fn synthetic_entry_uses_top_prediction() {
        let outcome = RuleSet::builtin()
            .with_rule(ScoringRule::new(
                "Cholera",
                crate::models::DiseaseCategory::WaterBorne,
                |_| 90.0,
                |_| RiskLevel::Critical,
            ))
            .score(&mumbai_env());
        let result = AnalysisResult {
            id: "x".into(),
            location: "Chennai".into(),
            timestamp: String::new(),
            env_data: mumbai_env(),
            predictions: outcome.predictions,
            ai_insights: String::new(),
            risk_score: outcome.risk_score,
        };
        let entry = synthetic_entry(&result, 2026, 42).unwrap();
        assert_eq!(entry, HistoricalEntry::new(2026, "Cholera", 42));
    }

    #[test]
    fn random_case_count_is_bounded() {
        for _ in 0..1000 {
            assert!(random_case_count() < SYNTHETIC_CASES_MAX);
        }
    }

    #[test]
    fn request_defaults_env_data() {
        let req: AnalysisRequest = serde_json::from_str(r#"{"location":"Goa"}"#).unwrap();
        assert_eq!(req.location, "Goa");
        assert_eq!(req.env_data, EnvironmentalInput::default());
    }
}
