//! Transport-agnostic application state.
//!
//! `CoreState` is built once at startup, wrapped in `Arc`, and shared by
//! every request handler. It owns the store, the rule table, the insight
//! generator, and the in-flight tracker.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::analysis_tracker::AnalysisTracker;
use crate::config::ServiceConfig;
use crate::models::{AnalysisResult, EnvironmentalInput};
use crate::pipeline::analysis::{AnalysisError, AnalysisPipeline};
use crate::pipeline::insight::{GeminiClient, InsightError, InsightGenerator};
use crate::pipeline::scoring::RuleSet;
use crate::store::AnalysisStore;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cannot initialize insight client: {0}")]
    InsightClient(#[from] InsightError),
}

pub struct CoreState {
    store: AnalysisStore,
    rules: RuleSet,
    generator: Arc<dyn InsightGenerator>,
    tracker: AnalysisTracker,
    config: ServiceConfig,
}

impl CoreState {
    /// Production state: baseline-seeded store, built-in rules, Gemini client.
    pub fn from_config(config: ServiceConfig) -> Result<Self, CoreError> {
        let generator = Arc::new(GeminiClient::from_config(&config)?);
        Ok(Self::with_generator(config, generator))
    }

    pub fn with_generator(config: ServiceConfig, generator: Arc<dyn InsightGenerator>) -> Self {
        Self {
            store: AnalysisStore::new(),
            rules: RuleSet::builtin(),
            generator,
            tracker: AnalysisTracker::new(),
            config,
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_store(mut self, store: AnalysisStore) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> &AnalysisStore {
        &self.store
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn tracker(&self) -> &AnalysisTracker {
        &self.tracker
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn insight_timeout(&self) -> Duration {
        self.config.insight_timeout
    }

    pub fn insight_model(&self) -> &str {
        self.generator.model()
    }

    pub fn pipeline(&self) -> AnalysisPipeline<'_> {
        AnalysisPipeline {
            rules: &self.rules,
            generator: self.generator.as_ref(),
            store: &self.store,
            tracker: &self.tracker,
            insight_timeout: self.config.insight_timeout,
        }
    }

    /// Run and record one analysis.
    pub async fn analyze(
        &self,
        location: &str,
        env: EnvironmentalInput,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.pipeline().run(location, env).await
    }
}
