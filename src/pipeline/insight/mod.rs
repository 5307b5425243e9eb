//! Insight enrichment: turn a scored analysis into a short narrative.
//!
//! The generator is reached over the network and can fail in many ways.
//! `generate_insight` absorbs every failure: the caller always gets an
//! `Insight`, and `Insight::into_text` always yields a displayable string.

pub mod gemini;
pub mod prompt;

pub use gemini::{Credentials, GeminiClient};
pub use prompt::build_insight_prompt;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;

use crate::models::{DiseasePrediction, EnvironmentalInput};

/// Returned when the generator answers with no text.
pub const INSIGHT_UNAVAILABLE: &str = "AI insight currently unavailable.";

/// Returned when the generator cannot be reached or fails.
pub const INSIGHT_FALLBACK: &str =
    "Error generating AI insights. Please check environmental factors manually.";

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("No API key configured for the insight service")]
    MissingCredential,

    #[error("Insight service unreachable at {0}")]
    Connection(String),

    #[error("Insight request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Insight service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// Outcome of one enrichment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    Generated { text: String },
    Unavailable,
    Fallback { reason: String },
}

impl Insight {
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Generated { text } => text,
            Self::Unavailable => INSIGHT_UNAVAILABLE,
            Self::Fallback { .. } => INSIGHT_FALLBACK,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Generated { text } => text,
            other => other.as_text().to_string(),
        }
    }
}

/// Text-generation backend (allows mocking).
pub trait InsightGenerator: Send + Sync {
    /// Generate a completion for `prompt`. An empty string is a valid answer.
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, InsightError>>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Build the prompt, call the generator under `timeout`, and classify the result.
pub async fn generate_insight(
    generator: &dyn InsightGenerator,
    location: &str,
    env: &EnvironmentalInput,
    predictions: &[DiseasePrediction],
    timeout: Duration,
) -> Insight {
    let prompt = build_insight_prompt(location, env, predictions);
    enrich(generator, &prompt, timeout).await
}

/// Call the generator with an already-built prompt. Never fails.
pub async fn enrich(generator: &dyn InsightGenerator, prompt: &str, timeout: Duration) -> Insight {
    let started = std::time::Instant::now();
    let outcome = match tokio::time::timeout(timeout, generator.generate(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(InsightError::Timeout(timeout)),
    };

    match outcome {
        Ok(text) if text.trim().is_empty() => {
            tracing::info!(model = generator.model(), "Insight service returned empty content");
            Insight::Unavailable
        }
        Ok(text) => {
            tracing::debug!(
                model = generator.model(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                chars = text.len(),
                "Insight generated"
            );
            Insight::Generated { text }
        }
        Err(e) => {
            tracing::warn!(model = generator.model(), error = %e, "AI insight error, using fallback");
            Insight::Fallback {
                reason: e.to_string(),
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Mock generator
// ═══════════════════════════════════════════════════════════

enum MockBehavior {
    Respond(String),
    Fail(fn() -> InsightError),
    Hang,
}

/// Mock insight generator for testing: returns a configurable response
/// and counts how often it was called.
pub struct MockInsightGenerator {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockInsightGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            behavior: MockBehavior::Respond(response.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: fn() -> InsightError) -> Self {
        Self {
            behavior: MockBehavior::Fail(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Never resolves; exercises the timeout path.
    pub fn hanging() -> Self {
        Self {
            behavior: MockBehavior::Hang,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InsightGenerator for MockInsightGenerator {
    fn generate<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, InsightError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            match &self.behavior {
                MockBehavior::Respond(text) => Ok(text.clone()),
                MockBehavior::Fail(make) => Err(make()),
                MockBehavior::Hang => {
                    std::future::pending::<()>().await;
                    Ok(String::new())
                }
            }
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}
