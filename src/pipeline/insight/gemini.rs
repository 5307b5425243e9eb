//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{InsightError, InsightGenerator};
use crate::config;

/// TCP connect budget. The overall request is bounded by the enrichment timeout.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Where the API key comes from.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Read `config::API_KEY_VARS` on every call.
    Environment,
    /// Fixed key. An empty key counts as missing.
    Static(String),
}

impl Credentials {
    fn resolve(&self) -> Option<String> {
        match self {
            Self::Environment => config::api_key_from_env(),
            Self::Static(key) if key.trim().is_empty() => None,
            Self::Static(key) => Some(key.trim().to_string()),
        }
    }
}

/// Gemini text-generation client.
pub struct GeminiClient {
    base_url: String,
    model: String,
    credentials: Credentials,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        credentials: Credentials,
    ) -> Result<Self, InsightError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| InsightError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            credentials,
            client,
        })
    }

    /// Client for the public endpoint, key read from the environment per call.
    pub fn from_config(config: &config::ServiceConfig) -> Result<Self, InsightError> {
        Self::new(
            &config.gemini_base_url,
            &config.insight_model,
            Credentials::Environment,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, InsightError> {
        let api_key = self
            .credentials
            .resolve()
            .ok_or(InsightError::MissingCredential)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    InsightError::Connection(self.base_url.clone())
                } else {
                    InsightError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| InsightError::ResponseParsing(e.to_string()))?;

        Ok(parsed.text())
    }
}

impl InsightGenerator for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, InsightError>> {
        Box::pin(self.generate_content(prompt))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ── Wire types ──────────────────────────────────────────────

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

/// Budget 0 disables extended reasoning.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

/// Response body. Every level is optional; absent text reads as empty.
#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    #[derive(Clone)]
    struct Stub {
        hits: Arc<AtomicUsize>,
        status: StatusCode,
        reply: serde_json::Value,
    }

    async fn stub_generate(
        State(stub): State<Stub>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        stub.hits.fetch_add(1, Ordering::SeqCst);
        assert_eq!(headers.get("x-goog-api-key").unwrap(), "test-key");
        assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
        assert!(body["contents"][0]["parts"][0]["text"].is_string());
        (stub.status, Json(stub.reply.clone()))
    }

    /// Serve a fake Gemini endpoint on an ephemeral port.
    async fn spawn_stub(status: StatusCode, reply: serde_json::Value) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let stub = Stub {
            hits: hits.clone(),
            status,
            reply,
        };
        let app = Router::new()
            .route("/v1beta/models/:call", post(stub_generate))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), hits)
    }

    fn client(base_url: &str, key: &str) -> GeminiClient {
        GeminiClient::new(base_url, "gemini-3-flash-preview", Credentials::Static(key.into()))
            .unwrap()
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let c = client("http://localhost:9999/", "k");
        assert_eq!(c.base_url(), "http://localhost:9999");
        assert_eq!(
            c.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-3-flash-preview:generateContent"
        );
        assert_eq!(c.model(), "gemini-3-flash-preview");
    }

    #[test]
    fn request_serializes_camel_case() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"Rain "},{"text":"raises dengue risk."}]}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text(), "Rain raises dengue risk.");
    }

    #[test]
    fn response_without_text_is_empty() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(parsed.text(), "");
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[test]
    fn blank_static_key_counts_as_missing() {
        assert!(Credentials::Static("  ".into()).resolve().is_none());
        assert_eq!(
            Credentials::Static(" abc ".into()).resolve().as_deref(),
            Some("abc")
        );
    }

    #[tokio::test]
    async fn generate_returns_service_text() {
        let (url, hits) = spawn_stub(
            StatusCode::OK,
            serde_json::json!({"candidates":[{"content":{"parts":[{"text":"Insight."}]}}]}),
        )
        .await;
        let text = client(&url, "test-key").generate("prompt").await.unwrap();
        assert_eq!(text, "Insight.");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generate_surfaces_http_status() {
        let (url, _) = spawn_stub(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"error":{"message":"API key not valid"}}),
        )
        .await;
        let err = client(&url, "test-key").generate("prompt").await.unwrap_err();
        match err {
            InsightError::Service { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_sends_nothing() {
        let (url, hits) = spawn_stub(StatusCode::OK, serde_json::json!({})).await;
        let err = client(&url, "").generate("prompt").await.unwrap_err();
        assert!(matches!(err, InsightError::MissingCredential));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreachable_host_is_connection_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"), "test-key")
            .generate("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, InsightError::Connection(_)));
    }
}
