use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "EcoHealth";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variables checked, in order, for the insight API key.
pub const API_KEY_VARS: &[&str] = &["ECOHEALTH_API_KEY", "API_KEY"];

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_INSIGHT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_INSIGHT_TIMEOUT_SECS: u64 = 10;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "ecohealth=info,ecohealth_lib=info,tower_http=info".to_string()
}

/// Get the application data directory.
/// ~/EcoHealth/ on all platforms; falls back to the working directory
/// when no home directory can be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Directory where exported plain-text reports are written.
pub fn reports_dir() -> PathBuf {
    app_data_dir().join("reports")
}

/// Runtime settings for the HTTP service and the insight client.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub gemini_base_url: String,
    pub insight_model: String,
    pub insight_timeout: Duration,
    pub reports_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8787))),
            gemini_base_url: DEFAULT_GEMINI_URL.to_string(),
            insight_model: DEFAULT_INSIGHT_MODEL.to_string(),
            insight_timeout: Duration::from_secs(DEFAULT_INSIGHT_TIMEOUT_SECS),
            reports_dir: reports_dir(),
        }
    }
}

impl ServiceConfig {
    /// Build from `ECOHEALTH_*` environment variables, keeping the default
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("ECOHEALTH_BIND") {
            match raw.parse() {
                Ok(addr) => config.bind_addr = addr,
                Err(e) => tracing::warn!(value = %raw, error = %e, "Ignoring invalid ECOHEALTH_BIND"),
            }
        }
        if let Some(url) = lookup("ECOHEALTH_GEMINI_URL").filter(|v| !v.trim().is_empty()) {
            config.gemini_base_url = url;
        }
        if let Some(model) = lookup("ECOHEALTH_MODEL").filter(|v| !v.trim().is_empty()) {
            config.insight_model = model;
        }
        if let Some(raw) = lookup("ECOHEALTH_INSIGHT_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.insight_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "Ignoring invalid ECOHEALTH_INSIGHT_TIMEOUT_SECS"),
            }
        }
        if let Some(dir) = lookup("ECOHEALTH_REPORTS_DIR").filter(|v| !v.trim().is_empty()) {
            config.reports_dir = PathBuf::from(dir);
        }

        config
    }
}

/// Resolve the insight API key from the environment at call time.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}
