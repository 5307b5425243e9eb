//! Plain-text outbreak report export.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::AnalysisResult;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot create reports dir: {0}")]
    CreateDir(std::io::Error),

    #[error("Cannot write report: {0}")]
    Write(std::io::Error),
}

/// Render the report body for one analysis.
pub fn render_report(result: &AnalysisResult) -> String {
    let env = &result.env_data;
    let mut out = String::with_capacity(512);

    let _ = writeln!(out, "HEALTH OUTBREAK REPORT: {}", result.location);
    let _ = writeln!(out, "Generated: {}", result.timestamp);
    out.push_str("---\n");
    let _ = writeln!(out, "Overall Risk Score: {}%", result.risk_score);
    out.push('\n');
    out.push_str("ENVIRONMENTAL DATA:\n");
    let _ = writeln!(out, "AQI: {}", env.aqi);
    let _ = writeln!(out, "Temp: {}°C", env.temperature);
    let _ = writeln!(out, "Humidity: {}%", env.humidity);
    let _ = writeln!(out, "Rainfall: {}mm", env.rainfall);
    out.push('\n');
    out.push_str("PREDICTIONS:\n");
    for p in &result.predictions {
        let _ = writeln!(out, "{}: {}% ({})", p.name, p.probability, p.risk_level);
    }
    out.push('\n');
    out.push_str("AI INSIGHTS:\n");
    out.push_str(&result.ai_insights);
    out.push('\n');

    out
}

/// `report_<location>_<YYYY-MM-DD>.txt`, location reduced to `[A-Za-z0-9_-]`.
pub fn report_filename(location: &str, date: NaiveDate) -> String {
    let mut safe: String = location
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if safe.is_empty() {
        safe.push_str("location");
    }
    format!("report_{safe}_{}.txt", date.format("%Y-%m-%d"))
}

/// Filename for a result, dated today (UTC).
pub fn filename_for(result: &AnalysisResult) -> String {
    report_filename(&result.location, chrono::Utc::now().date_naive())
}

/// Write the report into `dir` (created if missing) and return its path.
pub fn export_report(dir: &Path, result: &AnalysisResult) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(ReportError::CreateDir)?;
    let path = dir.join(filename_for(result));
    std::fs::write(&path, render_report(result)).map_err(ReportError::Write)?;
    tracing::info!(path = %path.display(), id = %result.id, "Report exported");
    Ok(path)
}
