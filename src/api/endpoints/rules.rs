//! `GET /api/rules`: the active scoring rule table.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::models::{DiseaseCategory, Trend};
use crate::pipeline::scoring::rules::ScoringRule;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub name: String,
    pub category: DiseaseCategory,
    pub trend: Trend,
    pub ceiling: u8,
    pub prevention_tips: Vec<String>,
}

impl From<&ScoringRule> for RuleInfo {
    fn from(rule: &ScoringRule) -> Self {
        Self {
            name: rule.name.clone(),
            category: rule.category,
            trend: rule.trend,
            ceiling: rule.ceiling(),
            prevention_tips: rule.prevention_tips.clone(),
        }
    }
}

pub async fn list(State(ctx): State<ApiContext>) -> Json<Vec<RuleInfo>> {
    Json(ctx.core.rules().rules().iter().map(RuleInfo::from).collect())
}
