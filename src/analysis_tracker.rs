//! In-flight analysis tracking.
//!
//! An analysis is pending from the moment it is accepted until its insight
//! resolves and the result is recorded. Concurrent analyses are not
//! serialized; each one is tagged with its result id, which doubles as a
//! correlation id in the logs.
//!
//! - `begin()` registers an analysis and returns an RAII guard
//! - dropping the guard (success, error, or cancellation) unregisters it
//! - `pending()` gives a snapshot for the health endpoint

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Snapshot of one analysis waiting on enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAnalysis {
    /// Correlation id; becomes the result id.
    pub id: String,
    pub location: String,
    /// When the analysis started (ISO 8601).
    pub started_at: String,
}

// ═══════════════════════════════════════════════════════════
// AnalysisTracker
// ═══════════════════════════════════════════════════════════

/// Registry of analyses that have started but not yet been recorded.
pub struct AnalysisTracker {
    pending: Mutex<HashMap<String, PendingAnalysis>>,
}

impl AnalysisTracker {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Register an analysis. The guard must be held until the result is recorded.
    pub fn begin(&self, id: &str, location: &str) -> AnalysisGuard<'_> {
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(
                id.to_string(),
                PendingAnalysis {
                    id: id.to_string(),
                    location: location.to_string(),
                    started_at: chrono::Utc::now().to_rfc3339(),
                },
            );
        }
        AnalysisGuard {
            id: id.to_string(),
            tracker: self,
        }
    }

    /// Analyses currently waiting, oldest first.
    pub fn pending(&self) -> Vec<PendingAnalysis> {
        let mut list: Vec<PendingAnalysis> = match self.pending.lock() {
            Ok(pending) => pending.values().cloned().collect(),
            Err(_) => return Vec::new(),
        };
        list.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        list
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending
            .lock()
            .map(|p| p.contains_key(id))
            .unwrap_or(false)
    }

    fn finish(&self, id: &str) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(id);
        }
    }
}

impl Default for AnalysisTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// AnalysisGuard: RAII registration token
// ═══════════════════════════════════════════════════════════

/// Dropping the guard removes the analysis from the pending set.
pub struct AnalysisGuard<'a> {
    id: String,
    tracker: &'a AnalysisTracker,
}

impl AnalysisGuard<'_> {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for AnalysisGuard<'_> {
    fn drop(&mut self) {
        self.tracker.finish(&self.id);
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
