//! In-memory analysis store.
//!
//! Owns the newest-first result history and the historical case
//! collection. Both live behind a single `RwLock` so that a result and the
//! historical entry derived from it are always published together.

use std::collections::VecDeque;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::models::{baseline_historical_data, AnalysisResult, HistoricalEntry};
use crate::trends::{aggregate_by_year, TrendSeries};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Internal lock error")]
    LockPoisoned,
}

#[derive(Default)]
struct StoreInner {
    /// Newest first.
    results: VecDeque<AnalysisResult>,
    /// Append order.
    historical: Vec<HistoricalEntry>,
}

/// Consistent view of both collections, taken under one read lock.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub results: Vec<AnalysisResult>,
    pub historical: Vec<HistoricalEntry>,
}

pub struct AnalysisStore {
    inner: RwLock<StoreInner>,
}

impl AnalysisStore {
    /// Store seeded with the regional baseline.
    pub fn new() -> Self {
        Self::with_historical(baseline_historical_data())
    }

    pub fn empty() -> Self {
        Self::with_historical(Vec::new())
    }

    pub fn with_historical(historical: Vec<HistoricalEntry>) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                results: VecDeque::new(),
                historical,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Publish a result and its derived historical entry in one write.
    pub fn record(
        &self,
        result: AnalysisResult,
        entry: Option<HistoricalEntry>,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner.results.push_front(result);
        if let Some(entry) = entry {
            inner.historical.push(entry);
        }
        Ok(())
    }

    /// All results, newest first.
    pub fn results(&self) -> Result<Vec<AnalysisResult>, StoreError> {
        Ok(self.read()?.results.iter().cloned().collect())
    }

    /// Up to `limit` newest results.
    pub fn recent(&self, limit: usize) -> Result<Vec<AnalysisResult>, StoreError> {
        Ok(self.read()?.results.iter().take(limit).cloned().collect())
    }

    pub fn latest(&self) -> Result<Option<AnalysisResult>, StoreError> {
        Ok(self.read()?.results.front().cloned())
    }

    pub fn get(&self, id: &str) -> Result<Option<AnalysisResult>, StoreError> {
        Ok(self.read()?.results.iter().find(|r| r.id == id).cloned())
    }

    pub fn result_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.results.len())
    }

    pub fn historical(&self) -> Result<Vec<HistoricalEntry>, StoreError> {
        Ok(self.read()?.historical.clone())
    }

    pub fn historical_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.historical.len())
    }

    /// Year-indexed series, recomputed from the raw entries.
    pub fn trend(&self) -> Result<TrendSeries, StoreError> {
        Ok(aggregate_by_year(&self.read()?.historical))
    }

    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let inner = self.read()?;
        Ok(StoreSnapshot {
            results: inner.results.iter().cloned().collect(),
            historical: inner.historical.clone(),
        })
    }
}

impl Default for AnalysisStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnvironmentalInput;

    fn result(id: &str, location: &str) -> AnalysisResult {
        AnalysisResult {
            id: id.into(),
            location: location.into(),
            timestamp: "2026-10-16T09:00:00+00:00".into(),
            env_data: EnvironmentalInput::default(),
            predictions: vec![],
            ai_insights: String::new(),
            risk_score: 0,
        }
    }

    #[test]
    fn new_store_is_seeded_with_baseline() {
        let store = AnalysisStore::new();
        assert_eq!(store.historical_count().unwrap(), 10);
        assert_eq!(store.result_count().unwrap(), 0);
        assert!(store.latest().unwrap().is_none());
    }

    #[test]
    fn record_prepends_result_and_appends_entry() {
        let store = AnalysisStore::empty();
        store
            .record(result("a", "Mumbai"), Some(HistoricalEntry::new(2026, "Dengue", 10)))
            .unwrap();
        store
            .record(result("b", "Delhi"), Some(HistoricalEntry::new(2026, "Typhoid", 20)))
            .unwrap();

        let ids: Vec<_> = store.results().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(store.latest().unwrap().unwrap().location, "Delhi");

        let diseases: Vec<_> = store
            .historical()
            .unwrap()
            .into_iter()
            .map(|e| e.disease)
            .collect();
        assert_eq!(diseases, vec!["Dengue", "Typhoid"]);
    }

    #[test]
    fn record_without_entry_leaves_historical_untouched() {
        let store = AnalysisStore::new();
        store.record(result("a", "Mumbai"), None).unwrap();
        assert_eq!(store.result_count().unwrap(), 1);
        assert_eq!(store.historical_count().unwrap(), 10);
    }

    #[test]
    fn get_and_recent() {
        let store = AnalysisStore::empty();
        for i in 0..7 {
            store.record(result(&format!("r{i}"), "Pune"), None).unwrap();
        }
        assert_eq!(store.get("r3").unwrap().unwrap().id, "r3");
        assert!(store.get("missing").unwrap().is_none());

        let recent = store.recent(5).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].id, "r6");
        assert_eq!(recent[4].id, "r2");
    }

    #[test]
    fn trend_reflects_recorded_entries() {
        let store = AnalysisStore::empty();
        store
            .record(result("a", "Mumbai"), Some(HistoricalEntry::new(2026, "Dengue", 5)))
            .unwrap();
        store
            .record(result("b", "Mumbai"), Some(HistoricalEntry::new(2026, "Dengue", 7)))
            .unwrap();
        let trend = store.trend().unwrap();
        assert_eq!(trend.years(), vec![2026]);
        assert_eq!(trend.cases_for(2026, "Dengue"), 12);
    }

    #[test]
    fn concurrent_writers_keep_pairs_together() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(AnalysisStore::empty());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..25 {
                        store
                            .record(
                                result(&format!("{i}-{j}"), "Accra"),
                                Some(HistoricalEntry::new(2026, "Dengue", 1)),
                            )
                            .unwrap();
                        let snap = store.snapshot().unwrap();
                        assert_eq!(snap.results.len(), snap.historical.len());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.result_count().unwrap(), 200);
        assert_eq!(store.historical_count().unwrap(), 200);
    }
}
