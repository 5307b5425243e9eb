//! Year-indexed disease case series for trend charts.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::HistoricalEntry;

/// Key holding the year in a serialized point.
pub const YEAR_KEY: &str = "year";

/// Summed cases per disease for one year.
///
/// Serializes flat (`{"year":2020,"Dengue":240,"Malaria":100}`), the row
/// shape chart libraries expect. Disease names of the form `year`, `year_`,
/// `year__`... gain one trailing underscore so none can shadow the year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub year: i32,
    pub cases: BTreeMap<String, u64>,
}

impl Serialize for TrendPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cases.len() + 1))?;
        map.serialize_entry(YEAR_KEY, &self.year)?;
        for (disease, cases) in &self.cases {
            map.serialize_entry(&disease_key(disease), cases)?;
        }
        map.end()
    }
}

fn disease_key(disease: &str) -> Cow<'_, str> {
    if disease.trim_end_matches('_') == YEAR_KEY {
        Cow::Owned(format!("{disease}_"))
    } else {
        Cow::Borrowed(disease)
    }
}

/// Points sorted by year, one per distinct year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    /// Every disease appearing in any year, sorted.
    pub fn diseases(&self) -> Vec<String> {
        self.points
            .iter()
            .flat_map(|p| p.cases.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 0 when the year or disease has no entries.
    pub fn cases_for(&self, year: i32, disease: &str) -> u64 {
        self.points
            .iter()
            .find(|p| p.year == year)
            .and_then(|p| p.cases.get(disease).copied())
            .unwrap_or(0)
    }

    pub fn total_cases(&self) -> u64 {
        self.points.iter().flat_map(|p| p.cases.values()).sum()
    }
}

/// Group entries by year and disease, summing cases that share both.
pub fn aggregate_by_year(entries: &[HistoricalEntry]) -> TrendSeries {
    let mut by_year: BTreeMap<i32, BTreeMap<String, u64>> = BTreeMap::new();
    for entry in entries {
        *by_year
            .entry(entry.year)
            .or_default()
            .entry(entry.disease.clone())
            .or_default() += u64::from(entry.cases);
    }

    TrendSeries {
        points: by_year
            .into_iter()
            .map(|(year, cases)| TrendPoint { year, cases })
            .collect(),
    }
}
