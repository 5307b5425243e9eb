use serde::{Deserialize, Serialize};

/// One (year, disease, case count) observation feeding trend charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    pub year: i32,
    pub disease: String,
    pub cases: u32,
}

impl HistoricalEntry {
    pub fn new(year: i32, disease: impl Into<String>, cases: u32) -> Self {
        Self {
            year,
            disease: disease.into(),
            cases,
        }
    }
}

/// Regional baseline the dashboard starts from before any analysis runs.
pub fn baseline_historical_data() -> Vec<HistoricalEntry> {
    const BASELINE: &[(i32, &str, u32)] = &[
        (2019, "Dengue", 120),
        (2020, "Dengue", 240),
        (2021, "Dengue", 180),
        (2022, "Dengue", 310),
        (2023, "Dengue", 450),
        (2019, "Malaria", 80),
        (2020, "Malaria", 100),
        (2021, "Malaria", 90),
        (2022, "Malaria", 120),
        (2023, "Malaria", 150),
    ];

    BASELINE
        .iter()
        .map(|&(year, disease, cases)| HistoricalEntry::new(year, disease, cases))
        .collect()
}
