use serde::{Deserialize, Serialize};

/// Environmental metrics supplied for one location.
///
/// Values are measurements with no enforced upper bound. Scoring accepts
/// anything finite; the assembler rejects NaN and infinities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalInput {
    /// Air quality index.
    pub aqi: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Millimetres.
    pub rainfall: f64,
    /// People per square kilometre.
    pub population_density: f64,
}

impl Default for EnvironmentalInput {
    fn default() -> Self {
        Self {
            aqi: 45.0,
            temperature: 28.0,
            humidity: 65.0,
            rainfall: 120.0,
            population_density: 1200.0,
        }
    }
}

impl EnvironmentalInput {
    /// Name of the first metric that is NaN or infinite, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("aqi", self.aqi),
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("rainfall", self.rainfall),
            ("populationDensity", self.population_density),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
    }
}
