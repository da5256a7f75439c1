use serde::{Deserialize, Serialize};

/// A single point-in-time current-weather reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// City name as the provider spells it.
    pub city: String,
    /// Degrees Celsius.
    pub temp: f64,
    pub condition: String,
    pub humidity: u8,
    /// Meters per second.
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// `YYYY-MM-DD HH:MM:SS`, as supplied by the provider.
    pub datetime: String,
    pub temp: f64,
    pub condition: String,
}

/// Forecast entries in provider order, typically 3-hour steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub forecasts: Vec<ForecastEntry>,
}

impl Forecast {
    pub fn is_empty(&self) -> bool {
        self.forecasts.is_empty()
    }

    /// Counts each condition, keeping the order in which conditions first appear.
    pub fn condition_frequency(&self) -> Vec<(String, u64)> {
        let mut freq: Vec<(String, u64)> = Vec::new();
        for entry in &self.forecasts {
            match freq.iter_mut().find(|(cond, _)| *cond == entry.condition) {
                Some((_, count)) => *count += 1,
                None => freq.push((entry.condition.clone(), 1)),
            }
        }
        freq
    }
}
