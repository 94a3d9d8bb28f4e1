//! Trait and types for fetching recent conditions from a forecast provider.

use anyhow::Result;

/// Recent conditions for one location, reduced to the series the snapshot
/// needs.
///
/// Series arrive already stripped of provider nulls; an empty series means
/// the provider had no usable data for that variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    /// Daily snowfall totals in cm, oldest day first.
    pub snowfall_cm: Vec<f64>,
    /// Hourly air temperature in degrees C.
    pub temperature_c: Vec<f64>,
    /// Hourly wind speed in km/h.
    pub wind_kph: Vec<f64>,
}

/// Abstraction over a weather forecast provider (e.g., Open-Meteo).
#[async_trait::async_trait]
pub trait ForecastApi {
    /// Returns recent conditions for the given coordinates.
    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast>;
}
