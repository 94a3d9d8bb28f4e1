//! Builds the daily weather snapshot published next to the resort pages.
//!
//! One run produces a single document: a `meta` block stamping when and
//! where the data came from, plus per-resort recent conditions. The dated
//! copy is archived and `latest.json` is what the site serves.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::weather::api::ForecastApi;

/// A resort entry from `resorts_locations.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResortLocation {
    pub resort_name: String,
    pub region: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub schema_version: String,
    pub snapshot_date_utc: String,
    pub generated_at_utc: String,
    pub source: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResortConditions {
    pub new_snow_24h_cm: i64,
    pub temperature_c: Option<f64>,
    pub wind_kph: Option<f64>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResortWeather {
    pub resort_name: String,
    pub region: String,
    pub last_verified_utc: String,
    pub conditions: ResortConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub meta: SnapshotMeta,
    pub resorts: Vec<ResortWeather>,
}

/// Reads the resort location list from a JSON file.
pub fn load_locations(path: &Path) -> Result<Vec<ResortLocation>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read locations file {}", path.display()))?;
    let locations = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse locations file {}", path.display()))?;
    Ok(locations)
}

/// Fetches conditions for every location and assembles the snapshot.
///
/// All-or-nothing: a single failed fetch aborts the whole snapshot, so a
/// partially-populated document never reaches the site.
pub async fn build_snapshot<A: ForecastApi>(
    api: &A,
    locations: &[ResortLocation],
    now: DateTime<Utc>,
) -> Result<WeatherSnapshot> {
    let generated_at = now.to_rfc3339();
    let mut resorts = Vec::with_capacity(locations.len());

    for location in locations {
        let forecast = api
            .fetch_forecast(location.lat, location.lon)
            .await
            .with_context(|| format!("Failed to fetch forecast for {}", location.resort_name))?;

        // past_days=1 puts yesterday's total first in the daily series
        let new_snow_24h_cm = forecast
            .snowfall_cm
            .first()
            .map(|cm| cm.round() as i64)
            .unwrap_or(0);

        resorts.push(ResortWeather {
            resort_name: location.resort_name.clone(),
            region: location.region.clone(),
            last_verified_utc: generated_at.clone(),
            conditions: ResortConditions {
                new_snow_24h_cm,
                temperature_c: mean(&forecast.temperature_c).map(round1),
                wind_kph: mean(&forecast.wind_kph).map(round1),
                summary: "Recent conditions snapshot".to_string(),
            },
        });
    }

    Ok(WeatherSnapshot {
        meta: SnapshotMeta {
            schema_version: "1.0".to_string(),
            snapshot_date_utc: now.format("%Y-%m-%d").to_string(),
            generated_at_utc: generated_at,
            source: "Open-Meteo".to_string(),
            notes: "Snapshot of recent conditions. Not live.".to_string(),
        },
        resorts,
    })
}

/// Writes the dated archive copy and refreshes the public `latest.json`.
///
/// Returns the path of the dated copy.
pub fn write_snapshot(
    snapshot: &WeatherSnapshot,
    snapshot_dir: &Path,
    public_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    fs::create_dir_all(snapshot_dir)?;
    fs::create_dir_all(public_dir)?;

    let body = serde_json::to_string_pretty(snapshot)?;
    let dated = snapshot_dir.join(format!("Japow-weather_{}.json", date.format("%Y%m%d")));
    fs::write(&dated, &body)?;
    fs::write(public_dir.join("latest.json"), &body)?;
    info!(path = %dated.display(), resorts = snapshot.resorts.len(), "Wrote weather snapshot");

    Ok(dated)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::api::Forecast;
    use chrono::TimeZone;
    use std::env;

    struct FixedApi;

    #[async_trait::async_trait]
    impl ForecastApi for FixedApi {
        async fn fetch_forecast(&self, _lat: f64, _lon: f64) -> Result<Forecast> {
            Ok(Forecast {
                snowfall_cm: vec![8.4, 3.0],
                temperature_c: vec![-5.0, -7.0],
                wind_kph: vec![10.0, 20.0, 33.0],
            })
        }
    }

    struct EmptyApi;

    #[async_trait::async_trait]
    impl ForecastApi for EmptyApi {
        async fn fetch_forecast(&self, _lat: f64, _lon: f64) -> Result<Forecast> {
            Ok(Forecast::default())
        }
    }

    struct SouthFailsApi;

    #[async_trait::async_trait]
    impl ForecastApi for SouthFailsApi {
        async fn fetch_forecast(&self, lat: f64, _lon: f64) -> Result<Forecast> {
            if lat < 0.0 {
                anyhow::bail!("provider outage");
            }
            Ok(Forecast::default())
        }
    }

    fn locations() -> Vec<ResortLocation> {
        vec![
            ResortLocation {
                resort_name: "Niseko United".to_string(),
                region: "Hokkaido".to_string(),
                lat: 42.86,
                lon: 140.70,
            },
            ResortLocation {
                resort_name: "Nozawa Onsen".to_string(),
                region: "Nagano".to_string(),
                lat: 36.92,
                lon: 138.44,
            },
        ]
    }

    fn run_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_build_snapshot_reduces_series() {
        let snapshot = build_snapshot(&FixedApi, &locations(), run_time())
            .await
            .unwrap();

        assert_eq!(snapshot.meta.schema_version, "1.0");
        assert_eq!(snapshot.meta.snapshot_date_utc, "2026-02-01");
        assert_eq!(snapshot.meta.source, "Open-Meteo");
        assert_eq!(snapshot.meta.notes, "Snapshot of recent conditions. Not live.");

        assert_eq!(snapshot.resorts.len(), 2);
        let first = &snapshot.resorts[0];
        assert_eq!(first.resort_name, "Niseko United");
        assert_eq!(first.region, "Hokkaido");
        assert_eq!(first.last_verified_utc, snapshot.meta.generated_at_utc);
        // yesterday's total only, rounded
        assert_eq!(first.conditions.new_snow_24h_cm, 8);
        assert_eq!(first.conditions.temperature_c, Some(-6.0));
        assert_eq!(first.conditions.wind_kph, Some(21.0));
        assert_eq!(first.conditions.summary, "Recent conditions snapshot");
    }

    #[tokio::test]
    async fn test_build_snapshot_with_no_data() {
        let snapshot = build_snapshot(&EmptyApi, &locations(), run_time())
            .await
            .unwrap();

        let conditions = &snapshot.resorts[0].conditions;
        assert_eq!(conditions.new_snow_24h_cm, 0);
        assert_eq!(conditions.temperature_c, None);
        assert_eq!(conditions.wind_kph, None);
    }

    #[tokio::test]
    async fn test_build_snapshot_aborts_on_any_failure() {
        let mut locations = locations();
        locations[1].lat = -36.92;

        let err = build_snapshot(&SouthFailsApi, &locations, run_time())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Nozawa Onsen"));
    }

    #[tokio::test]
    async fn test_write_snapshot_produces_dated_and_latest_copies() {
        let base = env::temp_dir().join("japow_snapshot_test_write");
        let _ = fs::remove_dir_all(&base);
        let snapshot_dir = base.join("snapshots");
        let public_dir = base.join("public");

        let snapshot = build_snapshot(&FixedApi, &locations(), run_time())
            .await
            .unwrap();
        let dated = write_snapshot(
            &snapshot,
            &snapshot_dir,
            &public_dir,
            run_time().date_naive(),
        )
        .unwrap();

        assert_eq!(dated, snapshot_dir.join("Japow-weather_20260201.json"));
        let latest: WeatherSnapshot =
            serde_json::from_str(&fs::read_to_string(public_dir.join("latest.json")).unwrap())
                .unwrap();
        assert_eq!(latest, snapshot);

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_load_locations_round_trip() {
        let path = env::temp_dir().join("japow_snapshot_test_locations.json");
        fs::write(
            &path,
            r#"[{"resort_name": "Kiroro", "region": "Hokkaido", "lat": 43.07, "lon": 140.98}]"#,
        )
        .unwrap();

        let locations = load_locations(&path).unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].resort_name, "Kiroro");
        assert_eq!(locations[0].lat, 43.07);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_locations_missing_file() {
        let err = load_locations(Path::new("/no/such/locations.json")).unwrap_err();
        assert!(err.to_string().contains("locations"));
    }
}
