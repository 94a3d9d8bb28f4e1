//! Open-Meteo client backing the daily weather snapshot.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::weather::api::{Forecast, ForecastApi};

#[derive(Deserialize, Default)]
struct ForecastResponse {
    #[serde(default)]
    hourly: HourlyBlock,
    #[serde(default)]
    daily: DailyBlock,
}

#[derive(Deserialize, Default)]
struct HourlyBlock {
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

#[derive(Deserialize, Default)]
struct DailyBlock {
    #[serde(default)]
    snowfall_sum: Vec<Option<f64>>,
}

impl ForecastResponse {
    /// Flattens the raw response into a [`Forecast`], dropping the `null`
    /// readings Open-Meteo emits for hours it has no data for.
    fn into_forecast(self) -> Forecast {
        Forecast {
            snowfall_cm: self.daily.snowfall_sum.into_iter().flatten().collect(),
            temperature_c: self.hourly.temperature_2m.into_iter().flatten().collect(),
            wind_kph: self.hourly.wind_speed_10m.into_iter().flatten().collect(),
        }
    }
}

pub struct OpenMeteoClient {
    base_url: String,
    client: reqwest::Client,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: "https://api.open-meteo.com".to_string(),
            client,
        })
    }
}

#[async_trait]
impl ForecastApi for OpenMeteoClient {
    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast> {
        let url = format!("{}/v1/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", "temperature_2m,wind_speed_10m".to_string()),
                ("daily", "snowfall_sum".to_string()),
                ("past_days", "1".to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send forecast request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Open-Meteo returned status {}: {}",
                status,
                body
            ));
        }

        let parsed: ForecastResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse forecast response: {}", e))?;

        Ok(parsed.into_forecast())
    }
}
