use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::WeatherSample;

use super::{FetchError, WeatherSource};

/// Point weather from the Open-Meteo forecast API. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    url: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i32,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    relativehumidity_2m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current_weather: OmCurrentWeather,
    hourly: OmHourly,
}

impl OmResponse {
    fn into_sample(self) -> Result<WeatherSample, FetchError> {
        // The first hourly slot stands in for the current humidity.
        let humidity = self
            .hourly
            .relativehumidity_2m
            .first()
            .copied()
            .flatten()
            .ok_or_else(|| FetchError::Decode("response has no hourly humidity".to_string()))?;

        let current = self.current_weather;
        Ok(WeatherSample {
            temperature: current.temperature,
            weather_code: current.weathercode,
            wind_speed: current.windspeed,
            wind_direction: current.winddirection,
            humidity: humidity.round().clamp(0.0, 100.0) as u8,
            is_day: current.is_day == 1,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch_weather(&self, lat: f64, lng: f64) -> Result<WeatherSample, FetchError> {
        tracing::debug!(lat, lng, "requesting current weather");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                ("current_weather", "true".to_string()),
                (
                    "hourly",
                    "temperature_2m,relativehumidity_2m,weathercode".to_string(),
                ),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            tracing::debug!(%status, "weather request rejected");
            return Err(FetchError::Status(status));
        }

        let body = res.text().await?;
        let parsed: OmResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("weather JSON: {e}")))?;

        parsed.into_sample()
    }
}
