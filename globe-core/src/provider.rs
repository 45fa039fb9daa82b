//! Remote resolvers: point weather, reverse geocoding and forward place search.
//!
//! The three capabilities fail differently:
//! - [`WeatherSource`] fails loudly; its error reaches the user.
//! - [`ReverseGeocoder`] cannot fail; it falls back to a coordinate label.
//! - [`PlaceSearch`] cannot fail; it falls back to no candidates.

use crate::{
    Config,
    model::{GeocodedPlace, Place, WeatherSample},
    provider::{nominatim::NominatimClient, open_meteo::OpenMeteoClient},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc};

pub mod nominatim;
pub mod open_meteo;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Any non-success status from the weather provider.
    #[error("Failed to fetch weather data")]
    Status(reqwest::StatusCode),
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_weather(&self, lat: f64, lng: f64) -> Result<WeatherSample, FetchError>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    /// Never fails: transport errors and non-success statuses resolve to
    /// [`GeocodedPlace::coordinate_fallback`].
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> GeocodedPlace;
}

#[async_trait]
pub trait PlaceSearch: Send + Sync + Debug {
    /// Never fails: any error resolves to an empty list.
    async fn search_places(&self, query: &str) -> Vec<Place>;
}

/// The set of remote capabilities the pipeline depends on.
#[derive(Debug, Clone)]
pub struct Resolvers {
    pub weather: Arc<dyn WeatherSource>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub places: Arc<dyn PlaceSearch>,
}

impl Resolvers {
    /// Open-Meteo for weather, Nominatim for both geocoding directions,
    /// sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.http.timeout())
            .user_agent(config.http.user_agent.as_str())
            .build()?;

        let nominatim = Arc::new(NominatimClient::new(
            http.clone(),
            &config.endpoints,
            config.http.accept_language.clone(),
            config.search.remote_limit,
        ));

        Ok(Self {
            weather: Arc::new(OpenMeteoClient::new(http, config.endpoints.weather_url.clone())),
            geocoder: nominatim.clone(),
            places: nominatim,
        })
    }
}
