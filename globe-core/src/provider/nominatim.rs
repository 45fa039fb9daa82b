//! Reverse and forward geocoding via Nominatim (OpenStreetMap).
//! Free, no API key required; a descriptive User-Agent is expected.

use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT_LANGUAGE};
use serde::Deserialize;

use crate::{
    config::Endpoints,
    model::{GeocodedPlace, Place},
};

use super::{FetchError, PlaceSearch, ReverseGeocoder};

#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: Client,
    reverse_url: String,
    search_url: String,
    accept_language: String,
    search_limit: usize,
}

impl NominatimClient {
    pub fn new(
        http: Client,
        endpoints: &Endpoints,
        accept_language: String,
        search_limit: usize,
    ) -> Self {
        Self {
            http,
            reverse_url: endpoints.reverse_geocode_url.clone(),
            search_url: endpoints.search_url.clone(),
            accept_language,
            search_limit,
        }
    }

    async fn try_reverse(&self, lat: f64, lng: f64) -> Result<GeocodedPlace, FetchError> {
        let res = self
            .http
            .get(&self.reverse_url)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("format", "json".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body: NominatimReverse = res.json().await?;
        Ok(body.into_place())
    }

    async fn try_search(&self, query: &str) -> Result<Vec<Place>, FetchError> {
        let res = self
            .http
            .get(&self.search_url)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .query(&[
                ("q", query.to_string()),
                ("format", "json".to_string()),
                ("limit", self.search_limit.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let hits: Vec<NominatimHit> = res.json().await?;
        Ok(hits.into_iter().filter_map(NominatimHit::into_place).collect())
    }
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    address: Option<NominatimAddress>,
    display_name: Option<String>,
}

impl NominatimReverse {
    fn into_place(self) -> GeocodedPlace {
        let addr = self.address.unwrap_or_default();

        // Prefer city > town > village > county > state for the place name
        let city = non_empty(addr.city)
            .or_else(|| non_empty(addr.town))
            .or_else(|| non_empty(addr.village))
            .or_else(|| non_empty(addr.county))
            .or_else(|| non_empty(addr.state))
            .unwrap_or_else(|| "Unknown".to_string());

        GeocodedPlace {
            city,
            country: addr.country.unwrap_or_default(),
            display_name: self.display_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    name: Option<String>,
    address: Option<NominatimAddress>,
}

impl NominatimHit {
    fn into_place(self) -> Option<Place> {
        let addr = self.address.unwrap_or_default();

        let name = non_empty(addr.city)
            .or_else(|| non_empty(addr.town))
            .or_else(|| non_empty(addr.village))
            .or_else(|| non_empty(self.name))?;

        let lat = self.lat.trim().parse().ok()?;
        let lng = self.lon.trim().parse().ok()?;

        Some(Place {
            name,
            country: addr.country.unwrap_or_default(),
            lat,
            lng,
            population: None,
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> GeocodedPlace {
        tracing::debug!(lat, lng, "reverse geocoding");

        match self.try_reverse(lat, lng).await {
            Ok(place) => {
                tracing::info!("Reverse geocoded to: {}", place.city);
                place
            }
            Err(e) => {
                tracing::warn!("Reverse geocode failed, using coordinates: {}", e);
                GeocodedPlace::coordinate_fallback(lat, lng)
            }
        }
    }
}

#[async_trait]
impl PlaceSearch for NominatimClient {
    async fn search_places(&self, query: &str) -> Vec<Place> {
        tracing::debug!(query, "searching places");

        match self.try_search(query).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!("Place search failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reverse(json: serde_json::Value) -> GeocodedPlace {
        serde_json::from_value::<NominatimReverse>(json).unwrap().into_place()
    }

    fn hit(json: serde_json::Value) -> Option<Place> {
        serde_json::from_value::<NominatimHit>(json).unwrap().into_place()
    }

    #[test]
    fn reverse_prefers_city() {
        let place = reverse(serde_json::json!({
            "address": { "city": "Tokyo", "state": "Tokyo", "country": "Japan" },
            "display_name": "Tokyo, Japan"
        }));
        assert_eq!(place.city, "Tokyo");
        assert_eq!(place.country, "Japan");
        assert_eq!(place.display_name, "Tokyo, Japan");
    }

    #[test]
    fn reverse_walks_precedence_chain() {
        let town = reverse(serde_json::json!({
            "address": { "town": "Hallstatt", "county": "Gmunden", "country": "Austria" }
        }));
        assert_eq!(town.city, "Hallstatt");

        let county = reverse(serde_json::json!({
            "address": { "city": "", "county": "Gmunden", "state": "Upper Austria" }
        }));
        assert_eq!(county.city, "Gmunden");

        let state = reverse(serde_json::json!({ "address": { "state": "Nunavut" } }));
        assert_eq!(state.city, "Nunavut");
        assert_eq!(state.country, "");
    }

    #[test]
    fn reverse_without_address_is_unknown() {
        let place = reverse(serde_json::json!({ "error": "Unable to geocode" }));
        assert_eq!(place.city, "Unknown");
        assert_eq!(place.country, "");
        assert_eq!(place.display_name, "");
    }

    #[test]
    fn hit_parses_coordinates_and_name() {
        let place = hit(serde_json::json!({
            "lat": "48.8588897",
            "lon": "2.3200410",
            "name": "Paris",
            "address": { "city": "Paris", "country": "France" }
        }))
        .unwrap();
        assert_eq!(place.name, "Paris");
        assert_eq!(place.country, "France");
        assert!((place.lat - 48.8588897).abs() < 1e-9);
        assert!((place.lng - 2.320041).abs() < 1e-9);
        assert_eq!(place.population, None);
    }

    #[test]
    fn hit_falls_back_to_item_name() {
        let place = hit(serde_json::json!({
            "lat": "27.9881",
            "lon": "86.9250",
            "name": "Mount Everest",
            "address": { "country": "Nepal" }
        }))
        .unwrap();
        assert_eq!(place.name, "Mount Everest");
    }

    #[test]
    fn hit_without_name_or_valid_coordinates_is_dropped() {
        assert!(hit(serde_json::json!({ "lat": "1.0", "lon": "2.0", "name": "" })).is_none());
        assert!(hit(serde_json::json!({ "lat": "north", "lon": "2.0", "name": "X" })).is_none());
    }
}
