use serde::{Deserialize, Serialize};

use crate::taxonomy::{self, Icon, WeatherCategory};

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A named location, either bundled in the gazetteer or returned by place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
}

impl Place {
    /// Identity used to deduplicate search results: `lowercase(name)-lowercase(country)`.
    pub fn identity_key(&self) -> String {
        format!("{}-{}", self.name.to_lowercase(), self.country.to_lowercase())
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Current conditions at a point, as reported by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Degrees Celsius.
    pub temperature: f64,
    pub weather_code: i32,
    /// km/h.
    pub wind_speed: f64,
    /// Degrees clockwise from north.
    pub wind_direction: f64,
    /// Relative humidity, 0-100.
    pub humidity: u8,
    pub is_day: bool,
}

/// The weather object handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherView {
    #[serde(flatten)]
    pub sample: WeatherSample,
    pub description: String,
    pub icon: Icon,
}

impl WeatherView {
    pub fn from_sample(sample: WeatherSample) -> Self {
        let info = taxonomy::describe(sample.weather_code);
        Self {
            sample,
            description: info.description.to_string(),
            icon: info.icon,
        }
    }

    /// Ambient category driving the background, independent of the card icon.
    pub fn category(&self) -> WeatherCategory {
        taxonomy::classify(self.sample.weather_code)
    }
}

/// Place name as resolved by reverse geocoding, before coordinates are attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeocodedPlace {
    pub city: String,
    pub country: String,
    pub display_name: String,
}

impl GeocodedPlace {
    /// Name used when the geocoder cannot be reached or answers with an error.
    pub fn coordinate_fallback(lat: f64, lng: f64) -> Self {
        Self {
            city: format_coordinate(lat, lng),
            country: String::new(),
            display_name: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationView {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

impl LocationView {
    /// Attach the requested coordinates to a geocoded name. The coordinates
    /// always come from the request, never from the geocoder.
    pub fn new(place: GeocodedPlace, at: Coordinates) -> Self {
        Self {
            city: place.city,
            country: place.country,
            lat: at.lat,
            lng: at.lng,
        }
    }
}

/// Renders `"{lat:.2}°, {lng:.2}°"`.
pub fn format_coordinate(lat: f64, lng: f64) -> String {
    format!("{lat:.2}°, {lng:.2}°")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggle(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Whole-degree temperature for display. Conversion happens before
    /// rounding, so 22.5 °C shows as 73 °F.
    pub fn display(self, celsius: f64) -> i64 {
        match self {
            Self::Celsius => round_half_up(celsius),
            Self::Fahrenheit => round_half_up(celsius * 9.0 / 5.0 + 32.0),
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Celsius => write!(f, "Celsius ({})", self.symbol()),
            Self::Fahrenheit => write!(f, "Fahrenheit ({})", self.symbol()),
        }
    }
}

/// Nearest integer, with halves going towards positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(code: i32) -> WeatherSample {
        WeatherSample {
            temperature: 22.5,
            weather_code: code,
            wind_speed: 12.3,
            wind_direction: 180.0,
            humidity: 65,
            is_day: true,
        }
    }

    #[test]
    fn fahrenheit_rounds_after_conversion() {
        assert_eq!(TemperatureUnit::Fahrenheit.display(22.5), 73);
        assert_eq!(TemperatureUnit::Fahrenheit.display(-10.0), 14);
        assert_eq!(TemperatureUnit::Fahrenheit.display(0.0), 32);
    }

    #[test]
    fn celsius_rounds_to_nearest() {
        assert_eq!(TemperatureUnit::Celsius.display(22.5), 23);
        assert_eq!(TemperatureUnit::Celsius.display(-15.3), -15);
        assert_eq!(TemperatureUnit::Celsius.display(-0.4), 0);
    }

    #[test]
    fn toggle_flips_unit() {
        assert_eq!(TemperatureUnit::Celsius.toggle(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::Fahrenheit.toggle(), TemperatureUnit::Celsius);
    }

    #[test]
    fn identity_key_ignores_case() {
        let a = Place {
            name: "Tokyo".into(),
            country: "Japan".into(),
            lat: 35.6762,
            lng: 139.6503,
            population: Some(37_400_000),
        };
        let b = Place {
            name: "TOKYO".into(),
            country: "japan".into(),
            lat: 35.68,
            lng: 139.76,
            population: None,
        };
        assert_eq!(a.identity_key(), "tokyo-japan");
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn coordinate_fallback_uses_two_decimals() {
        let place = GeocodedPlace::coordinate_fallback(35.6762, -139.6503);
        assert_eq!(place.city, "35.68°, -139.65°");
        assert!(place.country.is_empty());
    }

    #[test]
    fn location_keeps_requested_coordinates() {
        let place = GeocodedPlace {
            city: "Tokyo".into(),
            country: "Japan".into(),
            display_name: "Tokyo, Japan".into(),
        };
        let loc = LocationView::new(place, Coordinates::new(35.0, 139.0));
        assert_eq!(loc.lat, 35.0);
        assert_eq!(loc.lng, 139.0);
        assert_eq!(loc.city, "Tokyo");
    }

    #[test]
    fn view_carries_description_and_icon() {
        let view = WeatherView::from_sample(sample(63));
        assert_eq!(view.description, "Moderate rain");
        assert_eq!(view.icon, Icon::CloudShowersHeavy);
        assert_eq!(view.category(), WeatherCategory::Rain);
    }
}
