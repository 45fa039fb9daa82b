use globe_core::{LocationView, Place, TemperatureUnit, WeatherView, model::format_coordinate};

/// One line per search result, e.g. `Tokyo, Japan`.
pub fn place_line(place: &Place) -> String {
    if place.country.is_empty() {
        place.name.clone()
    } else {
        format!("{}, {}", place.name, place.country)
    }
}

/// Plain-text weather card.
pub fn card(weather: &WeatherView, location: &LocationView, unit: TemperatureUnit) -> String {
    let title = if location.country.is_empty() {
        location.city.clone()
    } else {
        format!("{}, {}", location.city, location.country)
    };

    let sample = &weather.sample;
    let lines = [
        title,
        format!(
            "{}{}  {} [{}]",
            unit.display(sample.temperature),
            unit.symbol(),
            weather.description,
            weather.icon,
        ),
        format!("Humidity  {}%", sample.humidity),
        format!("Wind      {} km/h from {:.0}°", sample.wind_speed, sample.wind_direction),
        format!(
            "{}  {}  ({})",
            format_coordinate(location.lat, location.lng),
            if sample.is_day { "Day" } else { "Night" },
            weather.category(),
        ),
    ];

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use globe_core::WeatherSample;

    fn view() -> WeatherView {
        WeatherView::from_sample(WeatherSample {
            temperature: 22.5,
            weather_code: 1,
            wind_speed: 12.3,
            wind_direction: 270.0,
            humidity: 65,
            is_day: false,
        })
    }

    fn tokyo() -> LocationView {
        LocationView {
            city: "Tokyo".into(),
            country: "Japan".into(),
            lat: 35.6762,
            lng: 139.6503,
        }
    }

    #[test]
    fn card_shows_converted_temperature() {
        let text = card(&view(), &tokyo(), TemperatureUnit::Fahrenheit);

        assert!(text.starts_with("Tokyo, Japan\n"));
        assert!(text.contains("73°F  Mainly clear [sun]"));
        assert!(text.contains("Humidity  65%"));
        assert!(text.contains("35.68°, 139.65°  Night  (clear)"));
    }

    #[test]
    fn card_without_country_uses_city_only() {
        let location = LocationView {
            country: String::new(),
            city: "35.68°, 139.65°".into(),
            ..tokyo()
        };
        let text = card(&view(), &location, TemperatureUnit::Celsius);

        assert!(text.starts_with("35.68°, 139.65°\n"));
        assert!(text.contains("23°C"));
    }

    #[test]
    fn place_line_omits_empty_country() {
        let place = Place {
            name: "Atlantis".into(),
            country: String::new(),
            lat: 0.0,
            lng: 0.0,
            population: None,
        };
        assert_eq!(place_line(&place), "Atlantis");
    }
}
