//! Bundled list of major world cities, searchable without a network round-trip.

use crate::model::Place;

/// A gazetteer entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub country: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub population: u64,
}

impl City {
    const fn new(
        name: &'static str,
        country: &'static str,
        lat: f64,
        lng: f64,
        population: u64,
    ) -> Self {
        Self {
            name,
            country,
            lat,
            lng,
            population,
        }
    }

    pub fn to_place(&self) -> Place {
        Place {
            name: self.name.to_string(),
            country: self.country.to_string(),
            lat: self.lat,
            lng: self.lng,
            population: Some(self.population),
        }
    }
}

/// Maximum number of matches returned by [`Gazetteer::search`].
pub const MAX_MATCHES: usize = 8;

pub static MAJOR_CITIES: &[City] = &[
    // Asia
    City::new("Tokyo", "Japan", 35.6762, 139.6503, 37_400_000),
    City::new("Shanghai", "China", 31.2304, 121.4737, 27_000_000),
    City::new("Beijing", "China", 39.9042, 116.4074, 21_500_000),
    City::new("Delhi", "India", 28.7041, 77.1025, 31_200_000),
    City::new("Mumbai", "India", 19.0760, 72.8777, 20_700_000),
    City::new("Seoul", "South Korea", 37.5665, 126.9780, 9_776_000),
    City::new("Singapore", "Singapore", 1.3521, 103.8198, 5_850_000),
    City::new("Hong Kong", "China", 22.3193, 114.1694, 7_500_000),
    City::new("Bangkok", "Thailand", 13.7563, 100.5018, 10_700_000),
    City::new("Jakarta", "Indonesia", -6.2088, 106.8456, 10_600_000),
    City::new("Taipei", "Taiwan", 25.0330, 121.5654, 2_600_000),
    City::new("Dubai", "UAE", 25.2048, 55.2708, 3_400_000),
    City::new("Istanbul", "Turkey", 41.0082, 28.9784, 15_500_000),
    // Europe
    City::new("London", "UK", 51.5074, -0.1278, 9_000_000),
    City::new("Paris", "France", 48.8566, 2.3522, 11_000_000),
    City::new("Berlin", "Germany", 52.5200, 13.4050, 3_600_000),
    City::new("Madrid", "Spain", 40.4168, -3.7038, 6_600_000),
    City::new("Rome", "Italy", 41.9028, 12.4964, 4_300_000),
    City::new("Amsterdam", "Netherlands", 52.3676, 4.9041, 1_150_000),
    City::new("Moscow", "Russia", 55.7558, 37.6173, 12_500_000),
    City::new("Vienna", "Austria", 48.2082, 16.3738, 1_900_000),
    City::new("Barcelona", "Spain", 41.3851, 2.1734, 5_600_000),
    City::new("Munich", "Germany", 48.1351, 11.5820, 1_500_000),
    // North America
    City::new("New York", "USA", 40.7128, -74.0060, 18_800_000),
    City::new("Los Angeles", "USA", 34.0522, -118.2437, 12_500_000),
    City::new("Chicago", "USA", 41.8781, -87.6298, 8_900_000),
    City::new("Toronto", "Canada", 43.6532, -79.3832, 6_200_000),
    City::new("San Francisco", "USA", 37.7749, -122.4194, 4_700_000),
    City::new("Miami", "USA", 25.7617, -80.1918, 6_200_000),
    City::new("Vancouver", "Canada", 49.2827, -123.1207, 2_500_000),
    City::new("Mexico City", "Mexico", 19.4326, -99.1332, 21_800_000),
    City::new("Seattle", "USA", 47.6062, -122.3321, 3_500_000),
    // South America
    City::new("São Paulo", "Brazil", -23.5505, -46.6333, 22_000_000),
    City::new("Buenos Aires", "Argentina", -34.6037, -58.3816, 15_000_000),
    City::new("Rio de Janeiro", "Brazil", -22.9068, -43.1729, 13_500_000),
    City::new("Lima", "Peru", -12.0464, -77.0428, 10_700_000),
    City::new("Bogotá", "Colombia", 4.7110, -74.0721, 11_300_000),
    City::new("Santiago", "Chile", -33.4489, -70.6693, 6_800_000),
    // Africa
    City::new("Cairo", "Egypt", 30.0444, 31.2357, 21_000_000),
    City::new("Lagos", "Nigeria", 6.5244, 3.3792, 15_000_000),
    City::new("Johannesburg", "South Africa", -26.2041, 28.0473, 5_800_000),
    City::new("Cape Town", "South Africa", -33.9249, 18.4241, 4_600_000),
    City::new("Nairobi", "Kenya", -1.2921, 36.8219, 4_400_000),
    City::new("Casablanca", "Morocco", 33.5731, -7.5898, 3_700_000),
    // Oceania
    City::new("Sydney", "Australia", -33.8688, 151.2093, 5_300_000),
    City::new("Melbourne", "Australia", -37.8136, 144.9631, 5_000_000),
    City::new("Auckland", "New Zealand", -36.8509, 174.7645, 1_660_000),
    City::new("Brisbane", "Australia", -27.4698, 153.0251, 2_500_000),
];

/// Fixed, in-memory place list.
#[derive(Debug, Clone, Copy)]
pub struct Gazetteer {
    entries: &'static [City],
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::bundled()
    }
}

impl Gazetteer {
    pub const fn new(entries: &'static [City]) -> Self {
        Self { entries }
    }

    pub const fn bundled() -> Self {
        Self::new(MAJOR_CITIES)
    }

    pub fn entries(&self) -> &'static [City] {
        self.entries
    }

    /// Case-insensitive substring match on name or country, in table order,
    /// capped at [`MAX_MATCHES`]. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<Place> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|city| {
                city.name.to_lowercase().contains(&needle)
                    || city.country.to_lowercase().contains(&needle)
            })
            .take(MAX_MATCHES)
            .map(City::to_place)
            .collect()
    }

    /// Case-insensitive exact match on name.
    pub fn by_name(&self, name: &str) -> Option<Place> {
        let wanted = name.to_lowercase();
        self.entries
            .iter()
            .find(|city| city.name.to_lowercase() == wanted)
            .map(City::to_place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_has_every_region() {
        assert_eq!(MAJOR_CITIES.len(), 48);
    }

    #[test]
    fn search_finds_tokyo() {
        let results = Gazetteer::bundled().search("tokyo");
        let tokyo = results.iter().find(|p| p.name == "Tokyo").expect("Tokyo must match");
        assert_eq!(tokyo.country, "Japan");
        assert_eq!(tokyo.population, Some(37_400_000));
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(Gazetteer::bundled().search("").is_empty());
    }

    #[test]
    fn search_matches_country_in_table_order() {
        let names: Vec<_> = Gazetteer::bundled()
            .search("usa")
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            ["New York", "Los Angeles", "Chicago", "San Francisco", "Miami", "Seattle"]
        );
    }

    #[test]
    fn search_is_capped() {
        // "a" appears in far more than eight entries.
        let results = Gazetteer::bundled().search("A");
        assert_eq!(results.len(), MAX_MATCHES);
        assert_eq!(results[0].name, "Tokyo");
    }

    #[test]
    fn search_handles_non_ascii() {
        let results = Gazetteer::bundled().search("SÃO");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "São Paulo");
    }

    #[test]
    fn by_name_is_exact_and_case_insensitive() {
        let g = Gazetteer::bundled();
        assert_eq!(g.by_name("PARIS").map(|p| p.country), Some("France".to_string()));
        assert!(g.by_name("Pari").is_none());
    }
}
