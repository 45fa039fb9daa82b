use crate::{
    Config,
    gazetteer::Gazetteer,
    geolocation::{self, PositionSource},
    model::{Place, TemperatureUnit},
    provider::Resolvers,
    resolution::{ResolutionState, WeatherResolver},
    search::{SearchAggregator, SearchKey},
};

/// The point currently highlighted on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    /// Set when the point came from a named place rather than a raw click.
    pub label: Option<String>,
}

/// One interactive session: a search box, a weather card and the globe marker.
#[derive(Debug)]
pub struct GlobeSession {
    search: SearchAggregator,
    weather: WeatherResolver,
    marker: Option<Marker>,
    unit: TemperatureUnit,
}

impl GlobeSession {
    pub fn new(resolvers: Resolvers, config: &Config) -> Self {
        Self {
            search: SearchAggregator::new(
                Gazetteer::bundled(),
                resolvers.places,
                config.search.clone(),
            ),
            weather: WeatherResolver::new(resolvers.weather, resolvers.geocoder),
            marker: None,
            unit: config.unit,
        }
    }

    pub fn search(&self) -> &SearchAggregator {
        &self.search
    }

    pub fn weather(&self) -> &WeatherResolver {
        &self.weather
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.unit = self.unit.toggle();
        self.unit
    }

    /// A raw click on the globe surface.
    pub async fn click(&mut self, lat: f64, lng: f64) -> ResolutionState {
        self.marker = Some(Marker {
            lat,
            lng,
            label: None,
        });
        self.weather.resolve(lat, lng).await
    }

    /// A named place picked outside the search box, e.g. a city marker on the globe.
    pub async fn choose_place(&mut self, place: Place) -> ResolutionState {
        let at = place.coordinates();
        self.marker = Some(Marker {
            lat: at.lat,
            lng: at.lng,
            label: Some(place.name),
        });
        self.weather.resolve(at.lat, at.lng).await
    }

    /// A search result picked by click: resets the search box, then resolves.
    pub async fn select_result(&mut self, place: Place) -> ResolutionState {
        let place = self.search.select(place);
        self.choose_place(place).await
    }

    /// Forward a key to the search box. Returns the new resolution state when
    /// Enter committed a place.
    pub async fn key(&mut self, key: SearchKey) -> Option<ResolutionState> {
        let place = self.search.key(key)?;
        Some(self.choose_place(place).await)
    }

    /// Resolve the device position. Geolocation failures become the
    /// resolution error; the marker is left unchanged.
    pub async fn locate(&mut self, source: &dyn PositionSource) -> ResolutionState {
        match geolocation::locate(source).await {
            Ok(at) => self.click(at.lat, at.lng).await,
            Err(e) => {
                self.weather.set_error(e.to_string());
                self.weather.state()
            }
        }
    }

    /// Dismiss the weather card.
    pub fn close(&mut self) {
        self.marker = None;
        self.weather.clear();
    }
}
