//! Core library for the `globe` weather explorer.
//!
//! This crate defines:
//! - A bundled gazetteer and the WMO weather code taxonomy
//! - Remote resolvers for weather, reverse geocoding and place search
//! - The debounced place search aggregator
//! - The weather resolution state machine
//! - Configuration handling
//!
//! Rendering is left to the caller. `globe-cli` is one such caller; a
//! graphical front end would drive [`GlobeSession`] the same way.

pub mod config;
pub mod gazetteer;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod resolution;
pub mod search;
pub mod session;
pub mod taxonomy;

pub use config::Config;
pub use gazetteer::Gazetteer;
pub use geolocation::{GeolocationError, PositionSource, StaticPosition};
pub use model::{
    Coordinates, GeocodedPlace, LocationView, Place, TemperatureUnit, WeatherSample, WeatherView,
};
pub use provider::{FetchError, PlaceSearch, Resolvers, ReverseGeocoder, WeatherSource};
pub use resolution::{Phase, ResolutionState, WeatherResolver};
pub use search::{SearchAggregator, SearchKey, SearchState};
pub use session::{GlobeSession, Marker};
pub use taxonomy::{Icon, WeatherCategory};
