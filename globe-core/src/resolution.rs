//! Weather resolution: turns a clicked or chosen point into one combined
//! weather + place view.
//!
//! [`WeatherResolver`] owns a single [`ResolutionState`] cell. Every change
//! goes through [`reduce`], and observers see each transition whole through a
//! `watch` channel. Requests carry a sequence number; a completion whose
//! request has been superseded never writes weather, location or error.

use std::{
    fmt::Display,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::watch;

use crate::{
    model::{Coordinates, LocationView, WeatherView},
    provider::{FetchError, ReverseGeocoder, WeatherSource},
};

/// Shown when a weather failure carries no message of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to fetch weather";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolutionState {
    pub weather: Option<WeatherView>,
    pub location: Option<LocationView>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Resolved,
    Errored,
}

impl ResolutionState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Errored
        } else if self.weather.is_some() {
            Phase::Resolved
        } else {
            Phase::Idle
        }
    }
}

/// The only legal ways the state may change.
#[derive(Debug, Clone)]
enum Transition {
    Begin,
    Resolve {
        weather: WeatherView,
        location: LocationView,
    },
    Fail(String),
    /// A superseded request finished; only the loading flag is released.
    Settle,
    Clear,
    SetError(String),
}

fn reduce(state: &mut ResolutionState, transition: Transition) {
    match transition {
        Transition::Begin => {
            state.loading = true;
            state.error = None;
            state.weather = None;
            state.location = None;
        }
        Transition::Resolve { weather, location } => {
            state.weather = Some(weather);
            state.location = Some(location);
            state.error = None;
            state.loading = false;
        }
        Transition::Fail(message) | Transition::SetError(message) => {
            state.weather = None;
            state.location = None;
            state.error = Some(message);
            state.loading = false;
        }
        Transition::Settle => state.loading = false,
        Transition::Clear => {
            state.weather = None;
            state.location = None;
            state.error = None;
        }
    }
}

/// Await both futures to completion, then fail if either failed.
///
/// The first future's error wins when both fail. Neither result is observable
/// until both have settled, so a successful second result is discarded when
/// the first fails.
pub async fn both_or_fail<A, B, E>(
    first: impl Future<Output = Result<A, E>>,
    second: impl Future<Output = Result<B, E>>,
) -> Result<(A, B), E> {
    let (first, second) = tokio::join!(first, second);
    Ok((first?, second?))
}

fn error_message(err: &impl Display) -> String {
    let message = err.to_string();
    if message.is_empty() {
        DEFAULT_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

#[derive(Debug)]
pub struct WeatherResolver {
    weather: Arc<dyn WeatherSource>,
    geocoder: Arc<dyn ReverseGeocoder>,
    state: watch::Sender<ResolutionState>,
    /// Bumped by every request, clear and external error.
    epoch: AtomicU64,
    /// Epoch of the most recent resolve request.
    issued: AtomicU64,
}

impl WeatherResolver {
    pub fn new(weather: Arc<dyn WeatherSource>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        let (state, _) = watch::channel(ResolutionState::default());
        Self {
            weather,
            geocoder,
            state,
            epoch: AtomicU64::new(0),
            issued: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ResolutionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResolutionState> {
        self.state.subscribe()
    }

    /// Fetch weather and place name for a point concurrently and publish the
    /// combined result. Returns the state after this request settles, which
    /// reflects a newer request if one was issued meanwhile.
    pub async fn resolve(&self, lat: f64, lng: f64) -> ResolutionState {
        let ticket = self.begin();
        let at = Coordinates::new(lat, lng);

        let outcome = both_or_fail(self.weather.fetch_weather(lat, lng), async {
            Ok::<_, FetchError>(self.geocoder.reverse_geocode(lat, lng).await)
        })
        .await;

        let transition = match outcome {
            Ok((sample, place)) => Transition::Resolve {
                weather: WeatherView::from_sample(sample),
                location: LocationView::new(place, at),
            },
            Err(e) => {
                tracing::warn!(lat, lng, "weather resolution failed: {}", e);
                Transition::Fail(error_message(&e))
            }
        };

        self.complete(ticket, transition);
        self.state()
    }

    /// Drop weather, location and error. The loading flag is left alone; a
    /// request still in flight releases it on completion but writes nothing else.
    pub fn clear(&self) {
        self.state.send_modify(|state| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            reduce(state, Transition::Clear);
        });
    }

    /// Surface an error raised outside the resolver, e.g. a geolocation failure.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|state| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            reduce(state, Transition::SetError(message));
        });
    }

    fn begin(&self) -> u64 {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            ticket = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            self.issued.store(ticket, Ordering::SeqCst);
            reduce(state, Transition::Begin);
        });
        ticket
    }

    fn complete(&self, ticket: u64, transition: Transition) {
        self.state.send_if_modified(|state| {
            if ticket == self.epoch.load(Ordering::SeqCst) {
                reduce(state, transition);
                true
            } else if ticket == self.issued.load(Ordering::SeqCst) {
                // Superseded by clear/set_error, not by a newer request.
                let was_loading = state.loading;
                reduce(state, Transition::Settle);
                was_loading
            } else {
                tracing::debug!(ticket, "discarding stale weather resolution");
                false
            }
        });
    }
}
