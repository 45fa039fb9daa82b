//! Place search autocomplete.
//!
//! Keystrokes update the query at once; the search itself waits for a quiet
//! period. Each search shows gazetteer matches immediately, then replaces
//! them with gazetteer + remote results once the remote search answers.
//! Every input, immediate search and selection takes a new ticket, and any
//! write from an older ticket is dropped.

use std::{collections::HashSet, sync::Arc};

use parking_lot::Mutex;
use tokio::{sync::watch, task::JoinHandle};

use crate::{config::SearchConfig, gazetteer::Gazetteer, model::Place, provider::PlaceSearch};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    pub query: String,
    /// Gazetteer matches first, then remote-only matches.
    pub results: Vec<Place>,
    pub open: bool,
    /// Highlighted row, if any.
    pub selected_index: Option<usize>,
    pub remote_loading: bool,
}

impl SearchState {
    pub fn selected(&self) -> Option<&Place> {
        self.selected_index.and_then(|i| self.results.get(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Gazetteer matches followed by remote matches not already present
/// (compared by [`Place::identity_key`]), truncated to `cap`.
pub fn merge_results(local: Vec<Place>, remote: Vec<Place>, cap: usize) -> Vec<Place> {
    let seen: HashSet<String> = local.iter().map(Place::identity_key).collect();

    local
        .into_iter()
        .chain(remote.into_iter().filter(|p| !seen.contains(&p.identity_key())))
        .take(cap)
        .collect()
}

#[derive(Debug, Default)]
struct Pending {
    latest: u64,
    timer: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct Inner {
    gazetteer: Gazetteer,
    places: Arc<dyn PlaceSearch>,
    settings: SearchConfig,
    state: watch::Sender<SearchState>,
    pending: Mutex<Pending>,
}

impl Inner {
    /// Invalidate everything in flight and return the new ticket.
    fn next_ticket(&self, update: impl FnOnce(&mut SearchState)) -> u64 {
        let mut pending = self.pending.lock();
        pending.latest += 1;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        self.state.send_modify(update);
        pending.latest
    }

    /// Apply `update` only if `ticket` is still the latest. Returns whether it was.
    fn apply(&self, ticket: u64, update: impl FnOnce(&mut SearchState)) -> bool {
        let pending = self.pending.lock();
        if pending.latest != ticket {
            return false;
        }
        self.state.send_modify(update);
        true
    }

    /// Called by a timer once its quiet period has elapsed.
    fn disarm(&self, ticket: u64) -> bool {
        let mut pending = self.pending.lock();
        if pending.latest != ticket {
            return false;
        }
        pending.timer = None;
        true
    }

    async fn run(&self, ticket: u64, query: String) {
        if query.chars().count() < self.settings.min_query_len {
            self.apply(ticket, |s| {
                s.results.clear();
                s.open = false;
                s.selected_index = None;
                s.remote_loading = false;
            });
            return;
        }

        let local = self.gazetteer.search(&query);
        let shown = self.apply(ticket, |s| {
            s.results = local.clone();
            s.open = true;
            s.selected_index = None;
            s.remote_loading = true;
        });
        if !shown {
            return;
        }

        let remote = self.places.search_places(&query).await;
        let merged = merge_results(local, remote, self.settings.max_results);
        let count = merged.len();

        let applied = self.apply(ticket, |s| {
            s.open = !merged.is_empty();
            s.results = merged;
            s.remote_loading = false;
        });
        if applied {
            tracing::debug!("merged {} results for {:?}", count, query);
        } else {
            tracing::debug!("discarding stale search results for {:?}", query);
        }
    }
}

/// Debounced autocomplete over the gazetteer and a remote [`PlaceSearch`].
#[derive(Debug, Clone)]
pub struct SearchAggregator {
    inner: Arc<Inner>,
}

impl SearchAggregator {
    pub fn new(gazetteer: Gazetteer, places: Arc<dyn PlaceSearch>, settings: SearchConfig) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(Inner {
                gazetteer,
                places,
                settings,
                state,
                pending: Mutex::new(Pending::default()),
            }),
        }
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Record a keystroke. The query is updated now; the search runs after the
    /// debounce window unless another keystroke arrives first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn input(&self, query: impl Into<String>) {
        let query = query.into();
        let inner = self.inner.clone();
        let debounce = inner.settings.debounce();

        let mut pending = self.inner.pending.lock();
        pending.latest += 1;
        let ticket = pending.latest;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        self.inner.state.send_modify(|s| s.query = query.clone());

        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if inner.disarm(ticket) {
                inner.run(ticket, query).await;
            }
        }));
    }

    /// Run the search for `query` now, skipping the debounce window, and
    /// return the settled state.
    pub async fn search_now(&self, query: impl Into<String>) -> SearchState {
        let query = query.into();
        let ticket = self.inner.next_ticket(|s| s.query = query.clone());
        self.inner.run(ticket, query).await;
        self.state()
    }

    /// Handle a navigation key. Returns the chosen place when Enter commits a
    /// highlighted row; keys are ignored while the list is closed.
    pub fn key(&self, key: SearchKey) -> Option<Place> {
        let current = self.state();
        if !current.open {
            return None;
        }

        let last = current.results.len().checked_sub(1);
        match key {
            SearchKey::ArrowDown => {
                let next = match (current.selected_index, last) {
                    (_, None) => None,
                    (None, Some(_)) => Some(0),
                    (Some(i), Some(last)) => Some((i + 1).min(last)),
                };
                self.inner.state.send_modify(|s| s.selected_index = next);
                None
            }
            SearchKey::ArrowUp => {
                let next = match (current.selected_index, last) {
                    (_, None) => None,
                    (None, Some(_)) => Some(0),
                    (Some(i), Some(_)) => Some(i.saturating_sub(1)),
                };
                self.inner.state.send_modify(|s| s.selected_index = next);
                None
            }
            SearchKey::Enter => {
                let place = current.selected().cloned()?;
                Some(self.select(place))
            }
            SearchKey::Escape => {
                self.inner.state.send_modify(|s| s.open = false);
                None
            }
        }
    }

    /// Highlight a row, as on mouse-over.
    pub fn hover(&self, index: usize) {
        self.inner.state.send_if_modified(|s| {
            if index < s.results.len() && s.selected_index != Some(index) {
                s.selected_index = Some(index);
                true
            } else {
                false
            }
        });
    }

    /// Reopen the list when the input regains focus with a long enough query.
    pub fn focus(&self) {
        let min = self.inner.settings.min_query_len;
        self.inner.state.send_if_modified(|s| {
            if !s.open && s.query.chars().count() >= min {
                s.open = true;
                true
            } else {
                false
            }
        });
    }

    /// Commit `place` as the user's choice: pending work is dropped and the
    /// search resets to empty and closed. The place is handed back for the caller to act on.
    pub fn select(&self, place: Place) -> Place {
        self.inner.next_ticket(|s| *s = SearchState::default());
        tracing::debug!(name = %place.name, country = %place.country, "place selected");
        place
    }
}
