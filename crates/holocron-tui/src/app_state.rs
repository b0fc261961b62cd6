//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it. The App event-loop is the only
//! thing that writes to AppState.

use std::collections::HashMap;

use holocron_api::{FavouritesStore, FetchStatus, ListPage, ListQuery, SearchState};

use crate::router::Route;
use crate::widgets::status_bar::InputMode;

pub struct AppState {
    // ── Navigation ──────────────────────────────────────────────────────────
    pub route: Route,

    // ── List ────────────────────────────────────────────────────────────────
    pub search: SearchState,
    /// Query the current `list` status belongs to. Results for any other
    /// query are stale and dropped.
    pub list_query: Option<ListQuery>,
    pub list: FetchStatus<ListPage>,
    /// Homeworld display names keyed by planet reference URL.
    pub homeworlds: HashMap<String, FetchStatus<String>>,

    // ── Favourites ──────────────────────────────────────────────────────────
    pub favourites: FavouritesStore,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            route: Route::List,
            search: SearchState::new(),
            list_query: None,
            list: FetchStatus::Pending,
            homeworlds: HashMap::new(),
            favourites: FavouritesStore::new(),
            input_mode: InputMode::Normal,
            base_url: base_url.into(),
        }
    }

    /// Resolved homeworld name for a planet reference, if known.
    pub fn homeworld_name(&self, url: &str) -> Option<&str> {
        self.homeworlds
            .get(url)
            .and_then(|s| s.value())
            .map(String::as_str)
    }

    pub fn homeworld_status(&self, url: &str) -> Option<&FetchStatus<String>> {
        self.homeworlds.get(url)
    }
}
