//! Action enum — all user-initiated intents flowing from components to the App.

use holocron_api::{FavouriteEntry, ForwardedEntry};

use crate::widgets::toast::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    CharacterList,
    CharacterDetail,
    FavouritesList,
    HelpOverlay,
}

/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Search / pagination ──────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    /// A validated, trimmed search term.
    Search(String),
    /// Leave search results: page 1, no term.
    BackToList,
    ChangePage(u32),
    /// Issue the current list request again.
    Reload,

    // ── Navigation ───────────────────────────────────────────────────────────
    OpenDetail {
        id: String,
        forwarded: ForwardedEntry,
    },
    ShowFavourites,
    NavigateBack,
    NavigateHome,

    // ── Favourites ───────────────────────────────────────────────────────────
    ToggleFavourite(FavouriteEntry),
    RemoveFavourite(String),

    // ── UI ───────────────────────────────────────────────────────────────────
    Notify(Severity, String),
    ToggleHelp,
    Quit,
}
