//! Shared core for the holocron character browser.
//!
//! Everything that is not terminal rendering lives here: the data model, the
//! remote resource client with its request cache, the search/pagination and
//! favourites state, fetch-status aggregation and view subscriptions.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod favourites;
pub mod model;
pub mod platform;
pub mod search;
pub mod status;
pub mod subscription;

pub use client::ResourceClient;
pub use error::{FetchError, ValidationError};
pub use favourites::FavouritesStore;
pub use model::{Entry, FavouriteEntry, ForwardedEntry, ListPage, ReferenceKind, ReferenceRecord};
pub use search::{FetchPolicy, ListQuery, SearchState};
pub use status::{aggregate, FetchStatus, GroupPhase, GroupState};
