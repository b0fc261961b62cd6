//! Route history.
//!
//! The list is always the root. `back` returns to whatever was shown before,
//! so a detail opened from favourites goes back to favourites.

use holocron_api::ForwardedEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    List,
    Detail {
        id: String,
        forwarded: ForwardedEntry,
    },
    Favourites,
}

impl Route {
    pub fn label(&self) -> String {
        match self {
            Self::List => "characters".to_string(),
            Self::Detail { id, forwarded } if forwarded.name.is_empty() => {
                format!("character {id}")
            }
            Self::Detail { forwarded, .. } => forwarded.name.clone(),
            Self::Favourites => "favourites".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Navigator {
    history: Vec<Route>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            history: vec![Route::List],
        }
    }

    pub fn current(&self) -> &Route {
        // history is never empty
        self.history.last().unwrap_or(&Route::List)
    }

    /// Pushing the route already shown is a no-op.
    pub fn push(&mut self, route: Route) {
        if *self.current() != route {
            self.history.push(route);
        }
    }

    /// Returns false when already at the root.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    pub fn home(&mut self) {
        self.history.truncate(1);
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
