//! Search/pagination state and the list query it drives.
//!
//! The stored page is only authoritative while no search term is active; a
//! non-empty term always targets page 1 of the filtered set.

use crate::error::ValidationError;

/// Fixed page size of the `people` collection.
pub const PAGE_SIZE: u32 = 10;

/// The request actually sent to the list endpoint. Constructed through
/// `ListQuery::new`, so a search query always carries page 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    page: u32,
    search: Option<String>,
}

impl ListQuery {
    pub fn new(page: u32, search: &str) -> Self {
        if search.is_empty() {
            Self {
                page: page.max(1),
                search: None,
            }
        } else {
            Self {
                page: 1,
                search: Some(search.to_string()),
            }
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_search(&self) -> bool {
        self.search.is_some()
    }
}

/// How the list request should treat a cached result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    CacheFirst,
    /// Drop any cached result for the key and fetch again.
    Refetch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    current_page: u32,
    search_term: String,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            search_term: String::new(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_searching(&self) -> bool {
        !self.search_term.is_empty()
    }

    /// Pages start at 1; a 0 from the caller is treated as 1.
    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Back to page 1 with no search term.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Commit text typed into the search control. Blank input is rejected and
    /// leaves the state untouched. The stored page is not changed.
    pub fn submit_search(&mut self, input: &str) -> Result<(), ValidationError> {
        let term = input.trim();
        if term.is_empty() {
            return Err(ValidationError::BlankSearchTerm);
        }
        self.search_term = term.to_string();
        Ok(())
    }

    /// The query the list endpoint should receive for the current state.
    pub fn effective_query(&self) -> ListQuery {
        ListQuery::new(self.current_page, &self.search_term)
    }

    /// Query plus cache policy. Search results are always refetched when the
    /// state changes; plain pages may come from the cache.
    pub fn list_plan(&self) -> (ListQuery, FetchPolicy) {
        let query = self.effective_query();
        let policy = if query.is_search() {
            FetchPolicy::Refetch
        } else {
            FetchPolicy::CacheFirst
        };
        (query, policy)
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of pages needed for `count` entries.
pub fn total_pages(count: u32) -> u32 {
    count.div_ceil(PAGE_SIZE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_page_one_without_term() {
        let state = SearchState::new();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.search_term(), "");
        assert!(!state.is_searching());
    }

    #[test]
    fn empty_term_uses_stored_page() {
        let mut state = SearchState::new();
        for page in [1, 2, 5, 9] {
            state.set_current_page(page);
            let query = state.effective_query();
            assert_eq!(query.page(), page);
            assert_eq!(query.search(), None);
        }
    }

    #[test]
    fn search_term_overrides_stored_page() {
        let mut state = SearchState::new();
        state.set_current_page(3);
        state.set_search_term("Luke");

        let query = state.effective_query();
        assert_eq!(query.page(), 1);
        assert_eq!(query.search(), Some("Luke"));
        // stored counter is untouched
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn blank_submission_is_rejected_and_state_unchanged() {
        let mut state = SearchState::new();
        state.set_current_page(2);
        let before = state.clone();

        assert_eq!(state.submit_search(""), Err(ValidationError::BlankSearchTerm));
        assert_eq!(state.submit_search("   \t"), Err(ValidationError::BlankSearchTerm));
        assert_eq!(state, before);
    }

    #[test]
    fn submission_commits_trimmed_term() {
        let mut state = SearchState::new();
        state.submit_search("  Leia ").unwrap();
        assert_eq!(state.search_term(), "Leia");
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut state = SearchState::new();
        state.set_current_page(4);
        state.set_search_term("Vader");
        state.reset();
        assert_eq!(state, SearchState::new());
    }

    #[test]
    fn page_zero_is_clamped() {
        let mut state = SearchState::new();
        state.set_current_page(0);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn plan_refetches_only_while_searching() {
        let mut state = SearchState::new();
        state.set_current_page(2);
        assert_eq!(state.list_plan().1, FetchPolicy::CacheFirst);

        state.set_search_term("Han");
        let (query, policy) = state.list_plan();
        assert_eq!(policy, FetchPolicy::Refetch);
        assert_eq!(query, ListQuery::new(7, "Han"));
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(82), 9);
    }
}
