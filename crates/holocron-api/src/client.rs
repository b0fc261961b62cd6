//! Remote resource client for the character dataset.
//!
//! Three endpoint families are read: the paginated/searchable `people/`
//! collection, a single entry by id, and arbitrary resources by absolute
//! reference URL (homeworlds, films, starships). Every read goes through a
//! `RequestCache`, so one key is fetched at most once per process unless it
//! fails or is explicitly refetched.
//!
//! URL building is split out into pure functions so it can be tested without
//! a server.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::RequestCache;
use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{Entry, ListPage, ReferenceKind, ReferenceRecord};
use crate::search::ListQuery;

const PEOPLE_PATH: &str = "people/";

pub struct ResourceClient {
    http: reqwest::Client,
    base_url: Url,
    lists: RequestCache<ListQuery, ListPage>,
    entries: RequestCache<String, Entry>,
    references: RequestCache<String, ReferenceRecord>,
}

impl ResourceClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Self::with_http(http, &config.base_url)
    }

    /// Build around an existing `reqwest::Client` (tests, custom TLS).
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            lists: RequestCache::new(),
            entries: RequestCache::new(),
            references: RequestCache::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// One page of entries. A non-empty `search` always targets page 1 of the
    /// filtered set and ignores `page`.
    pub async fn list_entries(&self, page: u32, search: &str) -> Result<ListPage, FetchError> {
        self.fetch_list(ListQuery::new(page, search)).await
    }

    /// Same as `list_entries` but a cached result for this query is dropped
    /// first. A request already in flight is still shared.
    pub async fn refetch_entries(&self, query: ListQuery) -> Result<ListPage, FetchError> {
        if self.lists.invalidate(&query) {
            debug!(?query, "refetching list");
        }
        self.fetch_list(query).await
    }

    pub async fn fetch_list(&self, query: ListQuery) -> Result<ListPage, FetchError> {
        let url = list_url(&self.base_url, &query);
        let http = self.http.clone();
        self.lists
            .get_or_fetch(query, move || get_json::<ListPage>(http, url))
            .await
    }

    /// A single entry by id. Not used by the browse flow, which forwards the
    /// fields it already has.
    pub async fn get_entry_detail(&self, id: &str) -> Result<Entry, FetchError> {
        let url = detail_url(&self.base_url, id)?;
        let http = self.http.clone();
        self.entries
            .get_or_fetch(id.to_string(), move || get_json::<Entry>(http, url))
            .await
    }

    /// Fetch any resource by its absolute reference. Cached by the exact URL
    /// string.
    pub async fn resolve_reference(&self, url: &str) -> Result<ReferenceRecord, FetchError> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::Decode(format!("bad reference {url}: {e}")))?;
        let http = self.http.clone();
        self.references
            .get_or_fetch(url.to_string(), move || {
                get_json::<ReferenceRecord>(http, parsed)
            })
            .await
    }

    /// Resolve a reference and pick the display field for its role. A record
    /// without that field is a decode error.
    pub async fn resolve_display(&self, url: &str, kind: ReferenceKind) -> Result<String, FetchError> {
        let record = self.resolve_reference(url).await?;
        record.display(kind).map(str::to_string).ok_or_else(|| {
            FetchError::Decode(format!("{url}: missing {} display field", kind.label()))
        })
    }

    /// Already-resolved display value, without starting a request.
    pub fn cached_display(&self, url: &str, kind: ReferenceKind) -> Option<String> {
        match self.references.peek(&url.to_string())? {
            Ok(record) => record.display(kind).map(str::to_string),
            Err(_) => None,
        }
    }
}

pub type SharedClient = Arc<ResourceClient>;

fn parse_base_url(base_url: &str) -> Result<Url, FetchError> {
    // `Url::join` drops the last segment unless the base ends with '/'.
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&normalized).map_err(|e| FetchError::Decode(format!("invalid base url {base_url}: {e}")))
}

/// `<base>/people/?page=N` or `<base>/people/?page=1&search=TERM`.
pub fn list_url(base: &Url, query: &ListQuery) -> Url {
    let mut url = base
        .join(PEOPLE_PATH)
        .unwrap_or_else(|_| base.clone());
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("page", &query.page().to_string());
        if let Some(term) = query.search() {
            pairs.append_pair("search", term);
        }
    }
    url
}

/// `<base>/people/<id>/`.
pub fn detail_url(base: &Url, id: &str) -> Result<Url, FetchError> {
    base.join(&format!("{PEOPLE_PATH}{id}/"))
        .map_err(|e| FetchError::Decode(format!("invalid entry id {id:?}: {e}")))
}

async fn get_json<T: DeserializeOwned>(http: reqwest::Client, url: Url) -> Result<T, FetchError> {
    debug!(%url, "GET");
    let response = http
        .get(url.clone())
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| {
            warn!(%url, error = %e, "request failed");
            FetchError::Network(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!(%url, %status, "non-success status");
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| {
        warn!(%url, error = %e, "decode failed");
        FetchError::Decode(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        parse_base_url("https://swapi.dev/api/").unwrap()
    }

    #[test]
    fn list_url_without_search_uses_page() {
        let url = list_url(&base(), &ListQuery::new(3, ""));
        assert_eq!(url.as_str(), "https://swapi.dev/api/people/?page=3");
    }

    #[test]
    fn list_url_with_search_targets_page_one() {
        let url = list_url(&base(), &ListQuery::new(3, "Luke"));
        assert_eq!(url.as_str(), "https://swapi.dev/api/people/?page=1&search=Luke");
    }

    #[test]
    fn list_url_encodes_search_term() {
        let url = list_url(&base(), &ListQuery::new(1, "Obi-Wan Kenobi"));
        assert_eq!(
            url.as_str(),
            "https://swapi.dev/api/people/?page=1&search=Obi-Wan+Kenobi"
        );
    }

    #[test]
    fn base_without_trailing_slash_keeps_last_segment() {
        let base = parse_base_url("http://127.0.0.1:3000/api").unwrap();
        let url = list_url(&base, &ListQuery::new(2, ""));
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/people/?page=2");
    }

    #[test]
    fn detail_url_has_trailing_slash() {
        let url = detail_url(&base(), "12").unwrap();
        assert_eq!(url.as_str(), "https://swapi.dev/api/people/12/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(FetchError::Decode(_))
        ));
    }
}
