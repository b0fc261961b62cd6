//! Local stand-in for the public character API.
//!
//! Serves a fixed dataset under `/api/` with the same shapes as the real
//! service: a paginated, searchable `people/` collection and single resources
//! for people, planets, films and starships. Every response links back to the
//! server's own base URL.
//!
//! `MockState` records how often each path was requested and can be told to
//! fail specific paths, which is what the client integration tests use to
//! check request de-duplication and partial failure handling.

mod fixtures;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, warn};

use fixtures::{lookup, person_json, FILMS, PEOPLE, PLANETS, STARSHIPS};

pub const PAGE_SIZE: usize = 10;

#[derive(Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    hits: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
    latency_ms: AtomicU64,
}

impl MockState {
    /// `base_url` is the prefix every reference in a response is built on,
    /// e.g. `http://127.0.0.1:3000/api/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            inner: Arc::new(Inner {
                base_url,
                hits: Mutex::new(HashMap::new()),
                failing: Mutex::new(HashSet::new()),
                latency_ms: AtomicU64::new(0),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Requests seen for `path`. Paths with a query string are counted under
    /// the full `path?query` form.
    pub fn hits(&self, path: &str) -> usize {
        lock(&self.inner.hits).get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        lock(&self.inner.hits).values().sum()
    }

    /// Answer `path` with a 500 until `clear_failures` is called.
    pub fn fail_path(&self, path: impl Into<String>) {
        lock(&self.inner.failing).insert(path.into());
    }

    pub fn clear_failures(&self) {
        lock(&self.inner.failing).clear();
    }

    /// Delay applied to every response.
    pub fn set_latency(&self, latency: Duration) {
        self.inner
            .latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    fn record(&self, key: &str) {
        *lock(&self.inner.hits).entry(key.to_string()).or_insert(0) += 1;
    }

    fn is_failing(&self, path: &str, full: &str) -> bool {
        let failing = lock(&self.inner.failing);
        failing.contains(path) || failing.contains(full)
    }

    fn latency(&self) -> Option<Duration> {
        match self.inner.latency_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/api/people/", get(list_people))
        .route("/api/people/{id}/", get(get_person))
        .route("/api/planets/{id}/", get(get_planet))
        .route("/api/films/{id}/", get(get_film))
        .route("/api/starships/{id}/", get(get_starship))
        .layer(middleware::from_fn_with_state(state.clone(), track))
        .with_state(state)
}

/// Bind an ephemeral localhost port and serve in a background task.
pub async fn spawn() -> Result<MockState, std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState::new(format!("http://{addr}/api/"));
    let router = app(state.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            warn!("mock api stopped: {}", e);
        }
    });
    Ok(state)
}

async fn track(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let full = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    state.record(&full);
    debug!(%full, "request");

    if let Some(delay) = state.latency() {
        tokio::time::sleep(delay).await;
    }
    if state.is_failing(&path, &full) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "injected failure" })),
        )
            .into_response();
    }
    next.run(request).await
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found" }))).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub search: Option<String>,
}

async fn list_people(State(state): State<MockState>, Query(params): Query<ListParams>) -> Response {
    match list_page(state.base_url(), &params) {
        Some(body) => Json(body).into_response(),
        None => not_found(),
    }
}

/// Page body for `params`, or `None` for a page outside the result set.
pub fn list_page(base: &str, params: &ListParams) -> Option<Value> {
    let page: usize = match params.page.as_deref() {
        None => 1,
        Some(raw) => raw.parse().ok().filter(|p| *p >= 1)?,
    };
    let term = params
        .search
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let matches: Vec<(u32, &fixtures::Person)> = PEOPLE
        .iter()
        .enumerate()
        .map(|(i, p)| (i as u32 + 1, p))
        .filter(|(_, p)| p.name.to_lowercase().contains(&term))
        .collect();

    let start = (page - 1) * PAGE_SIZE;
    if start > 0 && start >= matches.len() {
        return None;
    }
    let results: Vec<Value> = matches
        .iter()
        .skip(start)
        .take(PAGE_SIZE)
        .map(|(id, p)| person_json(base, *id, p))
        .collect();

    let page_link = |n: usize| match params.search.as_deref() {
        Some(s) if !s.is_empty() => format!("{base}people/?search={s}&page={n}"),
        _ => format!("{base}people/?page={n}"),
    };
    let next = (start + PAGE_SIZE < matches.len()).then(|| page_link(page + 1));
    let previous = (page > 1).then(|| page_link(page - 1));

    Some(json!({
        "count": matches.len(),
        "next": next,
        "previous": previous,
        "results": results,
    }))
}

async fn get_person(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let found = id
        .parse::<u32>()
        .ok()
        .and_then(|n| Some((n, PEOPLE.get(n.checked_sub(1)? as usize)?)));
    match found {
        Some((n, person)) => Json(person_json(state.base_url(), n, person)).into_response(),
        None => not_found(),
    }
}

async fn get_planet(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    named(state.base_url(), "planets", PLANETS, "name", &id)
}

async fn get_film(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    named(state.base_url(), "films", FILMS, "title", &id)
}

async fn get_starship(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    named(state.base_url(), "starships", STARSHIPS, "name", &id)
}

fn named(base: &str, collection: &str, table: &[(u32, &'static str)], field: &str, id: &str) -> Response {
    let Some((n, value)) = id
        .parse::<u32>()
        .ok()
        .and_then(|n| lookup(table, n).map(|v| (n, v)))
    else {
        return not_found();
    };
    let mut body = serde_json::Map::new();
    body.insert(field.to_string(), Value::from(value));
    body.insert(
        "url".to_string(),
        Value::from(format!("{base}{collection}/{n}/")),
    );
    Json(Value::Object(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://mock/api/";

    fn params(page: Option<&str>, search: Option<&str>) -> ListParams {
        ListParams {
            page: page.map(String::from),
            search: search.map(String::from),
        }
    }

    #[test]
    fn first_page_links_to_second() {
        let body = list_page(BASE, &params(Some("1"), None)).unwrap();
        assert_eq!(body["count"], PEOPLE.len());
        assert_eq!(body["results"].as_array().unwrap().len(), PAGE_SIZE);
        assert_eq!(body["next"], "http://mock/api/people/?page=2");
        assert!(body["previous"].is_null());
    }

    #[test]
    fn last_page_has_remainder() {
        let body = list_page(BASE, &params(Some("2"), None)).unwrap();
        assert_eq!(body["results"].as_array().unwrap().len(), PEOPLE.len() - PAGE_SIZE);
        assert!(body["next"].is_null());
    }

    #[test]
    fn page_past_the_end_is_none() {
        assert!(list_page(BASE, &params(Some("9"), None)).is_none());
        assert!(list_page(BASE, &params(Some("0"), None)).is_none());
        assert!(list_page(BASE, &params(Some("abc"), None)).is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let body = list_page(BASE, &params(Some("1"), Some("skywalker"))).unwrap();
        let names: Vec<&str> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Luke Skywalker", "Anakin Skywalker"]);
    }

    #[test]
    fn empty_search_result_is_a_valid_first_page() {
        let body = list_page(BASE, &params(None, Some("Jar Jar"))).unwrap();
        assert_eq!(body["count"], 0);
        assert!(body["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn base_gets_trailing_slash() {
        assert_eq!(MockState::new("http://x/api").base_url(), "http://x/api/");
    }
}
