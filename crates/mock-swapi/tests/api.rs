use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_swapi::{app, MockState};
use serde_json::Value;
use tower::ServiceExt;

const BASE: &str = "http://mock.test/api/";

async fn get(state: &MockState, uri: &str) -> (StatusCode, Value) {
    let resp = app(state.clone())
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// --- people ---

#[tokio::test]
async fn people_page_links_back_to_base() {
    let state = MockState::new(BASE);
    let (status, body) = get(&state, "/api/people/?page=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["name"], "Luke Skywalker");
    assert_eq!(body["results"][0]["url"], "http://mock.test/api/people/1/");
    assert_eq!(body["results"][0]["homeworld"], "http://mock.test/api/planets/1/");
    assert_eq!(body["next"], "http://mock.test/api/people/?page=2");
}

#[tokio::test]
async fn search_filters_by_name() {
    let state = MockState::new(BASE);
    let (status, body) = get(&state, "/api/people/?page=1&search=Luke").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Luke Skywalker");
}

#[tokio::test]
async fn page_out_of_range_is_404() {
    let state = MockState::new(BASE);
    let (status, body) = get(&state, "/api/people/?page=40").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not found");
}

#[tokio::test]
async fn single_person_by_id() {
    let state = MockState::new(BASE);
    let (status, body) = get(&state, "/api/people/4/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Darth Vader");
    assert_eq!(body["starships"][0], "http://mock.test/api/starships/13/");

    let (status, _) = get(&state, "/api/people/0/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- references ---

#[tokio::test]
async fn films_carry_title_and_planets_name() {
    let state = MockState::new(BASE);

    let (_, film) = get(&state, "/api/films/1/").await;
    assert_eq!(film["title"], "A New Hope");
    assert!(film.get("name").is_none());

    let (_, planet) = get(&state, "/api/planets/1/").await;
    assert_eq!(planet["name"], "Tatooine");

    let (_, ship) = get(&state, "/api/starships/12/").await;
    assert_eq!(ship["name"], "X-wing");
}

// --- instrumentation ---

#[tokio::test]
async fn hits_are_counted_per_path() {
    let state = MockState::new(BASE);
    get(&state, "/api/planets/1/").await;
    get(&state, "/api/planets/1/").await;
    get(&state, "/api/people/?page=2").await;

    assert_eq!(state.hits("/api/planets/1/"), 2);
    assert_eq!(state.hits("/api/people/?page=2"), 1);
    assert_eq!(state.total_hits(), 3);
}

#[tokio::test]
async fn injected_failure_returns_500_until_cleared() {
    let state = MockState::new(BASE);
    state.fail_path("/api/films/2/");

    let (status, _) = get(&state, "/api/films/2/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, _) = get(&state, "/api/films/3/").await;
    assert_eq!(status, StatusCode::OK);

    state.clear_failures();
    let (status, body) = get(&state, "/api/films/2/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "The Empire Strikes Back");
}
