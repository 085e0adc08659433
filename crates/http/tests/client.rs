//! End-to-end tests of `HttpDogsApi` against the in-process mock server.

mod helpers;

use std::sync::atomic::Ordering;

use helpers::MockServer;
use pawmatch_core::{
    ClientConfig, Cursor, DogsApi, Error, ErrorKind, FetchStatus, FilterProperty, NoopObserver, SearchSession,
    SearchTarget,
};
use pawmatch_http::HttpDogsApi;

fn client(server: &MockServer) -> HttpDogsApi {
    let config = ClientConfig { base_url: format!("{}/", server.base_url()), ..ClientConfig::default() };
    HttpDogsApi::new(&config).unwrap()
}

fn pairs(raw: &[(&str, &str)]) -> SearchTarget {
    SearchTarget::Query(raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
}

#[tokio::test]
async fn login_posts_name_and_email() {
    let server = MockServer::start().await;
    let api = client(&server);

    api.login("Ada", "ada@example.com").await.unwrap();

    let logins = server.state.logins.lock().unwrap().clone();
    assert_eq!(logins, vec![serde_json::json!({"name": "Ada", "email": "ada@example.com"})]);
}

#[tokio::test]
async fn breeds_are_decoded() {
    let server = MockServer::start().await;
    let breeds = client(&server).breeds().await.unwrap();
    assert_eq!(breeds, vec!["Akita", "Beagle", "Pug", "Whippet"]);
}

#[tokio::test]
async fn query_pairs_are_sent_as_repeated_keys() {
    let server = MockServer::start().await;
    let api = client(&server);

    let target = pairs(&[("breeds", "Pug"), ("breeds", "Akita"), ("ageMin", "1"), ("sort", "age:desc")]);
    let page = api.search(&target).await.unwrap();

    assert_eq!(page.ids, vec!["d1", "d2"]);
    assert_eq!(page.total, 4);
    assert!(page.prev.is_none());
    assert_eq!(
        server.state.last_query().as_deref(),
        Some("breeds=Pug&breeds=Akita&ageMin=1&sort=age%3Adesc")
    );
}

#[tokio::test]
async fn cursor_is_replayed_verbatim() {
    let server = MockServer::start().await;
    let api = client(&server);

    let cursor = Cursor::from("/dogs/search?size=2&from=2&sort=breed:asc");
    let page = api.search(&SearchTarget::Cursor(cursor)).await.unwrap();

    assert_eq!(server.state.last_query().as_deref(), Some("size=2&from=2&sort=breed:asc"));
    assert_eq!(page.ids, vec!["d3", "d4"]);
    assert_eq!(page.prev.as_ref().map(Cursor::as_str), Some("/dogs/search?size=2&from=0&sort=breed:asc"));
    assert!(page.next.is_none());
}

#[tokio::test]
async fn records_are_fetched_in_one_batch() {
    let server = MockServer::start().await;
    let api = client(&server);

    let dogs = api.dogs(&["d2".to_string(), "d4".to_string()]).await.unwrap();

    assert_eq!(dogs.iter().map(|d| d.breed.as_str()).collect::<Vec<_>>(), vec!["Beagle", "Whippet"]);
    assert_eq!(dogs[1].zip_code, "60601");
    assert_eq!(server.state.dogs_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn match_payloads_decode() {
    let server = MockServer::start().await;
    let api = client(&server);
    let ids = vec!["d1".to_string(), "d3".to_string()];

    assert_eq!(api.find_match(&ids).await.unwrap().matched.as_deref(), Some("d3"));

    server.state.no_match.store(true, Ordering::SeqCst);
    assert_eq!(api.find_match(&ids).await.unwrap().matched, None);
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_401_and_403_are_unauthorized() {
    let server = MockServer::start().await;
    let api = client(&server);

    for status in [401, 403] {
        server.state.fail_with(status);
        let err = api.breeds().await.unwrap_err();
        assert_eq!(err, Error::Unauthorized { status });
    }
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    server.state.fail_with(500);

    let err = client(&server).search(&pairs(&[("sort", "breed:asc")])).await.unwrap_err();

    assert_eq!(err, Error::Http { status: 500, body: "mock failure".into() });
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    server.state.garbage_breeds.store(true, Ordering::SeqCst);

    let err = client(&server).breeds().await.unwrap_err();

    assert!(matches!(err, Error::Malformed(_)), "got {err:?}");
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let config = ClientConfig { base_url: "http://127.0.0.1:1".into(), ..ClientConfig::default() };
    let err = HttpDogsApi::new(&config).unwrap().breeds().await.unwrap_err();

    assert!(matches!(err, Error::Network(_)), "got {err:?}");
    assert!(err.is_retryable());
}

// ---------------------------------------------------------------------------
// Session over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_pages_through_results() {
    let server = MockServer::start().await;
    let api = client(&server);
    let config = ClientConfig { page_size: Some(2), ..ClientConfig::default() };
    let mut session = SearchSession::new(&config);

    session.set_filter(FilterProperty::Breeds, "Akita,Beagle,Pug,Whippet");
    let status = session.search(&api, &mut NoopObserver).await.unwrap();
    assert_eq!(status, FetchStatus::Updated { shown: 2, total: 4 });
    assert!(server.state.last_query().unwrap().ends_with("sort=breed%3Aasc&size=2"));

    session.next_page(&api, &mut NoopObserver).await.unwrap();
    assert_eq!(session.search_state().dogs()[0].id, "d3");
    assert!(session.search_state().has_prev());
    assert!(!session.search_state().has_next());

    assert!(session.add_favorite_by_id("d4", &mut NoopObserver));
    let matched = session.find_match(&api, &mut NoopObserver).await.unwrap();
    assert_eq!(matched.breed, "Whippet");
}
