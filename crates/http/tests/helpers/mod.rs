//! In-process mock of the dogs API.
//!
//! Binds `127.0.0.1:0`, serves a small fixed kennel, and records how it was
//! called so tests can assert on the exact query string a client sent.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::oneshot;

#[derive(Default)]
pub struct MockState {
    pub calls: AtomicUsize,
    pub dogs_calls: AtomicUsize,
    pub queries: Mutex<Vec<Option<String>>>,
    pub bodies: Mutex<Vec<Vec<String>>>,
    pub logins: Mutex<Vec<Value>>,
    /// Answer every dogs endpoint with this status instead of a payload.
    pub fail_with: Mutex<Option<u16>>,
    /// Answer `/dogs/match` with `{}`.
    pub no_match: AtomicBool,
    /// Answer `/dogs/breeds` with a body that is not JSON.
    pub garbage_breeds: AtomicBool,
}

impl MockState {
    pub fn fail_with(&self, status: u16) {
        *self.fail_with.lock().unwrap() = Some(status);
    }

    pub fn last_query(&self) -> Option<String> {
        self.queries.lock().unwrap().last().cloned().flatten()
    }

    fn guard(&self) -> Option<Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let status = (*self.fail_with.lock().unwrap())?;
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Some((status, "mock failure").into_response())
    }
}

pub struct MockServer {
    pub state: Arc<MockState>,
    base_url: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/logout", post(logout))
            .route("/dogs/breeds", get(breeds))
            .route("/dogs/search", get(search))
            .route("/dogs", post(dogs))
            .route("/dogs/match", post(find_match))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });

        Self { state, base_url: format!("http://{addr}"), shutdown_tx: Some(shutdown_tx) }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn kennel() -> Vec<Value> {
    [("d1", "Akita", 3), ("d2", "Beagle", 5), ("d3", "Pug", 1), ("d4", "Whippet", 9)]
        .into_iter()
        .map(|(id, breed, age)| {
            json!({
                "id": id,
                "name": format!("Dog {id}"),
                "breed": breed,
                "age": age,
                "zip_code": "60601",
                "img": format!("https://img.test/{id}.jpg"),
            })
        })
        .collect()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.logins.lock().unwrap().push(body);
    ([(header::SET_COOKIE, "fetch-access-token=mock; Path=/; HttpOnly")], "OK").into_response()
}

async fn logout(State(state): State<Arc<MockState>>) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    "OK".into_response()
}

async fn breeds(State(state): State<Arc<MockState>>) -> Response {
    if let Some(resp) = state.guard() {
        return resp;
    }
    if state.garbage_breeds.load(Ordering::SeqCst) {
        return "<html>maintenance</html>".into_response();
    }
    Json(json!(["Akita", "Beagle", "Pug", "Whippet"])).into_response()
}

/// Two pages of two ids each, keyed on `from`.
async fn search(State(state): State<Arc<MockState>>, RawQuery(query): RawQuery) -> Response {
    state.queries.lock().unwrap().push(query.clone());
    if let Some(resp) = state.guard() {
        return resp;
    }
    let second = query.as_deref().is_some_and(|q| q.contains("from=2"));
    let body = if second {
        json!({ "resultIds": ["d3", "d4"], "total": 4, "prev": "/dogs/search?size=2&from=0&sort=breed:asc" })
    } else {
        json!({ "resultIds": ["d1", "d2"], "total": 4, "next": "/dogs/search?size=2&from=2&sort=breed:asc" })
    };
    Json(body).into_response()
}

async fn dogs(State(state): State<Arc<MockState>>, Json(ids): Json<Vec<String>>) -> Response {
    state.dogs_calls.fetch_add(1, Ordering::SeqCst);
    state.bodies.lock().unwrap().push(ids.clone());
    if let Some(resp) = state.guard() {
        return resp;
    }
    let records: Vec<Value> =
        kennel().into_iter().filter(|d| ids.iter().any(|id| d["id"] == id.as_str())).collect();
    Json(records).into_response()
}

async fn find_match(State(state): State<Arc<MockState>>, Json(ids): Json<Vec<String>>) -> Response {
    state.bodies.lock().unwrap().push(ids.clone());
    if let Some(resp) = state.guard() {
        return resp;
    }
    if state.no_match.load(Ordering::SeqCst) || ids.is_empty() {
        return Json(json!({})).into_response();
    }
    Json(json!({ "match": ids[ids.len() - 1] })).into_response()
}
