//! Test harness for session-level scenarios.
//!
//! `FakeApi` is a scripted, call-counting stand-in for the dogs backend: search
//! responses are popped from a queue, records come from an in-memory table and are
//! returned in reverse request order so tests can tell server order from client order.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pawmatch_core::{Cursor, Dog, DogsApi, Error, MatchResponse, ResultPage, Result, SearchTarget};

#[derive(Default)]
pub struct Calls {
    pub breeds: AtomicUsize,
    pub search: AtomicUsize,
    pub dogs: AtomicUsize,
    pub matches: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.breeds.load(Ordering::SeqCst)
            + self.search.load(Ordering::SeqCst)
            + self.dogs.load(Ordering::SeqCst)
            + self.matches.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub calls: Calls,
    pub breeds: Vec<String>,
    pub records: HashMap<String, Dog>,
    pub search_script: Mutex<VecDeque<Result<ResultPage>>>,
    pub dogs_error: Mutex<Option<Error>>,
    pub match_script: Mutex<VecDeque<Result<MatchResponse>>>,
    pub search_targets: Mutex<Vec<SearchTarget>>,
    pub dogs_requests: Mutex<Vec<Vec<String>>>,
    pub match_requests: Mutex<Vec<Vec<String>>>,
    /// Artificial latency for every call.
    pub delay: Option<Duration>,
}

impl FakeApi {
    pub fn with_dogs(dogs: impl IntoIterator<Item = Dog>) -> Self {
        Self {
            records: dogs.into_iter().map(|d| (d.id.clone(), d)).collect(),
            breeds: vec!["Akita".into(), "Beagle".into(), "Pug".into()],
            ..Self::default()
        }
    }

    pub fn push_page(&self, page: Result<ResultPage>) {
        self.search_script.lock().unwrap().push_back(page);
    }

    pub fn push_match(&self, response: Result<MatchResponse>) {
        self.match_script.lock().unwrap().push_back(response);
    }

    pub fn fail_hydration(&self, err: Error) {
        *self.dogs_error.lock().unwrap() = Some(err);
    }

    pub fn last_target(&self) -> Option<SearchTarget> {
        self.search_targets.lock().unwrap().last().cloned()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DogsApi for FakeApi {
    async fn breeds(&self) -> Result<Vec<String>> {
        self.calls.breeds.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        Ok(self.breeds.clone())
    }

    async fn search(&self, target: &SearchTarget) -> Result<ResultPage> {
        self.calls.search.fetch_add(1, Ordering::SeqCst);
        self.search_targets.lock().unwrap().push(target.clone());
        self.wait().await;
        self.search_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Malformed("no scripted search response".into())))
    }

    async fn dogs(&self, ids: &[String]) -> Result<Vec<Dog>> {
        self.calls.dogs.fetch_add(1, Ordering::SeqCst);
        self.dogs_requests.lock().unwrap().push(ids.to_vec());
        self.wait().await;
        let scripted = self.dogs_error.lock().unwrap().clone();
        if let Some(err) = scripted {
            return Err(err);
        }
        Ok(ids.iter().rev().filter_map(|id| self.records.get(id).cloned()).collect())
    }

    async fn find_match(&self, ids: &[String]) -> Result<MatchResponse> {
        self.calls.matches.fetch_add(1, Ordering::SeqCst);
        self.match_requests.lock().unwrap().push(ids.to_vec());
        self.wait().await;
        self.match_script.lock().unwrap().pop_front().unwrap_or_else(|| Ok(MatchResponse::default()))
    }
}

pub fn dog(id: &str, breed: &str) -> Dog {
    Dog {
        id: id.into(),
        name: format!("Dog {id}"),
        breed: breed.into(),
        age: 4,
        zip_code: "60601".into(),
        img: format!("https://img.example/{id}.jpg"),
    }
}

pub fn page(ids: &[&str], total: u64, prev: Option<&str>, next: Option<&str>) -> ResultPage {
    ResultPage {
        ids: ids.iter().map(|s| s.to_string()).collect(),
        total,
        prev: prev.map(Cursor::from),
        next: next.map(Cursor::from),
    }
}

pub fn query_target(pairs: &[(&str, &str)]) -> SearchTarget {
    SearchTarget::Query(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
}
