#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use pitfall::config::Config;
use pitfall::db::UserStore;
use pitfall::router::{PitfallState, pitfall_router};
use pitfall::service::evaluator::build_evaluator;
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

/// A throwaway SQLite file, removed (with its WAL/SHM siblings) on drop.
pub struct TestDb {
    pub path: PathBuf,
    pub url: String,
}

impl TestDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "pitfall-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        let url = format!("sqlite:{}", path.display());
        Self { path, url }
    }

    pub fn config(&self) -> Config {
        Config {
            database_url: self.url.clone(),
            ..Config::default()
        }
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut sibling = self.path.clone().into_os_string();
            sibling.push(suffix);
            let _ = fs::remove_file(sibling);
        }
    }
}

/// Reset the store at `cfg.database_url` and build the full router over it.
pub async fn spawn_app(cfg: &Config) -> Router {
    let store = UserStore::new(&cfg.database_url).expect("invalid database url");
    store.reset().await.expect("failed to reset store");
    let evaluator = build_evaluator(cfg).expect("failed to build evaluator");
    pitfall_router(PitfallState::new(store, evaluator, cfg.markup))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, body.to_vec())
}

pub async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    let json = serde_json::from_slice(&body).expect("response body was not json");
    (status, json)
}
