//! The deliberate defects are part of the contract: these pin them in place.

mod common;

use axum::http::StatusCode;
use common::{TestDb, get, post_json, send, send_json, spawn_app};
use pitfall::config::{Config, EvaluatorKind, MarkupMode};
use serde_json::json;

#[tokio::test]
async fn user_id_fragment_alters_query() {
    let db = TestDb::new("sqli-id");
    let app = spawn_app(&db.config()).await;

    // `999 OR 1=1` matches every row; the first one comes back.
    let (status, body) = send_json(&app, get("/user/999%20OR%201=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");

    let (status, body) = send_json(&app, get("/user/0%20OR%20role='user'")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
}

#[tokio::test]
async fn malformed_user_id_leaks_driver_error() {
    let db = TestDb::new("sqli-error");
    let app = spawn_app(&db.config()).await;

    let (status, body) = send_json(&app, get("/user/abc")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().expect("error should be a string");
    assert!(message.contains("no such column"), "{message}");
}

#[tokio::test]
async fn login_comment_bypasses_password() {
    let db = TestDb::new("sqli-login");
    let app = spawn_app(&db.config()).await;

    let (status, body) = send_json(
        &app,
        post_json("/login", json!({"username": "admin' --", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["password"], "admin123");
}

#[tokio::test]
async fn login_unbalanced_quote_is_server_error() {
    let db = TestDb::new("sqli-login-error");
    let app = spawn_app(&db.config()).await;

    let (status, body) = send_json(
        &app,
        post_json("/login", json!({"username": "o'brien", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn raw_markup_reflects_script_tags() {
    let db = TestDb::new("xss-raw");
    let app = spawn_app(&db.config()).await;

    let (status, body) = send(&app, get("/search?q=%3Cscript%3Ealert(1)%3C%2Fscript%3E")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).expect("body was not utf-8");
    assert!(html.contains("<script>alert(1)</script>"));
}

#[tokio::test]
async fn escaped_markup_neutralises_script_tags() {
    let db = TestDb::new("xss-escaped");
    let cfg = Config {
        markup: MarkupMode::Escaped,
        ..db.config()
    };
    let app = spawn_app(&cfg).await;

    let (status, body) = send(&app, get("/search?q=%3Cscript%3Ealert(1)%3C%2Fscript%3E")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).expect("body was not utf-8");
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn unsandboxed_calculate_reads_and_plants_globals() {
    let db = TestDb::new("eval-unsandboxed");
    let app = spawn_app(&db.config()).await;

    let (status, body) =
        send_json(&app, post_json("/calculate", json!({"expression": "database_url"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], db.url.as_str());

    let (status, _) =
        send_json(&app, post_json("/calculate", json!({"expression": "planted = 7"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send_json(&app, post_json("/calculate", json!({"expression": "planted * 6"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 42}));
}

#[tokio::test]
async fn arithmetic_calculate_refuses_identifiers() {
    let db = TestDb::new("eval-arith");
    let cfg = Config {
        evaluator: EvaluatorKind::Arithmetic,
        ..db.config()
    };
    let app = spawn_app(&cfg).await;

    let (status, body) =
        send_json(&app, post_json("/calculate", json!({"expression": "2+2"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 4}));

    let (status, body) =
        send_json(&app, post_json("/calculate", json!({"expression": "database_url"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn stacked_statements_are_refused_before_running() {
    let db = TestDb::new("sqli-stacked");
    let app = spawn_app(&db.config()).await;

    let (_, seeded) = send_json(&app, get("/users")).await;

    let (status, body) = send_json(
        &app,
        post_json(
            "/login",
            json!({
                "username": "x'; UPDATE users SET password='pwned'; --",
                "password": "x"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "You can only execute one statement at a time."})
    );

    let (status, _) = send_json(&app, get("/user/999;%20DELETE%20FROM%20users")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, users) = send_json(&app, get("/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users, seeded);
    let rows = users.as_array().expect("users should be an array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["password"], "admin123");
    assert_eq!(rows[1]["password"], "user123");
}

#[tokio::test]
async fn arithmetic_calculate_uses_true_division() {
    let db = TestDb::new("eval-arith-div");
    let cfg = Config {
        evaluator: EvaluatorKind::Arithmetic,
        ..db.config()
    };
    let app = spawn_app(&cfg).await;

    let (status, body) =
        send_json(&app, post_json("/calculate", json!({"expression": "7/2"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 3.5}));
}
