mod support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use mcpilot_core::remote::{GistClient, RemoteError, RemoteStore};
use serde_json::{Value, json};

use support::sample_document;

#[derive(Clone, Default)]
struct FakeGitHub {
    base: Arc<Mutex<String>>,
    content: Arc<Mutex<String>>,
    truncated: Arc<Mutex<bool>>,
    last_query: Arc<Mutex<HashMap<String, String>>>,
    last_auth: Arc<Mutex<Option<String>>>,
    last_patch: Arc<Mutex<Option<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer good-token")
}

async fn get_gist(
    State(fake): State<FakeGitHub>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    *fake.last_query.lock().unwrap() = query;
    *fake.last_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != "gist1" {
        return StatusCode::NOT_FOUND.into_response();
    }

    let content = fake.content.lock().unwrap().clone();
    let truncated = *fake.truncated.lock().unwrap();
    let raw_url = format!("{}/raw/mcp.txt", fake.base.lock().unwrap());
    let file = if truncated {
        json!({"content": &content[..content.len() / 2], "truncated": true, "raw_url": raw_url})
    } else {
        json!({"content": content, "truncated": false, "raw_url": raw_url})
    };

    Json(json!({
        "id": id,
        "updated_at": "2024-04-05T06:07:08Z",
        "files": {"mcp.txt": file, "notes.md": {"content": "hi"}}
    }))
    .into_response()
}

async fn patch_gist(
    State(fake): State<FakeGitHub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    *fake.last_patch.lock().unwrap() = Some(body);
    Json(json!({"id": "gist1"})).into_response()
}

async fn raw_file(State(fake): State<FakeGitHub>) -> String {
    fake.content.lock().unwrap().clone()
}

async fn spawn_fake(fake: FakeGitHub) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    *fake.base.lock().unwrap() = base.clone();

    let app = Router::new()
        .route("/gists/:id", get(get_gist).patch(patch_gist))
        .route("/raw/mcp.txt", get(raw_file))
        .with_state(fake);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

fn document_text() -> String {
    serde_json::to_string_pretty(&sample_document()).unwrap()
}

#[tokio::test]
async fn fetch_reads_named_file_with_cache_buster() {
    let fake = FakeGitHub::default();
    *fake.content.lock().unwrap() = document_text();
    let base = spawn_fake(fake.clone()).await;
    let client = GistClient::new("gist1", "good-token")
        .unwrap()
        .with_api_base(base);

    let snapshot = client.fetch().await.unwrap();

    assert_eq!(snapshot.document, sample_document());
    assert_eq!(
        snapshot.updated_at.unwrap().to_rfc3339(),
        "2024-04-05T06:07:08+00:00"
    );
    let query = fake.last_query.lock().unwrap().clone();
    assert!(query.get("t").is_some_and(|t| t.parse::<i64>().is_ok()));
    assert_eq!(
        fake.last_auth.lock().unwrap().as_deref(),
        Some("Bearer good-token")
    );
}

#[tokio::test]
async fn truncated_file_is_fetched_from_raw_url() {
    let fake = FakeGitHub::default();
    *fake.content.lock().unwrap() = document_text();
    *fake.truncated.lock().unwrap() = true;
    let base = spawn_fake(fake).await;
    let client = GistClient::new("gist1", "good-token")
        .unwrap()
        .with_api_base(base);

    let snapshot = client.fetch().await.unwrap();

    assert_eq!(snapshot.document, sample_document());
}

#[tokio::test]
async fn bad_token_and_unknown_gist_map_to_messages() {
    let fake = FakeGitHub::default();
    *fake.content.lock().unwrap() = document_text();
    let base = spawn_fake(fake).await;

    let bad_token = GistClient::new("gist1", "wrong")
        .unwrap()
        .with_api_base(base.clone());
    let err = bad_token.fetch().await.unwrap_err();
    assert!(matches!(err, RemoteError::Unauthorized));
    assert_eq!(err.to_string(), "Invalid GitHub token. Please check settings.");

    let unknown = GistClient::new("other", "good-token")
        .unwrap()
        .with_api_base(base);
    let err = unknown.fetch().await.unwrap_err();
    assert_eq!(err.to_string(), "Gist not found. Please check the Gist ID.");
}

#[tokio::test]
async fn missing_file_is_reported_by_name() {
    let fake = FakeGitHub::default();
    let base = spawn_fake(fake).await;
    let client = GistClient::new("gist1", "good-token")
        .unwrap()
        .with_api_base(base)
        .with_file_name("servers.json");

    let err = client.fetch().await.unwrap_err();

    assert_eq!(err.to_string(), "File 'servers.json' not found in gist");
}

#[tokio::test]
async fn store_patches_whole_document_into_named_file() {
    let fake = FakeGitHub::default();
    let base = spawn_fake(fake.clone()).await;
    let client = GistClient::new("gist1", "good-token")
        .unwrap()
        .with_api_base(base);

    client.store(&sample_document()).await.unwrap();

    let body = fake.last_patch.lock().unwrap().clone().unwrap();
    let content = body["files"]["mcp.txt"]["content"].as_str().unwrap();
    assert_eq!(content, document_text());
}

#[tokio::test]
async fn missing_credentials_never_reach_the_network() {
    let client = GistClient::new("", "")
        .unwrap()
        .with_api_base("http://127.0.0.1:1");

    let err = client.store(&sample_document()).await.unwrap_err();

    assert!(matches!(err, RemoteError::MissingCredentials));
}
