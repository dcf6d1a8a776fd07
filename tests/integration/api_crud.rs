//! End-to-end CRUD tests driving a real server over HTTP.
//!
//! Each test boots its own server on an OS-assigned port with a data file
//! inside a fresh temp directory, then exercises the JSON API with a real
//! HTTP client.

use std::sync::Arc;

use taskline_server::api::AppState;
use taskline_server::server::start_server;
use taskline_server::static_files::StaticFiles;
use taskline_server::store::TaskStore;

/// Boots a server backed by `data.txt` in a fresh temp dir; returns the
/// base URL and the temp dir guard.
async fn spawn_server() -> (String, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState {
        store: Arc::new(TaskStore::flat_file(dir.path().join("data.txt"))),
        statics: Arc::new(StaticFiles::new(dir.path(), "app.html")),
    };
    let (addr, _handle) = start_server("127.0.0.1:0", state).await.unwrap();
    (format!("http://{addr}"), dir)
}

/// Helper: POST a new task and return the response.
async fn create_task(client: &reqwest::Client, base: &str, text: &str) -> reqwest::Response {
    client
        .post(format!("{base}/api/todos"))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn list_on_fresh_store_returns_empty_array() {
    let (base, _dir) = spawn_server().await;

    let response = reqwest::get(format!("{base}/api/todos")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn create_first_task_gets_id_one() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = create_task(&client, &base, "buy milk").await;
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["text"], "buy milk");
    assert_eq!(body["completed"], false);

    // createdAt is a UTC ISO-8601 timestamp.
    let created_at = body["createdAt"].as_str().unwrap();
    assert!(created_at.ends_with('Z'), "got: {created_at}");
    assert!(created_at.contains('T'));
}

#[tokio::test]
async fn created_ids_strictly_increase_and_gaps_are_not_reused() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    for expected in 1..=3 {
        let body: serde_json::Value =
            create_task(&client, &base, "task").await.json().await.unwrap();
        assert_eq!(body["id"], expected);
    }

    // Delete id 2, leaving a gap; the next id continues past the max.
    let response = client
        .delete(format!("{base}/api/todos/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let body: serde_json::Value =
        create_task(&client, &base, "after delete").await.json().await.unwrap();
    assert_eq!(body["id"], 4);
}

#[tokio::test]
async fn create_with_invalid_json_answers_400() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/todos"))
        .header("Content-Type", "application/json")
        .body("{not json at all")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Invalid data" }));
}

#[tokio::test]
async fn create_without_text_answers_400() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/todos"))
        .json(&serde_json::json!({ "note": "wrong field" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_merges_partial_fields() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value =
        create_task(&client, &base, "buy milk").await.json().await.unwrap();
    let created_at = created["createdAt"].as_str().unwrap().to_string();

    let response = client
        .put(format!("{base}/api/todos/1"))
        .json(&serde_json::json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["completed"], true);
    assert_eq!(body["text"], "buy milk"); // untouched
    assert_eq!(body["createdAt"], created_at.as_str()); // untouched
}

#[tokio::test]
async fn update_replaces_text_without_completing() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    create_task(&client, &base, "old text").await;

    let body: serde_json::Value = client
        .put(format!("{base}/api/todos/1"))
        .json(&serde_json::json!({ "text": "new text" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["text"], "new text");
    assert_eq!(body["completed"], false);
}

#[tokio::test]
async fn update_unknown_id_answers_404() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("{base}/api/todos/42"))
        .json(&serde_json::json!({ "completed": true }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Todo not found" }));
}

#[tokio::test]
async fn update_with_invalid_json_answers_400() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    create_task(&client, &base, "target").await;

    let response = client
        .put(format!("{base}/api/todos/1"))
        .header("Content-Type", "application/json")
        .body("###")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Invalid data" }));
}

#[tokio::test]
async fn delete_answers_204_with_empty_body() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    create_task(&client, &base, "ephemeral").await;

    let response = client
        .delete(format!("{base}/api/todos/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
    assert_eq!(response.text().await.unwrap(), "");

    // The task is gone.
    let body: serde_json::Value = reqwest::get(format!("{base}/api/todos"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn delete_unknown_id_answers_404() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    create_task(&client, &base, "only task").await;

    let response = client
        .delete(format!("{base}/api/todos/2"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Todo not found" }));
}

#[tokio::test]
async fn full_lifecycle_create_update_delete() {
    let (base, _dir) = spawn_server().await;
    let client = reqwest::Client::new();

    create_task(&client, &base, "one").await;
    create_task(&client, &base, "two").await;

    client
        .put(format!("{base}/api/todos/1"))
        .json(&serde_json::json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    client
        .delete(format!("{base}/api/todos/2"))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = reqwest::get(format!("{base}/api/todos"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], 1);
    assert_eq!(list[0]["completed"], true);
}
