use super::*;
use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::ActionEnvelope,
};
use tower::ServiceExt;

use crate::notes::Note;

fn test_app() -> Router {
    build_router(&Settings::default()).expect("router")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn post_action(uri: &str, action: &str, data: Value) -> Request<Body> {
    let body = serde_json::to_string(&ActionEnvelope::new(action, data)).expect("body");
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request")
}

async fn body_bytes(response: Response) -> Vec<u8> {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    serde_json::from_slice(&body_bytes(response).await).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = test_app().oneshot(get("/healthz")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn ping_echoes_optional_data() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/boards/main?action=ping"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json::<Value>(response).await,
        json!({ "pong": true, "echo": null })
    );

    let response = app
        .oneshot(get("/boards/main?action=ping&data=%7B%22x%22%3A1%7D"))
        .await
        .expect("response");
    assert_eq!(
        body_json::<Value>(response).await,
        json!({ "pong": true, "echo": { "x": 1 } })
    );
}

#[tokio::test]
async fn unknown_get_action_renders_the_board_page() {
    let app = test_app();

    let plain = app
        .clone()
        .oneshot(get("/boards/main"))
        .await
        .expect("response");
    assert_eq!(plain.status(), StatusCode::OK);
    let plain = body_bytes(plain).await;

    let unknown = app
        .clone()
        .oneshot(get("/boards/main?action=unknown"))
        .await
        .expect("response");
    assert_eq!(body_bytes(unknown).await, plain);

    let post_only = app
        .oneshot(get("/boards/main?action=create&data=%7B%7D"))
        .await
        .expect("response");
    assert_eq!(body_bytes(post_only).await, plain);

    let html = String::from_utf8(plain).expect("utf8");
    assert!(html.contains("<h1>Notes</h1>"));
    assert!(html.contains("No notes yet."));
}

#[tokio::test]
async fn create_search_and_delete_notes() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_action(
            "/boards/team",
            "create",
            json!({ "title": "Release checklist", "body": "tag & ship" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Note = body_json(response).await;
    assert_eq!(created.title, "Release checklist");

    app.clone()
        .oneshot(post_action(
            "/boards/team",
            "create",
            json!({ "title": "Lunch" }),
        ))
        .await
        .expect("response");

    let response = app
        .clone()
        .oneshot(get(
            "/boards/team?action=search&data=%7B%22query%22%3A%22release%22%7D",
        ))
        .await
        .expect("response");
    let found: Vec<Note> = body_json(response).await;
    assert_eq!(found, vec![created.clone()]);

    let response = app
        .clone()
        .oneshot(get("/boards/team?action=search"))
        .await
        .expect("response");
    let all: Vec<Note> = body_json(response).await;
    assert_eq!(all.len(), 2);

    let page = app
        .clone()
        .oneshot(get("/boards/team"))
        .await
        .expect("response");
    let html = String::from_utf8(body_bytes(page).await).expect("utf8");
    assert!(html.contains("tag &amp; ship"));

    let other_board = app
        .clone()
        .oneshot(get("/boards/main?action=search"))
        .await
        .expect("response");
    assert!(body_json::<Vec<Note>>(other_board).await.is_empty());

    let response = app
        .clone()
        .oneshot(post_action(
            "/boards/team",
            "delete",
            json!({ "id": created.id }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!(
            "/boards/team?action=get_note&data=%7B%22id%22%3A{}%7D",
            created.id
        )))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_blank_titles() {
    let response = test_app()
        .oneshot(post_action(
            "/boards/main",
            "create",
            json!({ "title": "   " }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ApiError = body_json(response).await;
    assert_eq!(error.code, ErrorCode::Validation);
}

#[tokio::test]
async fn unknown_post_action_is_not_found() {
    let response = test_app()
        .oneshot(post_action("/boards/main", "unknown", json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ApiError = body_json(response).await;
    assert_eq!(error.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn post_without_data_is_a_bad_request() {
    let request = Request::post("/boards/main")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"action":"create"}"#))
        .expect("request");
    let response = test_app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ApiError = body_json(response).await;
    assert_eq!(error.code, ErrorCode::BadRequest);
    assert!(error.message.contains("data"));
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let settings = Settings {
        max_body_bytes: 16,
        ..Settings::default()
    };
    let app = build_router(&settings).expect("router");

    let body = json!({ "action": "create", "data": { "title": "far too long for the limit" } })
        .to_string();
    let request = Request::post("/boards/main")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
