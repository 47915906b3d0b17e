//! Tests for the HTTP interface.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use strictly_checkers::{Color, Move, RulesConfig, Square};
use strictly_server::{router, SessionManager};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn seated_session(app: &Router) -> (String, String, String) {
    let (status, created) = send(app, Method::POST, "/sessions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["session_id"].as_str().unwrap().to_string();

    let (_, white) = send(app, Method::POST, &format!("/sessions/{id}/join"), Some(json!({"name": "alice"}))).await;
    let (_, black) = send(app, Method::POST, &format!("/sessions/{id}/join"), Some(json!({"name": "bob"}))).await;
    assert_eq!(white["seat"], "white");
    assert_eq!(black["seat"], "black");

    (
        id,
        white["id"].as_str().unwrap().to_string(),
        black["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health() {
    let app = router(SessionManager::default());
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}

#[tokio::test]
async fn test_create_and_list_sessions() {
    let app = router(SessionManager::default());
    let (status, _) = send(&app, Method::POST, "/sessions", Some(json!({"session_id": "table"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/sessions", Some(json!({"session_id": "table"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("table"));

    let (status, body) = send(&app, Method::GET, "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["table"]));
}

#[tokio::test]
async fn test_snapshot_of_new_session() {
    let app = router(SessionManager::default());
    let (id, _, _) = seated_session(&app).await;

    let (status, body) = send(&app, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["version"], 0);
    assert_eq!(body["state"]["turn"], "white");
    assert_eq!(body["participants"].as_array().unwrap().len(), 2);
    assert_eq!(body["legal_moves"].as_array().unwrap().len(), 7);
    assert!(body["board"].as_str().unwrap().starts_with("  01234567"));
}

#[tokio::test]
async fn test_legal_move_accepted() {
    let app = router(SessionManager::default());
    let (id, white, _) = seated_session(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/sessions/{id}/moves"),
        Some(json!({"participant_id": white, "color": "white", "from": [5, 0], "to": [4, 1]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 1);
    assert_eq!(body["move"]["from"], json!([5, 0]));
    assert_eq!(body["outcome"]["kind"], "legal_simple");
    assert_eq!(body["state"]["turn"], "black");
}

#[tokio::test]
async fn test_illegal_move_reports_reason() {
    let app = router(SessionManager::default());
    let (id, white, _) = seated_session(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/sessions/{id}/moves"),
        Some(json!({"participant_id": white, "color": "white", "from": [5, 0], "to": [4, 0]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reason"], "destination_not_playable");

    let (_, snapshot) = send(&app, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(snapshot["state"]["version"], 0);
}

#[tokio::test]
async fn test_wrong_seat_forbidden() {
    let app = router(SessionManager::default());
    let (id, _, black) = seated_session(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/sessions/{id}/moves"),
        Some(json!({"participant_id": black, "color": "white", "from": [5, 0], "to": [4, 1]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("reason").is_none());
}

#[tokio::test]
async fn test_off_board_move_is_bad_request() {
    let app = router(SessionManager::default());
    let (id, white, _) = seated_session(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/sessions/{id}/moves"),
        Some(json!({"participant_id": white, "color": "white", "from": [5, 0], "to": [8, 1]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_session_not_found() {
    let app = router(SessionManager::default());
    let (status, _) = send(&app, Method::GET, "/sessions/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/sessions/missing/join", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_session() {
    let app = router(SessionManager::default());
    let (id, _, _) = seated_session(&app).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn open_events(app: &Router, id: &str) -> Body {
    let request = Request::builder()
        .uri(format!("/sessions/{id}/events"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    response.into_body()
}

/// Reads the next non-comment SSE event as field name to value, or `None`
/// once the stream has ended.
async fn next_event(body: &mut Body) -> Option<HashMap<String, String>> {
    let mut buffer = String::new();
    loop {
        while let Some(end) = buffer.find("\n\n") {
            let block: String = buffer.drain(..end + 2).collect();
            let fields: HashMap<String, String> = block
                .lines()
                .filter(|line| !line.is_empty() && !line.starts_with(':'))
                .filter_map(|line| line.split_once(':'))
                .map(|(name, value)| (name.to_string(), value.trim_start().to_string()))
                .collect();
            if !fields.is_empty() {
                return Some(fields);
            }
        }

        let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
            .await
            .expect("no event within timeout")?
            .unwrap();
        if let Ok(data) = frame.into_data() {
            buffer.push_str(std::str::from_utf8(&data).unwrap());
        }
    }
}

fn seat_two(manager: &SessionManager) -> (String, String, String) {
    let id = manager.create_session(None).unwrap();
    let white = manager.join(&id, "alice".to_string()).unwrap();
    let black = manager.join(&id, "bob".to_string()).unwrap();
    (id, white.id, black.id)
}

#[tokio::test]
async fn test_event_stream_delivers_accepted_moves() {
    let manager = SessionManager::default();
    let app = router(manager.clone());
    let (id, white, _) = seat_two(&manager);
    let mut body = open_events(&app, &id).await;

    let step = Move::new(Square::new(5, 0), Square::new(4, 1));
    manager.submit_move(&id, &white, Color::White, step).unwrap();

    let event = next_event(&mut body).await.expect("stream ended early");
    assert_eq!(event["event"], "move");
    assert_eq!(event["id"], "1");

    let data: Value = serde_json::from_str(&event["data"]).unwrap();
    assert_eq!(data["session_id"], id.as_str());
    assert_eq!(data["version"], 1);
    assert_eq!(data["color"], "white");
    assert_eq!(data["player"]["name"], "alice");
    assert_eq!(data["move"], json!({"from": [5, 0], "to": [4, 1]}));
    assert_eq!(data["outcome"]["kind"], "legal_simple");
    assert_eq!(data["state"]["turn"], "black");
    assert!(!event["data"].contains(&white));
}

#[tokio::test]
async fn test_rejected_moves_are_not_streamed() {
    let manager = SessionManager::default();
    let app = router(manager.clone());
    let (id, white, _) = seat_two(&manager);
    let mut body = open_events(&app, &id).await;

    let illegal = Move::new(Square::new(5, 0), Square::new(4, 0));
    assert!(manager.submit_move(&id, &white, Color::White, illegal).is_err());
    let legal = Move::new(Square::new(5, 2), Square::new(4, 3));
    manager.submit_move(&id, &white, Color::White, legal).unwrap();

    let event = next_event(&mut body).await.expect("stream ended early");
    let data: Value = serde_json::from_str(&event["data"]).unwrap();
    assert_eq!(data["move"]["from"], json!([5, 2]));
    assert_eq!(data["version"], 1);
}

#[tokio::test]
async fn test_slow_subscriber_is_told_it_lagged() {
    let manager = SessionManager::new(RulesConfig::default(), 1);
    let app = router(manager.clone());
    let (id, white, black) = seat_two(&manager);
    let mut body = open_events(&app, &id).await;

    manager
        .submit_move(&id, &white, Color::White, Move::new(Square::new(5, 0), Square::new(4, 1)))
        .unwrap();
    manager
        .submit_move(&id, &black, Color::Black, Move::new(Square::new(2, 1), Square::new(3, 2)))
        .unwrap();

    let lagged = next_event(&mut body).await.expect("stream ended early");
    assert_eq!(lagged["event"], "lagged");
    assert_eq!(lagged["data"], "1");

    let latest = next_event(&mut body).await.expect("stream ended early");
    assert_eq!(latest["event"], "move");
    assert_eq!(latest["id"], "2");
}

#[tokio::test]
async fn test_event_stream_ends_with_session() {
    let manager = SessionManager::default();
    let app = router(manager.clone());
    let (id, _, _) = seat_two(&manager);
    let mut body = open_events(&app, &id).await;

    manager.end_session(&id).unwrap();
    assert!(next_event(&mut body).await.is_none());
}

#[tokio::test]
async fn test_event_stream_for_unknown_session() {
    let app = router(SessionManager::default());
    let (status, _) = send(&app, Method::GET, "/sessions/missing/events", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_session_rejects_join() {
    let manager = SessionManager::default().with_max_spectators(0);
    let app = router(manager.clone());
    let (id, _, _) = seat_two(&manager);

    let (status, body) = send(&app, Method::POST, &format!("/sessions/{id}/join"), Some(json!({"name": "carol"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("full"));
}
