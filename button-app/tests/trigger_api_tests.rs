mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use button_app::{api::models::TriggerResponse, services::BROADCAST_TEXT, AppConfig, Server};
use common::RecordingSession;
use mentra_sdk::AppServerHandler;
use std::path::PathBuf;
use tower::ServiceExt;

fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "PACKAGE_NAME" => Some("com.example.buttonapp".to_string()),
        "MENTRAOS_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .unwrap()
}

async fn post_trigger(router: Router) -> (StatusCode, TriggerResponse) {
    let response = router
        .oneshot(Request::post("/trigger").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn trigger_without_sessions_reports_zero() {
    let server = Server::new(test_config());

    let (status, body) = post_trigger(Server::admin_router(server.app())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        TriggerResponse {
            success: true,
            count: 0
        }
    );
}

#[tokio::test]
async fn trigger_counts_every_active_session() {
    let server = Server::new(test_config());
    let app = server.app();
    let mut sessions = Vec::new();
    for id in ["a", "b", "c"] {
        let session = RecordingSession::new(id, "u1");
        app.on_session(session.clone(), id, "u1").await.unwrap();
        session.clear_displays();
        sessions.push(session);
    }

    let (_, body) = post_trigger(Server::admin_router(app)).await;

    assert_eq!(body.count, 3);
    for session in &sessions {
        assert_eq!(session.display_texts(), vec![BROADCAST_TEXT.to_string()]);
    }
}

#[tokio::test]
async fn trigger_ignores_request_body() {
    let server = Server::new(test_config());

    let response = Server::admin_router(server.app())
        .oneshot(
            Request::post("/trigger")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"anything":"goes"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn example_scenario_through_the_runtime() {
    let server = Server::new(test_config());
    let app = server.app();
    let app_server = server.build().unwrap();
    let router = app_server.router();

    // start s1/u1 via the runtime webhook
    let response = router
        .clone()
        .oneshot(
            Request::post("/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer test-key")
                .body(Body::from(
                    r#"{"type":"session_request","sessionId":"s1","userId":"u1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.registry().session_ids(), vec!["s1".to_string()]);

    let mut layouts = app_server.session("s1").unwrap().subscribe_layouts();

    let (status, body) = post_trigger(router.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        TriggerResponse {
            success: true,
            count: 1
        }
    );
    let display = layouts.try_recv().unwrap();
    assert_eq!(display.text, BROADCAST_TEXT);
    assert_eq!(display.duration_ms, Some(5000));
    assert!(layouts.try_recv().is_err());

    let response = router
        .oneshot(
            Request::post("/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer test-key")
                .body(Body::from(
                    r#"{"type":"stop_request","sessionId":"s1","userId":"u1","reason":"user_disabled"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.registry().is_empty());
}

#[tokio::test]
async fn app_server_uses_configured_public_dir() {
    let server = Server::new(test_config());

    let app_server = server.build().unwrap();

    assert_eq!(app_server.config().public_dir, PathBuf::from("public"));
    assert_eq!(app_server.config().port, 3000);
}

#[tokio::test]
async fn webview_is_served_from_public_dir() {
    let public_dir = format!("{}/public", env!("CARGO_MANIFEST_DIR"));
    let config = AppConfig::from_lookup(|key| match key {
        "PACKAGE_NAME" => Some("com.example.buttonapp".to_string()),
        "MENTRAOS_API_KEY" => Some("test-key".to_string()),
        "PUBLIC_DIR" => Some(public_dir.clone()),
        _ => None,
    })
    .unwrap();
    let app_server = Server::new(config).build().unwrap();

    let response = app_server
        .router()
        .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("/trigger"));
    assert!(page.contains("Button App"));
}
