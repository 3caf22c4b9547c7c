/// Server-sent event stream tests
use bjtrain_web::server::{ServerConfig, WebServer};
use serde_json::json;
use std::time::Duration;
use warp::hyper::body::HttpBody;
use warp::hyper::{self, Body, Client as HyperClient, Request};

#[tokio::test]
async fn event_stream_rejects_unknown_session() {
    let server = WebServer::new(ServerConfig::for_tests()).expect("construct server");
    let handle = server.start().await.expect("start server");
    let address = handle.address();
    let client = HyperClient::new();

    let uri: hyper::Uri = format!("http://{address}/api/sessions/no-such-session/events")
        .parse()
        .expect("parse uri");
    let response = client.get(uri).await.expect("request events");
    assert_eq!(response.status(), hyper::StatusCode::NOT_FOUND);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn event_stream_delivers_hand_dealt_events() {
    let server = WebServer::new(ServerConfig::for_tests()).expect("construct server");
    let handle = server.start().await.expect("start server");
    let address = handle.address();
    let sessions = handle.context().sessions();
    let client = HyperClient::new();

    let create_request = Request::builder()
        .method(hyper::Method::POST)
        .uri(
            format!("http://{address}/api/sessions")
                .parse::<hyper::Uri>()
                .expect("parse create uri"),
        )
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "seed": 5 }).to_string()))
        .expect("build create request");
    let create_response = client.request(create_request).await.expect("create");
    assert_eq!(create_response.status(), hyper::StatusCode::CREATED);
    let body = hyper::body::to_bytes(create_response.into_body())
        .await
        .expect("read body");
    let created: serde_json::Value = serde_json::from_slice(&body).expect("parse json");
    let session_id = created["session_id"]
        .as_str()
        .expect("session_id")
        .to_string();

    let events_uri: hyper::Uri = format!("http://{address}/api/sessions/{session_id}/events")
        .parse()
        .expect("parse events uri");
    let events_response = client.get(events_uri).await.expect("open event stream");
    assert_eq!(events_response.status(), hyper::StatusCode::OK);
    let content_type = events_response
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .expect("content type header")
        .to_str()
        .expect("header string");
    assert!(content_type.starts_with("text/event-stream"));

    // Let the subscription register before dealing.
    tokio::time::sleep(Duration::from_millis(50)).await;
    sessions.deal(&session_id).expect("deal hand");

    let mut stream = events_response.into_body();
    let mut collected = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while !collected.contains("hand_dealt") {
        let chunk = tokio::time::timeout_at(deadline, stream.data())
            .await
            .expect("timed out waiting for event")
            .expect("stream ended early")
            .expect("stream error");
        collected.push_str(&String::from_utf8_lossy(&chunk));
    }

    assert!(collected.contains("event: training_event"));
    assert!(collected.contains("\"type\":\"hand_dealt\""));
    assert!(collected.contains(&session_id));

    handle.shutdown().await.expect("shutdown");
}
