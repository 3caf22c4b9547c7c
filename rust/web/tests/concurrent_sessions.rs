/// Concurrency tests for the session registry
///
/// Sessions belonging to different learners must not share trainer state,
/// and the registry must stay consistent under parallel creation and
/// teardown.
use bjtrain_web::server::{ServerConfig, WebServer};
use bjtrain_web::{AppContext, SessionConfig};
use serde_json::json;
use std::sync::Arc;
use warp::hyper::{self, Body, Client as HyperClient, Request};

#[tokio::test]
async fn parallel_session_creation_yields_unique_ids() {
    let ctx = AppContext::new_for_tests();
    let sessions = ctx.sessions();

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let sessions = Arc::clone(&sessions);
        tasks.push(tokio::spawn(async move {
            sessions.create_session(SessionConfig::default())
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        let id = task
            .await
            .expect("join task")
            .expect("create session");
        ids.push(id);
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16, "every session gets a distinct id");
    assert_eq!(sessions.active_sessions().len(), 16);
}

#[tokio::test]
async fn sessions_track_stats_independently() {
    let ctx = AppContext::new_for_tests();
    let sessions = ctx.sessions();

    let first = sessions
        .create_session(SessionConfig {
            seed: Some(7),
            ..SessionConfig::default()
        })
        .expect("create first session");
    let second = sessions
        .create_session(SessionConfig {
            seed: Some(7),
            ..SessionConfig::default()
        })
        .expect("create second session");

    use bjtrain_engine::strategy::Action;

    sessions.deal(&first).expect("deal first");
    sessions.answer(&first, Action::Hit).expect("answer first");
    sessions.deal(&first).expect("deal first again");
    sessions.answer(&first, Action::Stand).expect("answer first again");

    sessions.deal(&second).expect("deal second");
    sessions.answer(&second, Action::Hit).expect("answer second");

    let first_state = sessions.state(&first).expect("first state");
    let second_state = sessions.state(&second).expect("second state");
    assert_eq!(first_state.stats.total, 2);
    assert_eq!(second_state.stats.total, 1);
}

#[tokio::test]
async fn parallel_deals_on_separate_sessions_do_not_interfere() {
    let ctx = AppContext::new_for_tests();
    let sessions = ctx.sessions();

    let mut ids = Vec::new();
    for _ in 0..8 {
        ids.push(
            sessions
                .create_session(SessionConfig::default())
                .expect("create session"),
        );
    }

    let mut tasks = Vec::new();
    for id in ids.clone() {
        let sessions = Arc::clone(&sessions);
        tasks.push(tokio::spawn(async move {
            for _ in 0..5 {
                let view = sessions.deal(&id).expect("deal");
                assert_eq!(view.cards.len(), 2);
                sessions
                    .answer(&id, bjtrain_engine::strategy::Action::Hit)
                    .expect("answer");
            }
        }));
    }

    for task in tasks {
        task.await.expect("join task");
    }

    for id in &ids {
        let state = sessions.state(id).expect("state");
        assert_eq!(state.stats.total, 5);
    }
}

#[tokio::test]
async fn concurrent_http_clients_train_in_isolation() {
    let server = WebServer::new(ServerConfig::for_tests()).expect("construct server");
    let handle = server.start().await.expect("start server");
    let address = handle.address();

    let mut tasks = Vec::new();
    for _ in 0..4 {
        tasks.push(tokio::spawn(async move {
            let client = HyperClient::new();

            let create_request = Request::builder()
                .method(hyper::Method::POST)
                .uri(
                    format!("http://{address}/api/sessions")
                        .parse::<hyper::Uri>()
                        .expect("parse create uri"),
                )
                .header(hyper::header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({}).to_string()))
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

            for round in 1..=3u64 {
                let deal_request = Request::builder()
                    .method(hyper::Method::POST)
                    .uri(
                        format!("http://{address}/api/sessions/{session_id}/deal")
                            .parse::<hyper::Uri>()
                            .expect("parse deal uri"),
                    )
                    .body(Body::empty())
                    .expect("build deal request");
                let deal_response = client.request(deal_request).await.expect("deal");
                assert_eq!(deal_response.status(), hyper::StatusCode::OK);

                let answer_request = Request::builder()
                    .method(hyper::Method::POST)
                    .uri(
                        format!("http://{address}/api/sessions/{session_id}/answer")
                            .parse::<hyper::Uri>()
                            .expect("parse answer uri"),
                    )
                    .header(hyper::header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "action": "S" }).to_string()))
                    .expect("build answer request");
                let answer_response = client.request(answer_request).await.expect("answer");
                assert_eq!(answer_response.status(), hyper::StatusCode::OK);
                let answer_body = hyper::body::to_bytes(answer_response.into_body())
                    .await
                    .expect("read answer body");
                let answer: serde_json::Value =
                    serde_json::from_slice(&answer_body).expect("parse answer json");
                assert_eq!(answer["stats"]["total"], round);
            }

            session_id
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.expect("join task"));
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);

    handle.shutdown().await.expect("shutdown");
}
