//! Integration tests for the HTTP client against a mock backend

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use eventdesk_client::{ClientConfig, HttpEventsApi, StaticToken};
use eventdesk_core::environment::EventsApi;
use eventdesk_core::error::ApiError;
use eventdesk_core::types::{
    EventId, EventUpdate, Membership, ReviewDecision, RoleId, UserId,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: StaticToken) -> HttpEventsApi {
    let config = ClientConfig::new(&format!("{}/api", server.uri())).unwrap();
    HttpEventsApi::new(&config, Arc::new(token)).unwrap()
}

#[tokio::test]
async fn fetches_approved_events_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(query_param("status", "approved"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "e1", "title": "Orientation", "status": "approved", "createdBy": "u9"},
            {"id": "e2", "title": "Hackathon", "status": "approved", "registeredUserIds": ["u1"]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("secret"));
    let events = api.fetch_approved_events().await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].created_by, Some(UserId::new("u9")));
    assert!(events[1].has_registered(&UserId::new("u1")));
}

#[tokio::test]
async fn missing_token_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::none());
    let result = api.fetch_attendees(EventId::new("e1")).await;

    assert_eq!(result.unwrap_err(), ApiError::MissingToken);
}

#[tokio::test]
async fn unregister_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/e1/registrations/u1"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Event already started"})),
        )
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("t"));
    let err = api
        .unregister_from_event(EventId::new("e1"), UserId::new("u1"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Rejected { status: 409, message: Some("Event already started".into()) }
    );
}

#[tokio::test]
async fn plain_text_error_has_no_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/e1/registrations"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("t"));
    let err = api
        .register_for_event(EventId::new("e1"), UserId::new("u1"))
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Rejected { status: 502, message: None });
}

#[tokio::test]
async fn unauthorized_is_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("expired"));
    let err = api
        .set_account_locked(UserId::new("u1"), true)
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test]
async fn register_sends_user_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/e7/registrations"))
        .and(body_json(json!({"userId": "u3"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("t"));
    api.register_for_event(EventId::new("e7"), UserId::new("u3"))
        .await
        .unwrap();
}

#[tokio::test]
async fn attendance_is_put_per_user() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/events/e1/attendance/u2"))
        .and(body_json(json!({"attending": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("t"));
    api.set_attendance(EventId::new("e1"), UserId::new("u2"), true)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_event_returns_the_saved_event() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/events/e1"))
        .and(body_json(json!({
            "title": "Orientation 2026",
            "organizers": [{"userId": "u1", "roleId": "r1", "positionId": "p1"}],
            "participants": [{"userId": "u2", "roleId": "r2", "positionId": "p2"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "e1", "title": "Orientation 2026", "status": "approved"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("t"));
    let payload = EventUpdate {
        title: Some("Orientation 2026".into()),
        organizers: vec![Membership::new("u1", "r1", "p1")],
        participants: vec![Membership::new("u2", "r2", "p2")],
        ..EventUpdate::default()
    };
    let event = api.update_event(EventId::new("e1"), payload).await.unwrap();

    assert_eq!(event.title, "Orientation 2026");
}

#[tokio::test]
async fn review_and_role_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/e5/review"))
        .and(body_json(json!({"decision": "reject", "reason": "Duplicate"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/users/u4/role"))
        .and(body_json(json!({"roleId": "admin"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("t"));
    api.review_event(EventId::new("e5"), ReviewDecision::Reject { reason: "Duplicate".into() })
        .await
        .unwrap();
    api.assign_role(UserId::new("u4"), RoleId::new("admin")).await.unwrap();
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/e1/attendees"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let api = client_for(&server, StaticToken::new("t"));
    let err = api.fetch_attendees(EventId::new("e1")).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}
