//! Integration tests for the scoring client using wiremock.
//!
//! These tests run the three operations against a mock HTTP server,
//! covering the sentinel degradation rules, the publish transport
//! asymmetry, and the payload actually sent on the wire.

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sentria_fraud::config::{InMemoryConfigStore, TenantFraudConfig, API_KEY_PROPERTY};
use sentria_fraud::error::FraudError;
use sentria_fraud::event::{LoginEvent, RequestInfo};
use sentria_fraud::overrides::OverrideMap;
use sentria_fraud::payload::{hash_identifier, ContextField};
use sentria_fraud_client::{ClientConfig, FraudDetectionService, FraudScoreClient, MAX_RISK_SCORE};

const TENANT: &str = "acme.example";
const USER_ID: &str = "user123";
const SESSION_ID: &str = "session123";

fn store() -> InMemoryConfigStore {
    InMemoryConfigStore::new().with_tenant(
        TENANT,
        TenantFraudConfig::new().with_property(API_KEY_PROPERTY, "dummyApiKey"),
    )
}

fn event() -> LoginEvent {
    LoginEvent::new(TENANT)
        .with_user_id(USER_ID)
        .with_session_id(SESSION_ID)
        .with_request(
            RequestInfo::new()
                .with_client_ip("127.0.0.1")
                .with_user_agent("Mozilla/5.0"),
        )
}

fn service(base_url: &str) -> FraudDetectionService<InMemoryConfigStore> {
    let client = FraudScoreClient::new(ClientConfig::new(base_url)).unwrap();
    FraudDetectionService::new(store(), client)
}

fn overrides(value: Value) -> OverrideMap {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn score_body(score: f64) -> Value {
    json!({
        "status": 0,
        "score_response": {
            "scores": { "account_takeover": { "score": score } }
        }
    })
}

// =============================================================================
// Risk score
// =============================================================================

#[tokio::test]
async fn test_risk_score_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(query_param("return_score", "true"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "$type": "$login",
            "$api_key": "dummyApiKey",
            "$login_status": "$success",
            "$user_id": hash_identifier(USER_ID),
            "$session_id": hash_identifier(SESSION_ID),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_body(0.42)))
        .expect(1)
        .mount(&server)
        .await;

    let score = service(&server.uri())
        .login_risk_score(&event(), "LOGIN_SUCCESS", None, None)
        .await
        .unwrap();

    assert_eq!(score, 0.42);
}

#[tokio::test]
async fn test_risk_score_sentinel_on_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let score = service(&server.uri())
        .login_risk_score(&event(), "LOGIN_SUCCESS", None, None)
        .await
        .unwrap();

    assert_eq!(score, MAX_RISK_SCORE);
}

#[tokio::test]
async fn test_risk_score_sentinel_on_service_failure_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 51 })))
        .mount(&server)
        .await;

    let score = service(&server.uri())
        .login_risk_score(&event(), "LOGIN_SUCCESS", None, None)
        .await
        .unwrap();

    assert_eq!(score, MAX_RISK_SCORE);
}

#[tokio::test]
async fn test_risk_score_sentinel_on_missing_score_path() {
    let server = MockServer::start().await;

    // Well-formed envelope, ok status, but no account-takeover score.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "score_response": { "scores": {} }
        })))
        .mount(&server)
        .await;

    let score = service(&server.uri())
        .login_risk_score(&event(), "LOGIN_SUCCESS", None, None)
        .await
        .unwrap();

    assert_eq!(score, MAX_RISK_SCORE);
}

#[tokio::test]
async fn test_risk_score_sentinel_on_unparsable_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let score = service(&server.uri())
        .login_risk_score(&event(), "LOGIN_SUCCESS", None, None)
        .await
        .unwrap();

    assert_eq!(score, MAX_RISK_SCORE);
}

#[tokio::test]
async fn test_risk_score_sentinel_on_transport_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = FraudScoreClient::new(
        ClientConfig::new(uri)
            .with_connect_timeout(1)
            .with_request_timeout(2),
    )
    .unwrap();
    let service = FraudDetectionService::new(store(), client);

    let score = service
        .login_risk_score(&event(), "LOGIN_SUCCESS", None, None)
        .await
        .unwrap();

    assert_eq!(score, MAX_RISK_SCORE);
}

#[tokio::test]
async fn test_risk_score_selective_mode_sends_raw_values() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(query_param("return_score", "true"))
        .and(body_partial_json(json!({
            "$user_id": USER_ID,
            "$session_id": SESSION_ID,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_body(0.1)))
        .expect(1)
        .mount(&server)
        .await;

    let selected = [ContextField::UserId, ContextField::SessionId];
    let score = service(&server.uri())
        .login_risk_score(&event(), "LOGIN_SUCCESS", Some(&selected), None)
        .await
        .unwrap();

    assert_eq!(score, 0.1);
}

#[tokio::test]
async fn test_invalid_login_status_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_body(0.0)))
        .expect(0)
        .mount(&server)
        .await;

    let err = service(&server.uri())
        .login_risk_score(&event(), "LOGIN_PENDING", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, FraudError::InvalidLoginStatus { .. }));
}

// =============================================================================
// Workflow decision
// =============================================================================

#[tokio::test]
async fn test_workflow_decision_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(query_param("return_workflow_status", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "score_response": {
                "workflow_statuses": [
                    {
                        "abuse_types": ["account_takeover"],
                        "entity": { "type": "session", "id": "s1" },
                        "history": [
                            { "app": "decision", "config": { "decision_id": "session_looks_bad" } }
                        ]
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let decision = service(&server.uri())
        .login_workflow_decision(&event(), "LOGIN_FAILED", None)
        .await
        .unwrap();

    assert_eq!(decision.as_deref(), Some("session_looks_bad"));
}

#[tokio::test]
async fn test_workflow_decision_none_when_nothing_qualifies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "score_response": {
                "workflow_statuses": [
                    {
                        "abuse_types": ["payment_abuse"],
                        "entity": { "type": "session", "id": "s1" },
                        "history": []
                    }
                ]
            }
        })))
        .mount(&server)
        .await;

    let decision = service(&server.uri())
        .login_workflow_decision(&event(), "LOGIN_SUCCESS", None)
        .await
        .unwrap();

    assert_eq!(decision, None);
}

#[tokio::test]
async fn test_workflow_decision_none_on_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let decision = service(&server.uri())
        .login_workflow_decision(&event(), "LOGIN_SUCCESS", None)
        .await
        .unwrap();

    assert_eq!(decision, None);
}

#[tokio::test]
async fn test_workflow_decision_none_on_transport_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = FraudScoreClient::new(
        ClientConfig::new(uri)
            .with_connect_timeout(1)
            .with_request_timeout(2),
    )
    .unwrap();
    let service = FraudDetectionService::new(store(), client);

    let decision = service
        .login_workflow_decision(&event(), "LOGIN_SUCCESS", None)
        .await
        .unwrap();

    assert_eq!(decision, None);
}

// =============================================================================
// Publish
// =============================================================================

#[tokio::test]
async fn test_publish_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    // Embedder-owned connection pool.
    let client =
        FraudScoreClient::with_client(ClientConfig::new(server.uri()), reqwest::Client::new())
            .unwrap();
    let service = FraudDetectionService::new(store(), client);

    let result = service
        .publish_login_event(&event(), "LOGIN_SUCCESS", None)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_publish_swallows_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let result = service(&server.uri())
        .publish_login_event(&event(), "LOGIN_SUCCESS", None)
        .await;

    // Best-effort beyond the transport boundary: logged, not surfaced.
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_publish_swallows_service_failure_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 60 })))
        .mount(&server)
        .await;

    let result = service(&server.uri())
        .publish_login_event(&event(), "LOGIN_FAILED", None)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_publish_propagates_transport_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = FraudScoreClient::new(
        ClientConfig::new(uri)
            .with_connect_timeout(1)
            .with_request_timeout(2),
    )
    .unwrap();
    let service = FraudDetectionService::new(store(), client);

    let err = service
        .publish_login_event(&event(), "LOGIN_SUCCESS", None)
        .await
        .unwrap_err();

    assert!(matches!(err, FraudError::Transport { .. }));
    assert!(err.is_recoverable());
}

// =============================================================================
// Wire payload details
// =============================================================================

#[tokio::test]
async fn test_overrides_shape_the_wire_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 0 })))
        .mount(&server)
        .await;

    let map = overrides(json!({
        "$ip": "192.168.8.1",
        "$session_id": "",
        "logging_enabled": true,
        "customKey": "customValue",
    }));

    service(&server.uri())
        .publish_login_event(&event(), "LOGIN_SUCCESS", Some(&map))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let fields = body.as_object().unwrap();

    // Replaced, removed, and passthrough fields.
    assert_eq!(fields["$ip"], json!("192.168.8.1"));
    assert!(!fields.contains_key("$session_id"));
    assert_eq!(fields["customKey"], json!("customValue"));

    // Reserved keys never reach the wire.
    assert!(!fields.contains_key("logging_enabled"));

    // Hashing still applies to the user id.
    assert_eq!(fields["$user_id"], json!(hash_identifier(USER_ID)));
}

#[tokio::test]
async fn test_unconfigured_tenant_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 0 })))
        .expect(0)
        .mount(&server)
        .await;

    let client = FraudScoreClient::new(ClientConfig::new(server.uri())).unwrap();
    let service = FraudDetectionService::new(InMemoryConfigStore::new(), client);

    let err = service
        .login_risk_score(&event(), "LOGIN_SUCCESS", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, FraudError::Configuration { .. }));
}
