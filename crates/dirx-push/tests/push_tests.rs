//! Integration tests for the push client — authentication, upload, and
//! job-creation error classification.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dirx_push::{PushClient, PushError, PushOptions};

/// Counts error-level log records emitted while it is installed.
#[derive(Clone, Default)]
struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Helper: create a `PushClient` pointing at a wiremock server.
fn client(server: &MockServer) -> PushClient {
    PushClient::with_http_client(server.uri(), reqwest::Client::new())
}

/// Helper: baseline push options without overrides.
fn push_options() -> PushOptions {
    PushOptions {
        email: "admin@acme.com".to_string(),
        password: "hunter2".to_string(),
        resource: "users".to_string(),
        columns: vec!["displayName".to_string(), "email".to_string()],
        attributes_update_mode: "merge".to_string(),
        remove_unmatched_mode: "none".to_string(),
        override_map: None,
        attributes: Vec::new(),
    }
}

/// Helper: mount a successful login responding with a session cookie.
async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({
            "email": "admin@acme.com",
            "password": "hunter2"
        })))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "session_id=sessid1; Path=/"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn push_runs_the_full_sequence() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/files"))
        .and(header("Cookie", "session_id=sessid1;"))
        .and(body_string_contains("import.csv"))
        .and(body_string_contains("a,b\n1,2\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "id1" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/jobs"))
        .and(header("Cookie", "session_id=sessid1;"))
        .and(body_partial_json(json!({
            "fileId": "id1",
            "resource": "users",
            "columns": ["displayName", "email"],
            "options": {
                "attributesUpdateMode": "merge",
                "removeUnmatchedMode": "none"
            }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .push("a,b\n1,2\n", &push_options())
        .await
        .unwrap();
}

#[tokio::test]
async fn push_applies_overrides_before_upload() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/files"))
        .and(body_string_contains("a,b\n1,x\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "id1" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/jobs"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let mut options = push_options();
    options.override_map = json!({ "b": "x" }).as_object().cloned();
    options.attributes = vec!["b".to_string()];

    client(&server).push("a,b\n1,2\n", &options).await.unwrap();
}

#[tokio::test]
async fn push_forwards_numeric_file_ids_verbatim() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/jobs"))
        .and(body_partial_json(json!({ "fileId": 7 })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .push("a,b\n1,2\n", &push_options())
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_credentials_fail_with_authentication_error() {
    for status in [401, 422] {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client(&server)
            .push("a,b\n1,2\n", &push_options())
            .await
            .unwrap_err();

        match err {
            PushError::Authentication(message) => {
                assert_eq!(message, "incorrect email/password");
            }
            other => panic!("expected Authentication error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn other_login_failures_pass_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .push("a,b\n1,2\n", &push_options())
        .await
        .unwrap_err();

    match err {
        PushError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_set_cookie_fails_authentication() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client(&server)
        .push("a,b\n1,2\n", &push_options())
        .await
        .unwrap_err();

    match err {
        PushError::Authentication(message) => {
            assert!(message.contains("missing session cookie"));
        }
        other => panic!("expected Authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_cookie_fails_authentication() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "cook"))
        .mount(&server)
        .await;

    let err = client(&server)
        .push("a,b\n1,2\n", &push_options())
        .await
        .unwrap_err();

    match err {
        PushError::Authentication(message) => {
            assert!(message.contains("missing session token"));
        }
        other => panic!("expected Authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn upload_failures_pass_through_unwrapped() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage down"))
        .mount(&server)
        .await;

    let err = client(&server)
        .push("a,b\n1,2\n", &push_options())
        .await
        .unwrap_err();

    match err {
        PushError::Api { status, .. } => assert_eq!(status, 500),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn job_failure_with_structured_body_is_logged_once_and_wrapped() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "id1" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/jobs"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "mes" })))
        .mount(&server)
        .await;

    let errors = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry().with(errors.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let err = client(&server)
        .push("a,b\n1,2\n", &push_options())
        .await
        .unwrap_err();

    match err {
        PushError::JobCreation(cause) => match *cause {
            PushError::Api { status, ref body } => {
                assert_eq!(status, 400);
                assert!(body.contains("mes"));
            }
            ref other => panic!("expected Api cause, got {other:?}"),
        },
        other => panic!("expected JobCreation error, got {other:?}"),
    }

    // The server body is surfaced exactly once before the error propagates.
    assert_eq!(errors.count(), 1);
}

#[tokio::test]
async fn job_failure_without_structured_body_passes_through() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "id1" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intgs/import/jobs"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let errors = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry().with(errors.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let err = client(&server)
        .push("a,b\n1,2\n", &push_options())
        .await
        .unwrap_err();

    match err {
        PushError::Api { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    // No structured body, nothing to surface.
    assert_eq!(errors.count(), 0);
}

#[tokio::test]
async fn malformed_payload_aborts_before_upload() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    // No upload mock is mounted: the override step must fail first.
    let mut options = push_options();
    options.override_map = json!({ "a": "x" }).as_object().cloned();
    options.attributes = vec!["a".to_string()];

    let err = client(&server)
        .push("a,b\n\"1,2\n", &options)
        .await
        .unwrap_err();

    assert!(matches!(err, PushError::Override(_)));
}
