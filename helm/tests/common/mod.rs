// Shared setup for the integration tests
#![allow(dead_code)]

use std::sync::{Arc, Once};

use helm::session::{FileTokenStorage, SessionStore};
use helm::{Config, HelmApp};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn config_for(server: &MockServer) -> Config {
    Config::for_base_url(&server.uri())
}

/// App against the mock server with a throwaway session.
pub fn app_for(server: &MockServer) -> HelmApp {
    HelmApp::with_session(config_for(server), SessionStore::in_memory())
        .expect("Failed to build app")
}

/// App that is already logged in with `token`.
pub fn logged_in_app(server: &MockServer, token: &str) -> HelmApp {
    let app = app_for(server);
    app.session().set_token(token).expect("Failed to set token");
    app
}

/// Session persisted in a temporary directory; keep the `TempDir` alive.
pub fn file_session() -> (TempDir, Arc<SessionStore>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let session = SessionStore::open(FileTokenStorage::new(dir.path().join("session")))
        .expect("Failed to open session");
    (dir, session)
}

pub fn discussions_body(discussions: &[(i64, &str)]) -> Value {
    let data: Vec<Value> = discussions
        .iter()
        .map(|(id, name)| {
            json!({
                "id": id,
                "name": name,
                "userId": 1,
                "createdAt": "2024-05-01T10:00:00",
                "cards": null
            })
        })
        .collect();
    json!({ "data": data })
}

pub fn details_body(cards: &str, questions: &[(i64, &str, bool)]) -> Value {
    let questions: Vec<Value> = questions
        .iter()
        .map(|(id, text, from_user)| {
            json!({
                "id": id,
                "text": text,
                "fromUser": from_user,
                "discussionId": 9,
                "createdAt": "2024-05-01T10:00:00"
            })
        })
        .collect();
    json!({ "questions": questions, "cards": cards })
}
