#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;

use lawiki_api::config::ServerConfig;
use lawiki_api::router::build_app_router;
use lawiki_api::state::AppState;
use lawiki_clients::{
    CommentService, DeleteOutcome, MediaService, ServiceConfig, ServiceError, TranslationRequest,
    TranslationResponse, TranslationService,
};
use lawiki_core::translation::TranslatedFields;
use lawiki_core::types::new_version_id;
use lawiki_db::models::version::Version;
use lawiki_db::MemoryVersionStore;
use lawiki_events::{NotificationJob, NotificationQueue};
use lawiki_pipeline::{CascadeOrchestrator, TranslationEngine};

pub const SECRET: &str = "test-internal-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        services: ServiceConfig::new("http://127.0.0.1:1", SECRET),
    }
}

// ---------------------------------------------------------------------------
// Fake collaborators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DeleteMedia(String),
    DeleteComments(String),
    Translate(String),
}

#[derive(Default)]
pub struct FakeServices {
    calls: Mutex<Vec<Call>>,
    failing_media: Mutex<HashSet<String>>,
    detected_lang: Mutex<Option<String>>,
}

impl FakeServices {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_media(&self, id: &str) {
        self.failing_media.lock().unwrap().insert(id.to_string());
    }

    pub fn detect_as(&self, lang: &str) {
        *self.detected_lang.lock().unwrap() = Some(lang.to_string());
    }
}

#[async_trait]
impl MediaService for FakeServices {
    async fn delete_media(&self, media_id: &str) -> Result<DeleteOutcome, ServiceError> {
        self.calls.lock().unwrap().push(Call::DeleteMedia(media_id.into()));
        if self.failing_media.lock().unwrap().contains(media_id) {
            return Err(ServiceError::Status {
                service: "media",
                status: 500,
                body: "storage offline".into(),
            });
        }
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl CommentService for FakeServices {
    async fn delete_version_comments(&self, version_id: &str) -> Result<DeleteOutcome, ServiceError> {
        self.calls.lock().unwrap().push(Call::DeleteComments(version_id.into()));
        Ok(DeleteOutcome::AlreadyAbsent)
    }
}

#[async_trait]
impl TranslationService for FakeServices {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Translate(request.target_lang.clone()));
        Ok(TranslationResponse {
            translated_fields: request
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), format!("{v} ({})", request.target_lang)))
                .collect(),
            detected_source_language: self
                .detected_lang
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| "es".into()),
        })
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryVersionStore>,
    pub services: Arc<FakeServices>,
    pub jobs: mpsc::UnboundedReceiver<NotificationJob>,
}

/// The production router over an in-memory store and fake collaborators.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryVersionStore::new());
    let services = Arc::new(FakeServices::default());
    let (queue, jobs) = NotificationQueue::channel();

    let state = AppState {
        store: store.clone(),
        orchestrator: CascadeOrchestrator::new(
            store.clone(),
            services.clone(),
            services.clone(),
            queue,
        ),
        translator: TranslationEngine::new(store.clone(), services.clone()),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        services,
        jobs,
    }
}

impl TestApp {
    /// Send a request; the body is parsed as JSON when non-empty.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Option<serde_json::Value>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).unwrap())
        };
        (status, json)
    }

    pub async fn seed(
        &self,
        entry_id: &str,
        editor: &str,
        content: &str,
        created_at: &str,
        media: &[&str],
    ) -> Version {
        let version = Version {
            id: new_version_id(),
            entry_id: entry_id.into(),
            content: content.into(),
            editor: editor.into(),
            created_at: created_at.parse::<DateTime<Utc>>().unwrap(),
            updated_at: None,
            address: None,
            media_ids: media.iter().map(|m| m.to_string()).collect(),
            translated_fields: TranslatedFields::new(),
            source_lang: None,
        };
        self.store.insert(version.clone()).await;
        version
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
