//! Recording fakes for the collaborator seams.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use lawiki_clients::{
    CommentService, DeleteOutcome, MediaService, ServiceError, TranslationRequest,
    TranslationResponse, TranslationService,
};
use lawiki_core::translation::TranslatedFields;
use lawiki_core::types::new_version_id;
use lawiki_db::models::version::{CreateVersion, UpdateVersion, Version};
use lawiki_db::MemoryVersionStore;
use lawiki_events::{NotificationJob, NotificationQueue};
use tokio::sync::mpsc;

use crate::{CascadeOrchestrator, TranslationEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DeleteMedia(String),
    DeleteComments(String),
    Translate { target_lang: String, fields: Vec<String> },
}

/// Media ids starting with `gone` answer "already absent".
pub struct FakeServices {
    calls: Mutex<Vec<Call>>,
    failing_media: Mutex<HashSet<String>>,
    comments_fail: AtomicBool,
    detected_lang: Mutex<String>,
}

impl FakeServices {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_media(&self, id: &str) {
        self.failing_media.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_comments(&self) {
        self.comments_fail.store(true, Ordering::SeqCst);
    }

    pub fn detect_as(&self, lang: &str) {
        *self.detected_lang.lock().unwrap() = lang.to_string();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for FakeServices {
    fn default() -> Self {
        Self {
            calls: Mutex::default(),
            failing_media: Mutex::default(),
            comments_fail: AtomicBool::new(false),
            detected_lang: Mutex::new("es".to_string()),
        }
    }
}

fn failure(service: &'static str) -> ServiceError {
    ServiceError::Status {
        service,
        status: 500,
        body: "boom".into(),
    }
}

#[async_trait]
impl MediaService for FakeServices {
    async fn delete_media(&self, media_id: &str) -> Result<DeleteOutcome, ServiceError> {
        self.record(Call::DeleteMedia(media_id.to_string()));
        if self.failing_media.lock().unwrap().contains(media_id) {
            return Err(failure("media"));
        }
        if media_id.starts_with("gone") {
            return Ok(DeleteOutcome::AlreadyAbsent);
        }
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl CommentService for FakeServices {
    async fn delete_version_comments(&self, version_id: &str) -> Result<DeleteOutcome, ServiceError> {
        self.record(Call::DeleteComments(version_id.to_string()));
        if self.comments_fail.load(Ordering::SeqCst) {
            return Err(failure("comment"));
        }
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl TranslationService for FakeServices {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ServiceError> {
        self.record(Call::Translate {
            target_lang: request.target_lang.clone(),
            fields: request.fields.keys().cloned().collect(),
        });
        let translated_fields = request
            .fields
            .iter()
            .map(|(field, text)| (field.clone(), format!("[{}] {text}", request.target_lang)))
            .collect();
        Ok(TranslationResponse {
            translated_fields,
            detected_source_language: self.detected_lang.lock().unwrap().clone(),
        })
    }
}

pub struct Harness {
    pub store: Arc<MemoryVersionStore>,
    pub services: Arc<FakeServices>,
    pub jobs: mpsc::UnboundedReceiver<NotificationJob>,
    pub orchestrator: CascadeOrchestrator,
    pub translator: TranslationEngine,
}

impl Harness {
    /// Insert a version directly, bypassing the pipelines.
    pub async fn seed(&self, entry_id: &str, editor: &str, media: &[&str]) -> Version {
        let version = Version {
            id: new_version_id(),
            entry_id: entry_id.to_string(),
            content: format!("content of {entry_id}"),
            editor: editor.to_string(),
            created_at: Utc::now(),
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

pub fn harness() -> Harness {
    let store = Arc::new(MemoryVersionStore::new());
    let services = Arc::new(FakeServices::default());
    let (queue, jobs) = NotificationQueue::channel();
    let orchestrator =
        CascadeOrchestrator::new(store.clone(), services.clone(), services.clone(), queue);
    let translator = TranslationEngine::new(store.clone(), services.clone());
    Harness {
        store,
        services,
        jobs,
        orchestrator,
        translator,
    }
}

pub fn create_input(entry_id: &str, editor: &str, media: &[&str]) -> CreateVersion {
    CreateVersion {
        entry_id: entry_id.to_string(),
        content: "hola".to_string(),
        editor: editor.to_string(),
        address: Some(serde_json::json!({ "section": 1 })),
        media_ids: media.iter().map(|m| m.to_string()).collect(),
    }
}

pub fn update_input(content: &str, editor: &str, media: &[&str]) -> UpdateVersion {
    UpdateVersion {
        content: content.to_string(),
        editor: editor.to_string(),
        address: None,
        media_ids: media.iter().map(|m| m.to_string()).collect(),
    }
}
