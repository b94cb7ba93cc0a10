//! In-process [`VersionStore`] keeping records in a map.
//!
//! Mirrors the PostgreSQL semantics: newest-first ordering, zero-match
//! updates/deletes reported rather than failed, and field-scoped
//! translation writes.

use std::collections::HashMap;

use async_trait::async_trait;
use lawiki_core::search::VersionFilter;
use lawiki_core::translation::{merge_translations, FieldTranslations, TranslatedFields};
use lawiki_core::types::{Timestamp, VersionId};
use tokio::sync::RwLock;

use crate::models::version::{CreateVersion, UpdateVersion, Version};
use crate::store::{StoreError, VersionStore};

#[derive(Default)]
pub struct MemoryVersionStore {
    versions: RwLock<HashMap<VersionId, Version>>,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a fully-formed record (seeding, fixtures).
    pub async fn insert(&self, version: Version) {
        self.versions.write().await.insert(version.id, version);
    }

    pub async fn len(&self) -> usize {
        self.versions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.versions.read().await.is_empty()
    }
}

fn newest_first(mut versions: Vec<Version>) -> Vec<Version> {
    versions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    versions
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn create(
        &self,
        id: VersionId,
        input: &CreateVersion,
        created_at: Timestamp,
    ) -> Result<Version, StoreError> {
        let version = Version {
            id,
            entry_id: input.entry_id.clone(),
            content: input.content.clone(),
            editor: input.editor.clone(),
            created_at,
            updated_at: None,
            address: input.address.clone(),
            media_ids: input.media_ids.clone(),
            translated_fields: TranslatedFields::new(),
            source_lang: None,
        };
        self.versions.write().await.insert(id, version.clone());
        Ok(version)
    }

    async fn get(&self, id: VersionId) -> Result<Option<Version>, StoreError> {
        Ok(self.versions.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Version>, StoreError> {
        let all = self.versions.read().await.values().cloned().collect();
        Ok(newest_first(all))
    }

    async fn find(&self, filter: &VersionFilter) -> Result<Vec<Version>, StoreError> {
        let matched = self
            .versions
            .read()
            .await
            .values()
            .filter(|v| filter.matches(&v.content, &v.editor, v.created_at, &v.entry_id))
            .cloned()
            .collect();
        Ok(newest_first(matched))
    }

    async fn update(
        &self,
        id: VersionId,
        input: &UpdateVersion,
        updated_at: Timestamp,
    ) -> Result<Option<Version>, StoreError> {
        let mut versions = self.versions.write().await;
        Ok(versions.get_mut(&id).map(|v| {
            v.content = input.content.clone();
            v.editor = input.editor.clone();
            v.updated_at = Some(updated_at);
            v.address = input.address.clone();
            v.media_ids = input.media_ids.clone();
            v.clone()
        }))
    }

    async fn set_translation(
        &self,
        id: VersionId,
        lang: &str,
        translated: &FieldTranslations,
        source_lang: &str,
    ) -> Result<Option<Version>, StoreError> {
        let mut versions = self.versions.write().await;
        Ok(versions.get_mut(&id).map(|v| {
            merge_translations(&mut v.translated_fields, lang, translated);
            v.source_lang = Some(source_lang.to_string());
            v.clone()
        }))
    }

    async fn delete(&self, id: VersionId) -> Result<bool, StoreError> {
        Ok(self.versions.write().await.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[VersionId]) -> Result<u64, StoreError> {
        let mut versions = self.versions.write().await;
        Ok(ids.iter().filter(|id| versions.remove(id).is_some()).count() as u64)
    }
}
