//! Ordered cross-service pipelines for version mutations.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use lawiki_clients::{CommentService, DeleteOutcome, MediaService};
use lawiki_core::media::{dropped_media, normalize_media_ids};
use lawiki_core::search::VersionFilter;
use lawiki_core::types::{new_version_id, VersionId};
use lawiki_core::version::{validate_editor, validate_entry_id};
use lawiki_db::models::version::{CreateVersion, UpdateVersion, Version};
use lawiki_db::VersionStore;
use lawiki_events::{NotificationJob, NotificationQueue};

use crate::error::PipelineError;

/// How a single-version delete ended. Both are success for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Deletion {
    /// The record was removed by this call.
    Removed(Version),
    /// A concurrent delete removed the record between load and commit.
    AlreadyGone,
}

/// Sequences dependent-service calls around every version mutation.
///
/// Each pipeline halts on the first failing step and leaves completed steps
/// in place. Notifications are queued only after the store commit and never
/// affect the result.
#[derive(Clone)]
pub struct CascadeOrchestrator {
    store: Arc<dyn VersionStore>,
    media: Arc<dyn MediaService>,
    comments: Arc<dyn CommentService>,
    notifications: NotificationQueue,
}

impl CascadeOrchestrator {
    pub fn new(
        store: Arc<dyn VersionStore>,
        media: Arc<dyn MediaService>,
        comments: Arc<dyn CommentService>,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            store,
            media,
            comments,
            notifications,
        }
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Validate and persist a new version, then notify the entry author.
    pub async fn create(&self, mut input: CreateVersion) -> Result<Version, PipelineError> {
        validate_entry_id(&input.entry_id)?;
        validate_editor(&input.editor)?;
        input.media_ids = normalize_media_ids(input.media_ids);

        let version = self
            .store
            .create(new_version_id(), &input, Utc::now())
            .await?;

        tracing::info!(
            version_id = %version.id,
            entry_id = %version.entry_id,
            editor = %version.editor,
            "Version created",
        );
        self.notifications
            .submit(NotificationJob::entry_modified(&version.entry_id));

        Ok(version)
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Delete the media the update drops, then commit the new fields.
    ///
    /// Returns `Ok(None)` when the record vanished between load and commit.
    /// A failing media delete leaves the stored version untouched.
    pub async fn update(
        &self,
        id: VersionId,
        mut input: UpdateVersion,
    ) -> Result<Option<Version>, PipelineError> {
        validate_editor(&input.editor)?;
        input.media_ids = normalize_media_ids(input.media_ids);

        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::version_not_found(id))?;

        let dropped = dropped_media(&existing.media_ids, &input.media_ids);
        if !dropped.is_empty() {
            tracing::debug!(version_id = %id, dropped = dropped.len(), "Update drops media");
        }
        self.delete_media(id, &dropped).await?;

        let Some(updated) = self.store.update(id, &input, Utc::now()).await? else {
            tracing::warn!(version_id = %id, "Version disappeared before update commit");
            return Ok(None);
        };

        tracing::info!(version_id = %id, entry_id = %updated.entry_id, "Version updated");
        self.notifications
            .submit(NotificationJob::entry_modified(&updated.entry_id));

        Ok(Some(updated))
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Remove a version with its media and comments, then notify its editor.
    pub async fn delete(&self, id: VersionId) -> Result<Deletion, PipelineError> {
        let version = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::version_not_found(id))?;

        self.delete_media(id, &version.media_ids).await?;
        self.delete_comments(id).await?;

        if !self.store.delete(id).await? {
            tracing::info!(version_id = %id, "Version already deleted");
            return Ok(Deletion::AlreadyGone);
        }

        tracing::info!(version_id = %id, entry_id = %version.entry_id, "Version deleted");
        self.notifications.submit(NotificationJob::version_deleted(
            &version.entry_id,
            &version.editor,
        ));

        Ok(Deletion::Removed(version))
    }

    /// Remove every version of an entry. Returns the number of records
    /// deleted; zero means there was nothing to do and no calls were made.
    ///
    /// Media of all versions goes first, then comments of all versions, then
    /// one bulk store delete of exactly the versions that were cascaded. A
    /// version added to the entry meanwhile is left for the next call. A
    /// failure part-way leaves the records in place so the whole call can be
    /// retried.
    pub async fn delete_by_entry(&self, entry_id: &str) -> Result<u64, PipelineError> {
        validate_entry_id(entry_id)?;

        let versions = self.store.find(&VersionFilter::by_entry(entry_id)).await?;
        if versions.is_empty() {
            tracing::debug!(entry_id, "No versions to delete for entry");
            return Ok(0);
        }

        let mut seen = HashSet::new();
        for version in &versions {
            let pending: Vec<String> = version
                .media_ids
                .iter()
                .filter(|m| seen.insert(m.as_str()))
                .cloned()
                .collect();
            self.delete_media(version.id, &pending).await?;
        }

        for version in &versions {
            self.delete_comments(version.id).await?;
        }

        let ids: Vec<VersionId> = versions.iter().map(|v| v.id).collect();
        let deleted = self.store.delete_many(&ids).await?;
        tracing::info!(entry_id, deleted, "Entry versions deleted");
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Dependent resources
    // -----------------------------------------------------------------------

    async fn delete_media(&self, version_id: VersionId, media_ids: &[String]) -> Result<(), PipelineError> {
        for media_id in media_ids {
            match self.media.delete_media(media_id).await {
                Ok(DeleteOutcome::Deleted) => {
                    tracing::debug!(version_id = %version_id, media_id = %media_id, "Media deleted");
                }
                Ok(DeleteOutcome::AlreadyAbsent) => {
                    tracing::info!(version_id = %version_id, media_id = %media_id, "Media already absent");
                }
                Err(e) => {
                    tracing::error!(
                        version_id = %version_id,
                        media_id = %media_id,
                        error = %e,
                        "Media delete failed, aborting cascade",
                    );
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    async fn delete_comments(&self, version_id: VersionId) -> Result<(), PipelineError> {
        match self
            .comments
            .delete_version_comments(&version_id.to_string())
            .await
        {
            Ok(outcome) => {
                tracing::debug!(version_id = %version_id, ?outcome, "Comments deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    version_id = %version_id,
                    error = %e,
                    "Comment delete failed, aborting cascade",
                );
                Err(e.into())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
