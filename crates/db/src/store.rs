//! The Version Store contract shared by the cascade pipelines.
//!
//! [`VersionStore`] is the seam the pipelines depend on; [`PgVersionStore`]
//! is the production implementation over [`VersionRepo`], and
//! [`MemoryVersionStore`](crate::MemoryVersionStore) backs local runs and tests.

use async_trait::async_trait;
use lawiki_core::search::VersionFilter;
use lawiki_core::translation::FieldTranslations;
use lawiki_core::types::{Timestamp, VersionId};

use crate::models::version::{CreateVersion, UpdateVersion, Version};
use crate::repositories::VersionRepo;
use crate::DbPool;

/// Store-level failure. Always surfaced as an internal error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Persist a new version with the given id and creation time.
    async fn create(
        &self,
        id: VersionId,
        input: &CreateVersion,
        created_at: Timestamp,
    ) -> Result<Version, StoreError>;

    async fn get(&self, id: VersionId) -> Result<Option<Version>, StoreError>;

    /// Every version, newest first.
    async fn list(&self) -> Result<Vec<Version>, StoreError>;

    /// Versions matching all constraints of `filter`, newest first.
    async fn find(&self, filter: &VersionFilter) -> Result<Vec<Version>, StoreError>;

    /// Replace editable fields; `None` when the record no longer exists.
    async fn update(
        &self,
        id: VersionId,
        input: &UpdateVersion,
        updated_at: Timestamp,
    ) -> Result<Option<Version>, StoreError>;

    /// Field-scoped write of one language's translations and `source_lang`.
    async fn set_translation(
        &self,
        id: VersionId,
        lang: &str,
        translated: &FieldTranslations,
        source_lang: &str,
    ) -> Result<Option<Version>, StoreError>;

    /// `false` when nothing matched (already gone).
    async fn delete(&self, id: VersionId) -> Result<bool, StoreError>;

    /// Remove exactly the listed records; ids that no longer exist are
    /// skipped. Returns the number removed.
    async fn delete_many(&self, ids: &[VersionId]) -> Result<u64, StoreError>;

    /// Whether the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// [`VersionStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgVersionStore {
    pool: DbPool,
}

impl PgVersionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for PgVersionStore {
    async fn create(
        &self,
        id: VersionId,
        input: &CreateVersion,
        created_at: Timestamp,
    ) -> Result<Version, StoreError> {
        Ok(VersionRepo::create(&self.pool, id, input, created_at).await?)
    }

    async fn get(&self, id: VersionId) -> Result<Option<Version>, StoreError> {
        Ok(VersionRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list(&self) -> Result<Vec<Version>, StoreError> {
        Ok(VersionRepo::list(&self.pool).await?)
    }

    async fn find(&self, filter: &VersionFilter) -> Result<Vec<Version>, StoreError> {
        Ok(VersionRepo::search(&self.pool, filter).await?)
    }

    async fn update(
        &self,
        id: VersionId,
        input: &UpdateVersion,
        updated_at: Timestamp,
    ) -> Result<Option<Version>, StoreError> {
        Ok(VersionRepo::update(&self.pool, id, input, updated_at).await?)
    }

    async fn set_translation(
        &self,
        id: VersionId,
        lang: &str,
        translated: &FieldTranslations,
        source_lang: &str,
    ) -> Result<Option<Version>, StoreError> {
        Ok(VersionRepo::set_translation(&self.pool, id, lang, translated, source_lang).await?)
    }

    async fn delete(&self, id: VersionId) -> Result<bool, StoreError> {
        Ok(VersionRepo::delete(&self.pool, id).await?)
    }

    async fn delete_many(&self, ids: &[VersionId]) -> Result<u64, StoreError> {
        Ok(VersionRepo::delete_many(&self.pool, ids).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
