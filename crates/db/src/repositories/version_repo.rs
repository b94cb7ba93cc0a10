//! Repository for the `versions` table.
//!
//! Updates and deletes match on the primary key only; a zero-row result is
//! reported to the caller instead of being treated as an error, which is what
//! lets concurrent cascades on the same record race safely.

use lawiki_core::search::VersionFilter;
use lawiki_core::translation::FieldTranslations;
use lawiki_core::types::{Timestamp, VersionId};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::version::{CreateVersion, UpdateVersion, Version};

/// Column list for versions queries.
const COLUMNS: &str = "id, entry_id, content, editor, created_at, updated_at, \
    address, media_ids, translated_fields, source_lang";

/// Provides CRUD and search operations for versions.
pub struct VersionRepo;

impl VersionRepo {
    /// Insert a new version with a caller-allocated id and creation time.
    pub async fn create(
        pool: &PgPool,
        id: VersionId,
        input: &CreateVersion,
        created_at: Timestamp,
    ) -> Result<Version, sqlx::Error> {
        let query = format!(
            "INSERT INTO versions (id, entry_id, content, editor, created_at, address, media_ids)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .bind(&input.entry_id)
            .bind(&input.content)
            .bind(&input.editor)
            .bind(created_at)
            .bind(&input.address)
            .bind(&input.media_ids)
            .fetch_one(pool)
            .await
    }

    /// Find a version by ID.
    pub async fn find_by_id(pool: &PgPool, id: VersionId) -> Result<Option<Version>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM versions WHERE id = $1");
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every version, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Version>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM versions ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Version>(&query).fetch_all(pool).await
    }

    /// Search with optional conjunctive constraints, newest first.
    pub async fn search(pool: &PgPool, filter: &VersionFilter) -> Result<Vec<Version>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM versions
             WHERE ($1::TEXT IS NULL OR content ILIKE $1)
               AND (cardinality($2::TEXT[]) = 0 OR editor = ANY($2))
               AND ($3::TIMESTAMPTZ IS NULL OR created_at >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR created_at <= $4)
               AND ($5::TEXT IS NULL OR entry_id = $5)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(filter.content_pattern())
            .bind(&filter.editors)
            .bind(filter.created_from)
            .bind(filter.created_to)
            .bind(&filter.entry_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the editable fields. Returns `None` when no row matched.
    pub async fn update(
        pool: &PgPool,
        id: VersionId,
        input: &UpdateVersion,
        updated_at: Timestamp,
    ) -> Result<Option<Version>, sqlx::Error> {
        let query = format!(
            "UPDATE versions SET
                content = $2,
                editor = $3,
                updated_at = $4,
                address = $5,
                media_ids = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .bind(&input.content)
            .bind(&input.editor)
            .bind(updated_at)
            .bind(&input.address)
            .bind(&input.media_ids)
            .fetch_optional(pool)
            .await
    }

    /// Merge translated fields for one language and record the source
    /// language. Only those two columns are written, so a concurrent update
    /// of the other fields is not overwritten.
    pub async fn set_translation(
        pool: &PgPool,
        id: VersionId,
        lang: &str,
        translated: &FieldTranslations,
        source_lang: &str,
    ) -> Result<Option<Version>, sqlx::Error> {
        let query = format!(
            "UPDATE versions SET
                translated_fields = jsonb_set(
                    translated_fields,
                    ARRAY[$2::TEXT],
                    COALESCE(translated_fields -> $2, '{{}}'::jsonb) || $3::jsonb,
                    true
                ),
                source_lang = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .bind(lang)
            .bind(Json(translated))
            .bind(source_lang)
            .fetch_optional(pool)
            .await
    }

    /// Delete a version by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: VersionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM versions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the listed versions. Returns the number of rows removed.
    pub async fn delete_many(pool: &PgPool, ids: &[VersionId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM versions WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
