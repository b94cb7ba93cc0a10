//! Version record and request DTOs.

use lawiki_core::translation::TranslatedFields;
use lawiki_core::types::{Timestamp, VersionId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `versions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub entry_id: String,
    pub content: String,
    pub editor: String,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    /// Structural/location metadata, opaque to the service.
    pub address: Option<serde_json::Value>,
    pub media_ids: Vec<String>,
    #[sqlx(json)]
    #[serde(rename = "translatedFields", default)]
    pub translated_fields: TranslatedFields,
    #[serde(rename = "sourceLang", default, skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
}

/// DTO for creating a version. `id` and `created_at` are server-assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVersion {
    pub entry_id: String,
    #[serde(default)]
    pub content: String,
    pub editor: String,
    #[serde(default)]
    pub address: Option<serde_json::Value>,
    #[serde(default)]
    pub media_ids: Vec<String>,
}

/// DTO for replacing the editable fields of a version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateVersion {
    #[serde(default)]
    pub content: String,
    pub editor: String,
    #[serde(default)]
    pub address: Option<serde_json::Value>,
    #[serde(default)]
    pub media_ids: Vec<String>,
}
