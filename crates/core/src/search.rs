//! Version search filters.
//!
//! Query-string values are parsed and validated here so both the
//! PostgreSQL repository and the in-memory store apply identical rules.
//! All constraints are optional and conjunctive.

use chrono::DateTime;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Validated search constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionFilter {
    /// Case-insensitive substring of `content`, matched literally.
    pub content: Option<String>,
    /// Editor must be one of these (ignored when empty).
    pub editors: Vec<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub created_to: Option<Timestamp>,
    /// Exact owning entry.
    pub entry_id: Option<String>,
}

impl VersionFilter {
    /// Build a filter from raw query values.
    ///
    /// Blank strings count as absent. Dates must be RFC 3339.
    pub fn parse(
        content: Option<&str>,
        editors: &[String],
        created_from: Option<&str>,
        created_to: Option<&str>,
        entry_id: Option<&str>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            content: non_blank(content),
            editors: editors
                .iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            created_from: non_blank(created_from)
                .map(|raw| parse_timestamp("createdAtFrom", &raw))
                .transpose()?,
            created_to: non_blank(created_to)
                .map(|raw| parse_timestamp("createdAtTo", &raw))
                .transpose()?,
            entry_id: non_blank(entry_id),
        })
    }

    /// Filter restricted to one entry.
    pub fn by_entry(entry_id: impl Into<String>) -> Self {
        Self {
            entry_id: Some(entry_id.into()),
            ..Self::default()
        }
    }

    /// Whether a record with these fields satisfies every constraint.
    pub fn matches(&self, content: &str, editor: &str, created_at: Timestamp, entry_id: &str) -> bool {
        if let Some(ref needle) = self.content {
            if !content.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if !self.editors.is_empty() && !self.editors.iter().any(|e| e == editor) {
            return false;
        }
        if self.created_from.is_some_and(|from| created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| created_at > to) {
            return false;
        }
        if let Some(ref entry) = self.entry_id {
            if entry != entry_id {
                return false;
            }
        }
        true
    }

    /// ILIKE pattern for the content constraint, with wildcards escaped.
    pub fn content_pattern(&self) -> Option<String> {
        self.content
            .as_deref()
            .map(|needle| format!("%{}%", escape_like(needle)))
    }
}

/// Parse an RFC 3339 timestamp, naming the offending parameter on failure.
pub fn parse_timestamp(param: &str, raw: &str) -> Result<Timestamp, CoreError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.to_utc())
        .map_err(|_| {
            CoreError::Validation(format!(
                "Invalid '{param}' date format. Expected RFC 3339 (e.g. 2024-01-31T00:00:00Z)"
            ))
        })
}

/// Escape `\`, `%` and `_` for use inside a `LIKE` pattern (default escape char).
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
