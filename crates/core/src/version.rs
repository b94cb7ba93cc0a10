//! Validation rules for version payloads.

use crate::error::CoreError;

/// Longest accepted entry or editor reference.
pub const MAX_REFERENCE_LEN: usize = 128;

/// Validate the owning entry reference (required, bounded).
pub fn validate_entry_id(entry_id: &str) -> Result<(), CoreError> {
    validate_reference("entry_id", entry_id)
}

/// Validate the editor reference (required, bounded).
pub fn validate_editor(editor: &str) -> Result<(), CoreError> {
    validate_reference("editor", editor)
}

fn validate_reference(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("'{field}' is required")));
    }
    if value.len() > MAX_REFERENCE_LEN {
        return Err(CoreError::Validation(format!(
            "'{field}' must be at most {MAX_REFERENCE_LEN} characters"
        )));
    }
    Ok(())
}
