use crate::error::CoreError;

/// Version ids are UUIDv7 so they sort roughly by creation time.
pub type VersionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse a version id taken from a path or query parameter.
pub fn parse_version_id(raw: &str) -> Result<VersionId, CoreError> {
    uuid::Uuid::parse_str(raw.trim())
        .map_err(|_| CoreError::Validation(format!("Invalid version id '{raw}'")))
}

/// Allocate a fresh version id.
pub fn new_version_id() -> VersionId {
    uuid::Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_valid_uuid() {
        let id = new_version_id();
        assert_eq!(parse_version_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_id() {
        assert_matches!(
            parse_version_id("not-a-uuid"),
            Err(CoreError::Validation(msg)) if msg.contains("not-a-uuid")
        );
    }
}
