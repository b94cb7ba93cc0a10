#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A collaborator answered with a status outside the tolerated set,
    /// timed out, or could not be reached.
    #[error("Dependency failure ({service}): {message}")]
    Dependency {
        service: &'static str,
        message: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_includes_entity_and_id() {
        let err = CoreError::not_found("Version", "abc");
        assert_eq!(err.to_string(), "Entity not found: Version with id abc");
    }

    #[test]
    fn dependency_display_names_service() {
        let err = CoreError::Dependency {
            service: "media",
            message: "HTTP 500".into(),
        };
        assert_eq!(err.to_string(), "Dependency failure (media): HTTP 500");
    }
}
