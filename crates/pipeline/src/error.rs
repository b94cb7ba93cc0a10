use lawiki_clients::ServiceError;
use lawiki_core::error::CoreError;
use lawiki_db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A collaborator call failed; the pipeline stopped at that step.
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Nothing to translate: content is already in '{lang}'")]
    SameLanguage { lang: String },
}

impl PipelineError {
    pub(crate) fn version_not_found(id: impl std::fmt::Display) -> Self {
        Self::Core(CoreError::not_found("Version", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_language_message_names_the_language() {
        let err = PipelineError::SameLanguage { lang: "en".into() };
        assert_eq!(err.to_string(), "Nothing to translate: content is already in 'en'");
    }

    #[test]
    fn core_errors_display_unchanged() {
        let err = PipelineError::version_not_found("v1");
        assert_eq!(err.to_string(), "Entity not found: Version with id v1");
    }
}
