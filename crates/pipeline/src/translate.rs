//! Per-language translation of version content.

use std::sync::Arc;

use lawiki_clients::{TranslationRequest, TranslationService};
use lawiki_core::error::CoreError;
use lawiki_core::translation::{
    existing_content_translation, fields_to_translate, is_same_language, validate_target_lang,
    FieldTranslations,
};
use lawiki_core::types::VersionId;
use lawiki_db::models::version::Version;
use lawiki_db::VersionStore;

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    /// New translations were fetched and stored.
    Translated(Version),
    /// The language was already translated; nothing was requested.
    Skipped(Version),
}

impl TranslationOutcome {
    pub fn version(&self) -> &Version {
        match self {
            Self::Translated(v) | Self::Skipped(v) => v,
        }
    }

    pub fn into_version(self) -> Version {
        match self {
            Self::Translated(v) | Self::Skipped(v) => v,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

#[derive(Clone)]
pub struct TranslationEngine {
    store: Arc<dyn VersionStore>,
    translation: Arc<dyn TranslationService>,
}

impl TranslationEngine {
    pub fn new(store: Arc<dyn VersionStore>, translation: Arc<dyn TranslationService>) -> Self {
        Self { store, translation }
    }

    /// Translate a version's content into `target_lang`.
    ///
    /// A language whose content translation already exists is returned as
    /// [`TranslationOutcome::Skipped`] without calling the backend. Only the
    /// translated language and `source_lang` are written back.
    pub async fn translate(
        &self,
        id: VersionId,
        target_lang: Option<&str>,
    ) -> Result<TranslationOutcome, PipelineError> {
        let lang = validate_target_lang(target_lang)?;

        let version = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::version_not_found(id))?;

        if existing_content_translation(&version.translated_fields, &lang).is_some() {
            tracing::info!(version_id = %id, target_lang = %lang, "Translation already present, skipping");
            return Ok(TranslationOutcome::Skipped(version));
        }

        let request = TranslationRequest {
            fields: fields_to_translate(&version.content, &version.translated_fields, &lang),
            target_lang: lang.clone(),
        };
        let response = self.translation.translate(&request).await.map_err(|e| {
            tracing::error!(version_id = %id, target_lang = %lang, error = %e, "Translation request failed");
            e
        })?;

        let detected = response.detected_source_language.trim().to_string();
        if is_same_language(&detected, &lang) {
            tracing::warn!(version_id = %id, target_lang = %lang, "Source and target language match");
            return Err(PipelineError::SameLanguage { lang });
        }

        let translated: FieldTranslations = response
            .translated_fields
            .into_iter()
            .filter(|(field, text)| request.fields.contains_key(field) && !text.is_empty())
            .collect();
        if translated.is_empty() {
            return Err(CoreError::Dependency {
                service: "translation",
                message: "response contained no translated fields".into(),
            }
            .into());
        }

        let updated = self
            .store
            .set_translation(id, &lang, &translated, &detected)
            .await?
            .ok_or_else(|| PipelineError::version_not_found(id))?;

        tracing::info!(
            version_id = %id,
            target_lang = %lang,
            source_lang = %detected,
            "Version translated",
        );
        Ok(TranslationOutcome::Translated(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness, Call};
    use assert_matches::assert_matches;
    use lawiki_core::translation::CONTENT_FIELD;

    #[tokio::test]
    async fn translates_and_records_source_language() {
        let h = harness();
        let v = h.seed("e1", "u1", &[]).await;

        let outcome = h.translator.translate(v.id, Some("en")).await.unwrap();

        assert!(!outcome.is_skipped());
        let stored = h.store.get(v.id).await.unwrap().unwrap();
        assert_eq!(
            stored.translated_fields["en"][CONTENT_FIELD],
            format!("[en] {}", v.content)
        );
        assert_eq!(stored.source_lang.as_deref(), Some("es"));
        assert_eq!(outcome.version(), &stored);
    }

    #[tokio::test]
    async fn second_request_is_skipped_with_one_backend_call() {
        let h = harness();
        let v = h.seed("e1", "u1", &[]).await;

        let first = h.translator.translate(v.id, Some("en")).await.unwrap();
        let second = h.translator.translate(v.id, Some("en")).await.unwrap();

        assert!(second.is_skipped());
        assert_eq!(
            first.version().translated_fields["en"],
            second.version().translated_fields["en"]
        );
        assert_eq!(
            h.services.calls(),
            vec![Call::Translate {
                target_lang: "en".into(),
                fields: vec![CONTENT_FIELD.into()],
            }]
        );
    }

    #[tokio::test]
    async fn language_code_case_maps_to_one_translation() {
        let h = harness();
        let v = h.seed("e1", "u1", &[]).await;

        h.translator.translate(v.id, Some("EN")).await.unwrap();
        let second = h.translator.translate(v.id, Some("en")).await.unwrap();

        assert!(second.is_skipped());
        assert_eq!(
            second.version().translated_fields.keys().collect::<Vec<_>>(),
            vec!["en"]
        );
        assert_eq!(
            h.services.calls(),
            vec![Call::Translate {
                target_lang: "en".into(),
                fields: vec![CONTENT_FIELD.into()],
            }]
        );
    }

    #[tokio::test]
    async fn other_languages_are_preserved() {
        let h = harness();
        let v = h.seed("e1", "u1", &[]).await;

        h.translator.translate(v.id, Some("en")).await.unwrap();
        let fr = h.translator.translate(v.id, Some("fr")).await.unwrap().into_version();

        assert!(fr.translated_fields.contains_key("en"));
        assert!(fr.translated_fields.contains_key("fr"));
    }

    #[tokio::test]
    async fn same_language_is_rejected_without_mutation() {
        let h = harness();
        let v = h.seed("e1", "u1", &[]).await;
        h.services.detect_as("EN");

        let err = h.translator.translate(v.id, Some("en")).await.unwrap_err();

        assert_matches!(err, PipelineError::SameLanguage { .. });
        let stored = h.store.get(v.id).await.unwrap().unwrap();
        assert!(stored.translated_fields.is_empty());
        assert_eq!(stored.source_lang, None);
    }

    #[tokio::test]
    async fn missing_target_lang_is_validation_error() {
        let h = harness();
        let v = h.seed("e1", "u1", &[]).await;

        assert_matches!(
            h.translator.translate(v.id, None).await,
            Err(PipelineError::Core(CoreError::Validation(_)))
        );
        assert!(h.services.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_version_is_not_found() {
        let h = harness();
        let err = h
            .translator
            .translate(lawiki_core::types::new_version_id(), Some("en"))
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::Core(CoreError::NotFound { .. }));
    }
}
