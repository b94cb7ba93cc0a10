//! Translation merge rules.
//!
//! Translations are stored per target language, then per field:
//! `translated_fields[lang][field] = text`. A language whose `content`
//! already holds text is never sent to the (paid) translation backend again.

use std::collections::BTreeMap;

use crate::error::CoreError;

/// The only field of a version that is translated today.
pub const CONTENT_FIELD: &str = "content";

/// Longest accepted language code (covers tags such as `zh-Hant-TW`).
pub const MAX_LANG_LEN: usize = 16;

/// Field name -> translated text.
pub type FieldTranslations = BTreeMap<String, String>;

/// Language code -> field translations.
pub type TranslatedFields = BTreeMap<String, FieldTranslations>;

/// Validate a requested target language and lowercase it, so every
/// spelling of a code maps to one `translated_fields` key.
pub fn validate_target_lang(raw: Option<&str>) -> Result<String, CoreError> {
    let lang = raw.map(str::trim).unwrap_or_default();
    if lang.is_empty() {
        return Err(CoreError::Validation("Missing targetLang parameter".into()));
    }
    if lang.len() > MAX_LANG_LEN
        || !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "Invalid targetLang '{lang}'"
        )));
    }
    Ok(lang.to_ascii_lowercase())
}

/// Existing non-empty translation of `content` into `lang`, if any.
pub fn existing_content_translation<'a>(fields: &'a TranslatedFields, lang: &str) -> Option<&'a str> {
    fields
        .get(lang)
        .and_then(|f| f.get(CONTENT_FIELD))
        .map(String::as_str)
        .filter(|text| !text.is_empty())
}

/// Whether the detected source language makes the request pointless.
pub fn is_same_language(detected: &str, target: &str) -> bool {
    detected.trim().eq_ignore_ascii_case(target.trim())
}

/// Fields that must be sent to the translation backend for `lang`.
pub fn fields_to_translate(content: &str, fields: &TranslatedFields, lang: &str) -> FieldTranslations {
    let mut pending = FieldTranslations::new();
    if existing_content_translation(fields, lang).is_none() {
        pending.insert(CONTENT_FIELD.to_string(), content.to_string());
    }
    pending
}

/// Merge backend output into `fields[lang]`, leaving other languages and
/// other fields of the same language untouched. Empty texts are ignored.
pub fn merge_translations(fields: &mut TranslatedFields, lang: &str, translated: &FieldTranslations) {
    let slot = fields.entry(lang.to_string()).or_default();
    for (field, text) in translated {
        if !text.is_empty() {
            slot.insert(field.clone(), text.clone());
        }
    }
}
