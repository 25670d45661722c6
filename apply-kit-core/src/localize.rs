//! Language resolution: merges the sub-mapping named by `language` into the
//! top level and derives the document language used by the LaTeX templates.

use serde_yaml::{Mapping, Value};
use tracing::{debug, error, info, warn};

use crate::config::ConfigDocument;
use crate::data::{scalar_to_string, ApplicationData, DEFAULT_LANGUAGE, TYPED_KEYS};

/// Supported language codes and their babel names.
pub const SUPPORTED_LANGUAGES: [(&str, &str); 2] = [("en", "english"), ("de", "ngerman")];

pub fn doc_lang_for(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(lang, _)| *lang == code)
        .map(|(_, doc_lang)| *doc_lang)
}

/// Builds [`ApplicationData`] from the raw configuration.
///
/// Keys of the language sub-mapping override top-level keys of the same
/// name. An unsupported language is logged and leaves `doc_lang` unset.
pub fn resolve(mut doc: ConfigDocument) -> ApplicationData {
    let language = doc
        .get("language")
        .and_then(scalar_to_string)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    match doc.get(language.as_str()).cloned() {
        Some(Value::Mapping(overrides)) => {
            debug!(language = %language, keys = overrides.len(), "[LANG] Merging language sub-mapping");
            for (key, value) in overrides {
                doc.insert(key, value);
            }
        }
        Some(other) => {
            warn!(language = %language, found = ?other, "[LANG][WARN] Language section is not a mapping, ignoring it");
        }
        None => {
            debug!(language = %language, "[LANG] No language sub-mapping present");
        }
    }

    let doc_lang = doc_lang_for(&language).map(str::to_string);
    match &doc_lang {
        Some(doc_lang) => info!(language = %language, doc_lang = %doc_lang, "[LANG] Language resolved"),
        None => {
            let supported: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|(code, _)| *code).collect();
            error!(
                language = %language,
                ?supported,
                "[LANG][ERROR] No valid language set, only de/en are available"
            );
        }
    }

    let company = doc.get("company").and_then(scalar_to_string);
    let job_title = doc.get("job_title").and_then(scalar_to_string);
    let attachments = requested_attachments(&doc);

    let mut extra = Mapping::new();
    for (key, value) in doc {
        let typed = key.as_str().map(|k| TYPED_KEYS.contains(&k)).unwrap_or(false);
        if !typed {
            extra.insert(key, value);
        }
    }

    ApplicationData {
        extra,
        language: language.clone(),
        company,
        job_title,
        attachments,
        lang: language,
        doc_lang,
        content: String::new(),
    }
}

fn requested_attachments(doc: &Mapping) -> Vec<String> {
    match doc.get("attachments") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| {
                let name = scalar_to_string(item);
                if name.is_none() {
                    warn!(item = ?item, "[LANG][WARN] Ignoring non-text attachment entry");
                }
                name
            })
            .collect(),
        Some(other) => {
            warn!(found = ?other, "[LANG][WARN] `attachments` is not a list, ignoring it");
            Vec::new()
        }
    }
}
