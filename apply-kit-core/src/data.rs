//! The data carried through one generation run.
//!
//! [`ApplicationData`] is built once from the configuration by
//! [`crate::localize::resolve`] and then only grows: the attachment
//! validator replaces `attachments` with the filtered list and the content
//! loader fills `content`. The whole struct is exposed to templates, with
//! every field and every untyped config key as a top-level variable.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

pub const DEFAULT_LANGUAGE: &str = "de";
pub const ARCHIVE_COMPANY_FALLBACK: &str = "unknown_company";
pub const ARCHIVE_JOB_FALLBACK: &str = "job";
pub const HISTORY_FALLBACK: &str = "Unknown";
pub const MISSING_CONTENT_PLACEHOLDER: &str = "Missing application letter text.";

/// Config keys with a typed field; all other keys land in `extra`.
pub(crate) const TYPED_KEYS: [&str; 7] = [
    "language",
    "company",
    "job_title",
    "attachments",
    "lang",
    "doc_lang",
    "content",
];

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ApplicationData {
    /// Untyped config keys, passed to templates unchanged.
    #[serde(flatten)]
    pub extra: Mapping,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub attachments: Vec<String>,
    pub lang: String,
    /// Babel language name; unset when the language is not supported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_lang: Option<String>,
    pub content: String,
}

impl ApplicationData {
    /// Company as used in archive names.
    pub fn archive_company(&self) -> &str {
        self.company.as_deref().unwrap_or(ARCHIVE_COMPANY_FALLBACK)
    }

    /// Job title as used in archive names.
    pub fn archive_job(&self) -> &str {
        self.job_title.as_deref().unwrap_or(ARCHIVE_JOB_FALLBACK)
    }

    pub fn history_company(&self) -> &str {
        self.company.as_deref().unwrap_or(HISTORY_FALLBACK)
    }

    pub fn history_position(&self) -> &str {
        self.job_title.as_deref().unwrap_or(HISTORY_FALLBACK)
    }
}

/// Renders a YAML scalar as text. Sequences, mappings and null yield `None`.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
