//! Loads the application's YAML configuration.
//!
//! The document has no fixed schema: it is parsed into a plain YAML mapping
//! and only later shaped into [`crate::data::ApplicationData`] by the
//! localization resolver. Any failure here is fatal for the run.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Raw top-level configuration mapping as written by the user.
pub type ConfigDocument = Mapping;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0:?} not found")]
    NotFound(PathBuf),

    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config file {0:?} is empty")]
    Empty(PathBuf),

    #[error("config file {0:?} must contain a key/value mapping at the top level")]
    NotAMapping(PathBuf),
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConfigDocument, ConfigError> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "[CONFIG] Loading configuration from file");

    if !path_ref.exists() {
        error!(config_path = ?path_ref, "[CONFIG][ERROR] Config file not found");
        return Err(ConfigError::NotFound(path_ref.to_path_buf()));
    }

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "[CONFIG][ERROR] Failed to read config file");
            return Err(ConfigError::Read {
                path: path_ref.to_path_buf(),
                source: e,
            });
        }
    };

    let value: Value = match serde_yaml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "[CONFIG][ERROR] Failed to parse config YAML");
            return Err(ConfigError::Parse(e));
        }
    };

    match value {
        Value::Mapping(map) if map.is_empty() => {
            error!(config_path = ?path_ref, "[CONFIG][ERROR] Config mapping is empty");
            Err(ConfigError::Empty(path_ref.to_path_buf()))
        }
        Value::Mapping(map) => {
            info!(config_path = ?path_ref, keys = map.len(), "[CONFIG] Parsed config YAML successfully");
            Ok(map)
        }
        Value::Null => {
            error!(config_path = ?path_ref, "[CONFIG][ERROR] Config file holds no data");
            Err(ConfigError::Empty(path_ref.to_path_buf()))
        }
        other => {
            error!(config_path = ?path_ref, found = ?other, "[CONFIG][ERROR] Config top level is not a mapping");
            Err(ConfigError::NotAMapping(path_ref.to_path_buf()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load_config(dir.path().join("config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn empty_document_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        write(&path, "# only a comment\n").unwrap();
        assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Empty(_)));

        write(&path, "{}\n").unwrap();
        assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Empty(_)));
    }

    #[test]
    fn scalar_document_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        write(&path, "just a string\n").unwrap();
        assert!(matches!(load_config(&path).unwrap_err(), ConfigError::NotAMapping(_)));
    }

    #[test]
    fn invalid_yaml_reports_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        write(&path, b"not-yaml: [:::").unwrap();
        let msg = load_config(&path).unwrap_err().to_string();
        assert!(msg.contains("parse"), "Parse error expected, got: {msg}");
    }

    #[test]
    fn mapping_is_returned_as_is() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        write(&path, "company: Acme\nlanguage: en\nen:\n  greeting: Dear\n").unwrap();
        let doc = load_config(&path).unwrap();
        assert_eq!(doc.get("company").and_then(Value::as_str), Some("Acme"));
        assert!(doc.get("en").map(Value::is_mapping).unwrap_or(false));
    }
}
