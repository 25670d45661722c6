use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::data::{ApplicationData, MISSING_CONTENT_PLACEHOLDER};

/// Reads the cover-letter body into `data.content`.
///
/// A missing or unreadable file is not fatal: the placeholder text is used so
/// the letter still compiles and the gap is visible in the output.
pub fn load_content(data: &mut ApplicationData, content_file: &Path) {
    if !content_file.exists() {
        warn!(path = %content_file.display(), "[CONTENT][WARN] Application letter text not found");
        data.content = MISSING_CONTENT_PLACEHOLDER.to_string();
        return;
    }

    match fs::read_to_string(content_file) {
        Ok(text) => {
            info!(path = %content_file.display(), chars = text.chars().count(), "[CONTENT] Application letter text loaded");
            data.content = text;
        }
        Err(e) => {
            error!(error = ?e, path = %content_file.display(), "[CONTENT][ERROR] Failed to read application letter text");
            data.content = MISSING_CONTENT_PLACEHOLDER.to_string();
        }
    }
}
