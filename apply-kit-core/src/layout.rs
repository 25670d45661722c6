//! Fixed on-disk layout of an application workspace.
//!
//! Every path the tool reads or writes is derived from one base directory:
//!
//! ```text
//! <base>/
//!   config.yaml
//!   application_text.txt
//!   application_history.csv
//!   attachments/
//!   templates/        *.tex.j2 in, *.tex and *.pdf out
//!   applications/     one archive folder per application
//! ```

use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const CONTENT_FILE_NAME: &str = "application_text.txt";
pub const HISTORY_FILE_NAME: &str = "application_history.csv";
pub const TEMPLATE_DIR_NAME: &str = "templates";
pub const ATTACHMENT_DIR_NAME: &str = "attachments";
pub const APPLICATION_DIR_NAME: &str = "applications";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub base_dir: PathBuf,
    pub template_dir: PathBuf,
    pub attachment_dir: PathBuf,
    pub application_dir: PathBuf,
    pub config_file: PathBuf,
    pub content_file: PathBuf,
    pub history_file: PathBuf,
}

impl Layout {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let layout = Self {
            template_dir: base_dir.join(TEMPLATE_DIR_NAME),
            attachment_dir: base_dir.join(ATTACHMENT_DIR_NAME),
            application_dir: base_dir.join(APPLICATION_DIR_NAME),
            config_file: base_dir.join(CONFIG_FILE_NAME),
            content_file: base_dir.join(CONTENT_FILE_NAME),
            history_file: base_dir.join(HISTORY_FILE_NAME),
            base_dir,
        };
        debug!(?layout, "Resolved workspace layout");
        layout
    }
}
