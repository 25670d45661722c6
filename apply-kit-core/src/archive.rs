//! Moves the compiled documents of one run into a dated archive folder.
//!
//! The folder is named `{date}_{company}_{job}` with company and job reduced
//! by [`shell_friendly_name`] and lowercased, e.g.
//! `2024-03-01_acme_corp_senior_eng-lead`. Creating it is idempotent; what
//! happens to artifacts already present inside it is decided by
//! [`ExistingArtifactPolicy`].
//!
//! The three document PDFs are required: the first one that is missing aborts
//! archiving, leaving files moved so far in place. The combined `main.pdf` is
//! optional and renamed to `application_{company}_{job}.pdf`.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::data::ApplicationData;
use crate::layout::{Layout, CONFIG_FILE_NAME, CONTENT_FILE_NAME};
use crate::sanitize::shell_friendly_name;

pub const REQUIRED_ARTIFACTS: [&str; 3] = ["cv.pdf", "application_letter.pdf", "attachments.pdf"];
pub const MAIN_ARTIFACT: &str = "main.pdf";

/// What to do when an artifact already exists in the archive folder, e.g.
/// after a second run for the same company and job on the same day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExistingArtifactPolicy {
    #[default]
    Fail,
    Overwrite,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to create archive folder {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compiled artifact {0:?} is missing")]
    MissingArtifact(PathBuf),

    #[error("{0:?} already exists in the archive folder")]
    DestinationExists(PathBuf),

    #[error("failed to move {from:?} to {to:?}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub folder: PathBuf,
    pub moved: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    /// Renamed combined PDF, when `main.pdf` was present.
    pub main_pdf: Option<PathBuf>,
}

fn company_token(data: &ApplicationData) -> String {
    shell_friendly_name(data.archive_company()).to_lowercase()
}

fn job_token(data: &ApplicationData) -> String {
    shell_friendly_name(data.archive_job()).to_lowercase()
}

pub fn archive_folder_name(date: NaiveDate, data: &ApplicationData) -> String {
    format!(
        "{}_{}_{}",
        date.format("%Y-%m-%d"),
        company_token(data),
        job_token(data)
    )
}

pub fn final_pdf_name(data: &ApplicationData) -> String {
    format!("application_{}_{}.pdf", company_token(data), job_token(data))
}

pub fn archive_results(
    data: &ApplicationData,
    layout: &Layout,
    date: NaiveDate,
    policy: ExistingArtifactPolicy,
) -> Result<ArchiveReport, ArchiveError> {
    let folder = layout.application_dir.join(archive_folder_name(date, data));
    fs::create_dir_all(&folder).map_err(|e| {
        error!(error = ?e, folder = %folder.display(), "[ARCHIVE][ERROR] Failed to create archive folder");
        ArchiveError::CreateDir {
            path: folder.clone(),
            source: e,
        }
    })?;
    info!(folder = %folder.display(), "[ARCHIVE] Archive folder ready");

    let mut report = ArchiveReport {
        folder: folder.clone(),
        moved: Vec::new(),
        copied: Vec::new(),
        main_pdf: None,
    };

    for name in REQUIRED_ARTIFACTS {
        let to = folder.join(name);
        move_file(&layout.template_dir.join(name), &to, policy)?;
        report.moved.push(to);
    }

    let provenance = [
        (&layout.config_file, CONFIG_FILE_NAME),
        (&layout.content_file, CONTENT_FILE_NAME),
    ];
    for (from, name) in provenance {
        let to = folder.join(name);
        match fs::copy(from, &to) {
            Ok(_) => {
                debug!(from = %from.display(), to = %to.display(), "[ARCHIVE] Copied for provenance");
                report.copied.push(to);
            }
            Err(e) => {
                warn!(error = ?e, from = %from.display(), "[ARCHIVE][WARN] Could not copy file into archive");
            }
        }
    }

    let main_src = layout.template_dir.join(MAIN_ARTIFACT);
    if main_src.exists() {
        let final_name = final_pdf_name(data);
        let to = folder.join(&final_name);
        move_file(&main_src, &to, policy)?;
        info!(final_name = %final_name, "[ARCHIVE] Main pdf moved");
        report.main_pdf = Some(to);
    }

    info!(
        folder = %folder.display(),
        moved = report.moved.len(),
        copied = report.copied.len(),
        "[ARCHIVE] Archiving done"
    );
    Ok(report)
}

/// Renames `from` to `to`, falling back to copy-and-delete when a rename is
/// not possible (e.g. across file systems).
fn move_file(from: &Path, to: &Path, policy: ExistingArtifactPolicy) -> Result<(), ArchiveError> {
    if !from.is_file() {
        error!(path = %from.display(), "[ARCHIVE][ERROR] Compiled artifact is missing");
        return Err(ArchiveError::MissingArtifact(from.to_path_buf()));
    }

    if to.exists() {
        match policy {
            ExistingArtifactPolicy::Fail => {
                error!(path = %to.display(), "[ARCHIVE][ERROR] Destination already exists");
                return Err(ArchiveError::DestinationExists(to.to_path_buf()));
            }
            ExistingArtifactPolicy::Overwrite => {
                warn!(path = %to.display(), "[ARCHIVE][WARN] Overwriting existing file");
                fs::remove_file(to).map_err(|e| move_error(from, to, e))?;
            }
        }
    }

    if let Err(rename_err) = fs::rename(from, to) {
        debug!(error = ?rename_err, "[ARCHIVE] Rename failed, copying instead");
        fs::copy(from, to).map_err(|e| move_error(from, to, e))?;
        fs::remove_file(from).map_err(|e| move_error(from, to, e))?;
    }
    debug!(from = %from.display(), to = %to.display(), "[ARCHIVE] Moved");
    Ok(())
}

fn move_error(from: &Path, to: &Path, source: std::io::Error) -> ArchiveError {
    error!(error = ?source, from = %from.display(), to = %to.display(), "[ARCHIVE][ERROR] Move failed");
    ArchiveError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}
