//! High-level pipeline: orchestrates config → data → documents → archive → history.
//!
//! This module provides the top-level orchestration for one generation run.
//! The stages run strictly in order:
//!   - Load the YAML configuration and resolve the language section
//!   - Filter attachments to the files present and load the letter text
//!   - Render and compile the four documents
//!   - Move the results into the archive folder
//!   - Record the application in the history table
//!
//! # Error Handling
//! A configuration failure stops the run; it is returned as `Err`. Render and
//! compile failures are reported per document and the run goes on. An archive
//! failure ends the run before the history stage, whose outcome is then
//! [`HistoryOutcome::NotRun`]. Callers decide how outcomes map to an exit
//! status (see [`GenerationReport::archive_failed`]).
//!
//! # Navigation
//! - Main entrypoint: [`generate`]
//! - Data preparation only: [`prepare_data`]

use chrono::NaiveDate;
use tracing::{error, info};

use crate::archive::{archive_results, ArchiveError, ArchiveReport, ExistingArtifactPolicy};
use crate::attachments::validate_attachments;
use crate::config::{load_config, ConfigError};
use crate::content::load_content;
use crate::contract::{Compiler, Renderer};
use crate::data::ApplicationData;
use crate::history::{log_to_history, HistoryOutcome};
use crate::layout::Layout;
use crate::localize::resolve;
use crate::pipeline::{render_and_compile, DocumentReport};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub layout: Layout,
    pub policy: ExistingArtifactPolicy,
}

#[derive(Debug)]
pub struct GenerationReport {
    pub date: NaiveDate,
    pub data: ApplicationData,
    pub documents: Vec<DocumentReport>,
    pub archive: Result<ArchiveReport, ArchiveError>,
    pub history: HistoryOutcome,
}

impl GenerationReport {
    pub fn archive_failed(&self) -> bool {
        self.archive.is_err()
    }

    pub fn failed_documents(&self) -> Vec<&'static str> {
        self.documents
            .iter()
            .filter(|d| !d.succeeded())
            .map(|d| d.job.output)
            .collect()
    }
}

/// Builds the run's [`ApplicationData`]: config, language, attachments and
/// letter text.
pub fn prepare_data(layout: &Layout) -> Result<ApplicationData, ConfigError> {
    let doc = load_config(&layout.config_file)?;
    let mut data = resolve(doc);
    validate_attachments(&mut data, &layout.attachment_dir);
    load_content(&mut data, &layout.content_file);
    Ok(data)
}

pub async fn generate<R, C>(
    options: &GenerateOptions,
    renderer: &R,
    compiler: &C,
    date: NaiveDate,
) -> Result<GenerationReport, ConfigError>
where
    R: Renderer + ?Sized,
    C: Compiler + ?Sized,
{
    let layout = &options.layout;
    info!(base_dir = %layout.base_dir.display(), %date, "[GENERATE] Starting application generation");

    let data = match prepare_data(layout) {
        Ok(data) => data,
        Err(e) => {
            error!(error = %e, "[GENERATE][ERROR] Error loading data");
            return Err(e);
        }
    };

    let documents = render_and_compile(renderer, compiler, &data, &layout.template_dir).await;

    let archive = archive_results(&data, layout, date, options.policy);
    let history = match &archive {
        Ok(_) => log_to_history(&data, &layout.history_file, date),
        Err(e) => {
            error!(error = %e, "[GENERATE][ERROR] Archiving failed, application not recorded");
            HistoryOutcome::NotRun
        }
    };

    let report = GenerationReport {
        date,
        data,
        documents,
        archive,
        history,
    };
    info!(
        failed_documents = ?report.failed_documents(),
        archive_failed = report.archive_failed(),
        "[GENERATE] Generation finished"
    );
    Ok(report)
}
