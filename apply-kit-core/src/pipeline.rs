//! Render-and-compile pipeline for the four application documents.
//!
//! Each document is rendered into the template directory and then compiled
//! there. A failure in one document never stops the next one: a broken cover
//! letter template must not prevent generating the CV. A document whose
//! render failed is not compiled, since no fresh source exists for it.

use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::contract::{CompileError, Compiler, RenderError, Renderer};
use crate::data::ApplicationData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentJob {
    pub template: &'static str,
    pub output: &'static str,
}

/// Build order. `main` comes last because it embeds the other three PDFs.
pub const DOCUMENTS: [DocumentJob; 4] = [
    DocumentJob {
        template: "attachments.tex.j2",
        output: "attachments.tex",
    },
    DocumentJob {
        template: "cv.tex.j2",
        output: "cv.tex",
    },
    DocumentJob {
        template: "application_letter.tex.j2",
        output: "application_letter.tex",
    },
    DocumentJob {
        template: "main.tex.j2",
        output: "main.tex",
    },
];

#[derive(Debug)]
pub enum StepOutcome<E> {
    Done,
    Failed(E),
    Skipped,
}

impl<E> StepOutcome<E> {
    pub fn is_done(&self) -> bool {
        matches!(self, StepOutcome::Done)
    }
}

#[derive(Debug)]
pub struct DocumentReport {
    pub job: DocumentJob,
    pub render: StepOutcome<RenderError>,
    pub compile: StepOutcome<CompileError>,
}

impl DocumentReport {
    pub fn succeeded(&self) -> bool {
        self.render.is_done() && self.compile.is_done()
    }
}

/// Renders `job.template` and writes the result to `template_dir/job.output`.
pub fn render_document<R: Renderer + ?Sized>(
    renderer: &R,
    job: &DocumentJob,
    data: &ApplicationData,
    template_dir: &Path,
) -> Result<(), RenderError> {
    let text = renderer.render(job.template, data)?;
    let output_path = template_dir.join(job.output);
    fs::write(&output_path, text).map_err(|e| RenderError::Write {
        path: output_path.clone(),
        source: e,
    })?;
    info!(output = job.output, "[RENDER] Document generated");
    Ok(())
}

/// Runs every job in [`DOCUMENTS`] order, logging and recording failures.
pub async fn render_and_compile<R, C>(
    renderer: &R,
    compiler: &C,
    data: &ApplicationData,
    template_dir: &Path,
) -> Vec<DocumentReport>
where
    R: Renderer + ?Sized,
    C: Compiler + ?Sized,
{
    let mut reports = Vec::with_capacity(DOCUMENTS.len());

    for job in DOCUMENTS {
        let render = match render_document(renderer, &job, data, template_dir) {
            Ok(()) => StepOutcome::Done,
            Err(e) => {
                error!(template = job.template, error = %e, "[RENDER][ERROR] Error in rendering");
                StepOutcome::Failed(e)
            }
        };

        let compile = if render.is_done() {
            match compiler.compile(Path::new(job.output), template_dir).await {
                Ok(()) => StepOutcome::Done,
                Err(e) => {
                    match &e {
                        CompileError::Failed { status, diagnostics } => error!(
                            source = job.output,
                            status = %status,
                            "[COMPILE][ERROR] Error in compiling {}:\n{}",
                            job.output,
                            diagnostics
                        ),
                        CompileError::Launch { program, source } => error!(
                            source = job.output,
                            program = %program,
                            error = %source,
                            "[COMPILE][ERROR] Compiler could not be started"
                        ),
                    }
                    StepOutcome::Failed(e)
                }
            }
        } else {
            warn!(source = job.output, "[COMPILE][WARN] Skipping compile, no fresh source");
            StepOutcome::Skipped
        };

        reports.push(DocumentReport {
            job,
            render,
            compile,
        });
    }

    let failed = reports.iter().filter(|r| !r.succeeded()).count();
    info!(documents = reports.len(), failed, "[GENERATE] Rendering and compiling done");
    reports
}
