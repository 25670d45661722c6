use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info};

use crate::contract::{CompileError, Compiler};

pub const DEFAULT_PROGRAM: &str = "xelatex";
/// Diagnostic lines kept from a failed compiler run.
pub const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Runs a LaTeX engine non-interactively, stopping at the first error.
#[derive(Debug, Clone)]
pub struct LatexCompiler {
    program: String,
}

impl Default for LatexCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl LatexCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Compiler for LatexCompiler {
    async fn compile(&self, source: &Path, workdir: &Path) -> Result<(), CompileError> {
        info!(program = %self.program, source = %source.display(), "[COMPILE] Compiling");

        let output = Command::new(&self.program)
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg(source)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                error!(error = ?e, program = %self.program, "[COMPILE][ERROR] Failed to launch compiler");
                return Err(CompileError::Launch {
                    program: self.program.clone(),
                    source: e,
                });
            }
        };

        if output.status.success() {
            info!(source = %source.display(), "[COMPILE] Pdf creation successful");
            return Ok(());
        }

        let diagnostics = diagnostics(
            &String::from_utf8_lossy(&output.stderr),
            &String::from_utf8_lossy(&output.stdout),
        );
        Err(CompileError::Failed {
            status: output.status.to_string(),
            diagnostics,
        })
    }
}

/// Last lines of stderr, or of stdout when stderr is empty (TeX engines
/// report most errors on stdout).
pub fn diagnostics(stderr: &str, stdout: &str) -> String {
    let text = if !stderr.trim().is_empty() {
        stderr
    } else if !stdout.trim().is_empty() {
        stdout
    } else {
        return "Unknown LaTeX error".to_string();
    };
    tail_lines(text, DIAGNOSTIC_TAIL_LINES)
}

pub fn tail_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}
