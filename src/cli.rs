//! This module implements the CLI interface for apply-kit: argument parsing,
//! the async entrypoint, and mapping run outcomes to an exit status.
//!
//! All business logic (data model, rendering, compiling, archiving, history)
//! lives in the [`apply-kit-core`] crate. This module is strictly glue.
//!
//! ## How To Use
//! - From a shell: run `apply-kit` inside the application workspace, or pass
//!   `--base-dir`. No arguments are required.
//! - Programmatically: call [`run`] with a constructed [`Cli`].
//!
//! [`apply-kit-core`]: ../../apply-kit-core/

use anyhow::{Context, Result};
use apply_kit_core::archive::ExistingArtifactPolicy;
use apply_kit_core::compile::{LatexCompiler, DEFAULT_PROGRAM};
use apply_kit_core::generate::{generate, prepare_data, GenerateOptions};
use apply_kit_core::layout::Layout;
use apply_kit_core::render::TemplateRenderer;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for apply-kit: build, archive and log a job application.
#[derive(Debug, Parser)]
#[clap(
    name = "apply-kit",
    version,
    about = "Render LaTeX application documents from config.yaml, compile, archive and log them"
)]
pub struct Cli {
    /// Workspace holding config.yaml, templates/, attachments/ and the history table
    #[clap(long, env = "APPLY_KIT_BASE_DIR", default_value = ".", global = true)]
    pub base_dir: PathBuf,

    /// LaTeX engine used to compile the rendered sources
    #[clap(long, env = "APPLY_KIT_COMPILER", default_value = DEFAULT_PROGRAM, global = true)]
    pub compiler: String,

    /// Replace artifacts already present in today's archive folder instead of failing
    #[clap(long, global = true)]
    pub overwrite: bool,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render, compile, archive and log the application (default)
    Generate,
    /// Print the data passed to the templates as YAML, without building anything
    Inspect,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let layout = Layout::new(&cli.base_dir);

    match cli.command.unwrap_or(Commands::Generate) {
        Commands::Inspect => {
            let data = prepare_data(&layout)?;
            let yaml = serde_yaml::to_string(&data).context("Failed to serialise template data")?;
            print!("{yaml}");
            Ok(())
        }
        Commands::Generate => {
            let options = GenerateOptions {
                layout,
                policy: if cli.overwrite {
                    ExistingArtifactPolicy::Overwrite
                } else {
                    ExistingArtifactPolicy::Fail
                },
            };
            let renderer = TemplateRenderer::new(&options.layout.template_dir)?;
            let compiler = LatexCompiler::new(cli.compiler);
            let today = chrono::Local::now().date_naive();

            tracing::info!(command = "generate", compiler = compiler.program(), "Starting generation");
            let report = generate(&options, &renderer, &compiler, today).await?;

            if let Err(e) = &report.archive {
                tracing::error!(command = "generate", error = %e, "Archiving failed");
                anyhow::bail!("Archiving failed: {e}");
            }
            let failed = report.failed_documents();
            if !failed.is_empty() {
                tracing::warn!(command = "generate", ?failed, "Some documents did not build");
            }
            tracing::info!(command = "generate", "Generation complete");
            Ok(())
        }
    }
}
