#![allow(unused)]

//! # contract: seams to the two external collaborators
//!
//! Rendering and compiling are delegated to outside engines. This module
//! defines the traits the pipeline talks to, plus their error types:
//!
//! - [`Renderer`]: template name + [`ApplicationData`] in, typeset source out.
//! - [`Compiler`]: source file in, artifact next to it (or diagnostics) out.
//!
//! The default implementations live in [`crate::render`] and
//! [`crate::compile`]. Both traits are annotated for `mockall` so the
//! pipeline can be tested without a TeX installation.

use async_trait::async_trait;
use mockall::{automock, predicate::*};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::ApplicationData;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {0} not found")]
    NotFound(String),

    #[error("failed to render template {template}: {message}")]
    Engine { template: String, message: String },

    #[error("failed to write rendered output {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to launch compiler {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compiler exited with {status}:\n{diagnostics}")]
    Failed { status: String, diagnostics: String },
}

/// Turns a named template and the application data into document source.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, data: &ApplicationData) -> Result<String, RenderError>;
}

/// Compiles a source file into its artifact inside `workdir`.
///
/// Implementors block until the compiler process has exited; success means a
/// zero exit status.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, source: &Path, workdir: &Path) -> Result<(), CompileError>;
}
