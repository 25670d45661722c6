#![doc = "apply-kit-core: core logic library for apply-kit."]

//! This crate contains the whole application-document pipeline: loading the
//! YAML configuration, resolving language sections, rendering LaTeX
//! templates, driving the external compiler, archiving the results and
//! keeping the application history.
//!
//! # Usage
//! Build a [`generate::GenerateOptions`] from a [`layout::Layout`] and call
//! [`generate::generate`] with a [`contract::Renderer`] and a
//! [`contract::Compiler`] (usually [`render::TemplateRenderer`] and
//! [`compile::LatexCompiler`]).

pub mod archive;
pub mod attachments;
pub mod compile;
pub mod config;
pub mod content;
pub mod contract;
pub mod data;
pub mod generate;
pub mod history;
pub mod layout;
pub mod localize;
pub mod pipeline;
pub mod render;
pub mod sanitize;
