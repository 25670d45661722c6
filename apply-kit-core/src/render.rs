//! Jinja-style rendering configured for LaTeX sources.
//!
//! LaTeX uses `{`, `}` and `%` everywhere, so the default Jinja delimiters are
//! replaced:
//!
//! | construct | delimiters   |
//! |-----------|--------------|
//! | block     | `<% ... %>`  |
//! | variable  | `<< ... >>`  |
//! | comment   | `<# ... #>`  |
//!
//! Block tags trim their trailing newline and leading indentation, nothing is
//! auto-escaped and undefined variables render as empty text.

use minijinja::syntax::SyntaxConfig;
use minijinja::{path_loader, AutoEscape, Environment, Error, ErrorKind};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::contract::{RenderError, Renderer};
use crate::data::ApplicationData;

pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Creates a renderer resolving template names inside `template_dir`.
    pub fn new(template_dir: &Path) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_loader(path_loader(template_dir.to_path_buf()));
        env.set_syntax(latex_syntax().map_err(|e| RenderError::Engine {
            template: "<syntax>".to_string(),
            message: e.to_string(),
        })?);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("regex_replace", regex_replace);
        debug!(template_dir = %template_dir.display(), "[RENDER] Template environment ready");
        Ok(Self { env })
    }
}

fn latex_syntax() -> Result<SyntaxConfig, Error> {
    SyntaxConfig::builder()
        .block_delimiters("<%", "%>")
        .variable_delimiters("<<", ">>")
        .comment_delimiters("<#", "#>")
        .build()
}

fn backslash_reference() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| Regex::new(r"\\(\d+)|\\g<(\w+)>|\\\\|\$").expect("static regex is valid"))
}

/// Rewrites a `\1` / `\g<name>` style replacement into `regex` syntax.
/// `\\` becomes a single backslash and `$` stays literal; other escapes such
/// as `\&` pass through unchanged.
fn expand_replacement(replace: &str) -> String {
    backslash_reference()
        .replace_all(replace, |caps: &Captures| {
            match caps.get(1).or_else(|| caps.get(2)) {
                Some(group) => format!("${{{}}}", group.as_str()),
                None if &caps[0] == "$" => "$$".to_string(),
                None => "\\".to_string(),
            }
        })
        .into_owned()
}

/// `<< value | regex_replace("find", "replace") >>`. Group references in the
/// replacement are written `\1` or `\g<name>`.
fn regex_replace(value: String, find: String, replace: String) -> Result<String, Error> {
    let re = Regex::new(&find).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid pattern {find:?} for regex_replace: {e}"),
        )
    })?;
    let replacement = expand_replacement(&replace);
    Ok(re.replace_all(&value, replacement.as_str()).into_owned())
}

impl Renderer for TemplateRenderer {
    fn render(&self, template: &str, data: &ApplicationData) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(template).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => RenderError::NotFound(template.to_string()),
            _ => RenderError::Engine {
                template: template.to_string(),
                message: format!("{e:#}"),
            },
        })?;
        tmpl.render(data).map_err(|e| RenderError::Engine {
            template: template.to_string(),
            message: format!("{e:#}"),
        })
    }
}
