//! Workflow template rendering.
//!
//! Template repositories carry a CI workflow with placeholders such as
//! `name: {{ .Project }}`. A placeholder is an opening delimiter, an optional
//! leading dot, an identifier and a closing delimiter, with optional spaces
//! inside. Two delimiter pairs are in use by the template repositories:
//!
//! - `braces`: opens with ` {{` (leading space included) and closes with
//!   `}}`. The space keeps GitHub Actions expressions such as `${{ secrets.X }}`
//!   out of reach; it is written back in front of the substituted value.
//! - `brackets`: `[[` and `]]`.
//!
//! Rendering fails on a variable with no binding and on any opening
//! delimiter left over after substitution, so a rendered file never carries
//! template syntax into the new repository.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

/// Delimiter pair used by a workflow template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TemplateSyntax {
    /// ` {{ .Name }}`
    #[default]
    Braces,
    /// `[[ .Name ]]`
    Brackets,
}

impl TemplateSyntax {
    pub fn delimiters(self) -> Delimiters {
        match self {
            TemplateSyntax::Braces => Delimiters::new(" {{", "}}"),
            TemplateSyntax::Brackets => Delimiters::new("[[", "]]"),
        }
    }
}

/// Opening and closing delimiter of a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Whitespace the opening delimiter starts with; kept in the output.
    fn leading_whitespace(&self) -> &str {
        let trimmed = self.open.trim_start();
        &self.open[..self.open.len() - trimmed.len()]
    }

    fn pattern(&self) -> Result<Regex> {
        let pattern = format!(
            r"{}\s*\.?([A-Za-z_][A-Za-z0-9_]*)\s*{}",
            regex::escape(&self.open),
            regex::escape(&self.close)
        );
        Ok(Regex::new(&pattern)?)
    }
}

/// Render `content`, replacing every placeholder with its binding in `vars`.
pub fn render(
    content: &str,
    delimiters: &Delimiters,
    vars: &HashMap<String, String>,
) -> Result<String> {
    let pattern = delimiters.pattern()?;
    let lead = delimiters.leading_whitespace();

    let mut rendered = String::with_capacity(content.len());
    let mut last = 0;

    for captures in pattern.captures_iter(content) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        check_literal(content, last, whole.start(), delimiters)?;

        let value = vars.get(name.as_str()).ok_or_else(|| Error::Template {
            message: "undefined variable".to_string(),
            variable: Some(name.as_str().to_string()),
        })?;

        rendered.push_str(&content[last..whole.start()]);
        rendered.push_str(lead);
        rendered.push_str(value);
        last = whole.end();
    }

    check_literal(content, last, content.len(), delimiters)?;
    rendered.push_str(&content[last..]);

    Ok(rendered)
}

/// Fail if the literal text between two placeholders still opens one.
fn check_literal(content: &str, start: usize, end: usize, delimiters: &Delimiters) -> Result<()> {
    match content[start..end].find(&delimiters.open) {
        Some(offset) => {
            let line = content[..start + offset].matches('\n').count() + 1;
            Err(Error::Template {
                message: format!("unclosed or malformed placeholder on line {}", line),
                variable: None,
            })
        }
        None => Ok(()),
    }
}
