//! # Output Configuration
//!
//! Controls how progress and results look on the terminal. Each announced
//! step and the final summary carry an emoji; when colour is off the emoji
//! is replaced with a bracketed tag such as `[REPO]`.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::io::Write;

use crate::config::Target;
use crate::phases::orchestrator::Summary;
use crate::phases::{Progress, SideEffect, Step};

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    Always,
    Never,
    #[default]
    Auto,
}

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// `Always` and `Never` are final; `Auto` looks at the environment and
    /// at whether stdout is a terminal.
    pub fn from_choice(choice: ColorChoice) -> Self {
        let use_color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_choice(ColorChoice::Auto)
    }
}

/// Returns `emoji_str` when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// First line of every run.
pub fn banner_line(config: &OutputConfig) -> String {
    format!(
        "{} Starting v{}",
        emoji(config, "🚀", "[START]"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Announcement line for `step`, if it has one.
pub fn step_line(config: &OutputConfig, step: Step) -> Option<String> {
    step.announcement()
        .map(|a| format!("{} {}", emoji(config, a.emoji, a.plain), a.message))
}

/// Lines printed after a successful bootstrap.
pub fn summary_lines(config: &OutputConfig, summary: &Summary) -> Vec<String> {
    let dashboard = match summary.target {
        Target::DenoDeploy => emoji(config, "🦕", "[DENO]"),
        Target::CloudflarePages => emoji(config, "🟠", "[PAGES]"),
    };
    vec![
        format!("{} Finished", emoji(config, "🎉", "[DONE]")),
        format!("{} {}", dashboard, summary.dashboard_url),
        format!("{} {}", emoji(config, "🐙", "[GITHUB]"), summary.repository_url),
    ]
}

/// Lines printed on failure: the error, then one cleanup hint per resource
/// left behind.
pub fn failure_lines(config: &OutputConfig, message: &str, orphaned: &[SideEffect]) -> Vec<String> {
    let mut lines = vec![format!("{} Error, {}", emoji(config, "❌", "[ERR]"), message)];
    if !orphaned.is_empty() {
        lines.push(format!(
            "{} Created before the failure, clean up by hand:",
            emoji(config, "⚠️", "[WARN]")
        ));
        lines.extend(
            orphaned
                .iter()
                .map(|effect| format!("  - {}: {}", effect, effect.undo_hint())),
        );
    }
    lines
}

/// `Progress` that prints step announcements to stdout.
pub struct ConsoleProgress {
    config: OutputConfig,
}

impl ConsoleProgress {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }
}

impl Progress for ConsoleProgress {
    fn started(&self, step: Step) {
        if let Some(line) = step_line(&self.config, step) {
            let mut stdout = std::io::stdout().lock();
            // A closed stdout must not abort the bootstrap halfway.
            let _ = writeln!(stdout, "{}", line);
        }
    }
}
