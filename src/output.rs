//! # Terminal Output
//!
//! Status markers for the CLI summaries. With colour enabled the markers are
//! coloured symbols; without it they fall back to bracketed words, which keep
//! logs and CI job output readable.
//!
//! Colour follows `--color=always|never|auto`. In `auto` mode it is turned
//! off by `NO_COLOR` (any value), `CLICOLOR=0` or `TERM=dumb`, forced on by
//! `CLICOLOR_FORCE`, and otherwise left to `console`'s TTY detection.

use console::style;
use std::env;

/// Whether CLI output may use colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag against the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
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
}

/// Kind of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Ok,
    Skip,
    Warn,
}

/// The prefix for a status line.
pub fn marker(config: &OutputConfig, marker: Marker) -> String {
    let (symbol, plain) = match marker {
        Marker::Ok => ("✓", "[OK]"),
        Marker::Skip => ("·", "[SKIP]"),
        Marker::Warn => ("!", "[WARN]"),
    };
    if !config.use_color {
        return plain.to_string();
    }
    let styled = match marker {
        Marker::Ok => style(symbol).green(),
        Marker::Skip => style(symbol).dim(),
        Marker::Warn => style(symbol).yellow(),
    };
    styled.force_styling(true).to_string()
}
