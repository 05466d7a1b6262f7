//! Operator-facing report output
//!
//! Every check receives a [`Console`] carrying the run's [`Verbosity`]. All
//! report lines (banners, fixes, summaries, per-item detail) go through it,
//! so a silent run prints nothing and tests can capture output in a buffer.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Nothing is printed; the exit status is the only signal
    Silent,
    /// Check banners, failures and the summary
    #[default]
    Normal,
    /// Additionally, one line per inspected item
    Verbose,
}

impl Verbosity {
    /// Resolve the `--quiet` / `--verbose` flag pair
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Silent,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, Verbosity::Silent)
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verbosity::Silent => write!(f, "silent"),
            Verbosity::Normal => write!(f, "normal"),
            Verbosity::Verbose => write!(f, "verbose"),
        }
    }
}

/// Verbosity-gated writer for report lines
pub struct Console<'a> {
    verbosity: Verbosity,
    out: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(verbosity: Verbosity, out: &'a mut dyn Write) -> Self {
        Self { verbosity, out }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Print at normal and verbose levels
    pub fn say(&mut self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            self.emit(&message.to_string());
        }
    }

    /// Print at verbose level only
    pub fn detail(&mut self, message: impl Display) {
        if self.verbosity.is_verbose() {
            self.emit(&message.to_string());
        }
    }

    /// Print a possibly multi-line block, indenting continuation lines
    pub fn block(&mut self, message: impl Display) {
        if self.verbosity >= Verbosity::Normal {
            let text = message.to_string();
            self.emit(&indent_continuation(&text, "  "));
        }
    }

    fn emit(&mut self, line: &str) {
        // A closed stdout is not a reason to abort a repair run.
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::debug!(error = %e, "console write failed");
        }
    }
}

/// Indent every line after the first by `indent`
pub fn indent_continuation(text: &str, indent: &str) -> String {
    let mut lines = text.lines();
    let mut rendered = lines.next().unwrap_or_default().to_string();
    for line in lines {
        rendered.push('\n');
        rendered.push_str(indent);
        rendered.push_str(line);
    }
    rendered
}
