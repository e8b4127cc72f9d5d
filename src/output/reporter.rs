//! Terminal implementation of the `ProgressReporter` port.
//!
//! On a TTY, step messages animate a single spinner line; success and
//! warning lines print above it. Without a TTY (or with `--quiet`), steps
//! degrade to plain lines so logs stay readable.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{progress, OutputContext, Styles};

/// Spinner-backed progress reporter for interactive runs.
pub struct TerminalReporter {
    pb: Option<ProgressBar>,
    styles: Styles,
    quiet: bool,
}

impl TerminalReporter {
    /// Build a reporter matching the output context's TTY and quiet state.
    #[must_use]
    pub fn new(ctx: &OutputContext) -> Self {
        Self {
            pb: ctx.show_progress().then(|| progress::spinner("")),
            styles: ctx.styles.clone(),
            quiet: ctx.quiet,
        }
    }

    /// Stop the spinner, leaving a final success line.
    pub fn finish(&self, msg: &str) {
        match &self.pb {
            Some(pb) => progress::finish_ok(pb, msg),
            None => {
                if !self.quiet {
                    println!("✓ {msg}");
                }
            }
        }
    }

    /// Stop the spinner without leaving a line behind.
    pub fn clear(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for TerminalReporter {
    fn step(&self, message: &str) {
        match &self.pb {
            Some(pb) => pb.set_message(message.to_string()),
            None => {
                if !self.quiet {
                    println!("  {message}");
                }
            }
        }
    }

    fn success(&self, message: &str) {
        let line = format!("  {} {message}", "✓".style(self.styles.success));
        match &self.pb {
            Some(pb) => pb.println(line),
            None => {
                if !self.quiet {
                    println!("{line}");
                }
            }
        }
    }

    fn warn(&self, message: &str) {
        let line = format!("  {} {message}", "⚠".style(self.styles.warning));
        match &self.pb {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }
}
