//! Output sinks.
//!
//! The language core never writes to a stream directly; every side effect is
//! a `print` or `error` line handed to an [`Output`], in statement order.

use std::io::{self, Write};

pub trait Output {
    /// One line produced by `out` or `print`.
    fn print(&mut self, line: &str);

    /// One diagnostic line.
    fn error(&mut self, line: &str);
}

impl<O: Output + ?Sized> Output for &mut O {
    fn print(&mut self, line: &str) {
        (**self).print(line);
    }

    fn error(&mut self, line: &str) {
        (**self).error(line);
    }
}

// ── CollectOutput ─────────────────────────────────────────────────────────────

/// Records lines in memory.  Used by embedding hosts and by tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectOutput {
    pub lines: Vec<String>,
    pub errors: Vec<String>,
}

impl CollectOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Output for CollectOutput {
    fn print(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }

    fn error(&mut self, line: &str) {
        self.errors.push(line.to_owned());
    }
}

// ── StdOutput ─────────────────────────────────────────────────────────────────

/// `print` lines to stdout, `error` lines to stderr as `error: <line>`.
#[derive(Debug, Default)]
pub struct StdOutput;

impl StdOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for StdOutput {
    fn print(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        // Write failures (a closed pipe) are ignored.
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }

    fn error(&mut self, line: &str) {
        let mut err = io::stderr().lock();
        for l in line.lines() {
            let _ = writeln!(err, "error: {l}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
