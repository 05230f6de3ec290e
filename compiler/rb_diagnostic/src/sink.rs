//! Destinations for advisory diagnostics.
//!
//! The lexer reports warnings through [`DiagnosticSink::report`] and never
//! looks at them again. What happens next (collecting, limiting, logging,
//! printing) is the caller's choice of sink.

use tracing::warn;

use crate::{Diagnostic, DiagnosticKind};

/// Receives advisory diagnostics as they are produced.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collect everything.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Discard everything.
impl DiagnosticSink for () {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Forward every diagnostic to `tracing` at `WARN` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(
            kind = diagnostic.kind.as_str(),
            file = diagnostic.position.file(),
            line = diagnostic.position.line() + 1,
            "{}",
            diagnostic.message
        );
    }
}

/// Configuration for [`DiagnosticQueue`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of diagnostics kept (0 = unlimited).
    pub limit: usize,
    /// Drop a diagnostic identical in kind and line to the previous one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep everything (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            limit: 0,
            deduplicate: false,
        }
    }
}

/// A sink that limits and deduplicates before collecting.
///
/// Diagnostics over the limit are counted, not kept.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    dropped: usize,
    last: Option<(DiagnosticKind, usize)>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics not kept because the limit was reached.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the queue, ordered by line. Reports on one line keep their
    /// arrival order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by_key(Diagnostic::line);
        self.last = None;
        out
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn report(&mut self, diagnostic: Diagnostic) {
        let key = (diagnostic.kind, diagnostic.line());
        if self.config.deduplicate && self.last == Some(key) {
            return;
        }
        self.last = Some(key);
        if self.config.limit != 0 && self.diagnostics.len() >= self.config.limit {
            self.dropped += 1;
            return;
        }
        self.diagnostics.push(diagnostic);
    }
}
