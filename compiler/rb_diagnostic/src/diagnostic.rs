use std::fmt;

use rb_lexer_core::SourcePosition;

use crate::DiagnosticKind;

/// How a diagnostic affects scanning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The parse is aborted.
    Fatal,
    /// Recorded; scanning continues with a default interpretation.
    Advisory,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "error"),
            Severity::Advisory => write!(f, "warning"),
        }
    }
}

/// A reported problem: what, where and how bad.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub position: SourcePosition,
}

impl Diagnostic {
    /// A diagnostic with the kind's default severity.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, position: SourcePosition) -> Self {
        Diagnostic {
            severity: kind.severity(),
            kind,
            message: message.into(),
            position,
        }
    }

    /// A warning, whatever the kind's default severity.
    #[cold]
    pub fn warning(
        kind: DiagnosticKind,
        message: impl Into<String>,
        position: SourcePosition,
    ) -> Self {
        Diagnostic {
            severity: Severity::Advisory,
            kind,
            message: message.into(),
            position,
        }
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    /// Zero-based line of the diagnostic.
    #[inline]
    pub fn line(&self) -> usize {
        self.position.line()
    }
}

/// `file:line: warning: message`, as the interpreter prints it.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Advisory => write!(f, "{}: warning: {}", self.position, self.message),
            Severity::Fatal => write!(f, "{}: {}", self.position, self.message),
        }
    }
}

#[cfg(test)]
mod tests;
