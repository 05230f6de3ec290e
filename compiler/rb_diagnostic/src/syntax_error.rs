//! Fatal lexer errors.

use std::ops::Range;

use rb_lexer_core::SourcePosition;

use crate::{Diagnostic, DiagnosticKind, Severity};

/// Result of any lexer operation that can hit a fatal problem.
pub type LexResult<T> = Result<T, Box<SyntaxError>>;

/// A fatal syntax error raised while scanning.
///
/// Besides the kind, position and message it keeps a copy of the
/// offending physical line and the byte columns to underline, which is
/// everything [`render_syntax_error`](crate::render_syntax_error) needs.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("{position}: {message}")]
pub struct SyntaxError {
    kind: DiagnosticKind,
    position: SourcePosition,
    line_text: String,
    message: String,
    columns: Range<usize>,
}

impl SyntaxError {
    /// Create an error with no source line attached.
    #[cold]
    pub fn new(kind: DiagnosticKind, position: SourcePosition, message: impl Into<String>) -> Self {
        SyntaxError {
            kind,
            position,
            line_text: String::new(),
            message: message.into(),
            columns: 0..0,
        }
    }

    /// Attach the offending line and the column range to underline.
    ///
    /// The range is clamped to the line.
    #[must_use]
    pub fn with_line(mut self, line: &[u8], columns: Range<usize>) -> Self {
        let len = line.len();
        let start = columns.start.min(len);
        let end = columns.end.clamp(start, len);
        self.line_text = String::from_utf8_lossy(line).into_owned();
        self.columns = start..end;
        self
    }

    #[inline]
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The physical source line the error occurred on.
    #[inline]
    pub fn line_text(&self) -> &str {
        &self.line_text
    }

    /// Byte columns of the problem within [`line_text`](Self::line_text).
    #[inline]
    pub fn columns(&self) -> Range<usize> {
        self.columns.clone()
    }

    /// The error as a plain fatal diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            severity: Severity::Fatal,
            kind: self.kind,
            message: self.message.clone(),
            position: self.position.clone(),
        }
    }
}
