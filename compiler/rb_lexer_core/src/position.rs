//! Source positions and the per-line position cache.

use std::fmt;
use std::sync::Arc;

/// A location in a source file.
///
/// `line` is zero-based. `offset` and `length`, when present, index the
/// original source bytes (before carriage-return normalization).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    file: Arc<str>,
    line: usize,
    offset: Option<usize>,
    length: Option<usize>,
}

impl SourcePosition {
    /// A position covering a whole line.
    pub fn new(file: Arc<str>, line: usize) -> Self {
        SourcePosition {
            file,
            line,
            offset: None,
            length: None,
        }
    }

    /// Attach a byte span to this position.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = Some(offset);
        self.length = Some(length);
        self
    }

    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Shared handle to the file name.
    #[inline]
    pub fn file_name(&self) -> &Arc<str> {
        &self.file
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    #[inline]
    pub fn length(&self) -> Option<usize> {
        self.length
    }
}

/// Displays as `file:line` with a one-based line, as warnings print it.
impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line + 1)
    }
}

/// Hands out token positions, reusing the previous one while the scanner
/// stays on the same line.
#[derive(Clone, Debug)]
pub struct PositionTracker {
    file: Arc<str>,
    last: Option<SourcePosition>,
}

impl PositionTracker {
    pub fn new(file: impl Into<Arc<str>>) -> Self {
        PositionTracker {
            file: file.into(),
            last: None,
        }
    }

    pub fn file(&self) -> &Arc<str> {
        &self.file
    }

    /// Position for the token being scanned.
    ///
    /// An `explicit` start captured by the scanner wins unchanged. Otherwise
    /// the last position is reused when `line` matches it and the cursor is
    /// not sitting at a line start; anything else mints a fresh position.
    pub fn current(
        &mut self,
        explicit: Option<&SourcePosition>,
        line: usize,
        at_line_start: bool,
    ) -> SourcePosition {
        if let Some(pos) = explicit {
            return pos.clone();
        }
        if let Some(last) = &self.last {
            if last.line == line && !at_line_start {
                return last.clone();
            }
        }
        let pos = SourcePosition::new(Arc::clone(&self.file), line);
        self.last = Some(pos.clone());
        pos
    }

    /// Forget the cached position.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
