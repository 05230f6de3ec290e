//! Per-lexer configuration.

use std::sync::Arc;

use rb_lexer_core::Encoding;

/// Settings fixed for the lifetime of one lexer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexerConfig {
    /// File name used in positions and diagnostics.
    pub file_name: Arc<str>,
    /// Zero-based line number of the first source line.
    pub start_line: usize,
    /// Source encoding until a magic comment says otherwise.
    pub encoding: Encoding,
    /// Emit warnings that only appear in verbose mode.
    pub verbose: bool,
    /// `false` drops every warning.
    pub warnings_enabled: bool,
    /// Initial `frozen_string_literal` setting.
    pub frozen_string_literal: Option<bool>,
    /// Bytes of the offending line kept in a syntax error.
    pub error_line_limit: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig {
            file_name: Arc::from("(string)"),
            start_line: 0,
            encoding: Encoding::Utf8,
            verbose: false,
            warnings_enabled: true,
            frozen_string_literal: None,
            error_line_limit: 256,
        }
    }
}

impl LexerConfig {
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<Arc<str>>) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use]
    pub fn with_start_line(mut self, line: usize) -> Self {
        self.start_line = line;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_warnings(mut self, enabled: bool) -> Self {
        self.warnings_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_frozen_string_literal(mut self, frozen: Option<bool>) -> Self {
        self.frozen_string_literal = frozen;
        self
    }

    #[must_use]
    pub fn with_error_line_limit(mut self, limit: usize) -> Self {
        self.error_line_limit = limit;
        self
    }
}
