//! Caret-underlined error output.
//!
//! Renders fatal errors the way the interpreter prints them:
//!
//! ```text
//! t.rb:1: unterminated string meets end of file
//! puts "abc
//!      ^~~~
//! ```

use std::io::Write;

use crate::{Diagnostic, DiagnosticSink, Severity, SyntaxError};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for [`CaretEmitter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Build the caret line: spaces up to the start column, `^`, then `~` for
/// the rest of the range.
fn caret_line(error: &SyntaxError) -> String {
    let columns = error.columns();
    // Keep tabs so the caret lines up with the source line as displayed.
    let mut line: String = error
        .line_text()
        .bytes()
        .take(columns.start)
        .map(|b| if b == b'\t' { '\t' } else { ' ' })
        .collect();
    line.push('^');
    let width = columns.end.saturating_sub(columns.start);
    for _ in 1..width {
        line.push('~');
    }
    line
}

/// Render a syntax error as message, source line and caret line.
///
/// The source and caret lines are left out when no line text is attached.
pub fn render_syntax_error(error: &SyntaxError) -> String {
    let mut out = error.to_string();
    if !error.line_text().is_empty() {
        out.push('\n');
        out.push_str(error.line_text());
        out.push('\n');
        out.push_str(&caret_line(error));
    }
    out
}

/// Writes errors and warnings to a terminal or any other writer.
///
/// As a [`DiagnosticSink`] it prints each warning the moment the lexer
/// reports it.
pub struct CaretEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> CaretEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        CaretEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    /// Print a fatal error with its source line and caret underline.
    pub fn emit_error(&mut self, error: &SyntaxError) {
        let _ = write!(self.writer, "{}: ", error.position());
        let message = error.message().to_owned();
        self.write_colored(&message, colors::BOLD);
        let _ = writeln!(self.writer);
        if !error.line_text().is_empty() {
            let _ = writeln!(self.writer, "{}", error.line_text());
            let caret = caret_line(error);
            self.write_colored(&caret, colors::ERROR);
            let _ = writeln!(self.writer);
        }
    }

    /// Print one diagnostic on a single line.
    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        let _ = write!(self.writer, "{}: ", diagnostic.position);
        match diagnostic.severity {
            Severity::Advisory => self.write_colored("warning", colors::WARNING),
            Severity::Fatal => self.write_colored("error", colors::ERROR),
        }
        let _ = writeln!(self.writer, ": {}", diagnostic.message);
    }

    pub fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for CaretEmitter<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.emit(&diagnostic);
    }
}
