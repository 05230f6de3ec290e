use std::sync::Arc;

use rb_lexer_core::SourcePosition;

use super::{Diagnostic, Severity};
use crate::DiagnosticKind;
use pretty_assertions::assert_eq;

fn pos(line: usize) -> SourcePosition {
    SourcePosition::new(Arc::from("t.rb"), line)
}

#[test]
fn new_uses_kind_severity() {
    let fatal = Diagnostic::new(DiagnosticKind::InvalidEscape, "bad", pos(0));
    assert!(fatal.is_fatal());
    let warn = Diagnostic::new(DiagnosticKind::FloatOutOfRange, "Float 1e999 out of range.", pos(0));
    assert_eq!(warn.severity, Severity::Advisory);
}

#[test]
fn warning_constructor_is_advisory() {
    let diag = Diagnostic::warning(DiagnosticKind::InvalidNumber, "odd", pos(4));
    assert!(!diag.is_fatal());
    assert_eq!(diag.line(), 4);
}

#[test]
fn display_matches_interpreter_warning_format() {
    let diag = Diagnostic::new(
        DiagnosticKind::CarriageReturn,
        "encountered \\r in middle of line, treated as a mere space",
        pos(2),
    );
    assert_eq!(
        diag.to_string(),
        "t.rb:3: warning: encountered \\r in middle of line, treated as a mere space"
    );
}

#[test]
fn display_fatal_has_no_warning_tag() {
    let diag = Diagnostic::new(DiagnosticKind::InvalidNumber, "Illegal octal digit.", pos(0));
    assert_eq!(diag.to_string(), "t.rb:1: Illegal octal digit.");
}
