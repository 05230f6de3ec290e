use std::io;

use pretty_assertions::assert_eq;
use rb_diagnostic::DiagnosticKind;
use rb_lexer_core::{Encoding, StreamSource};

use super::*;
use crate::test_helpers::{
    drain, kinds, lex_error, lex_error_with, lexer, lexer_with, warnings, warnings_with,
};

// === Whitespace, newlines and end of input ===

#[test]
fn sentinel_bytes_end_input() {
    assert_eq!(kinds("a\0b"), [TokenKind::Identifier]);
    assert_eq!(kinds("a\x04b"), [TokenKind::Identifier]);
    assert_eq!(kinds("a\x1ab"), [TokenKind::Identifier]);
}

#[test]
fn newline_terminates_statement() {
    assert_eq!(
        kinds("a\nb"),
        [
            TokenKind::Identifier,
            TokenKind::Punct(b'\n'),
            TokenKind::Identifier
        ]
    );
}

#[test]
fn newline_after_operator_is_skipped() {
    assert_eq!(
        kinds("1 +\n2"),
        [TokenKind::Integer, TokenKind::Plus, TokenKind::Integer]
    );
}

#[test]
fn leading_dot_continues_expression() {
    let expected = [TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier];
    assert_eq!(kinds("foo\n  .bar"), expected);
    assert_eq!(
        kinds("foo\n&.bar"),
        [TokenKind::Identifier, TokenKind::AndDot, TokenKind::Identifier]
    );
}

#[test]
fn range_on_next_line_is_not_a_continuation() {
    assert_eq!(
        kinds("foo\n..bar"),
        [
            TokenKind::Identifier,
            TokenKind::Punct(b'\n'),
            TokenKind::Dot2,
            TokenKind::Identifier
        ]
    );
}

#[test]
fn backslash_newline_joins_lines() {
    assert_eq!(
        kinds("1 \\\n+ 2"),
        [TokenKind::Integer, TokenKind::Plus, TokenKind::Integer]
    );
}

#[test]
fn lone_carriage_return_warns_once() {
    let diagnostics = warnings("a\rb\r");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::CarriageReturn);
}

#[test]
fn crlf_is_a_plain_newline() {
    assert_eq!(
        kinds("a\r\nb"),
        [
            TokenKind::Identifier,
            TokenKind::Punct(b'\n'),
            TokenKind::Identifier
        ]
    );
    assert!(warnings("a\r\nb").is_empty());
}

// === Comments and document structure ===

#[test]
fn comment_ends_like_a_newline() {
    assert_eq!(
        kinds("a # note\nb"),
        [
            TokenKind::Identifier,
            TokenKind::Punct(b'\n'),
            TokenKind::Identifier
        ]
    );
}

#[test]
fn embedded_document_is_skipped() {
    assert_eq!(kinds("=begin\nignored\n=end\nfoo"), [TokenKind::Identifier]);
    assert_eq!(
        kinds("=begin x\n=end trailing\nfoo"),
        [TokenKind::Identifier]
    );
}

#[test]
fn unterminated_embedded_document() {
    let err = lex_error("=begin\nfoo\n");
    assert_eq!(err.kind(), DiagnosticKind::UnterminatedEmbeddedDocument);
    assert_eq!(err.message(), "embedded document meets end of file");
    assert_eq!(err.position().line(), 0);
}

#[test]
fn end_marker_stops_lexing() {
    let mut lexer = lexer("foo\n__END__\nbar");
    let tokens = drain(&mut lexer);
    assert_eq!(tokens.len(), 2);
    assert!(lexer.end_seen());
}

#[test]
fn end_marker_must_stand_alone() {
    let mut lexer = lexer("__END__x");
    let tokens = drain(&mut lexer);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].0, TokenKind::Identifier);
    assert!(!lexer.end_seen());
}

#[test]
fn shebang_moves_magic_comment_line() {
    let mut lexer = lexer("#!/usr/bin/env ruby\n# frozen_string_literal: true\nfoo");
    assert_eq!(drain(&mut lexer).len(), 1);
    assert!(lexer.has_shebang());
    assert_eq!(lexer.frozen_string_literal(), Some(true));
}

#[test]
fn byte_order_mark_selects_utf8() {
    let config = LexerConfig::default().with_encoding(Encoding::UsAscii);
    let mut lexer = lexer_with("\u{feff}foo", config);
    let tokens = drain(&mut lexer);
    assert_eq!(tokens.len(), 1);
    assert_eq!(lexer.encoding(), Encoding::Utf8);
}

// === Positions ===

#[test]
fn tokens_carry_their_line() {
    let mut lexer = lexer("a\n  b");
    let lines: Vec<usize> = std::iter::from_fn(|| match lexer.next_token() {
        Ok((TokenKind::EndOfInput, _)) | Err(_) => None,
        Ok((_, position)) => Some(position.line()),
    })
    .collect();
    assert_eq!(lines, [0, 0, 1]);
}

#[test]
fn start_line_offsets_positions() {
    let mut lexer = lexer_with("a", LexerConfig::default().with_start_line(9));
    let (_, position) = lexer.next_token().unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(position.line(), 9);
}

#[test]
fn token_span_covers_the_token() {
    let mut lexer = lexer("foo bar");
    assert!(lexer.next_token().is_ok());
    assert_eq!(lexer.token_span(), 0..3);
    assert!(lexer.next_token().is_ok());
    assert_eq!(lexer.token_span(), 4..7);
}

#[test]
fn syntax_error_records_line_and_text() {
    let err = lex_error("foo\n  @1");
    assert_eq!(err.position().line(), 1);
    assert_eq!(err.message(), "`@1' is not allowed as an instance variable name");
    assert_eq!(err.line_text(), "  @1");
}

#[test]
fn error_line_is_truncated() {
    let config = LexerConfig::default().with_error_line_limit(4);
    let err = lex_error_with("@1 + something", config);
    assert_eq!(err.line_text(), "@1 +");
}

#[test]
fn read_error_is_fatal() {
    struct Failing;

    impl io::Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    let mut lexer = Lexer::new(StreamSource::new(Failing), LexerConfig::default(), Vec::new());
    let err = match lexer.next_token() {
        Err(err) => err,
        Ok(token) => panic!("expected a read error, got {token:?}"),
    };
    assert_eq!(err.kind(), DiagnosticKind::Io);
    assert_eq!(err.message(), "read error: disk on fire");
}

// === Parser-facing state ===

#[test]
fn local_variable_turns_splat_into_multiply() {
    // MRI's `warn_balanced` rule: an operand on the left wins, so this is a
    // multiply that warns instead of a splat.
    let mut lexer = lexer("a *b");
    lexer.declare_local(b"a");
    let kinds: Vec<TokenKind> = drain(&mut lexer).into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        [TokenKind::Identifier, TokenKind::Star2, TokenKind::Identifier]
    );
    let (_, diagnostics) = lexer.into_parts();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::AmbiguousOperator);
}

#[test]
fn method_call_argument_splat() {
    assert_eq!(
        kinds("a *b"),
        [TokenKind::Identifier, TokenKind::Star, TokenKind::Identifier]
    );
    let diagnostics = warnings("a *b");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::AmbiguousOperator);
    assert_eq!(diagnostics[0].message, "`*' interpreted as argument prefix");
}

#[test]
fn block_scopes_see_enclosing_locals() {
    let mut lexer = lexer("");
    lexer.declare_local(b"outer");
    lexer.push_block_scope();
    lexer.declare_local(b"inner");
    assert!(lexer.is_local(b"outer"));
    assert!(lexer.is_local(b"inner"));

    lexer.push_local_scope();
    assert!(!lexer.is_local(b"outer"));
    lexer.pop_local_scope();
    lexer.pop_local_scope();
    assert!(!lexer.is_local(b"inner"));
    assert!(lexer.is_local(b"outer"));
}

#[test]
fn local_enters_end_with_label() {
    let mut lexer = lexer("x");
    lexer.declare_local(b"x");
    assert!(lexer.next_token().is_ok());
    assert_eq!(lexer.state(), LexState::END | LexState::LABEL);
}

#[test]
fn nesting_mutators_round_trip() {
    let mut lexer = lexer("");
    lexer.cond_push(true);
    assert!(lexer.cond_is_set());
    assert!(lexer.cond_pop());
    assert!(!lexer.cond_is_set());

    lexer.cmdarg_push(true);
    let saved = lexer.cmdarg_stack();
    lexer.set_cmdarg_stack(StackState::new());
    assert!(!lexer.cmdarg_is_set());
    lexer.set_cmdarg_stack(saved);
    assert!(lexer.cmdarg_is_set());

    lexer.set_paren_nest(2);
    lexer.set_left_paren_begin(2);
    lexer.set_brace_nest(1);
    lexer.set_command_start(false);
    assert_eq!(lexer.paren_nest(), 2);
    assert_eq!(lexer.left_paren_begin(), 2);
    assert_eq!(lexer.brace_nest(), 1);
    assert!(!lexer.command_start());
}

#[test]
fn context_snapshot_restores() {
    let mut lexer = lexer("");
    let saved = lexer.context();
    lexer.context_mut().in_def = true;
    assert!(lexer.context().in_def);
    lexer.restore_context(saved);
    assert_eq!(lexer.context(), LexContext::default());
}

#[test]
fn kwarg_context_keeps_newline_after_label() {
    // A label opening a command is an identifier, so the label needs a
    // command name in front of it.
    let mut lexer = lexer("foo a:\n1");
    lexer.context_mut().in_kwarg = true;
    let kinds: Vec<TokenKind> = drain(&mut lexer).into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Identifier,
            TokenKind::Label,
            TokenKind::Punct(b'\n'),
            TokenKind::Integer
        ]
    );
}

#[test]
fn newline_after_label_is_skipped_outside_kwarg() {
    assert_eq!(
        kinds("foo a:\n1"),
        [TokenKind::Identifier, TokenKind::Label, TokenKind::Integer]
    );
}

#[test]
fn reset_forgets_open_literal() {
    let mut lexer = lexer("\"abc");
    assert!(lexer.next_token().is_ok());
    assert!(lexer.str_term().is_some());
    lexer.reset();
    assert!(lexer.str_term().is_none());
    assert_eq!(lexer.state(), LexState::BEG);
    assert!(lexer.command_start());
}

#[test]
fn disabled_warnings_are_dropped() {
    let source = "# frozen_string_literal: maybe\n";
    assert_eq!(warnings(source).len(), 1);
    assert!(warnings_with(source, LexerConfig::default().with_warnings(false)).is_empty());
}
