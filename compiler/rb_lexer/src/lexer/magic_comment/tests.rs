use pretty_assertions::assert_eq;

use super::*;
use crate::config::LexerConfig;
use crate::test_helpers::{
    drain, lex_error, lexer, lexer_with, verbose, warnings, warnings_with, TestLexer,
};

/// Lex all of `source` and hand back the lexer for inspection.
fn lexed(source: &str) -> TestLexer<'_> {
    let mut lexer = lexer(source);
    drain(&mut lexer);
    lexer
}

// === Key matching ===

#[test]
fn keys_ignore_case_and_dashes() {
    assert_eq!(
        MagicKey::lookup(b"Frozen-String-Literal"),
        Some(MagicKey::FrozenStringLiteral)
    );
    assert_eq!(MagicKey::lookup(b"encoding"), Some(MagicKey::Coding));
    assert_eq!(MagicKey::lookup(b"CODING"), Some(MagicKey::Coding));
    assert_eq!(MagicKey::lookup(b"warn-past-scope"), Some(MagicKey::WarnPastScope));
    assert_eq!(MagicKey::lookup(b"fileencoding"), None);
}

#[test]
fn line_ending_suffixes() {
    assert_eq!(strip_eol_suffix(b"utf-8-unix"), b"utf-8");
    assert_eq!(strip_eol_suffix(b"euc-jp-DOS"), b"euc-jp");
    assert_eq!(strip_eol_suffix(b"-mac"), b"-mac");
    assert_eq!(strip_eol_suffix(b"utf-8"), b"utf-8");
}

#[test]
fn case_insensitive_search() {
    assert_eq!(find_ignore_case(b"file-Encoding", b"coding"), Some(7));
    assert_eq!(find_ignore_case(b"cod", b"coding"), None);
}

// === frozen_string_literal and warning switches ===

#[test]
fn frozen_string_literal_forms() {
    let table = [
        ("# frozen_string_literal: true\n", Some(true)),
        ("# frozen_string_literal: FALSE\n", Some(false)),
        ("# -*- frozen_string_literal: true -*-\n", Some(true)),
        ("# -*- coding: utf-8; frozen-string-literal: true -*-\n", Some(true)),
        ("  # frozen_string_literal: true\n", Some(true)),
        ("# frozen_string_literal: true; x\n", None),
        ("# frozen_string_literal\n", None),
    ];
    for (source, expected) in table {
        assert_eq!(lexed(source).frozen_string_literal(), expected, "{source:?}");
    }
}

#[test]
fn frozen_string_literal_from_config() {
    let config = LexerConfig::default().with_frozen_string_literal(Some(true));
    let mut lexer = lexer_with("# frozen_string_literal: false\n", config);
    drain(&mut lexer);
    assert_eq!(lexer.frozen_string_literal(), Some(false));
}

#[test]
fn invalid_boolean_value_warns() {
    let diagnostics = warnings("# frozen_string_literal: maybe\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::InvalidMagicCommentValue);
    assert_eq!(
        diagnostics[0].message,
        "invalid value for frozen_string_literal: maybe"
    );
}

#[test]
fn frozen_string_literal_after_tokens_is_ignored() {
    let source = "foo\n# frozen_string_literal: true\n";
    assert_eq!(lexed(source).frozen_string_literal(), None);
    assert!(warnings(source).is_empty());

    let diagnostics = warnings_with(source, verbose());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::IgnoredMagicComment);
    assert_eq!(
        diagnostics[0].message,
        "`frozen_string_literal' is ignored after any tokens"
    );
}

#[test]
fn warning_switches() {
    let lexer = lexed("# warn_indent: true\n# warn_past_scope: true\n");
    assert!(lexer.warn_indent());
    assert!(lexer.warn_past_scope());
    assert!(!lexed("# warn_indent: false\n").warn_indent());
}

#[test]
fn unrelated_comments_are_ignored() {
    for source in ["# hi\n", "# todo: later\n", "# -*- ruby -*-\n", "# a: b\n"] {
        let lexer = lexed(source);
        assert_eq!(lexer.frozen_string_literal(), None, "{source:?}");
        assert_eq!(lexer.encoding(), Encoding::Utf8, "{source:?}");
        assert!(warnings(source).is_empty(), "{source:?}");
    }
}

// === Source encoding ===

#[test]
fn coding_comment_forms() {
    let table = [
        ("# coding: euc-jp\n", Encoding::EucJp),
        ("# encoding: binary\n", Encoding::Ascii8Bit),
        ("# -*- coding: Shift_JIS -*-\n", Encoding::ShiftJis),
        ("# -*- mode: ruby; coding: \"us-ascii\" -*-\n", Encoding::UsAscii),
        ("# coding: euc-jp-dos\n", Encoding::EucJp),
        ("# vim: set fileencoding=iso-8859-1 :\n", Encoding::Iso8859_1),
        ("#!/usr/bin/ruby\n# coding: euc-jp\n", Encoding::EucJp),
    ];
    for (source, expected) in table {
        assert_eq!(lexed(source).encoding(), expected, "{source:?}");
    }
}

#[test]
fn coding_comment_only_counts_at_the_top() {
    assert_eq!(lexed("foo\n# coding: euc-jp\n").encoding(), Encoding::Utf8);
    assert_eq!(lexed("\n# coding: euc-jp\n").encoding(), Encoding::Utf8);
}

#[test]
fn encoding_switch_applies_to_later_literals() {
    let mut lexer = lexer("# coding: binary\n\"\u{e9}\"");
    let tokens = drain(&mut lexer);
    let content = tokens
        .iter()
        .find_map(|(_, value)| value.str_buf())
        .map(|buf| (buf.encoding, buf.bytes.len()));
    assert_eq!(content, Some((Encoding::Ascii8Bit, 2)));
}

#[test]
fn unknown_encoding_is_fatal() {
    let err = lex_error("# coding: klingon\n");
    assert_eq!(err.kind(), DiagnosticKind::UnknownEncoding);
    assert_eq!(err.message(), "unknown encoding name: klingon");
}

#[test]
fn ascii_incompatible_encoding_is_fatal() {
    let err = lex_error("# coding: utf-16le\n");
    assert_eq!(err.kind(), DiagnosticKind::IncompatibleEncoding);
    assert_eq!(err.message(), "UTF-16LE is not ASCII compatible");
}
