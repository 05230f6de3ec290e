//! Shared harness for the lexer's unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use rb_diagnostic::{Diagnostic, SyntaxError};
use rb_lexer_core::BytesSource;

use crate::{LexerConfig, Lexer, StrBuf, TokenKind, TokenValue};

pub type TestLexer<'a> = Lexer<BytesSource<'a>, Vec<Diagnostic>>;

pub fn lexer(source: &str) -> TestLexer<'_> {
    lexer_with(source, LexerConfig::default())
}

pub fn lexer_with(source: &str, config: LexerConfig) -> TestLexer<'_> {
    Lexer::new(BytesSource::new(source.as_bytes()), config, Vec::new())
}

/// Every token up to, not including, the end of input.
pub fn drain(lexer: &mut TestLexer<'_>) -> Vec<(TokenKind, TokenValue)> {
    let mut tokens = Vec::new();
    loop {
        let (kind, _) = lexer
            .next_token()
            .unwrap_or_else(|err| panic!("unexpected syntax error: {err}"));
        if kind == TokenKind::EndOfInput {
            return tokens;
        }
        tokens.push((kind, lexer.take_value()));
    }
}

pub fn tokens(source: &str) -> Vec<(TokenKind, TokenValue)> {
    drain(&mut lexer(source))
}

pub fn kinds(source: &str) -> Vec<TokenKind> {
    tokens(source).into_iter().map(|(kind, _)| kind).collect()
}

/// The first fatal error, panicking if the source lexes cleanly.
pub fn lex_error(source: &str) -> Box<SyntaxError> {
    lex_error_with(source, LexerConfig::default())
}

pub fn lex_error_with(source: &str, config: LexerConfig) -> Box<SyntaxError> {
    let mut lexer = lexer_with(source, config);
    loop {
        match lexer.next_token() {
            Ok((TokenKind::EndOfInput, _)) => panic!("expected a syntax error for {source:?}"),
            Ok(_) => {}
            Err(err) => return err,
        }
    }
}

/// Warnings reported while lexing all of `source`.
pub fn warnings_with(source: &str, config: LexerConfig) -> Vec<Diagnostic> {
    let mut lexer = lexer_with(source, config);
    drain(&mut lexer);
    lexer.into_parts().1
}

pub fn warnings(source: &str) -> Vec<Diagnostic> {
    warnings_with(source, LexerConfig::default())
}

pub fn verbose() -> LexerConfig {
    LexerConfig::default().with_verbose(true)
}

pub fn name(value: &TokenValue) -> String {
    String::from_utf8_lossy(value.name().expect("name value")).into_owned()
}

pub fn text(value: &TokenValue) -> String {
    value.str_buf().map(StrBuf::to_string_lossy).expect("string value")
}

/// String-content chunks of `source`, in order.
pub fn contents(source: &str) -> Vec<String> {
    tokens(source)
        .iter()
        .filter(|(kind, _)| *kind == TokenKind::StringContent)
        .map(|(_, value)| text(value))
        .collect()
}
