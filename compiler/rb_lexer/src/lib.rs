//! Hand-written, state-driven lexer for MRI-compatible Ruby source.
//!
//! The lexer is pulled by a parser one token at a time with
//! [`Lexer::next_token`]. Ruby's grammar cannot be tokenized without
//! feedback, so the lexer exposes the mode bits ([`LexState`]), nesting
//! stacks and local-variable scopes for the parser to read and adjust
//! between tokens.
//!
//! # Quick start
//!
//! ```
//! use rb_lexer::{tokenize, LexerConfig, TokenKind};
//!
//! let (tokens, warnings) = tokenize(b"puts 1 + 2\n", LexerConfig::default())?;
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Identifier,
//!         TokenKind::Integer,
//!         TokenKind::Plus,
//!         TokenKind::Integer,
//!         TokenKind::Punct(b'\n'),
//!     ]
//! );
//! assert!(warnings.is_empty());
//! # Ok::<(), Box<rb_lexer::SyntaxError>>(())
//! ```
//!
//! # Crate layout
//!
//! - [`lexer`](Lexer): the state machine and its scanning rules
//! - [`keywords`]: the reserved-word table
//! - [`state`](LexState): mode bits and the bit stacks for `cond`/`cmdarg`
//! - [`string_term`](StrTerm): the open-literal descriptors
//! - [`token`](TokenKind) and [`value`](TokenValue): what a token is and
//!   what it carries

mod config;
pub mod keywords;
mod lexer;
mod state;
mod string_term;
mod token;
mod value;

#[cfg(test)]
mod test_helpers;

use rb_lexer_core::{BytesSource, SourcePosition};

pub use config::LexerConfig;
pub use keywords::Keyword;
pub use lexer::{LexContext, Lexer};
pub use rb_diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, LexResult, SyntaxError};
pub use state::{LexState, StackState};
pub use string_term::{
    dedent_len, dedent_string, indent_width, HeredocTerm, StrFunc, StrTerm, StringTerm,
};
pub use token::TokenKind;
pub use value::{Integer, Numeric, RegexpFlags, RegexpOptions, StrBuf, TokenValue};

/// A token together with its semantic value and where it started.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub position: SourcePosition,
}

/// Lex a whole in-memory source without a parser.
///
/// No local variables are declared, so every identifier is scanned as a
/// possible method call. The end-of-input token is not included. Returns
/// the tokens and the warnings reported along the way.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn tokenize(source: &[u8], config: LexerConfig) -> LexResult<(Vec<Token>, Vec<Diagnostic>)> {
    let mut lexer = Lexer::new(BytesSource::new(source), config, Vec::new());
    let mut tokens = Vec::new();
    loop {
        let (kind, position) = lexer.next_token()?;
        if kind == TokenKind::EndOfInput {
            break;
        }
        tokens.push(Token {
            kind,
            value: lexer.take_value(),
            position,
        });
    }
    let (_, warnings) = lexer.into_parts();
    Ok((tokens, warnings))
}
