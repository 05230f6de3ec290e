use pretty_assertions::assert_eq;
use rb_diagnostic::{Diagnostic, DiagnosticKind};
use rb_lexer_core::BytesSource;

use super::*;
use crate::config::LexerConfig;
use crate::test_helpers::{drain, kinds, lex_error, lexer, name, text, tokens, warnings};

// === Identifiers and constants ===

#[test]
fn identifier_and_constant() {
    let tokens = tokens("foo Bar");
    assert_eq!(tokens[0].0, TokenKind::Identifier);
    assert_eq!(name(&tokens[0].1), "foo");
    assert_eq!(tokens[1].0, TokenKind::Constant);
    assert_eq!(name(&tokens[1].1), "Bar");
}

#[test]
fn predicate_and_bang_methods() {
    let tokens = tokens("empty? save!");
    assert_eq!(tokens[0].0, TokenKind::Fid);
    assert_eq!(name(&tokens[0].1), "empty?");
    assert_eq!(tokens[1].0, TokenKind::Fid);
    assert_eq!(name(&tokens[1].1), "save!");
}

#[test]
fn bang_before_equals_is_an_operator() {
    assert_eq!(
        kinds("a!=b"),
        [TokenKind::Identifier, TokenKind::Neq, TokenKind::Identifier]
    );
}

#[test]
fn setter_method_name() {
    let tokens = tokens("def name=(v)");
    assert_eq!(tokens[1].0, TokenKind::Identifier);
    assert_eq!(name(&tokens[1].1), "name=");
    assert_eq!(tokens[2].0, TokenKind::LParen2);
}

#[test]
fn multibyte_identifier() {
    let tokens = tokens("héllo");
    assert_eq!(tokens.len(), 1);
    assert_eq!(name(&tokens[0].1), "héllo");
}

#[test]
fn invalid_multibyte_byte() {
    let mut lexer = Lexer::new(
        BytesSource::new(b"\xffa"),
        LexerConfig::default(),
        Vec::<Diagnostic>::new(),
    );
    let err = match lexer.next_token() {
        Err(err) => err,
        Ok(token) => panic!("expected an error, got {token:?}"),
    };
    assert_eq!(err.kind(), DiagnosticKind::InvalidMultibyteChar);
}

#[test]
fn control_byte_is_rejected() {
    let err = lex_error("\x01");
    assert_eq!(err.kind(), DiagnosticKind::InvalidCharacter);
    assert_eq!(err.message(), "Invalid char `\\001' ('\u{1}') in expression");
}

// === Keywords ===

#[test]
fn statement_keywords() {
    assert_eq!(
        kinds("if x then y end"),
        [
            TokenKind::KwIf,
            TokenKind::Identifier,
            TokenKind::KwThen,
            TokenKind::Identifier,
            TokenKind::KwEnd
        ]
    );
}

#[test]
fn modifier_keywords() {
    let table = [
        ("a if b", TokenKind::ModIf),
        ("a unless b", TokenKind::ModUnless),
        ("a while b", TokenKind::ModWhile),
        ("a until b", TokenKind::ModUntil),
        ("a rescue b", TokenKind::ModRescue),
    ];
    for (source, expected) in table {
        assert_eq!(kinds(source)[1], expected, "{source}");
    }
}

#[test]
fn keyword_carries_its_position() {
    let tokens = tokens("\nself");
    match &tokens[0].1 {
        TokenValue::Position(position) => assert_eq!(position.line(), 1),
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn keyword_as_method_name() {
    let tokens = tokens("def if");
    assert_eq!(tokens[1].0, TokenKind::KwIf);
    assert_eq!(name(&tokens[1].1), "if");
}

#[test]
fn keyword_after_dot_is_a_method() {
    assert_eq!(
        kinds("a.class"),
        [TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier]
    );
}

#[test]
fn do_variants() {
    assert_eq!(kinds("do"), [TokenKind::KwDoBlock]);
    assert_eq!(kinds("foo do"), [TokenKind::Identifier, TokenKind::KwDo]);

    let mut cond = lexer("x do");
    cond.declare_local(b"x");
    cond.cond_push(true);
    assert_eq!(drain(&mut cond)[1].0, TokenKind::KwDoCond);

    let mut lambda = lexer("->() do");
    let first = drain_until(&mut lambda, TokenKind::RParen);
    assert_eq!(first, TokenKind::RParen);
    lambda.set_paren_nest(1);
    lambda.set_left_paren_begin(1);
    assert_eq!(lambda.next_token().map(|t| t.0).ok(), Some(TokenKind::KwDoLambda));
    assert_eq!(lambda.paren_nest(), 0);
}

/// Step the lexer until `kind` is returned.
fn drain_until(lexer: &mut crate::test_helpers::TestLexer<'_>, kind: TokenKind) -> TokenKind {
    loop {
        match lexer.next_token() {
            Ok((found, _)) if found == kind || found == TokenKind::EndOfInput => return found,
            Ok(_) => {}
            Err(err) => panic!("{err}"),
        }
    }
}

// === Labels ===

#[test]
fn hash_label() {
    let tokens = tokens("{a: 1}");
    assert_eq!(tokens[1].0, TokenKind::Label);
    assert_eq!(name(&tokens[1].1), "a");
    assert_eq!(tokens[2].0, TokenKind::Integer);
}

#[test]
fn keyword_argument_label() {
    assert_eq!(
        kinds("foo a: 1"),
        [TokenKind::Identifier, TokenKind::Label, TokenKind::Integer]
    );
}

#[test]
fn scope_is_not_a_label() {
    assert_eq!(
        kinds("foo A::B"),
        [
            TokenKind::Identifier,
            TokenKind::Constant,
            TokenKind::Colon2,
            TokenKind::Constant
        ]
    );
}

#[test]
fn label_state() {
    let mut lexer = lexer("foo a:");
    drain(&mut lexer);
    assert_eq!(lexer.state(), LexState::ARG | LexState::LABELED);
}

// === Character literals ===

#[test]
fn character_literals() {
    let table = [("?a", "a"), ("?\\n", "\n"), ("?\\u0041", "A"), ("?é", "é")];
    for (source, expected) in table {
        let tokens = tokens(source);
        assert_eq!(tokens.len(), 1, "{source}");
        assert_eq!(tokens[0].0, TokenKind::Char, "{source}");
        assert_eq!(text(&tokens[0].1), expected, "{source}");
    }
}

#[test]
fn question_mark_before_identifier_is_ternary() {
    assert_eq!(
        kinds("?ab"),
        [TokenKind::Punct(b'?'), TokenKind::Identifier]
    );
}

#[test]
fn question_mark_before_space_warns() {
    let diagnostics = warnings("? ");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "invalid character syntax; use ?\\s");
}

#[test]
fn question_mark_at_end_of_input() {
    let err = lex_error("?");
    assert_eq!(err.kind(), DiagnosticKind::IncompleteCharacterSyntax);
}

// === Global variables ===

#[test]
fn global_variable_forms() {
    let table = [
        ("$foo", "$foo"),
        ("$_", "$_"),
        ("$_bar", "$_bar"),
        ("$~", "$~"),
        ("$-w", "$-w"),
        ("$stdout", "$stdout"),
    ];
    for (source, expected) in table {
        let tokens = tokens(source);
        assert_eq!(tokens[0].0, TokenKind::Gvar, "{source}");
        assert_eq!(name(&tokens[0].1), expected, "{source}");
    }
}

#[test]
fn match_references() {
    let tokens = tokens("$1 $&");
    assert_eq!(tokens[0], (TokenKind::NthRef, TokenValue::NthRef(1)));
    assert_eq!(tokens[1], (TokenKind::BackRef, TokenValue::BackRef(b'&')));
}

#[test]
fn match_reference_as_alias_name() {
    let mut lexer = lexer("$1");
    lexer.set_state(LexState::FNAME);
    let tokens = drain(&mut lexer);
    assert_eq!(tokens[0].0, TokenKind::Gvar);
}

#[test]
fn huge_match_reference_warns() {
    let source = "$99999999999";
    assert_eq!(tokens(source)[0].1, TokenValue::NthRef(0));
    let diagnostics = warnings(source);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::NthRefTooBig);
    assert_eq!(
        diagnostics[0].message,
        "`$99999999999' is too big for a number variable, always nil"
    );
}

#[test]
fn invalid_global_names() {
    assert_eq!(
        lex_error("$").message(),
        "`$' without identifiers is not allowed as a global variable name"
    );
    assert_eq!(
        lex_error("$%").message(),
        "`$%' is not allowed as a global variable name"
    );
}

// === Instance and class variables ===

#[test]
fn instance_and_class_variables() {
    let tokens = tokens("@a @@b");
    assert_eq!(tokens[0].0, TokenKind::Ivar);
    assert_eq!(name(&tokens[0].1), "@a");
    assert_eq!(tokens[1].0, TokenKind::Cvar);
    assert_eq!(name(&tokens[1].1), "@@b");
}

#[test]
fn invalid_instance_and_class_variables() {
    assert_eq!(
        lex_error("@").message(),
        "`@' without identifiers is not allowed as an instance variable name"
    );
    assert_eq!(
        lex_error("@@1").message(),
        "`@@1' is not allowed as a class variable name"
    );
}
