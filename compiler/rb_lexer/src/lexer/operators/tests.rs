use pretty_assertions::assert_eq;
use rb_diagnostic::DiagnosticKind;

use super::*;
use crate::test_helpers::{drain, kinds, lex_error, lexer, tokens, warnings};

/// The single operator token between two integer operands.
fn binary(op: &str) -> TokenKind {
    let source = format!("1 {op} 2");
    match kinds(&source).as_slice() {
        [TokenKind::Integer, kind, TokenKind::Integer] => *kind,
        other => panic!("{source:?} lexed as {other:?}"),
    }
}

// === Binary operators ===

#[test]
fn binary_operators_after_an_operand() {
    let table = [
        ("==", TokenKind::Eq),
        ("===", TokenKind::Eqq),
        ("!=", TokenKind::Neq),
        ("=~", TokenKind::Match),
        ("!~", TokenKind::NMatch),
        ("<=>", TokenKind::Cmp),
        ("<=", TokenKind::Leq),
        (">=", TokenKind::Geq),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
        ("<<", TokenKind::LShift),
        (">>", TokenKind::RShift),
        ("&&", TokenKind::AndOp),
        ("||", TokenKind::OrOp),
        ("**", TokenKind::Pow),
        ("*", TokenKind::Star2),
        ("/", TokenKind::Divide),
        ("%", TokenKind::Percent),
        ("&", TokenKind::Amper2),
        ("|", TokenKind::Pipe),
        ("^", TokenKind::Caret),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("..", TokenKind::Dot2),
        ("...", TokenKind::Dot3),
        ("=>", TokenKind::Assoc),
    ];
    for (op, expected) in table {
        assert_eq!(binary(op), expected, "{op}");
    }
}

#[test]
fn operator_assignment_carries_the_operator() {
    let table = [
        "+", "-", "*", "/", "%", "**", "&", "|", "^", "&&", "||", "<<", ">>",
    ];
    for op in table {
        let source = format!("a {op}= 1");
        let tokens = tokens(&source);
        assert_eq!(tokens.len(), 3, "{source}");
        assert_eq!(tokens[1].0, TokenKind::OpAsgn, "{source}");
        assert_eq!(tokens[1].1, TokenValue::Op(op), "{source}");
    }
}

#[test]
fn plain_assignment() {
    assert_eq!(
        kinds("a = 1"),
        [TokenKind::Identifier, TokenKind::Punct(b'='), TokenKind::Integer]
    );
}

// === Unary and prefix forms ===

#[test]
fn unary_minus_before_a_number() {
    assert_eq!(kinds("-1"), [TokenKind::UMinusNum, TokenKind::Integer]);
    assert_eq!(kinds("-a"), [TokenKind::UMinus, TokenKind::Identifier]);
}

#[test]
fn unary_plus_is_folded_into_the_number() {
    assert_eq!(kinds("+1"), [TokenKind::Integer]);
    assert_eq!(kinds("+a"), [TokenKind::UPlus, TokenKind::Identifier]);
}

#[test]
fn command_argument_minus_is_ambiguous() {
    assert_eq!(
        kinds("foo -1"),
        [TokenKind::Identifier, TokenKind::UMinusNum, TokenKind::Integer]
    );
    let diagnostics = warnings("foo -1");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::AmbiguousArgument);
    assert_eq!(diagnostics[0].message, "Ambiguous first argument; make sure.");
}

#[test]
fn ambiguous_prefixes_warn_by_default() {
    let table = [
        ("foo *b", TokenKind::Star, "`*' interpreted as argument prefix"),
        ("foo **b", TokenKind::DStar, "`**' interpreted as argument prefix"),
        ("foo &b", TokenKind::Amper, "`&' interpreted as argument prefix"),
    ];
    for (source, kind, message) in table {
        assert_eq!(kinds(source)[1], kind, "{source}");
        let diagnostics = warnings(source);
        assert_eq!(diagnostics.len(), 1, "{source}");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::AmbiguousOperator, "{source}");
        assert_eq!(diagnostics[0].message, message, "{source}");
    }
    assert_eq!(warnings("foo -1").len(), 1);
    assert!(warnings("foo * b").is_empty());
    assert!(warnings("foo(*b)").is_empty());
}

#[test]
fn minus_after_local_is_binary_with_warning() {
    let mut lexer = lexer("a -1");
    lexer.declare_local(b"a");
    let tokens = drain(&mut lexer);
    assert_eq!(tokens[1].0, TokenKind::Minus);
    let (_, diagnostics) = lexer.into_parts();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "`-' after local variable or literal is interpreted as binary operator \
         even though it seems like unary operator"
    );
}

#[test]
fn double_splat_and_block_pass() {
    assert_eq!(
        kinds("foo **opts"),
        [TokenKind::Identifier, TokenKind::DStar, TokenKind::Identifier]
    );
    assert_eq!(
        kinds("foo &blk"),
        [TokenKind::Identifier, TokenKind::Amper, TokenKind::Identifier]
    );
    assert_eq!(kinds("*a"), [TokenKind::Star, TokenKind::Identifier]);
}

#[test]
fn operator_method_names() {
    assert_eq!(kinds("def +@"), [TokenKind::KwDef, TokenKind::UPlus]);
    assert_eq!(kinds("def -@"), [TokenKind::KwDef, TokenKind::UMinus]);
    assert_eq!(kinds("def []="), [TokenKind::KwDef, TokenKind::Aset]);
    assert_eq!(kinds("def []"), [TokenKind::KwDef, TokenKind::Aref]);
    assert_eq!(kinds("def ~"), [TokenKind::KwDef, TokenKind::Tilde]);
}

#[test]
fn index_method_name_keeps_paren_nest() {
    let mut lexer = lexer("def [](i)");
    let tokens = drain(&mut lexer);
    assert_eq!(tokens[1].0, TokenKind::Aref);
    assert_eq!(lexer.paren_nest(), 0);
}

// === Brackets ===

#[test]
fn parenthesis_forms() {
    assert_eq!(kinds("(1)")[0], TokenKind::LParen);
    assert_eq!(kinds("foo (1)")[1], TokenKind::LParenArg);
    assert_eq!(kinds("foo(1)")[1], TokenKind::LParen2);
}

#[test]
fn bracket_forms() {
    assert_eq!(
        kinds("[1, 2]"),
        [
            TokenKind::LBrack,
            TokenKind::Integer,
            TokenKind::Punct(b','),
            TokenKind::Integer,
            TokenKind::RBrack
        ]
    );
    assert_eq!(kinds("foo[0]")[1], TokenKind::Punct(b'['));
    assert_eq!(kinds("foo [0]")[1], TokenKind::LBrack);
}

#[test]
fn brace_forms() {
    assert_eq!(kinds("{}"), [TokenKind::LBrace, TokenKind::RCurly]);
    assert_eq!(
        kinds("foo {}"),
        [TokenKind::Identifier, TokenKind::LCurly, TokenKind::RCurly]
    );
}

#[test]
fn stray_close_brace_ends_an_embedded_expression() {
    assert_eq!(kinds("}"), [TokenKind::StringDEnd]);
}

#[test]
fn lambda_body_brace() {
    let mut lexer = lexer("->{ 1 }");
    assert_eq!(lexer.next_token().map(|t| t.0).ok(), Some(TokenKind::Lambda));
    lexer.set_paren_nest(lexer.paren_nest() + 1);
    lexer.set_left_paren_begin(lexer.paren_nest());
    assert_eq!(lexer.next_token().map(|t| t.0).ok(), Some(TokenKind::LamBeg));
    assert_eq!(lexer.paren_nest(), 0);
    assert_eq!(lexer.left_paren_begin(), 0);
}

// === Colons, dots and slashes ===

#[test]
fn scope_operators() {
    assert_eq!(
        kinds("a::B"),
        [TokenKind::Identifier, TokenKind::Colon2, TokenKind::Constant]
    );
    assert_eq!(kinds("::B"), [TokenKind::Colon3, TokenKind::Constant]);
}

#[test]
fn symbol_openers() {
    assert_eq!(kinds(":foo"), [TokenKind::SymBeg, TokenKind::Identifier]);
    assert_eq!(
        kinds(":\"foo\""),
        [TokenKind::SymBeg, TokenKind::StringContent, TokenKind::StringEnd]
    );
}

#[test]
fn ternary_colon() {
    assert_eq!(
        kinds("a ? b : c"),
        [
            TokenKind::Identifier,
            TokenKind::Punct(b'?'),
            TokenKind::Identifier,
            TokenKind::Punct(b':'),
            TokenKind::Identifier
        ]
    );
}

#[test]
fn leading_dot_float_is_rejected() {
    let err = lex_error(".5");
    assert_eq!(err.kind(), DiagnosticKind::LeadingDotFloat);
    assert_eq!(
        err.message(),
        "no .<digit> floating literal anymore; put 0 before dot"
    );
}

#[test]
fn method_call_dots() {
    assert_eq!(
        kinds("a.b"),
        [TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier]
    );
    assert_eq!(
        kinds("a&.b"),
        [TokenKind::Identifier, TokenKind::AndDot, TokenKind::Identifier]
    );
}

#[test]
fn slash_in_command_argument_opens_regexp() {
    assert_eq!(
        kinds("foo /re/"),
        [
            TokenKind::Identifier,
            TokenKind::RegexpBeg,
            TokenKind::StringContent,
            TokenKind::RegexpEnd
        ]
    );
    assert_eq!(
        warnings("foo /re/")[0].kind,
        DiagnosticKind::AmbiguousArgument
    );
}

// === Percent literals ===

#[test]
fn percent_literal_openers() {
    let table = [
        ("%(a)", TokenKind::StringBeg),
        ("%q(a)", TokenKind::StringBeg),
        ("%Q(a)", TokenKind::StringBeg),
        ("%x(a)", TokenKind::XStringBeg),
        ("%r(a)", TokenKind::RegexpBeg),
        ("%s(a)", TokenKind::SymBeg),
        ("%w(a)", TokenKind::QWordsBeg),
        ("%W(a)", TokenKind::WordsBeg),
        ("%i(a)", TokenKind::QSymbolsBeg),
        ("%I(a)", TokenKind::SymbolsBeg),
    ];
    for (source, expected) in table {
        assert_eq!(kinds(source)[0], expected, "{source}");
    }
}

#[test]
fn unknown_percent_literal() {
    let err = lex_error("%z[a]");
    assert_eq!(err.kind(), DiagnosticKind::UnknownPercentLiteral);
    assert_eq!(err.message(), "unknown type of %string");
}

#[test]
fn percent_at_end_of_input() {
    let err = lex_error("%");
    assert_eq!(err.kind(), DiagnosticKind::UnterminatedQuotedString);
}

#[test]
fn backtick_as_method_name() {
    let mut lexer = lexer("`");
    lexer.set_state(LexState::FNAME);
    assert_eq!(lexer.next_token().map(|t| t.0).ok(), Some(TokenKind::BackRef2));
}
