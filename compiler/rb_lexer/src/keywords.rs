//! Reserved words.
//!
//! Each keyword carries two terminals: `id0` for statement position and
//! `id1` for modifier position (`x if y`). The two differ only for `if`,
//! `unless`, `while`, `until` and `rescue`. The lexer picks between them
//! from the current mode bits; `state` is the mode the lexer enters after
//! the keyword.
//!
//! Lookup is length-bucketed: keywords are 2-12 bytes and start with an
//! ASCII letter or `_`, so most identifiers are rejected without any
//! comparison.

use crate::state::LexState;
use crate::TokenKind;

/// A reserved word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keyword {
    pub name: &'static str,
    pub id0: TokenKind,
    pub id1: TokenKind,
    pub state: LexState,
}

const fn kw(name: &'static str, id0: TokenKind, id1: TokenKind, state: LexState) -> Keyword {
    Keyword {
        name,
        id0,
        id1,
        state,
    }
}

const fn same(name: &'static str, id: TokenKind, state: LexState) -> Keyword {
    kw(name, id, id, state)
}

const FNAME_ITEM: LexState = LexState::FNAME.union(LexState::FITEM);

static ENCODING: Keyword = same("__ENCODING__", TokenKind::KwEncoding, LexState::END);
static LINE: Keyword = same("__LINE__", TokenKind::KwLine, LexState::END);
static FILE: Keyword = same("__FILE__", TokenKind::KwFile, LexState::END);
static L_BEGIN: Keyword = same("BEGIN", TokenKind::KwLBegin, LexState::END);
static L_END: Keyword = same("END", TokenKind::KwLEnd, LexState::END);
static ALIAS: Keyword = same("alias", TokenKind::KwAlias, FNAME_ITEM);
static AND: Keyword = same("and", TokenKind::KwAnd, LexState::VALUE);
static BEGIN: Keyword = same("begin", TokenKind::KwBegin, LexState::BEG);
static BREAK: Keyword = same("break", TokenKind::KwBreak, LexState::MID);
static CASE: Keyword = same("case", TokenKind::KwCase, LexState::VALUE);
static CLASS: Keyword = same("class", TokenKind::KwClass, LexState::CLASS);
static DEF: Keyword = same("def", TokenKind::KwDef, LexState::FNAME);
static DEFINED: Keyword = same("defined?", TokenKind::KwDefined, LexState::ARG);
static DO: Keyword = same("do", TokenKind::KwDo, LexState::BEG);
static ELSE: Keyword = same("else", TokenKind::KwElse, LexState::BEG);
static ELSIF: Keyword = same("elsif", TokenKind::KwElsif, LexState::VALUE);
static END: Keyword = same("end", TokenKind::KwEnd, LexState::END);
static ENSURE: Keyword = same("ensure", TokenKind::KwEnsure, LexState::BEG);
static FALSE: Keyword = same("false", TokenKind::KwFalse, LexState::END);
static FOR: Keyword = same("for", TokenKind::KwFor, LexState::VALUE);
static IF: Keyword = kw("if", TokenKind::KwIf, TokenKind::ModIf, LexState::VALUE);
static IN: Keyword = same("in", TokenKind::KwIn, LexState::VALUE);
static MODULE: Keyword = same("module", TokenKind::KwModule, LexState::VALUE);
static NEXT: Keyword = same("next", TokenKind::KwNext, LexState::MID);
static NIL: Keyword = same("nil", TokenKind::KwNil, LexState::END);
static NOT: Keyword = same("not", TokenKind::KwNot, LexState::ARG);
static OR: Keyword = same("or", TokenKind::KwOr, LexState::VALUE);
static REDO: Keyword = same("redo", TokenKind::KwRedo, LexState::END);
static RESCUE: Keyword = kw("rescue", TokenKind::KwRescue, TokenKind::ModRescue, LexState::MID);
static RETRY: Keyword = same("retry", TokenKind::KwRetry, LexState::END);
static RETURN: Keyword = same("return", TokenKind::KwReturn, LexState::MID);
static SELF: Keyword = same("self", TokenKind::KwSelf, LexState::END);
static SUPER: Keyword = same("super", TokenKind::KwSuper, LexState::ARG);
static THEN: Keyword = same("then", TokenKind::KwThen, LexState::BEG);
static TRUE: Keyword = same("true", TokenKind::KwTrue, LexState::END);
static UNDEF: Keyword = same("undef", TokenKind::KwUndef, FNAME_ITEM);
static UNLESS: Keyword = kw("unless", TokenKind::KwUnless, TokenKind::ModUnless, LexState::VALUE);
static UNTIL: Keyword = kw("until", TokenKind::KwUntil, TokenKind::ModUntil, LexState::VALUE);
static WHEN: Keyword = same("when", TokenKind::KwWhen, LexState::VALUE);
static WHILE: Keyword = kw("while", TokenKind::KwWhile, TokenKind::ModWhile, LexState::VALUE);
static YIELD: Keyword = same("yield", TokenKind::KwYield, LexState::ARG);

/// Every reserved word, in no particular order.
pub static KEYWORDS: [&Keyword; 41] = [
    &ENCODING, &LINE, &FILE, &L_BEGIN, &L_END, &ALIAS, &AND, &BEGIN, &BREAK, &CASE, &CLASS, &DEF,
    &DEFINED, &DO, &ELSE, &ELSIF, &END, &ENSURE, &FALSE, &FOR, &IF, &IN, &MODULE, &NEXT, &NIL,
    &NOT, &OR, &REDO, &RESCUE, &RETRY, &RETURN, &SELF, &SUPER, &THEN, &TRUE, &UNDEF, &UNLESS,
    &UNTIL, &WHEN, &WHILE, &YIELD,
];

/// Look up a reserved word by its exact spelling.
#[inline]
pub fn lookup(text: &[u8]) -> Option<&'static Keyword> {
    let len = text.len();

    // Guard: all keywords are 2-12 bytes and start with a letter or `_`
    if !(2..=12).contains(&len) {
        return None;
    }
    let first = text[0];
    if !first.is_ascii_alphabetic() && first != b'_' {
        return None;
    }

    match len {
        2 => match text {
            b"do" => Some(&DO),
            b"if" => Some(&IF),
            b"in" => Some(&IN),
            b"or" => Some(&OR),
            _ => None,
        },
        3 => match text {
            b"END" => Some(&L_END),
            b"and" => Some(&AND),
            b"def" => Some(&DEF),
            b"end" => Some(&END),
            b"for" => Some(&FOR),
            b"nil" => Some(&NIL),
            b"not" => Some(&NOT),
            _ => None,
        },
        4 => match text {
            b"case" => Some(&CASE),
            b"else" => Some(&ELSE),
            b"next" => Some(&NEXT),
            b"redo" => Some(&REDO),
            b"self" => Some(&SELF),
            b"then" => Some(&THEN),
            b"true" => Some(&TRUE),
            b"when" => Some(&WHEN),
            _ => None,
        },
        5 => match text {
            b"BEGIN" => Some(&L_BEGIN),
            b"alias" => Some(&ALIAS),
            b"begin" => Some(&BEGIN),
            b"break" => Some(&BREAK),
            b"class" => Some(&CLASS),
            b"elsif" => Some(&ELSIF),
            b"false" => Some(&FALSE),
            b"retry" => Some(&RETRY),
            b"super" => Some(&SUPER),
            b"undef" => Some(&UNDEF),
            b"until" => Some(&UNTIL),
            b"while" => Some(&WHILE),
            b"yield" => Some(&YIELD),
            _ => None,
        },
        6 => match text {
            b"ensure" => Some(&ENSURE),
            b"module" => Some(&MODULE),
            b"rescue" => Some(&RESCUE),
            b"return" => Some(&RETURN),
            b"unless" => Some(&UNLESS),
            _ => None,
        },
        8 => match text {
            b"__FILE__" => Some(&FILE),
            b"__LINE__" => Some(&LINE),
            b"defined?" => Some(&DEFINED),
            _ => None,
        },
        12 => match text {
            b"__ENCODING__" => Some(&ENCODING),
            _ => None,
        },
        _ => None,
    }
}
