//! Grammar terminals produced by the lexer.

use std::fmt;

/// A grammar terminal.
///
/// Single-character punctuation that the grammar names by the character
/// itself (`=`, `,`, `;`, newline, ...) is [`TokenKind::Punct`]. Everything
/// else has a variant; [`name`](TokenKind::name) gives the conventional
/// terminal name used in grammar files and test expectations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Keywords ===
    KwClass,
    KwModule,
    KwDef,
    KwUndef,
    KwBegin,
    KwRescue,
    KwEnsure,
    KwEnd,
    KwIf,
    KwUnless,
    KwThen,
    KwElsif,
    KwElse,
    KwCase,
    KwWhen,
    KwWhile,
    KwUntil,
    KwFor,
    KwBreak,
    KwNext,
    KwRedo,
    KwRetry,
    KwIn,
    KwDo,
    /// `do` opening the body of a `while`/`until`/`for` loop.
    KwDoCond,
    /// `do` opening a block attached to a command call.
    KwDoBlock,
    /// `do` opening the body of a `->` lambda.
    KwDoLambda,
    KwReturn,
    KwYield,
    KwSuper,
    KwSelf,
    KwNil,
    KwTrue,
    KwFalse,
    KwAnd,
    KwOr,
    KwNot,
    KwAlias,
    KwDefined,
    /// `BEGIN`
    KwLBegin,
    /// `END`
    KwLEnd,
    /// `__LINE__`
    KwLine,
    /// `__FILE__`
    KwFile,
    /// `__ENCODING__`
    KwEncoding,
    // Statement-modifier forms.
    ModIf,
    ModUnless,
    ModWhile,
    ModUntil,
    ModRescue,

    // === Names ===
    Identifier,
    /// Method name ending in `!` or `?`.
    Fid,
    Gvar,
    Ivar,
    Constant,
    Cvar,
    Label,

    // === Literals ===
    Integer,
    Float,
    Rational,
    Imaginary,
    StringContent,
    Char,
    NthRef,
    BackRef,
    RegexpEnd,

    // === Operators ===
    UPlus,
    UMinus,
    /// `-` directly before a numeric literal.
    UMinusNum,
    Pow,
    Cmp,
    Eq,
    Eqq,
    Neq,
    Geq,
    Leq,
    AndOp,
    OrOp,
    Match,
    NMatch,
    Dot2,
    Dot3,
    Aref,
    Aset,
    LShift,
    RShift,
    AndDot,
    Colon2,
    Colon3,
    OpAsgn,
    Assoc,
    Plus,
    Minus,
    Star2,
    Divide,
    Percent,
    Lt,
    Gt,
    Pipe,
    Bang,
    Caret,
    Tilde,
    Amper2,
    Dot,
    /// `` ` `` as a method name.
    BackRef2,

    // === Brackets ===
    LParen,
    /// `(` after a space in argument position: `foo (1)`.
    LParenArg,
    /// `(` of a method call: `foo(1)`.
    LParen2,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    LBraceArg,
    LCurly,
    RCurly,

    // === Prefixes ===
    Star,
    DStar,
    Amper,
    Lambda,
    LamBeg,
    SymBeg,

    // === Literal delimiters ===
    StringBeg,
    XStringBeg,
    RegexpBeg,
    WordsBeg,
    QWordsBeg,
    SymbolsBeg,
    QSymbolsBeg,
    /// `#{` inside an interpolating literal.
    StringDBeg,
    /// `}` closing an interpolation.
    StringDEnd,
    /// `#` before an interpolated variable.
    StringDVar,
    StringEnd,
    /// Closing quote of a `"label":`.
    LabelEnd,

    /// Punctuation the grammar names by the character itself.
    Punct(u8),

    /// End of input.
    EndOfInput,
}

impl TokenKind {
    /// Conventional terminal name.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::KwClass => "keyword_class",
            TokenKind::KwModule => "keyword_module",
            TokenKind::KwDef => "keyword_def",
            TokenKind::KwUndef => "keyword_undef",
            TokenKind::KwBegin => "keyword_begin",
            TokenKind::KwRescue => "keyword_rescue",
            TokenKind::KwEnsure => "keyword_ensure",
            TokenKind::KwEnd => "keyword_end",
            TokenKind::KwIf => "keyword_if",
            TokenKind::KwUnless => "keyword_unless",
            TokenKind::KwThen => "keyword_then",
            TokenKind::KwElsif => "keyword_elsif",
            TokenKind::KwElse => "keyword_else",
            TokenKind::KwCase => "keyword_case",
            TokenKind::KwWhen => "keyword_when",
            TokenKind::KwWhile => "keyword_while",
            TokenKind::KwUntil => "keyword_until",
            TokenKind::KwFor => "keyword_for",
            TokenKind::KwBreak => "keyword_break",
            TokenKind::KwNext => "keyword_next",
            TokenKind::KwRedo => "keyword_redo",
            TokenKind::KwRetry => "keyword_retry",
            TokenKind::KwIn => "keyword_in",
            TokenKind::KwDo => "keyword_do",
            TokenKind::KwDoCond => "keyword_do_cond",
            TokenKind::KwDoBlock => "keyword_do_block",
            TokenKind::KwDoLambda => "keyword_do_LAMBDA",
            TokenKind::KwReturn => "keyword_return",
            TokenKind::KwYield => "keyword_yield",
            TokenKind::KwSuper => "keyword_super",
            TokenKind::KwSelf => "keyword_self",
            TokenKind::KwNil => "keyword_nil",
            TokenKind::KwTrue => "keyword_true",
            TokenKind::KwFalse => "keyword_false",
            TokenKind::KwAnd => "keyword_and",
            TokenKind::KwOr => "keyword_or",
            TokenKind::KwNot => "keyword_not",
            TokenKind::KwAlias => "keyword_alias",
            TokenKind::KwDefined => "keyword_defined",
            TokenKind::KwLBegin => "keyword_BEGIN",
            TokenKind::KwLEnd => "keyword_END",
            TokenKind::KwLine => "keyword__LINE__",
            TokenKind::KwFile => "keyword__FILE__",
            TokenKind::KwEncoding => "keyword__ENCODING__",
            TokenKind::ModIf => "modifier_if",
            TokenKind::ModUnless => "modifier_unless",
            TokenKind::ModWhile => "modifier_while",
            TokenKind::ModUntil => "modifier_until",
            TokenKind::ModRescue => "modifier_rescue",
            TokenKind::Identifier => "tIDENTIFIER",
            TokenKind::Fid => "tFID",
            TokenKind::Gvar => "tGVAR",
            TokenKind::Ivar => "tIVAR",
            TokenKind::Constant => "tCONSTANT",
            TokenKind::Cvar => "tCVAR",
            TokenKind::Label => "tLABEL",
            TokenKind::Integer => "tINTEGER",
            TokenKind::Float => "tFLOAT",
            TokenKind::Rational => "tRATIONAL",
            TokenKind::Imaginary => "tIMAGINARY",
            TokenKind::StringContent => "tSTRING_CONTENT",
            TokenKind::Char => "tCHAR",
            TokenKind::NthRef => "tNTH_REF",
            TokenKind::BackRef => "tBACK_REF",
            TokenKind::RegexpEnd => "tREGEXP_END",
            TokenKind::UPlus => "tUPLUS",
            TokenKind::UMinus => "tUMINUS",
            TokenKind::UMinusNum => "tUMINUS_NUM",
            TokenKind::Pow => "tPOW",
            TokenKind::Cmp => "tCMP",
            TokenKind::Eq => "tEQ",
            TokenKind::Eqq => "tEQQ",
            TokenKind::Neq => "tNEQ",
            TokenKind::Geq => "tGEQ",
            TokenKind::Leq => "tLEQ",
            TokenKind::AndOp => "tANDOP",
            TokenKind::OrOp => "tOROP",
            TokenKind::Match => "tMATCH",
            TokenKind::NMatch => "tNMATCH",
            TokenKind::Dot2 => "tDOT2",
            TokenKind::Dot3 => "tDOT3",
            TokenKind::Aref => "tAREF",
            TokenKind::Aset => "tASET",
            TokenKind::LShift => "tLSHFT",
            TokenKind::RShift => "tRSHFT",
            TokenKind::AndDot => "tANDDOT",
            TokenKind::Colon2 => "tCOLON2",
            TokenKind::Colon3 => "tCOLON3",
            TokenKind::OpAsgn => "tOP_ASGN",
            TokenKind::Assoc => "tASSOC",
            TokenKind::Plus => "tPLUS",
            TokenKind::Minus => "tMINUS",
            TokenKind::Star2 => "tSTAR2",
            TokenKind::Divide => "tDIVIDE",
            TokenKind::Percent => "tPERCENT",
            TokenKind::Lt => "tLT",
            TokenKind::Gt => "tGT",
            TokenKind::Pipe => "tPIPE",
            TokenKind::Bang => "tBANG",
            TokenKind::Caret => "tCARET",
            TokenKind::Tilde => "tTILDE",
            TokenKind::Amper2 => "tAMPER2",
            TokenKind::Dot => "tDOT",
            TokenKind::BackRef2 => "tBACK_REF2",
            TokenKind::LParen => "tLPAREN",
            TokenKind::LParenArg => "tLPAREN_ARG",
            TokenKind::LParen2 => "tLPAREN2",
            TokenKind::RParen => "tRPAREN",
            TokenKind::LBrack => "tLBRACK",
            TokenKind::RBrack => "tRBRACK",
            TokenKind::LBrace => "tLBRACE",
            TokenKind::LBraceArg => "tLBRACE_ARG",
            TokenKind::LCurly => "tLCURLY",
            TokenKind::RCurly => "tRCURLY",
            TokenKind::Star => "tSTAR",
            TokenKind::DStar => "tDSTAR",
            TokenKind::Amper => "tAMPER",
            TokenKind::Lambda => "tLAMBDA",
            TokenKind::LamBeg => "tLAMBEG",
            TokenKind::SymBeg => "tSYMBEG",
            TokenKind::StringBeg => "tSTRING_BEG",
            TokenKind::XStringBeg => "tXSTRING_BEG",
            TokenKind::RegexpBeg => "tREGEXP_BEG",
            TokenKind::WordsBeg => "tWORDS_BEG",
            TokenKind::QWordsBeg => "tQWORDS_BEG",
            TokenKind::SymbolsBeg => "tSYMBOLS_BEG",
            TokenKind::QSymbolsBeg => "tQSYMBOLS_BEG",
            TokenKind::StringDBeg => "tSTRING_DBEG",
            TokenKind::StringDEnd => "tSTRING_DEND",
            TokenKind::StringDVar => "tSTRING_DVAR",
            TokenKind::StringEnd => "tSTRING_END",
            TokenKind::LabelEnd => "tLABEL_END",
            TokenKind::Punct(c) => punct_name(c),
            TokenKind::EndOfInput => "$end",
        }
    }

    /// Is this one of the reserved-word terminals?
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::KwClass
                | TokenKind::KwModule
                | TokenKind::KwDef
                | TokenKind::KwUndef
                | TokenKind::KwBegin
                | TokenKind::KwRescue
                | TokenKind::KwEnsure
                | TokenKind::KwEnd
                | TokenKind::KwIf
                | TokenKind::KwUnless
                | TokenKind::KwThen
                | TokenKind::KwElsif
                | TokenKind::KwElse
                | TokenKind::KwCase
                | TokenKind::KwWhen
                | TokenKind::KwWhile
                | TokenKind::KwUntil
                | TokenKind::KwFor
                | TokenKind::KwBreak
                | TokenKind::KwNext
                | TokenKind::KwRedo
                | TokenKind::KwRetry
                | TokenKind::KwIn
                | TokenKind::KwDo
                | TokenKind::KwDoCond
                | TokenKind::KwDoBlock
                | TokenKind::KwDoLambda
                | TokenKind::KwReturn
                | TokenKind::KwYield
                | TokenKind::KwSuper
                | TokenKind::KwSelf
                | TokenKind::KwNil
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwAnd
                | TokenKind::KwOr
                | TokenKind::KwNot
                | TokenKind::KwAlias
                | TokenKind::KwDefined
                | TokenKind::KwLBegin
                | TokenKind::KwLEnd
                | TokenKind::KwLine
                | TokenKind::KwFile
                | TokenKind::KwEncoding
                | TokenKind::ModIf
                | TokenKind::ModUnless
                | TokenKind::ModWhile
                | TokenKind::ModUntil
                | TokenKind::ModRescue
        )
    }
}

fn punct_name(c: u8) -> &'static str {
    match c {
        b'\n' => "'\\n'",
        b' ' => "' '",
        b'=' => "'='",
        b';' => "';'",
        b',' => "','",
        b'?' => "'?'",
        b':' => "':'",
        b'[' => "'['",
        b'\\' => "'\\\\'",
        b'$' => "'$'",
        _ => "tPUNCT",
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
