//! Semantic values attached to tokens.
//!
//! The grammar reads the value of the token just returned through
//! [`Lexer::value`](crate::Lexer::value); the lexer overwrites it on the
//! next call.

use std::fmt;

use bitflags::bitflags;
use rb_lexer_core::{Encoding, SourcePosition};

/// The payload of the most recent token.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TokenValue {
    #[default]
    None,
    /// Identifier, constant, variable or label name.
    Name(Vec<u8>),
    /// Spelling of an operator. For `tOP_ASGN` this is the operator
    /// without its `=`.
    Op(&'static str),
    Numeric(Numeric),
    /// Decoded string content or character literal.
    Str(StrBuf),
    /// Options of a closing regexp delimiter.
    Regexp(RegexpOptions),
    /// Where a keyword was seen.
    Position(SourcePosition),
    /// `$1`..: the group number, 0 when it is out of range.
    NthRef(usize),
    /// `$&`, `` $` ``, `$'` or `$+`.
    BackRef(u8),
}

impl TokenValue {
    pub fn name(&self) -> Option<&[u8]> {
        match self {
            TokenValue::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn str_buf(&self) -> Option<&StrBuf> {
        match self {
            TokenValue::Str(buf) => Some(buf),
            _ => None,
        }
    }

    pub fn numeric(&self) -> Option<&Numeric> {
        match self {
            TokenValue::Numeric(n) => Some(n),
            _ => None,
        }
    }
}

/// An integer literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Integer {
    Fixnum(i64),
    /// Too big for `i64`: the digits (underscores removed) and their radix.
    Bignum { digits: String, radix: u32 },
}

impl Integer {
    /// Parse `digits` in `radix`, falling back to [`Integer::Bignum`].
    pub fn parse(digits: &str, radix: u32) -> Integer {
        match i64::from_str_radix(digits, radix) {
            Ok(n) => Integer::Fixnum(n),
            Err(_) => Integer::Bignum {
                digits: digits.trim_start_matches('0').to_owned(),
                radix,
            },
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::Fixnum(n) => write!(f, "{n}"),
            Integer::Bignum { digits, radix: 10 } => f.write_str(digits),
            Integer::Bignum { digits, radix } => write!(f, "{digits} (base {radix})"),
        }
    }
}

/// A numeric literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Numeric {
    Integer(Integer),
    Float(f64),
    /// Exact `numerator/denominator`; `1.5r` is `15/10`.
    Rational {
        numerator: Integer,
        denominator: Integer,
    },
    /// `3i`, `1.5ri`: the value multiplied by `i`.
    Imaginary(Box<Numeric>),
}

/// Decoded bytes of a string literal plus the encoding they are in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StrBuf {
    pub bytes: Vec<u8>,
    pub encoding: Encoding,
}

impl StrBuf {
    pub fn new(encoding: Encoding) -> Self {
        StrBuf {
            bytes: Vec::new(),
            encoding,
        }
    }

    /// Lossy UTF-8 view, for tests and debugging output.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

bitflags! {
    /// Regexp option letters `i`, `x`, `m` and `o`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RegexpFlags: u8 {
        const IGNORECASE = 1;
        const EXTENDED = 1 << 1;
        const MULTILINE = 1 << 2;
        /// Interpolate once.
        const ONCE = 1 << 3;
    }
}

/// Everything after the closing `/` of a regexp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RegexpOptions {
    pub flags: RegexpFlags,
    /// Encoding forced by `n`, `e`, `s` or `u`. The last letter wins.
    pub kcode: Option<Encoding>,
}
