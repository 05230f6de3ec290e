//! Sub-lexer state for quoted constructs.
//!
//! While a string, symbol, regexp, word list or heredoc is open, the lexer
//! owns exactly one [`StrTerm`] describing it. The main loop hands control
//! to the string scanner whenever that slot is filled.

use bitflags::bitflags;

bitflags! {
    /// Behavior of an open literal.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StrFunc: u8 {
        /// Keep backslash escapes for a later pass (regexps).
        const ESCAPE = 0x01;
        /// `#{}` interpolation and escape decoding.
        const EXPAND = 0x02;
        const REGEXP = 0x04;
        /// Whitespace separates words.
        const QWORDS = 0x08;
        const SYMBOL = 0x10;
        /// `<<-` / `<<~`: the terminator may be indented.
        const INDENT = 0x20;
        /// `"foo":` may close as a label.
        const LABEL = 0x40;
    }
}

impl StrFunc {
    pub const SQUOTE: StrFunc = StrFunc::empty();
    pub const DQUOTE: StrFunc = StrFunc::EXPAND;
    pub const XQUOTE: StrFunc = StrFunc::EXPAND;
    pub const REGEXP_LIT: StrFunc = StrFunc::REGEXP.union(StrFunc::ESCAPE).union(StrFunc::EXPAND);
    pub const SWORD: StrFunc = StrFunc::QWORDS;
    pub const DWORD: StrFunc = StrFunc::QWORDS.union(StrFunc::EXPAND);
    pub const SSYM: StrFunc = StrFunc::SYMBOL;
    pub const DSYM: StrFunc = StrFunc::SYMBOL.union(StrFunc::EXPAND);
}

/// An open quoted literal other than a heredoc.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringTerm {
    pub func: StrFunc,
    /// Closing delimiter.
    pub term: u8,
    /// Opening delimiter when it differs from `term` (`(` for `%w(...)`).
    pub paren: Option<u8>,
    /// Unclosed `paren`s seen inside the literal.
    pub nest: usize,
    /// Line the literal started on, for unterminated-literal errors.
    pub line: usize,
}

impl StringTerm {
    pub fn new(func: StrFunc, term: u8, paren: Option<u8>, line: usize) -> Self {
        StringTerm {
            func,
            term,
            paren,
            nest: 0,
            line,
        }
    }
}

/// An open heredoc.
///
/// Besides the terminator it keeps the physical line the heredoc started
/// on, split at the identifier: the part already scanned and the part
/// still to be scanned once the body has been read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeredocTerm {
    /// Terminator spelling.
    pub marker: Vec<u8>,
    pub func: StrFunc,
    /// `<<~`: strip common indentation.
    pub squiggly: bool,
    /// Consumed part of the starting line, up to and including the
    /// identifier.
    pub line_prefix: Vec<u8>,
    /// Unscanned rest of the starting line, including its newline.
    pub rest: Vec<u8>,
    /// Line number of the starting line.
    pub line: usize,
    pub(crate) dedent: Option<usize>,
}

impl HeredocTerm {
    /// Columns stripped from each body line of a `<<~` heredoc.
    pub fn dedent(&self) -> Option<usize> {
        self.dedent
    }
}

/// The lexer's "current string term" slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrTerm {
    String(StringTerm),
    Heredoc(HeredocTerm),
    /// The content is complete; the next token is `tSTRING_END`.
    Ended,
}

/// Width in columns of the leading whitespace of `line`, with tabs
/// advancing to the next multiple of 8.
///
/// Returns `None` for a line that is empty or only whitespace: such lines
/// do not take part in choosing a heredoc's indentation.
pub fn indent_width(line: &[u8]) -> Option<usize> {
    let mut col = 0;
    for &b in line {
        match b {
            b' ' => col += 1,
            b'\t' => col = TAB_WIDTH * (col / TAB_WIDTH + 1),
            b'\n' => return None,
            _ => return Some(col),
        }
    }
    None
}

const TAB_WIDTH: usize = 8;

/// Number of leading bytes of `bytes` that make up at most `width` columns
/// of indentation.
///
/// A tab that would cross `width` is kept.
pub fn dedent_len(bytes: &[u8], width: usize) -> usize {
    let mut col = 0;
    let mut i = 0;
    while i < bytes.len() && col < width {
        match bytes[i] {
            b' ' => col += 1,
            b'\t' => {
                let next = TAB_WIDTH * (col / TAB_WIDTH + 1);
                if next > width {
                    break;
                }
                col = next;
            }
            _ => break,
        }
        i += 1;
    }
    i
}

/// Strip up to `width` columns of leading indentation from `bytes` in
/// place, returning the number of bytes removed.
pub fn dedent_string(bytes: &mut Vec<u8>, width: usize) -> usize {
    let len = dedent_len(bytes, width);
    bytes.drain(..len);
    len
}

#[cfg(test)]
mod tests;
