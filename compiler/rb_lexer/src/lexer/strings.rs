//! Quoted literals: openers, content scanning and interpolation.
//!
//! Content is returned in chunks. A chunk ends at the closing delimiter,
//! at an interpolation (`#{`, `#@`, `#$`) and, in word lists, at
//! whitespace.

use rb_diagnostic::{DiagnosticKind, DiagnosticSink, LexResult};
use rb_lexer_core::{Encoding, Source};
use tracing::debug;

use super::escapes::EscapeFlags;
use super::identifiers::is_global_punct;
use super::{is_space, Lexer, Suspended};
use crate::state::{LexState, StackState};
use crate::string_term::{StrFunc, StrTerm, StringTerm};
use crate::token::TokenKind;
use crate::value::{RegexpFlags, RegexpOptions, StrBuf, TokenValue};

/// What follows a `#` inside an interpolating literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Interpolation {
    /// `#@ivar`, `#@@cvar`, `#$gvar`: a bare variable.
    Variable,
    /// `#{`: an embedded expression, the `{` consumed.
    Block,
}

/// Regexp metacharacters that keep their backslash when they are also the
/// closing delimiter.
#[inline]
fn is_simple_regexp_meta(c: u8) -> bool {
    matches!(
        c,
        b'$' | b'*' | b'+' | b'.' | b'?' | b'^' | b'|' | b')' | b']' | b'}' | b'>'
    )
}

impl<S: Source, W: DiagnosticSink> Lexer<S, W> {
    /// Next token while a string term is open. The term was taken out of
    /// its slot and is put back unless the literal closes.
    pub(super) fn string_term_token(&mut self, term: StrTerm) -> LexResult<TokenKind> {
        self.newtok();
        match term {
            StrTerm::Ended => {
                self.state = LexState::END | LexState::ENDARG;
                Ok(TokenKind::StringEnd)
            }
            StrTerm::String(term) => self.parse_string(term),
            StrTerm::Heredoc(here) => self.here_document(here),
        }
    }

    fn parse_string(&mut self, mut st: StringTerm) -> LexResult<TokenKind> {
        let func = st.func;
        let mut c = self.nextc();
        let mut space = false;
        if func.contains(StrFunc::QWORDS) && c.is_some_and(is_space) {
            while c.is_some_and(is_space) {
                c = self.nextc();
            }
            space = true;
        }

        if c == Some(st.term) && st.nest == 0 {
            if func.contains(StrFunc::QWORDS) {
                self.strterm = Some(StrTerm::Ended);
                return Ok(TokenKind::Punct(b' '));
            }
            return self.string_end(func);
        }
        if space {
            self.pushback(c);
            self.strterm = Some(StrTerm::String(st));
            return Ok(TokenKind::Punct(b' '));
        }

        self.newtok();
        if func.contains(StrFunc::EXPAND) && c == Some(b'#') {
            if let Some(kind) = self.peek_variable_name() {
                return Ok(self.interpolation(kind, StrTerm::String(st)));
            }
            self.tokadd(b'#');
            c = self.nextc();
        }
        self.pushback(c);

        let mut encoding = self.encoding;
        let paren = st.paren;
        let term = st.term;
        if self
            .tokadd_string(func, term, paren, Some(&mut st.nest), &mut encoding)?
            .is_none()
        {
            let message = if func.contains(StrFunc::REGEXP) {
                "unterminated regexp meets end of file"
            } else {
                "unterminated string meets end of file"
            };
            let kind = if func.contains(StrFunc::REGEXP) {
                DiagnosticKind::UnterminatedRegexp
            } else {
                DiagnosticKind::UnterminatedString
            };
            return Err(self.syntax_error_at(st.line, kind, message));
        }

        self.value = TokenValue::Str(StrBuf {
            bytes: std::mem::take(&mut self.tok),
            encoding,
        });
        self.strterm = Some(StrTerm::String(st));
        Ok(TokenKind::StringContent)
    }

    /// The closing delimiter was read.
    fn string_end(&mut self, func: StrFunc) -> LexResult<TokenKind> {
        if func.contains(StrFunc::REGEXP) {
            let options = self.regexp_options()?;
            self.value = TokenValue::Regexp(options);
            self.state = LexState::END | LexState::ENDARG;
            return Ok(TokenKind::RegexpEnd);
        }

        let label_position = (self.state.intersects(LexState::BEG | LexState::ENDFN)
            && !self.cond.is_in_state())
            || self.state.is_arg();
        if func.contains(StrFunc::LABEL) && label_position && self.is_label_suffix() {
            self.nextc();
            self.state = LexState::BEG | LexState::LABEL;
            return Ok(TokenKind::LabelEnd);
        }
        self.state = LexState::END | LexState::ENDARG;
        Ok(TokenKind::StringEnd)
    }

    /// Classify the bytes after a `#` inside an interpolating literal. Only
    /// `#{` consumes anything.
    pub(super) fn peek_variable_name(&mut self) -> Option<Interpolation> {
        let first = self.source.at(0)?;
        let mut next = self.source.at(1)?;
        match first {
            b'$' => {
                if next == b'-' {
                    next = self.source.at(2)?;
                } else if is_global_punct(next) || next.is_ascii_digit() {
                    return Some(Interpolation::Variable);
                }
            }
            b'@' => {
                if next == b'@' {
                    next = self.source.at(2)?;
                }
            }
            b'{' => {
                self.nextc();
                self.command_start = true;
                return Some(Interpolation::Block);
            }
            _ => return None,
        }
        (next >= 0x80 || next == b'_' || next.is_ascii_alphabetic())
            .then_some(Interpolation::Variable)
    }

    /// Leave the literal `term` for an interpolation.
    ///
    /// `#{` saves the term with the nesting context and resumes it at the
    /// matching `}`. A bare variable only needs the next token, so the
    /// term is put back after it.
    pub(super) fn interpolation(&mut self, kind: Interpolation, term: StrTerm) -> TokenKind {
        match kind {
            Interpolation::Variable => {
                self.pending_dvar = Some(term);
                self.state = LexState::BEG;
                TokenKind::StringDVar
            }
            Interpolation::Block => {
                debug!(depth = self.suspended.len() + 1, "interpolation");
                self.suspended.push(Suspended {
                    term,
                    cond: self.cond,
                    cmdarg: self.cmdarg,
                    state: self.state,
                    brace_nest: self.brace_nest,
                });
                self.cond = StackState::new();
                self.cmdarg = StackState::new();
                self.brace_nest = 0;
                self.state = LexState::BEG;
                TokenKind::StringDBeg
            }
        }
    }

    /// The `}` closing an interpolation: restore the suspended literal.
    /// Returns `false` when no interpolation is open.
    pub(super) fn resume_string_term(&mut self) -> bool {
        let Some(saved) = self.suspended.pop() else {
            return false;
        };
        self.strterm = Some(saved.term);
        self.cond = saved.cond;
        self.cmdarg = saved.cmdarg;
        self.state = saved.state;
        self.brace_nest = saved.brace_nest;
        true
    }

    /// Collect literal content into the token buffer.
    ///
    /// Stops before `term` (at nesting depth 0), before an interpolation
    /// and, for word lists, before whitespace; the stopping byte is left
    /// unread and returned. `None` means the input ended.
    pub(super) fn tokadd_string(
        &mut self,
        func: StrFunc,
        term: u8,
        paren: Option<u8>,
        mut nest: Option<&mut usize>,
        encoding: &mut Encoding,
    ) -> LexResult<Option<u8>> {
        let mut has_nonascii = false;

        loop {
            let Some(mut c) = self.nextc() else {
                return Ok(None);
            };

            if paren == Some(c) {
                if let Some(nest) = nest.as_deref_mut() {
                    *nest += 1;
                }
            } else if c == term {
                match nest.as_deref_mut() {
                    Some(nest) if *nest > 0 => *nest -= 1,
                    _ => {
                        self.pushback(Some(c));
                        return Ok(Some(c));
                    }
                }
            } else if func.contains(StrFunc::EXPAND)
                && c == b'#'
                && matches!(self.source.at(0), Some(b'$' | b'@' | b'{'))
            {
                self.pushback(Some(c));
                return Ok(Some(c));
            } else if c == b'\\' {
                let Some(escaped) = self.nextc() else {
                    return Ok(None);
                };
                c = escaped;
                match c {
                    b'\n' => {
                        if func.contains(StrFunc::QWORDS) {
                            // `%w` keeps an escaped newline as content.
                        } else if func.contains(StrFunc::EXPAND) {
                            continue;
                        } else {
                            self.tokadd(b'\\');
                        }
                    }
                    b'\\' => {
                        if func.contains(StrFunc::ESCAPE) {
                            self.tokadd(c);
                        }
                    }
                    b'u' => {
                        if !func.contains(StrFunc::EXPAND) {
                            self.tokadd(b'\\');
                        } else {
                            let before = *encoding;
                            self.tokadd_utf8(
                                encoding,
                                true,
                                func.contains(StrFunc::SYMBOL),
                                func.contains(StrFunc::REGEXP),
                            )?;
                            if has_nonascii && before != *encoding {
                                return Err(self.mixed_escape(*encoding));
                            }
                            continue;
                        }
                    }
                    _ if c >= 0x80 => {
                        if !func.contains(StrFunc::EXPAND) {
                            self.tokadd(b'\\');
                        }
                        has_nonascii = true;
                        self.tokadd_nonascii(c, *encoding)?;
                        continue;
                    }
                    _ if func.contains(StrFunc::REGEXP) => {
                        if c == term && !is_simple_regexp_meta(c) {
                            self.tokadd(c);
                            continue;
                        }
                        self.pushback(Some(c));
                        self.tokadd_escape()?;
                        continue;
                    }
                    _ if func.contains(StrFunc::EXPAND) => {
                        self.pushback(Some(c));
                        if func.contains(StrFunc::ESCAPE) {
                            self.tokadd(b'\\');
                        }
                        c = self.read_escape(EscapeFlags::empty())?;
                    }
                    _ if func.contains(StrFunc::QWORDS) && is_space(c) => {
                        // `%w[a\ b]`: the space belongs to the word.
                    }
                    _ if c != term && paren != Some(c) => {
                        self.tokadd(b'\\');
                        self.pushback(Some(c));
                        continue;
                    }
                    _ => {}
                }
            } else if c >= 0x80 {
                has_nonascii = true;
                self.tokadd_nonascii(c, *encoding)?;
                continue;
            } else if func.contains(StrFunc::QWORDS) && is_space(c) {
                self.pushback(Some(c));
                return Ok(Some(c));
            }

            if c >= 0x80 {
                has_nonascii = true;
                if *encoding != self.encoding {
                    return Err(self.mixed_error(*encoding));
                }
            }
            self.tokadd(c);
        }
    }

    /// A raw non-ASCII character in a literal whose content encoding
    /// `encoding` may have been switched by a `\u` escape.
    fn tokadd_nonascii(&mut self, c: u8, encoding: Encoding) -> LexResult<()> {
        if encoding != self.encoding {
            return Err(self.mixed_error(encoding));
        }
        self.tokadd_mbchar(c)
    }

    #[cold]
    fn mixed_error(&mut self, encoding: Encoding) -> Box<rb_diagnostic::SyntaxError> {
        let message = format!("{encoding} mixed within {} source", self.encoding);
        self.syntax_error(DiagnosticKind::MixedEncoding, message)
    }

    #[cold]
    fn mixed_escape(&mut self, encoding: Encoding) -> Box<rb_diagnostic::SyntaxError> {
        let message = format!("{encoding} escape mixed within {} source", self.encoding);
        self.syntax_error(DiagnosticKind::MixedEncoding, message)
    }

    /// Option letters after the closing delimiter of a regexp.
    fn regexp_options(&mut self) -> LexResult<RegexpOptions> {
        let mut options = RegexpOptions::default();
        let mut unknown = String::new();
        loop {
            let c = self.nextc();
            match c {
                Some(b'i') => options.flags |= RegexpFlags::IGNORECASE,
                Some(b'x') => options.flags |= RegexpFlags::EXTENDED,
                Some(b'm') => options.flags |= RegexpFlags::MULTILINE,
                Some(b'o') => options.flags |= RegexpFlags::ONCE,
                Some(b'n') => options.kcode = Some(Encoding::Ascii8Bit),
                Some(b'e') => options.kcode = Some(Encoding::EucJp),
                Some(b's') => options.kcode = Some(Encoding::Windows31j),
                Some(b'u') => options.kcode = Some(Encoding::Utf8),
                Some(other) if other.is_ascii_alphabetic() => unknown.push(char::from(other)),
                _ => {
                    self.pushback(c);
                    break;
                }
            }
        }
        if !unknown.is_empty() {
            let plural = if unknown.len() > 1 { "s" } else { "" };
            return Err(self.syntax_error(
                DiagnosticKind::UnknownRegexpOption,
                format!("unknown regexp option{plural} - {unknown}"),
            ));
        }
        Ok(options)
    }

    // === Openers ===

    pub(super) fn double_quote(&mut self, command_state: bool) -> TokenKind {
        let label = self.label_func(command_state);
        self.open_string(StrFunc::DQUOTE | label, b'"', None);
        TokenKind::StringBeg
    }

    pub(super) fn single_quote(&mut self, command_state: bool) -> TokenKind {
        let label = self.label_func(command_state);
        self.open_string(StrFunc::SQUOTE | label, b'\'', None);
        TokenKind::StringBeg
    }

    /// `` ` ``: a command string, or the method name after `def` or `.`.
    pub(super) fn backtick(&mut self, command_state: bool) -> TokenKind {
        if self.state.contains(LexState::FNAME) {
            self.state = LexState::ENDFN;
            return TokenKind::BackRef2;
        }
        if self.state.contains(LexState::DOT) {
            self.state = if command_state {
                LexState::CMDARG
            } else {
                LexState::ARG
            };
            return TokenKind::BackRef2;
        }
        self.open_string(StrFunc::XQUOTE, b'`', None);
        TokenKind::XStringBeg
    }

    fn label_func(&self, command_state: bool) -> StrFunc {
        if self.state.is_label_possible(command_state) {
            StrFunc::LABEL
        } else {
            StrFunc::empty()
        }
    }
}
