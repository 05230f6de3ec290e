//! Identifiers, keywords, labels, character literals and `$`/`@`
//! variables.

use rb_diagnostic::{DiagnosticKind, DiagnosticSink, LexResult};
use rb_lexer_core::Source;
use tracing::trace;

use super::escapes::EscapeFlags;
use super::{is_ident_char, is_space, Lexer};
use crate::keywords;
use crate::state::LexState;
use crate::token::TokenKind;
use crate::value::{StrBuf, TokenValue};

/// Largest `$N` that still names a match group.
const NTH_REF_MAX: usize = (1 << 30) - 1;

/// Punctuation that forms a one-character global name (`$~`, `$;`, ...).
#[inline]
pub(super) fn is_global_punct(c: u8) -> bool {
    matches!(
        c,
        b'~' | b'*'
            | b'$'
            | b'?'
            | b'!'
            | b'@'
            | b'/'
            | b'\\'
            | b';'
            | b','
            | b'.'
            | b'='
            | b':'
            | b'<'
            | b'>'
            | b'"'
    )
}

impl<S: Source, W: DiagnosticSink> Lexer<S, W> {
    /// Scan the rest of an identifier whose first byte `c` was consumed.
    pub(super) fn identifier(&mut self, c: u8, command_state: bool) -> LexResult<TokenKind> {
        if !is_ident_char(c) {
            let message = format!(
                "Invalid char `\\{:03o}' ('{}') in expression",
                c,
                char::from(c)
            );
            return Err(self.syntax_error(DiagnosticKind::InvalidCharacter, message));
        }
        self.tokadd_mbchar(c)?;
        self.tokadd_ident_tail()?;

        let mut kind = None;
        match self.source.at(0) {
            Some(b'!' | b'?') if !self.source.peek_at(b'=', 1) => {
                if let Some(c) = self.nextc() {
                    self.tokadd(c);
                }
                kind = Some(TokenKind::Fid);
            }
            Some(b'=')
                if self.state.contains(LexState::FNAME)
                    && !self.source.peek_at(b'~', 1)
                    && !self.source.peek_at(b'>', 1)
                    && (!self.source.peek_at(b'=', 1) || self.source.peek_at(b'>', 2)) =>
            {
                self.nextc();
                self.tokadd(b'=');
                kind = Some(TokenKind::Identifier);
            }
            _ => {}
        }

        if self.state.is_label_possible(command_state) && self.is_label_suffix() {
            self.nextc();
            self.state = LexState::ARG | LexState::LABELED;
            self.value = self.tok_name();
            return Ok(TokenKind::Label);
        }

        if !self.state.contains(LexState::DOT) {
            if let Some(keyword) = keywords::lookup(&self.tok) {
                return Ok(self.keyword(keyword));
            }
        }

        let kind = kind.unwrap_or(if self.tok[0].is_ascii_uppercase() {
            TokenKind::Constant
        } else {
            TokenKind::Identifier
        });

        if self
            .state
            .intersects(LexState::BEG_ANY | LexState::ARG_ANY | LexState::DOT)
        {
            self.state = if command_state {
                LexState::CMDARG
            } else {
                LexState::ARG
            };
        } else if self.state == LexState::FNAME {
            self.state = LexState::ENDFN;
        } else {
            self.state = LexState::END;
        }

        if kind == TokenKind::Identifier
            && !self.last_state.intersects(LexState::DOT | LexState::FNAME)
            && self.is_local(&self.tok)
        {
            self.state = LexState::END | LexState::LABEL;
        }

        self.value = self.tok_name();
        Ok(kind)
    }

    /// Consume identifier bytes following the first one.
    fn tokadd_ident_tail(&mut self) -> LexResult<()> {
        while let Some(c) = self.source.at(0).filter(|&c| is_ident_char(c)) {
            self.nextc();
            self.tokadd_mbchar(c)?;
        }
        Ok(())
    }

    fn keyword(&mut self, keyword: &'static keywords::Keyword) -> TokenKind {
        let state = self.state;
        self.state = keyword.state;
        trace!(keyword = keyword.name, "keyword");

        if state.contains(LexState::FNAME) {
            self.value = TokenValue::Name(keyword.name.as_bytes().to_vec());
            return keyword.id0;
        }
        self.value = TokenValue::Position(self.token_position());
        if self.state.contains(LexState::BEG) {
            self.command_start = true;
        }

        if keyword.id0 == TokenKind::KwDo {
            if self.lambda_beginning() {
                self.left_paren_begin = 0;
                self.paren_nest -= 1;
                return TokenKind::KwDoLambda;
            }
            if self.cond.is_in_state() {
                return TokenKind::KwDoCond;
            }
            if self.cmdarg.is_in_state() && !state.contains(LexState::CMDARG) {
                return TokenKind::KwDoBlock;
            }
            if state.intersects(LexState::BEG | LexState::ENDARG) {
                return TokenKind::KwDoBlock;
            }
            return TokenKind::KwDo;
        }

        if state.intersects(LexState::BEG | LexState::LABELED) {
            keyword.id0
        } else {
            if keyword.id0 != keyword.id1 {
                self.state = LexState::BEG | LexState::LABEL;
            }
            keyword.id1
        }
    }

    /// `?a` character literals, or the ternary `?`.
    pub(super) fn question_mark(&mut self) -> LexResult<TokenKind> {
        if self.state.is_end() {
            self.state = LexState::VALUE;
            return Ok(TokenKind::Punct(b'?'));
        }
        let Some(c) = self.nextc() else {
            return Err(self.syntax_error(
                DiagnosticKind::IncompleteCharacterSyntax,
                "incomplete character syntax",
            ));
        };

        if is_space(c) {
            if !self.state.is_arg() {
                let escape = match c {
                    b' ' => Some('s'),
                    b'\n' => Some('n'),
                    b'\t' => Some('t'),
                    0x0b => Some('v'),
                    b'\r' => Some('r'),
                    0x0c => Some('f'),
                    _ => None,
                };
                if let Some(escape) = escape {
                    self.warn(
                        DiagnosticKind::InvalidCharacterSyntax,
                        format!("invalid character syntax; use ?\\{escape}"),
                    );
                }
            }
            return Ok(self.ternary(c));
        }

        self.tok.clear();
        let mut encoding = self.encoding;
        if c >= 0x80 {
            self.tokadd_mbchar(c)?;
        } else if (c.is_ascii_alphanumeric() || c == b'_')
            && self.source.at(0).is_some_and(is_ident_char)
        {
            return Ok(self.ternary(c));
        } else if c == b'\\' {
            match self.source.at(0) {
                Some(b'u') => {
                    self.nextc();
                    self.tokadd_utf8(&mut encoding, false, false, false)?;
                }
                Some(next) if next >= 0x80 => {
                    self.nextc();
                    self.tokadd_mbchar(next)?;
                }
                _ => {
                    let byte = self.read_escape(EscapeFlags::empty())?;
                    self.tokadd(byte);
                }
            }
        } else {
            self.tokadd(c);
        }

        self.value = TokenValue::Str(StrBuf {
            bytes: std::mem::take(&mut self.tok),
            encoding,
        });
        self.state = LexState::END;
        Ok(TokenKind::Char)
    }

    fn ternary(&mut self, c: u8) -> TokenKind {
        self.pushback(Some(c));
        self.state = LexState::VALUE;
        TokenKind::Punct(b'?')
    }

    /// `$foo`, `$1`, `$&` and the other global forms.
    pub(super) fn dollar(&mut self) -> LexResult<TokenKind> {
        let last_state = self.last_state;
        self.state = LexState::END;
        let c = self.nextc();

        match c {
            Some(b'_') => {
                self.tok.extend_from_slice(b"$_");
                self.tokadd_ident_tail()?;
                Ok(self.global_variable())
            }
            Some(c) if is_global_punct(c) => {
                self.tokadd(b'$');
                self.tokadd(c);
                Ok(self.global_variable())
            }
            Some(b'-') => {
                let next = self.nextc();
                match next {
                    Some(n) if is_ident_char(n) => {
                        self.tok.extend_from_slice(b"$-");
                        self.tokadd_mbchar(n)?;
                        Ok(self.global_variable())
                    }
                    _ => {
                        self.pushback(next);
                        self.pushback(Some(b'-'));
                        Ok(TokenKind::Punct(b'$'))
                    }
                }
            }
            Some(c @ (b'&' | b'`' | b'\'' | b'+')) => {
                if last_state.contains(LexState::FNAME) {
                    self.tokadd(b'$');
                    self.tokadd(c);
                    return Ok(self.global_variable());
                }
                self.value = TokenValue::BackRef(c);
                Ok(TokenKind::BackRef)
            }
            Some(c @ b'1'..=b'9') => {
                self.tokadd(b'$');
                self.tokadd(c);
                while let Some(d) = self.source.at(0).filter(u8::is_ascii_digit) {
                    self.nextc();
                    self.tokadd(d);
                }
                if last_state.contains(LexState::FNAME) {
                    return Ok(self.global_variable());
                }
                let number = self.nth_ref_number();
                self.value = TokenValue::NthRef(number);
                Ok(TokenKind::NthRef)
            }
            Some(c) if is_ident_char(c) => {
                self.tokadd(b'$');
                self.tokadd_mbchar(c)?;
                self.tokadd_ident_tail()?;
                Ok(self.global_variable())
            }
            None | Some(b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r') => Err(self.syntax_error(
                DiagnosticKind::InvalidVariableName,
                "`$' without identifiers is not allowed as a global variable name",
            )),
            Some(other) => {
                self.pushback(c);
                Err(self.syntax_error(
                    DiagnosticKind::InvalidVariableName,
                    format!(
                        "`${}' is not allowed as a global variable name",
                        char::from(other)
                    ),
                ))
            }
        }
    }

    fn global_variable(&mut self) -> TokenKind {
        self.state = LexState::END;
        self.value = self.tok_name();
        TokenKind::Gvar
    }

    /// Group number of the `$N` in the token buffer; 0 with a warning when
    /// it is too big.
    fn nth_ref_number(&mut self) -> usize {
        let digits = &self.tok[1..];
        let number = digits.iter().try_fold(0usize, |n, &d| {
            n.checked_mul(10)?.checked_add(usize::from(d - b'0'))
        });
        match number {
            Some(n) if n <= NTH_REF_MAX => n,
            _ => {
                let name = String::from_utf8_lossy(&self.tok).into_owned();
                self.warn(
                    DiagnosticKind::NthRefTooBig,
                    format!("`{name}' is too big for a number variable, always nil"),
                );
                0
            }
        }
    }

    /// `@foo` and `@@foo`.
    pub(super) fn at(&mut self) -> LexResult<TokenKind> {
        self.tokadd(b'@');
        let mut c = self.nextc();
        let class_var = c == Some(b'@');
        if class_var {
            self.tokadd(b'@');
            c = self.nextc();
        }

        let (kind, description) = if class_var {
            (TokenKind::Cvar, "a class variable name")
        } else {
            (TokenKind::Ivar, "an instance variable name")
        };
        let sigil = if class_var { "@@" } else { "@" };

        match c {
            None | Some(b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r') => {
                Err(self.syntax_error(
                    DiagnosticKind::InvalidVariableName,
                    format!("`{sigil}' without identifiers is not allowed as {description}"),
                ))
            }
            Some(c) if c.is_ascii_digit() || !is_ident_char(c) => {
                self.pushback(Some(c));
                Err(self.syntax_error(
                    DiagnosticKind::InvalidVariableName,
                    format!(
                        "`{sigil}{}' is not allowed as {description}",
                        char::from(c)
                    ),
                ))
            }
            Some(c) => {
                self.tokadd_mbchar(c)?;
                self.tokadd_ident_tail()?;
                self.state = LexState::END;
                self.value = self.tok_name();
                Ok(kind)
            }
        }
    }
}

#[cfg(test)]
mod tests;
