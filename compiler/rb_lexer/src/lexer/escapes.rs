//! Backslash escapes.
//!
//! Strings decode escapes into bytes with [`Lexer::read_escape`]. Regexps
//! keep the escape text for the regexp engine and only validate it, with
//! [`Lexer::tokadd_escape`]. `\u` is shared by both through
//! [`Lexer::tokadd_utf8`].

use bitflags::bitflags;
use rb_diagnostic::{DiagnosticKind, DiagnosticSink, LexResult};
use rb_lexer_core::{Encoding, Source};

use super::Lexer;

bitflags! {
    /// Escape prefixes already applied, so `\M-\M-a` is rejected.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(super) struct EscapeFlags: u8 {
        const CONTROL = 1;
        const META = 2;
    }
}

/// Largest Unicode scalar value.
const MAX_CODEPOINT: u32 = 0x0010_ffff;

impl<S: Source, W: DiagnosticSink> Lexer<S, W> {
    /// Decode the escape after a consumed backslash into one byte.
    pub(super) fn read_escape(&mut self, flags: EscapeFlags) -> LexResult<u8> {
        let c = self.nextc();
        let byte = match c {
            Some(b'\\') => b'\\',
            Some(b'n') => b'\n',
            Some(b't') => b'\t',
            Some(b'r') => b'\r',
            Some(b'f') => 0x0c,
            Some(b'v') => 0x0b,
            Some(b'a') => 0x07,
            Some(b'e') => 0x1b,
            Some(b'b') => 0x08,
            Some(b's') => b' ',
            Some(b'0'..=b'7') => {
                self.pushback(c);
                let (value, _) = self.scan_oct();
                value
            }
            Some(b'x') => self.scan_hex_escape()?,
            Some(b'M') => {
                if flags.contains(EscapeFlags::META) || !self.expect_dash() {
                    return Err(self.invalid_escape());
                }
                match self.nextc() {
                    Some(b'\\') => {
                        if self.peek(b'u') {
                            return Err(self.invalid_escape());
                        }
                        self.read_escape(flags | EscapeFlags::META)? | 0x80
                    }
                    Some(c) if c.is_ascii() => c | 0x80,
                    _ => return Err(self.invalid_escape()),
                }
            }
            Some(b'C') | Some(b'c') => {
                if c == Some(b'C') && !self.expect_dash() {
                    return Err(self.invalid_escape());
                }
                if flags.contains(EscapeFlags::CONTROL) {
                    return Err(self.invalid_escape());
                }
                let target = match self.nextc() {
                    Some(b'\\') => {
                        if self.peek(b'u') {
                            return Err(self.invalid_escape());
                        }
                        self.read_escape(flags | EscapeFlags::CONTROL)?
                    }
                    Some(b'?') => return Ok(0x7f),
                    Some(c) if c.is_ascii() => c,
                    _ => return Err(self.invalid_escape()),
                };
                target & 0x9f
            }
            None => return Err(self.invalid_escape()),
            Some(other) => other,
        };
        Ok(byte)
    }

    /// Copy a regexp escape into the token buffer unchanged, checking its
    /// syntax. Called after the backslash was consumed.
    pub(super) fn tokadd_escape(&mut self) -> LexResult<()> {
        let mut flags = EscapeFlags::empty();
        loop {
            let c = self.nextc();
            match c {
                // Escaped newline: a line continuation, dropped.
                Some(b'\n') => return Ok(()),
                Some(b'0'..=b'7') => {
                    self.pushback(c);
                    let (_, digits) = self.scan_oct();
                    self.tokadd(b'\\');
                    self.tok.extend_from_slice(&digits);
                    return Ok(());
                }
                Some(b'x') => {
                    let digits = self.scan_hex_digits(2);
                    if digits.is_empty() {
                        return Err(self.invalid_hex_escape());
                    }
                    self.tok.extend_from_slice(b"\\x");
                    self.tok.extend_from_slice(&digits);
                    return Ok(());
                }
                Some(b'M') => {
                    if flags.contains(EscapeFlags::META) || !self.expect_dash() {
                        return Err(self.invalid_escape());
                    }
                    self.tok.extend_from_slice(b"\\M-");
                    flags |= EscapeFlags::META;
                }
                Some(b'C') => {
                    if flags.contains(EscapeFlags::CONTROL) || !self.expect_dash() {
                        return Err(self.invalid_escape());
                    }
                    self.tok.extend_from_slice(b"\\C-");
                    flags |= EscapeFlags::CONTROL;
                }
                Some(b'c') => {
                    if flags.contains(EscapeFlags::CONTROL) {
                        return Err(self.invalid_escape());
                    }
                    self.tok.extend_from_slice(b"\\c");
                    flags |= EscapeFlags::CONTROL;
                }
                None => return Err(self.invalid_escape()),
                Some(other) => {
                    self.tokadd(b'\\');
                    self.tokadd(other);
                    return Ok(());
                }
            }

            // After a `\M-`, `\C-` or `\c` prefix: either another escape or
            // the byte it applies to.
            match self.nextc() {
                Some(b'\\') => {}
                Some(target) => {
                    self.tokadd(target);
                    return Ok(());
                }
                None => return Err(self.invalid_escape()),
            }
        }
    }

    /// `\u` escapes, after the `u` was consumed.
    ///
    /// In a string (`string_literal`) the braced form may list several
    /// codepoints separated by single spaces or tabs. Regexps keep the
    /// escape text. A codepoint of 0x80 or above makes `encoding` UTF-8.
    pub(super) fn tokadd_utf8(
        &mut self,
        encoding: &mut Encoding,
        string_literal: bool,
        symbol_literal: bool,
        regexp_literal: bool,
    ) -> LexResult<()> {
        if regexp_literal {
            self.tok.extend_from_slice(b"\\u");
        }

        if !self.peek(b'{') {
            let digits = self.scan_hex_digits(4);
            if digits.len() < 4 {
                return Err(self.syntax_error(
                    DiagnosticKind::InvalidUnicodeEscape,
                    "Invalid Unicode escape",
                ));
            }
            if regexp_literal {
                self.tok.extend_from_slice(&digits);
                return Ok(());
            }
            let codepoint = hex_value(&digits);
            return self.tokadd_codepoint(codepoint, encoding, symbol_literal);
        }

        loop {
            // `{` on the first pass, the separating blank afterwards.
            if let Some(c) = self.nextc() {
                if regexp_literal {
                    self.tokadd(c);
                }
            }
            let digits = self.scan_hex_digits(6);
            if digits.is_empty() {
                return Err(self.syntax_error(
                    DiagnosticKind::InvalidUnicodeEscape,
                    "invalid Unicode escape",
                ));
            }
            let codepoint = hex_value(&digits);
            if codepoint > MAX_CODEPOINT {
                return Err(self.syntax_error(
                    DiagnosticKind::InvalidUnicodeEscape,
                    "invalid Unicode codepoint (too large)",
                ));
            }
            if regexp_literal {
                self.tok.extend_from_slice(&digits);
            } else {
                self.tokadd_codepoint(codepoint, encoding, symbol_literal)?;
            }
            if !(string_literal && (self.peek(b' ') || self.peek(b'\t'))) {
                break;
            }
        }

        if !self.peek(b'}') {
            return Err(self.syntax_error(
                DiagnosticKind::UnterminatedUnicodeEscape,
                "unterminated Unicode escape",
            ));
        }
        self.nextc();
        if regexp_literal {
            self.tokadd(b'}');
        }
        Ok(())
    }

    fn tokadd_codepoint(
        &mut self,
        codepoint: u32,
        encoding: &mut Encoding,
        symbol_literal: bool,
    ) -> LexResult<()> {
        if symbol_literal && codepoint == 0 {
            return Err(self.syntax_error(
                DiagnosticKind::NulInSymbol,
                "symbol cannot contain '\\u0000'",
            ));
        }
        if codepoint < 0x80 {
            if let Ok(byte) = u8::try_from(codepoint) {
                self.tokadd(byte);
            }
            return Ok(());
        }
        let Some(ch) = char::from_u32(codepoint) else {
            return Err(self.syntax_error(
                DiagnosticKind::InvalidUnicodeEscape,
                "invalid Unicode codepoint",
            ));
        };
        *encoding = Encoding::Utf8;
        let mut buf = [0u8; 4];
        self.tok
            .extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }

    /// Up to three octal digits: the value and the digits read.
    fn scan_oct(&mut self) -> (u8, Vec<u8>) {
        let mut value: u32 = 0;
        let mut digits = Vec::with_capacity(3);
        while digits.len() < 3 {
            match self.source.at(0) {
                Some(d @ b'0'..=b'7') => {
                    self.nextc();
                    value = value * 8 + u32::from(d - b'0');
                    digits.push(d);
                }
                _ => break,
            }
        }
        ((value & 0xff) as u8, digits)
    }

    /// Up to `max` hex digits, consumed.
    fn scan_hex_digits(&mut self, max: usize) -> Vec<u8> {
        let mut digits = Vec::with_capacity(max);
        while digits.len() < max {
            match self.source.at(0) {
                Some(d) if d.is_ascii_hexdigit() => {
                    self.nextc();
                    digits.push(d);
                }
                _ => break,
            }
        }
        digits
    }

    /// `\xHH` after the `x`.
    fn scan_hex_escape(&mut self) -> LexResult<u8> {
        let digits = self.scan_hex_digits(2);
        if digits.is_empty() {
            return Err(self.invalid_hex_escape());
        }
        Ok((hex_value(&digits) & 0xff) as u8)
    }

    /// Consume the `-` of `\M-` / `\C-`, or leave the cursor alone.
    fn expect_dash(&mut self) -> bool {
        let c = self.nextc();
        if c == Some(b'-') {
            return true;
        }
        self.pushback(c);
        false
    }

    #[cold]
    fn invalid_escape(&mut self) -> Box<rb_diagnostic::SyntaxError> {
        self.syntax_error(DiagnosticKind::InvalidEscape, "Invalid escape character syntax")
    }

    #[cold]
    fn invalid_hex_escape(&mut self) -> Box<rb_diagnostic::SyntaxError> {
        self.syntax_error(DiagnosticKind::InvalidEscape, "invalid hex escape")
    }
}

fn hex_value(digits: &[u8]) -> u32 {
    digits.iter().fold(0, |acc, &d| {
        acc * 16 + char::from(d).to_digit(16).unwrap_or(0)
    })
}
