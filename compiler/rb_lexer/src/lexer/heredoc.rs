//! Heredocs.
//!
//! `<<ID` reads the identifier, then parks the rest of the physical line
//! and scans the body from the following lines. Once the terminator is
//! found the parked text is put back in front of the input, and a newline
//! in it jumps the line counter past the body.

use rb_diagnostic::{DiagnosticKind, DiagnosticSink, LexResult};
use rb_lexer_core::{is_horizontal_space, Encoding, Source};
use tracing::debug;

use super::{is_ident_char, Lexer};
use crate::state::LexState;
use crate::string_term::{dedent_len, dedent_string, indent_width, HeredocTerm, StrFunc, StrTerm};
use crate::token::TokenKind;
use crate::value::{StrBuf, TokenValue};

impl<S: Source, W: DiagnosticSink> Lexer<S, W> {
    /// After `<<`: read a heredoc identifier and open the heredoc.
    ///
    /// Returns `None`, with the cursor restored, when the bytes do not form
    /// an identifier and `<<` is an operator.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(super) fn heredoc_identifier(&mut self) -> LexResult<Option<TokenKind>> {
        let mut c = self.nextc();
        let mut func = StrFunc::empty();
        let mut squiggly = false;
        let sign = c;
        match c {
            Some(b'-') => {
                c = self.nextc();
                func = StrFunc::INDENT;
            }
            Some(b'~') => {
                c = self.nextc();
                func = StrFunc::INDENT;
                squiggly = true;
            }
            _ => {}
        }

        let Some(first) = c else {
            return Err(self.unterminated_identifier());
        };

        self.tok.clear();
        let token = match first {
            b'\'' | b'"' | b'`' => {
                func |= match first {
                    b'\'' => StrFunc::SQUOTE,
                    b'"' => StrFunc::DQUOTE,
                    _ => StrFunc::XQUOTE,
                };
                loop {
                    match self.nextc() {
                        Some(c) if c == first => break,
                        None | Some(b'\n') => return Err(self.unterminated_identifier()),
                        Some(c) => self.tokadd_mbchar(c)?,
                    }
                }
                if first == b'`' {
                    TokenKind::XStringBeg
                } else {
                    TokenKind::StringBeg
                }
            }
            c if is_ident_char(c) => {
                func |= StrFunc::DQUOTE;
                self.tokadd_mbchar(c)?;
                while let Some(c) = self.source.at(0).filter(|&c| is_ident_char(c)) {
                    self.nextc();
                    self.tokadd_mbchar(c)?;
                }
                TokenKind::StringBeg
            }
            _ => {
                self.pushback(c);
                if func.contains(StrFunc::INDENT) {
                    self.pushback(sign);
                }
                return Ok(None);
            }
        };

        let marker = std::mem::take(&mut self.tok);
        let line_prefix = self.source.line_prefix();
        let line = self.source.line();
        let (mut rest, had_newline) = self.source.read_line_bytes();
        if had_newline {
            rest.push(b'\n');
            self.newline_consumed();
        }

        let dedent = if squiggly {
            self.squiggly_indent(&marker)
        } else {
            None
        };
        debug!(
            marker = %String::from_utf8_lossy(&marker),
            line = line + 1,
            squiggly,
            ?dedent,
            "heredoc"
        );

        self.strterm = Some(StrTerm::Heredoc(HeredocTerm {
            marker,
            func,
            squiggly,
            line_prefix,
            rest,
            line,
            dedent,
        }));
        Ok(Some(token))
    }

    /// Smallest indentation among the non-blank body lines of a `<<~`
    /// heredoc, found by looking ahead to the terminator.
    fn squiggly_indent(&mut self, marker: &[u8]) -> Option<usize> {
        let mut k: isize = 0;
        let mut smallest: Option<usize> = None;
        let mut line = Vec::new();
        loop {
            line.clear();
            let mut ended = false;
            loop {
                match self.source.at(k) {
                    None => {
                        ended = true;
                        break;
                    }
                    Some(c) => {
                        k += 1;
                        if c == b'\n' {
                            break;
                        }
                        line.push(c);
                    }
                }
            }
            let start = line
                .iter()
                .position(|&c| !is_horizontal_space(c))
                .unwrap_or(line.len());
            if line[start..] == *marker {
                break;
            }
            if let Some(width) = indent_width(&line) {
                smallest = Some(smallest.map_or(width, |s| s.min(width)));
            }
            if ended {
                break;
            }
        }
        smallest
    }

    /// Next token inside a heredoc body.
    pub(super) fn here_document(&mut self, here: HeredocTerm) -> LexResult<TokenKind> {
        let indent = here.func.contains(StrFunc::INDENT);
        let at_line_start = self.source.column() == 0;

        if at_line_start {
            if self.source.at(0).is_none() {
                return Err(self.heredoc_not_found(&here));
            }
            if self.source.match_marker(&here.marker, indent, true) {
                self.restore_heredoc_line(&here);
                self.state = LexState::END | LexState::ENDARG;
                return Ok(TokenKind::StringEnd);
            }
        }

        let mut encoding = self.encoding;
        self.tok.clear();

        if !here.func.contains(StrFunc::EXPAND) {
            loop {
                let (mut line, had_newline) = self.source.read_line_bytes();
                if let Some(width) = here.dedent {
                    dedent_string(&mut line, width);
                }
                self.tok.extend_from_slice(&line);
                if !had_newline || self.source.at(0).is_none() {
                    return Err(self.heredoc_not_found(&here));
                }
                self.tok.push(b'\n');
                if self.source.match_marker(&here.marker, indent, true) {
                    break;
                }
            }
            return Ok(self.finish_heredoc(here, encoding));
        }

        if at_line_start {
            self.skip_heredoc_indent(here.dedent);
        }
        let c = self.nextc();
        if c == Some(b'#') {
            if let Some(kind) = self.peek_variable_name() {
                return Ok(self.interpolation(kind, StrTerm::Heredoc(here)));
            }
            self.tokadd(b'#');
        } else {
            self.pushback(c);
        }

        loop {
            match self.tokadd_string(here.func, b'\n', None, None, &mut encoding)? {
                None => return Err(self.heredoc_not_found(&here)),
                Some(b'\n') => {}
                Some(_) => {
                    self.value = TokenValue::Str(StrBuf {
                        bytes: std::mem::take(&mut self.tok),
                        encoding,
                    });
                    self.strterm = Some(StrTerm::Heredoc(here));
                    return Ok(TokenKind::StringContent);
                }
            }
            self.nextc();
            self.tokadd(b'\n');
            if self.source.at(0).is_none() {
                return Err(self.heredoc_not_found(&here));
            }
            if self.source.match_marker(&here.marker, indent, true) {
                break;
            }
            self.skip_heredoc_indent(here.dedent);
        }
        Ok(self.finish_heredoc(here, encoding))
    }

    /// The terminator was consumed: emit the last content chunk and resume
    /// the parked line. The next token closes the literal.
    fn finish_heredoc(&mut self, here: HeredocTerm, encoding: Encoding) -> TokenKind {
        self.value = TokenValue::Str(StrBuf {
            bytes: std::mem::take(&mut self.tok),
            encoding,
        });
        self.restore_heredoc_line(&here);
        self.strterm = Some(StrTerm::Ended);
        TokenKind::StringContent
    }

    fn restore_heredoc_line(&mut self, here: &HeredocTerm) {
        self.heredoc_end = Some(self.source.line());
        self.source
            .restore_line(&here.line_prefix, &here.rest, here.line);
        debug!(line = here.line + 1, "heredoc closed");
    }

    /// Skip up to `width` columns of indentation at the start of a body
    /// line.
    fn skip_heredoc_indent(&mut self, width: Option<usize>) {
        let Some(width) = width else {
            return;
        };
        let mut lookahead = Vec::new();
        let mut k = 0;
        while let Some(c) = self.source.at(k).filter(|&c| c == b' ' || c == b'\t') {
            lookahead.push(c);
            k += 1;
        }
        for _ in 0..dedent_len(&lookahead, width) {
            self.nextc();
        }
    }

    #[cold]
    fn heredoc_not_found(&mut self, here: &HeredocTerm) -> Box<rb_diagnostic::SyntaxError> {
        let message = format!(
            "can't find string \"{}\" anywhere before EOF",
            String::from_utf8_lossy(&here.marker)
        );
        self.syntax_error_at(here.line, DiagnosticKind::UnterminatedHeredoc, message)
    }

    #[cold]
    fn unterminated_identifier(&mut self) -> Box<rb_diagnostic::SyntaxError> {
        self.syntax_error(
            DiagnosticKind::UnterminatedHeredocIdentifier,
            "unterminated here document identifier",
        )
    }
}
