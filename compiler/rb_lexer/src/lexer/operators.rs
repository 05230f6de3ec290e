//! Punctuation.
//!
//! Most rules follow the same shape: read one or two bytes of lookahead,
//! pick the terminal from the current mode bits, then set the mode for the
//! next token.

use rb_diagnostic::{DiagnosticKind, DiagnosticSink, LexResult};
use rb_lexer_core::Source;

use super::{is_space, Lexer};
use crate::state::LexState;
use crate::string_term::{StrFunc, StrTerm, StringTerm};
use crate::token::TokenKind;
use crate::value::TokenValue;

impl<S: Source, W: DiagnosticSink> Lexer<S, W> {
    /// `ARG` after an operator method name (`def +`), `BEG` otherwise.
    fn set_operator_state(&mut self) {
        self.state = if self.state.is_after_operator() {
            LexState::ARG
        } else {
            LexState::BEG
        };
    }

    /// `a += 1` and friends. The value is the operator without its `=`.
    fn op_assign(&mut self, op: &'static str) -> TokenKind {
        self.value = TokenValue::Op(op);
        self.state = LexState::BEG;
        TokenKind::OpAsgn
    }

    /// Open a quoted literal closing on `term`.
    pub(super) fn open_string(&mut self, func: StrFunc, term: u8, paren: Option<u8>) {
        let line = self.source.line();
        self.strterm = Some(StrTerm::String(StringTerm::new(func, term, paren, line)));
    }

    pub(super) fn star(&mut self, space_seen: bool) -> TokenKind {
        let mut c = self.nextc();
        let token = if c == Some(b'*') {
            c = self.nextc();
            if c == Some(b'=') {
                return self.op_assign("**");
            }
            self.pushback(c);
            if self.is_space_arg(c, space_seen) {
                self.warn(
                    DiagnosticKind::AmbiguousOperator,
                    "`**' interpreted as argument prefix",
                );
                TokenKind::DStar
            } else if self.state.is_beg() {
                TokenKind::DStar
            } else {
                self.warn_balanced(c, space_seen, "**", "argument prefix");
                TokenKind::Pow
            }
        } else {
            if c == Some(b'=') {
                return self.op_assign("*");
            }
            self.pushback(c);
            if self.is_space_arg(c, space_seen) {
                self.warn(
                    DiagnosticKind::AmbiguousOperator,
                    "`*' interpreted as argument prefix",
                );
                TokenKind::Star
            } else if self.state.is_beg() {
                TokenKind::Star
            } else {
                self.warn_balanced(c, space_seen, "*", "argument prefix");
                TokenKind::Star2
            }
        };
        self.set_operator_state();
        token
    }

    pub(super) fn bang(&mut self) -> TokenKind {
        let c = self.nextc();
        if self.state.is_after_operator() {
            self.state = LexState::ARG;
            if c == Some(b'@') {
                return TokenKind::Bang;
            }
        } else {
            self.state = LexState::BEG;
        }
        match c {
            Some(b'=') => TokenKind::Neq,
            Some(b'~') => TokenKind::NMatch,
            _ => {
                self.pushback(c);
                TokenKind::Bang
            }
        }
    }

    pub(super) fn equal(&mut self) -> TokenKind {
        self.set_operator_state();
        let c = self.nextc();
        match c {
            Some(b'=') => {
                let c = self.nextc();
                if c == Some(b'=') {
                    return TokenKind::Eqq;
                }
                self.pushback(c);
                TokenKind::Eq
            }
            Some(b'~') => TokenKind::Match,
            Some(b'>') => TokenKind::Assoc,
            _ => {
                self.pushback(c);
                TokenKind::Punct(b'=')
            }
        }
    }

    pub(super) fn less_than(&mut self, space_seen: bool) -> LexResult<TokenKind> {
        self.last_state = self.state;
        let c = self.nextc();
        if c == Some(b'<')
            && !self.state.intersects(LexState::DOT | LexState::CLASS)
            && !self.state.is_end()
            && (!self.state.is_arg() || self.state.contains(LexState::LABELED) || space_seen)
        {
            if let Some(token) = self.heredoc_identifier()? {
                return Ok(token);
            }
        }

        if self.state.is_after_operator() {
            self.state = LexState::ARG;
        } else {
            if self.state.contains(LexState::CLASS) {
                self.command_start = true;
            }
            self.state = LexState::BEG;
        }

        match c {
            Some(b'=') => {
                let c = self.nextc();
                if c == Some(b'>') {
                    return Ok(TokenKind::Cmp);
                }
                self.pushback(c);
                Ok(TokenKind::Leq)
            }
            Some(b'<') => {
                let c = self.nextc();
                if c == Some(b'=') {
                    return Ok(self.op_assign("<<"));
                }
                self.pushback(c);
                self.warn_balanced(c, space_seen, "<<", "here document");
                Ok(TokenKind::LShift)
            }
            _ => {
                self.pushback(c);
                Ok(TokenKind::Lt)
            }
        }
    }

    pub(super) fn greater_than(&mut self) -> TokenKind {
        self.set_operator_state();
        let c = self.nextc();
        match c {
            Some(b'=') => TokenKind::Geq,
            Some(b'>') => {
                let c = self.nextc();
                if c == Some(b'=') {
                    return self.op_assign(">>");
                }
                self.pushback(c);
                TokenKind::RShift
            }
            _ => {
                self.pushback(c);
                TokenKind::Gt
            }
        }
    }

    pub(super) fn ampersand(&mut self, space_seen: bool) -> TokenKind {
        let c = self.nextc();
        match c {
            Some(b'&') => {
                self.state = LexState::BEG;
                let c = self.nextc();
                if c == Some(b'=') {
                    return self.op_assign("&&");
                }
                self.pushback(c);
                return TokenKind::AndOp;
            }
            Some(b'=') => return self.op_assign("&"),
            Some(b'.') => {
                self.state = LexState::DOT;
                return TokenKind::AndDot;
            }
            _ => {}
        }
        self.pushback(c);

        let token = if self.is_space_arg(c, space_seen) {
            self.warn(
                DiagnosticKind::AmbiguousOperator,
                "`&' interpreted as argument prefix",
            );
            TokenKind::Amper
        } else if self.state.is_beg() {
            TokenKind::Amper
        } else {
            self.warn_balanced(c, space_seen, "&", "argument prefix");
            TokenKind::Amper2
        };
        self.set_operator_state();
        token
    }

    pub(super) fn pipe(&mut self) -> TokenKind {
        let c = self.nextc();
        match c {
            Some(b'|') => {
                self.state = LexState::BEG;
                let c = self.nextc();
                if c == Some(b'=') {
                    return self.op_assign("||");
                }
                self.pushback(c);
                TokenKind::OrOp
            }
            Some(b'=') => self.op_assign("|"),
            _ => {
                self.state = if self.state.is_after_operator() {
                    LexState::ARG
                } else {
                    LexState::BEG | LexState::LABEL
                };
                self.pushback(c);
                TokenKind::Pipe
            }
        }
    }

    pub(super) fn plus(&mut self, space_seen: bool) -> LexResult<TokenKind> {
        let c = self.nextc();
        if self.state.is_after_operator() {
            self.state = LexState::ARG;
            if c == Some(b'@') {
                return Ok(TokenKind::UPlus);
            }
            self.pushback(c);
            return Ok(TokenKind::Plus);
        }
        if c == Some(b'=') {
            return Ok(self.op_assign("+"));
        }
        if self.state.is_beg() || (self.is_space_arg(c, space_seen) && self.arg_ambiguous()) {
            self.state = LexState::BEG;
            self.pushback(c);
            if let Some(digit @ b'0'..=b'9') = c {
                // The sign does not change the value; only the digits are kept.
                self.nextc();
                return self.parse_number(digit);
            }
            return Ok(TokenKind::UPlus);
        }
        self.state = LexState::BEG;
        self.pushback(c);
        self.warn_balanced(c, space_seen, "+", "unary operator");
        Ok(TokenKind::Plus)
    }

    pub(super) fn minus(&mut self, space_seen: bool) -> LexResult<TokenKind> {
        let c = self.nextc();
        if self.state.is_after_operator() {
            self.state = LexState::ARG;
            if c == Some(b'@') {
                return Ok(TokenKind::UMinus);
            }
            self.pushback(c);
            return Ok(TokenKind::Minus);
        }
        match c {
            Some(b'=') => return Ok(self.op_assign("-")),
            Some(b'>') => {
                self.state = LexState::ENDFN;
                return Ok(TokenKind::Lambda);
            }
            _ => {}
        }
        if self.state.is_beg() || (self.is_space_arg(c, space_seen) && self.arg_ambiguous()) {
            self.state = LexState::BEG;
            self.pushback(c);
            if c.is_some_and(|b| b.is_ascii_digit()) {
                return Ok(TokenKind::UMinusNum);
            }
            return Ok(TokenKind::UMinus);
        }
        self.state = LexState::BEG;
        self.pushback(c);
        self.warn_balanced(c, space_seen, "-", "unary operator");
        Ok(TokenKind::Minus)
    }

    pub(super) fn dot(&mut self) -> LexResult<TokenKind> {
        self.state = LexState::BEG;
        let c = self.nextc();
        if c == Some(b'.') {
            let c = self.nextc();
            if c == Some(b'.') {
                return Ok(TokenKind::Dot3);
            }
            self.pushback(c);
            return Ok(TokenKind::Dot2);
        }
        self.pushback(c);
        if c.is_some_and(|b| b.is_ascii_digit()) {
            return Err(self.syntax_error(
                DiagnosticKind::LeadingDotFloat,
                "no .<digit> floating literal anymore; put 0 before dot",
            ));
        }
        self.state = LexState::DOT;
        Ok(TokenKind::Dot)
    }

    pub(super) fn right_paren(&mut self) -> TokenKind {
        self.paren_nest -= 1;
        self.cond.lexpop();
        self.cmdarg.lexpop();
        self.state = LexState::ENDFN;
        TokenKind::RParen
    }

    pub(super) fn right_bracket(&mut self) -> TokenKind {
        self.paren_nest -= 1;
        self.cond.lexpop();
        self.cmdarg.lexpop();
        self.state = LexState::ENDARG;
        TokenKind::RBrack
    }

    pub(super) fn right_curly(&mut self) -> TokenKind {
        if self.brace_nest == 0 && self.resume_string_term() {
            return TokenKind::StringDEnd;
        }
        self.cond.lexpop();
        self.cmdarg.lexpop();
        self.state = LexState::ENDARG;
        let token = if self.brace_nest == 0 {
            TokenKind::StringDEnd
        } else {
            TokenKind::RCurly
        };
        self.brace_nest -= 1;
        token
    }

    pub(super) fn colon(&mut self, space_seen: bool) -> TokenKind {
        let c = self.nextc();
        if c == Some(b':') {
            if self.state.is_beg()
                || self.state.contains(LexState::CLASS)
                || (self.state.is_arg() && space_seen)
            {
                self.state = LexState::BEG;
                return TokenKind::Colon3;
            }
            self.state = LexState::DOT;
            return TokenKind::Colon2;
        }

        if self.state.is_end() || c.is_some_and(is_space) || c == Some(b'#') {
            self.pushback(c);
            self.warn_balanced(c, space_seen, ":", "symbol literal");
            self.state = LexState::BEG;
            return TokenKind::Punct(b':');
        }

        match c {
            Some(b'\'') => self.open_string(StrFunc::SSYM, b'\'', None),
            Some(b'"') => self.open_string(StrFunc::DSYM, b'"', None),
            _ => self.pushback(c),
        }
        self.state = LexState::FNAME;
        TokenKind::SymBeg
    }

    pub(super) fn slash(&mut self, space_seen: bool) -> TokenKind {
        if self.state.is_beg() {
            self.open_string(StrFunc::REGEXP_LIT, b'/', None);
            return TokenKind::RegexpBeg;
        }
        let c = self.nextc();
        if c == Some(b'=') {
            return self.op_assign("/");
        }
        self.pushback(c);
        if self.is_space_arg(c, space_seen) {
            self.arg_ambiguous();
            self.open_string(StrFunc::REGEXP_LIT, b'/', None);
            return TokenKind::RegexpBeg;
        }
        self.set_operator_state();
        self.warn_balanced(c, space_seen, "/", "regexp literal");
        TokenKind::Divide
    }

    pub(super) fn caret(&mut self) -> TokenKind {
        let c = self.nextc();
        if c == Some(b'=') {
            return self.op_assign("^");
        }
        self.set_operator_state();
        self.pushback(c);
        TokenKind::Caret
    }

    pub(super) fn tilde(&mut self) -> TokenKind {
        if self.state.is_after_operator() {
            let c = self.nextc();
            if c != Some(b'@') {
                self.pushback(c);
            }
            self.state = LexState::ARG;
        } else {
            self.state = LexState::BEG;
        }
        TokenKind::Tilde
    }

    pub(super) fn left_paren(&mut self, space_seen: bool) -> TokenKind {
        let token = if self.state.is_beg() {
            TokenKind::LParen
        } else if self.state.is_arg() && space_seen {
            TokenKind::LParenArg
        } else {
            TokenKind::LParen2
        };
        self.paren_nest += 1;
        self.cond.stop();
        self.cmdarg.stop();
        self.state = LexState::BEG | LexState::LABEL;
        token
    }

    pub(super) fn left_bracket(&mut self, space_seen: bool) -> TokenKind {
        self.paren_nest += 1;
        if self.state.is_after_operator() {
            self.state = LexState::ARG;
            let c = self.nextc();
            if c == Some(b']') {
                self.paren_nest -= 1;
                if self.peek(b'=') {
                    self.nextc();
                    return TokenKind::Aset;
                }
                return TokenKind::Aref;
            }
            self.pushback(c);
            self.state |= LexState::LABEL;
            return TokenKind::Punct(b'[');
        }
        let token = if self.state.is_beg()
            || (self.state.is_arg() && (space_seen || self.state.contains(LexState::LABELED)))
        {
            TokenKind::LBrack
        } else {
            TokenKind::Punct(b'[')
        };
        self.state = LexState::BEG | LexState::LABEL;
        self.cond.stop();
        self.cmdarg.stop();
        token
    }

    pub(super) fn left_curly(&mut self) -> TokenKind {
        self.brace_nest += 1;
        if self.lambda_beginning() {
            self.state = LexState::BEG;
            self.left_paren_begin = 0;
            self.paren_nest -= 1;
            self.cond.stop();
            self.cmdarg.stop();
            return TokenKind::LamBeg;
        }

        let token = if self.state.contains(LexState::LABELED) {
            TokenKind::LBrace
        } else if self
            .state
            .intersects(LexState::ARG_ANY | LexState::END | LexState::ENDFN)
        {
            TokenKind::LCurly
        } else if self.state.contains(LexState::ENDARG) {
            TokenKind::LBraceArg
        } else {
            TokenKind::LBrace
        };

        self.cond.stop();
        self.cmdarg.stop();
        self.state = LexState::BEG;
        if token != TokenKind::LBraceArg {
            self.state |= LexState::LABEL;
        }
        if token != TokenKind::LBrace {
            self.command_start = true;
        }
        token
    }

    /// Is a `{` or `do` here the body of a `->(...)` lambda?
    pub(super) fn lambda_beginning(&self) -> bool {
        self.left_paren_begin > 0 && self.left_paren_begin == self.paren_nest
    }

    pub(super) fn percent(&mut self, space_seen: bool) -> LexResult<TokenKind> {
        if self.state.is_beg() {
            let c = self.nextc();
            return self.percent_literal(c);
        }
        let c = self.nextc();
        if c == Some(b'=') {
            return Ok(self.op_assign("%"));
        }
        if self.is_space_arg(c, space_seen)
            || (self.state.contains(LexState::FITEM) && c == Some(b's'))
        {
            return self.percent_literal(c);
        }
        self.set_operator_state();
        self.pushback(c);
        self.warn_balanced(c, space_seen, "%", "string literal");
        Ok(TokenKind::Percent)
    }

    /// `%w[...]` and friends. `c` is the byte after the `%`.
    fn percent_literal(&mut self, c: Option<u8>) -> LexResult<TokenKind> {
        let (kind, term) = match c {
            Some(c) if c.is_ascii_alphanumeric() => {
                let term = self.nextc();
                if term.is_some_and(|t| t.is_ascii_alphanumeric() || t >= 0x80) {
                    return Err(self.syntax_error(
                        DiagnosticKind::UnknownPercentLiteral,
                        "unknown type of %string",
                    ));
                }
                (c, term)
            }
            other => (b'Q', other),
        };
        let Some(term) = term else {
            return Err(self.syntax_error(
                DiagnosticKind::UnterminatedQuotedString,
                "unterminated quoted string meets end of file",
            ));
        };

        let (term, paren) = match term {
            b'(' => (b')', Some(b'(')),
            b'[' => (b']', Some(b'[')),
            b'{' => (b'}', Some(b'{')),
            b'<' => (b'>', Some(b'<')),
            other => (other, None),
        };

        let (func, token) = match kind {
            b'Q' => (StrFunc::DQUOTE, TokenKind::StringBeg),
            b'q' => (StrFunc::SQUOTE, TokenKind::StringBeg),
            b'W' => (StrFunc::DWORD, TokenKind::WordsBeg),
            b'w' => (StrFunc::SWORD, TokenKind::QWordsBeg),
            b'I' => (StrFunc::DWORD, TokenKind::SymbolsBeg),
            b'i' => (StrFunc::SWORD, TokenKind::QSymbolsBeg),
            b'x' => (StrFunc::XQUOTE, TokenKind::XStringBeg),
            b'r' => (StrFunc::REGEXP_LIT, TokenKind::RegexpBeg),
            b's' => (StrFunc::SSYM, TokenKind::SymBeg),
            _ => {
                return Err(self.syntax_error(
                    DiagnosticKind::UnknownPercentLiteral,
                    "unknown type of %string",
                ));
            }
        };
        self.open_string(func, term, paren);

        match token {
            TokenKind::WordsBeg
            | TokenKind::QWordsBeg
            | TokenKind::SymbolsBeg
            | TokenKind::QSymbolsBeg => {
                let mut c = self.nextc();
                while c.is_some_and(is_space) {
                    c = self.nextc();
                }
                self.pushback(c);
            }
            TokenKind::SymBeg => self.state = LexState::FNAME | LexState::FITEM,
            _ => {}
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests;
