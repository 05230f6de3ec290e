//! The lexer state machine.
//!
//! [`Lexer::next_token`] is a single re-entrant dispatch over the next
//! source byte. Whitespace, comments and line continuations loop without
//! producing a token; everything else is routed to a scanning rule in one
//! of the submodules:
//!
//! - `operators`: punctuation, whose meaning depends on the mode bits
//! - `identifiers`: names, keywords, labels and `$`/`@` variables
//! - `numbers`: numeric literals and their suffixes
//! - `strings`: openers of quoted literals and the string-term scanner
//! - `heredoc`: heredoc identifiers and bodies
//! - `escapes`: backslash escapes shared by strings and `?x` literals
//! - `magic_comment`: `# coding:` style comments
//!
//! While a quoted literal is open the lexer holds a [`StrTerm`] and the
//! string scanner runs instead of the main dispatch. An interpolation
//! (`#{`) suspends the term together with the nesting context and resumes
//! it at the matching `}`.

mod escapes;
mod heredoc;
mod identifiers;
mod magic_comment;
mod numbers;
mod operators;
mod strings;

use std::io;
use std::ops::Range;
use std::sync::Arc;

use rb_diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, LexResult, SyntaxError};
use rb_lexer_core::{Encoding, PositionTracker, Source, SourcePosition};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::LexerConfig;
use crate::state::{LexState, StackState};
use crate::string_term::StrTerm;
use crate::token::TokenKind;
use crate::value::TokenValue;

/// Parser-owned flags the lexer consults.
///
/// A plain snapshot: the parser saves it with [`Lexer::context`] around a
/// method definition and puts it back with [`Lexer::restore_context`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LexContext {
    pub in_def: bool,
    pub in_single: bool,
    pub in_class: bool,
    /// Inside keyword-argument defaults: a newline after a label ends the
    /// argument instead of being skipped.
    pub in_kwarg: bool,
    pub in_defined: bool,
}

/// Main-scan context saved while an interpolated expression is lexed.
#[derive(Clone, Debug)]
struct Suspended {
    term: StrTerm,
    cond: StackState,
    cmdarg: StackState,
    state: LexState,
    brace_nest: i32,
}

/// One scope of declared local variables.
#[derive(Clone, Debug, Default)]
struct LocalScope {
    names: FxHashSet<Vec<u8>>,
    /// Block scopes also see the enclosing scope's variables.
    inherits: bool,
}

/// Hand-written Ruby lexer over any [`Source`].
///
/// Warnings go to the [`DiagnosticSink`] `W`; fatal errors are returned.
/// The semantic value of the last token is read with [`value`](Self::value)
/// right after [`next_token`](Self::next_token) returns.
pub struct Lexer<S: Source, W: DiagnosticSink> {
    source: S,
    sink: W,
    config: LexerConfig,
    tracker: PositionTracker,
    encoding: Encoding,

    state: LexState,
    /// Mode at the start of the token being scanned.
    last_state: LexState,
    cond: StackState,
    cmdarg: StackState,
    paren_nest: i32,
    /// `paren_nest` just inside a `->(` parameter list, 0 when none.
    left_paren_begin: i32,
    brace_nest: i32,
    command_start: bool,
    context: LexContext,
    locals: Vec<LocalScope>,

    strterm: Option<StrTerm>,
    suspended: SmallVec<[Suspended; 4]>,
    /// Term to resume after the variable following `#@`/`#$`.
    pending_dvar: Option<StrTerm>,
    /// Line to continue on once the rest of a heredoc's starting line has
    /// been scanned.
    heredoc_end: Option<usize>,

    tok: Vec<u8>,
    value: TokenValue,
    token_line: usize,
    token_column: usize,
    token_offset: usize,

    prepared: bool,
    has_shebang: bool,
    token_seen: bool,
    end_seen: bool,
    frozen_string_literal: Option<bool>,
    warn_indent: bool,
    warn_past_scope: bool,
    io_error: Option<io::Error>,
}

impl<S: Source, W: DiagnosticSink> Lexer<S, W> {
    /// Create a lexer over `source`.
    ///
    /// A non-zero `config.start_line` renumbers the source's current line.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %config.file_name))]
    pub fn new(mut source: S, config: LexerConfig, sink: W) -> Self {
        if config.start_line != 0 {
            source.set_line(config.start_line);
        }
        let tracker = PositionTracker::new(Arc::clone(&config.file_name));
        let encoding = config.encoding;
        let frozen_string_literal = config.frozen_string_literal;
        Lexer {
            source,
            sink,
            config,
            tracker,
            encoding,
            state: LexState::BEG,
            last_state: LexState::BEG,
            cond: StackState::new(),
            cmdarg: StackState::new(),
            paren_nest: 0,
            left_paren_begin: 0,
            brace_nest: 0,
            command_start: true,
            context: LexContext::default(),
            locals: vec![LocalScope::default()],
            strterm: None,
            suspended: SmallVec::new(),
            pending_dvar: None,
            heredoc_end: None,
            tok: Vec::new(),
            value: TokenValue::None,
            token_line: 0,
            token_column: 0,
            token_offset: 0,
            prepared: false,
            has_shebang: false,
            token_seen: false,
            end_seen: false,
            frozen_string_literal,
            warn_indent: false,
            warn_past_scope: false,
            io_error: None,
        }
    }

    // === Token stream ===

    /// Scan the next token.
    ///
    /// Returns [`TokenKind::EndOfInput`] at the end of the source, at a
    /// NUL, `^D` or `^Z` byte, and after `__END__`.
    pub fn next_token(&mut self) -> LexResult<(TokenKind, SourcePosition)> {
        if !self.prepared {
            self.prepare();
        }
        self.value = TokenValue::None;
        let dvar_term = self.pending_dvar.take();

        let result = self.yylex();
        if let Some(err) = self.io_error.take() {
            return Err(self.syntax_error(DiagnosticKind::Io, format!("read error: {err}")));
        }
        let kind = result?;

        if let Some(term) = dvar_term {
            self.strterm = Some(term);
        }
        if let Some(line) = self.source.take_carriage_return() {
            let position = SourcePosition::new(Arc::clone(self.tracker.file()), line);
            self.report(Diagnostic::warning(
                DiagnosticKind::CarriageReturn,
                "encountered \\r in middle of line, treated as a mere space",
                position,
            ));
        }
        if kind != TokenKind::EndOfInput {
            self.token_seen = true;
        }

        let position = self.token_position();
        trace!(
            token = kind.name(),
            state = %self.state.describe(),
            line = position.line() + 1,
            "token"
        );
        Ok((kind, position))
    }

    /// Semantic value of the token last returned.
    #[inline]
    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    /// Move the semantic value out, leaving [`TokenValue::None`].
    pub fn take_value(&mut self) -> TokenValue {
        std::mem::take(&mut self.value)
    }

    /// Byte range of the last token in the original source.
    ///
    /// For heredoc bodies and for tokens scanned from the resumed rest of
    /// a heredoc's starting line the range is approximate.
    pub fn token_span(&self) -> Range<usize> {
        self.token_offset..self.source.offset().max(self.token_offset)
    }

    // === Lexer state mutators ===

    #[inline]
    pub fn state(&self) -> LexState {
        self.state
    }

    pub fn set_state(&mut self, state: LexState) {
        self.state = state;
    }

    pub fn cond_push(&mut self, value: bool) {
        self.cond.push(value);
    }

    pub fn cond_pop(&mut self) -> bool {
        self.cond.pop()
    }

    pub fn cond_lexpop(&mut self) {
        self.cond.lexpop();
    }

    pub fn cond_is_set(&self) -> bool {
        self.cond.is_in_state()
    }

    pub fn cmdarg_push(&mut self, value: bool) {
        self.cmdarg.push(value);
    }

    pub fn cmdarg_pop(&mut self) -> bool {
        self.cmdarg.pop()
    }

    pub fn cmdarg_lexpop(&mut self) {
        self.cmdarg.lexpop();
    }

    pub fn cmdarg_is_set(&self) -> bool {
        self.cmdarg.is_in_state()
    }

    /// The whole command-argument stack, saved by the parser around
    /// constructs that reset it.
    pub fn cmdarg_stack(&self) -> StackState {
        self.cmdarg
    }

    pub fn set_cmdarg_stack(&mut self, stack: StackState) {
        self.cmdarg = stack;
    }

    pub fn paren_nest(&self) -> i32 {
        self.paren_nest
    }

    pub fn set_paren_nest(&mut self, nest: i32) {
        self.paren_nest = nest;
    }

    pub fn left_paren_begin(&self) -> i32 {
        self.left_paren_begin
    }

    pub fn set_left_paren_begin(&mut self, value: i32) {
        self.left_paren_begin = value;
    }

    pub fn brace_nest(&self) -> i32 {
        self.brace_nest
    }

    pub fn set_brace_nest(&mut self, nest: i32) {
        self.brace_nest = nest;
    }

    pub fn command_start(&self) -> bool {
        self.command_start
    }

    pub fn set_command_start(&mut self, value: bool) {
        self.command_start = value;
    }

    #[inline]
    pub fn context(&self) -> LexContext {
        self.context
    }

    pub fn restore_context(&mut self, context: LexContext) {
        self.context = context;
    }

    pub fn context_mut(&mut self) -> &mut LexContext {
        &mut self.context
    }

    // === Local variables ===

    /// Open a scope that does not see enclosing locals (`def`, `class`).
    pub fn push_local_scope(&mut self) {
        self.locals.push(LocalScope::default());
    }

    /// Open a block scope, which sees the enclosing scope's locals.
    pub fn push_block_scope(&mut self) {
        self.locals.push(LocalScope {
            names: FxHashSet::default(),
            inherits: true,
        });
    }

    pub fn pop_local_scope(&mut self) {
        debug_assert!(self.locals.len() > 1, "popped the top-level local scope");
        if self.locals.len() > 1 {
            self.locals.pop();
        }
    }

    pub fn declare_local(&mut self, name: &[u8]) {
        if let Some(scope) = self.locals.last_mut() {
            scope.names.insert(name.to_vec());
        }
    }

    /// Is `name` a local variable visible from the current scope?
    pub fn is_local(&self, name: &[u8]) -> bool {
        for scope in self.locals.iter().rev() {
            if scope.names.contains(name) {
                return true;
            }
            if !scope.inherits {
                break;
            }
        }
        false
    }

    // === Source-level facts ===

    /// Current source encoding, as changed by magic comments.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Was `__END__` reached?
    pub fn end_seen(&self) -> bool {
        self.end_seen
    }

    pub fn frozen_string_literal(&self) -> Option<bool> {
        self.frozen_string_literal
    }

    pub fn warn_indent(&self) -> bool {
        self.warn_indent
    }

    pub fn warn_past_scope(&self) -> bool {
        self.warn_past_scope
    }

    pub fn has_shebang(&self) -> bool {
        self.has_shebang
    }

    /// The open string term, if any.
    pub fn str_term(&self) -> Option<&StrTerm> {
        self.strterm.as_ref()
    }

    /// Zero-based line of the cursor.
    pub fn line(&self) -> usize {
        self.source.line()
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_parts(self) -> (S, W) {
        (self.source, self.sink)
    }

    /// Forget all scanning state, keeping the source where it is.
    pub fn reset(&mut self) {
        self.state = LexState::BEG;
        self.last_state = LexState::BEG;
        self.cond.reset();
        self.cmdarg.reset();
        self.paren_nest = 0;
        self.left_paren_begin = 0;
        self.brace_nest = 0;
        self.command_start = true;
        self.context = LexContext::default();
        self.locals = vec![LocalScope::default()];
        self.strterm = None;
        self.suspended.clear();
        self.pending_dvar = None;
        self.heredoc_end = None;
        self.tok.clear();
        self.value = TokenValue::None;
        self.token_seen = false;
        self.end_seen = false;
        self.tracker.reset();
        debug!("lexer reset");
    }

    // === Main dispatch ===

    fn yylex(&mut self) -> LexResult<TokenKind> {
        if self.end_seen {
            return Ok(TokenKind::EndOfInput);
        }
        if let Some(term) = self.strterm.take() {
            return self.string_term_token(term);
        }

        let command_state = self.command_start;
        self.command_start = false;
        let mut space_seen = false;

        loop {
            self.last_state = self.state;
            self.newtok();
            let Some(c) = self.nextc() else {
                return Ok(TokenKind::EndOfInput);
            };

            match c {
                0 | 0x04 | 0x1a => return Ok(TokenKind::EndOfInput),
                b' ' | b'\t' | 0x0c | b'\r' | 0x0b => space_seen = true,
                b'#' => {
                    self.comment()?;
                    if let Some(token) = self.newline(&mut space_seen) {
                        return Ok(token);
                    }
                }
                b'\n' => {
                    if let Some(token) = self.newline(&mut space_seen) {
                        return Ok(token);
                    }
                }
                b'*' => return Ok(self.star(space_seen)),
                b'!' => return Ok(self.bang()),
                b'=' => {
                    if self.source.was_begin_of_line() && self.embedded_document()? {
                        continue;
                    }
                    return Ok(self.equal());
                }
                b'<' => return self.less_than(space_seen),
                b'>' => return Ok(self.greater_than()),
                b'"' => return Ok(self.double_quote(command_state)),
                b'`' => return Ok(self.backtick(command_state)),
                b'\'' => return Ok(self.single_quote(command_state)),
                b'?' => return self.question_mark(),
                b'&' => return Ok(self.ampersand(space_seen)),
                b'|' => return Ok(self.pipe()),
                b'+' => return self.plus(space_seen),
                b'-' => return self.minus(space_seen),
                b'.' => return self.dot(),
                b'0'..=b'9' => return self.parse_number(c),
                b')' => return Ok(self.right_paren()),
                b']' => return Ok(self.right_bracket()),
                b'}' => return Ok(self.right_curly()),
                b':' => return Ok(self.colon(space_seen)),
                b'/' => return Ok(self.slash(space_seen)),
                b'^' => return Ok(self.caret()),
                b';' => {
                    self.state = LexState::BEG;
                    self.command_start = true;
                    return Ok(TokenKind::Punct(b';'));
                }
                b',' => {
                    self.state = LexState::BEG | LexState::LABEL;
                    return Ok(TokenKind::Punct(b','));
                }
                b'~' => return Ok(self.tilde()),
                b'(' => return Ok(self.left_paren(space_seen)),
                b'[' => return Ok(self.left_bracket(space_seen)),
                b'{' => return Ok(self.left_curly()),
                b'\\' => {
                    if self.peek(b'\n') {
                        self.nextc();
                        space_seen = true;
                        continue;
                    }
                    return Ok(TokenKind::Punct(b'\\'));
                }
                b'%' => return self.percent(space_seen),
                b'$' => return self.dollar(),
                b'@' => return self.at(),
                b'_' => {
                    if self.source.was_begin_of_line() && self.end_marker() {
                        return Ok(TokenKind::EndOfInput);
                    }
                    return self.identifier(c, command_state);
                }
                _ => return self.identifier(c, command_state),
            }
        }
    }

    /// Handle a newline (or the end of a comment line).
    ///
    /// Returns `None` when the newline is insignificant and scanning should
    /// continue with the next line.
    fn newline(&mut self, space_seen: &mut bool) -> Option<TokenKind> {
        let beg = self
            .state
            .intersects(LexState::BEG | LexState::CLASS | LexState::FNAME | LexState::DOT)
            && !self.state.contains(LexState::LABELED);
        if beg || self.state.contains(LexState::ARG | LexState::LABELED) {
            if !beg && self.context.in_kwarg {
                return Some(self.normal_newline());
            }
            return None;
        }

        // A line starting with `.foo` or `&.foo` continues the expression.
        let mut skipped: SmallVec<[u8; 16]> = SmallVec::new();
        loop {
            match self.nextc() {
                Some(c @ (b' ' | b'\t' | 0x0c | b'\r' | 0x0b)) => {
                    *space_seen = true;
                    skipped.push(c);
                }
                Some(c @ (b'.' | b'&')) if self.peek(b'.') == (c == b'&') => {
                    self.pushback(Some(c));
                    return None;
                }
                None => break,
                other => {
                    self.pushback(other);
                    self.source.unread_many(&skipped);
                    break;
                }
            }
        }
        Some(self.normal_newline())
    }

    fn normal_newline(&mut self) -> TokenKind {
        self.command_start = true;
        self.state = LexState::BEG;
        TokenKind::Punct(b'\n')
    }

    /// Skip a comment line, applying any magic comment on it.
    ///
    /// Leaves the cursor after the newline.
    fn comment(&mut self) -> LexResult<()> {
        let at_top = self.comment_at_top();
        let (text, had_newline) = self.source.read_line_bytes();
        if had_newline {
            self.newline_consumed();
        } else {
            self.note_end_of_input();
        }
        if !self.magic_comment(&text, at_top)? && at_top {
            self.set_file_encoding(&text)?;
        }
        Ok(())
    }

    /// Is the `#` just read the first non-blank byte of the first line (or
    /// the second, after a shebang)?
    fn comment_at_top(&self) -> bool {
        let first = self.config.start_line + usize::from(self.has_shebang);
        if self.source.line() != first {
            return false;
        }
        let prefix = self.source.line_prefix();
        prefix[..prefix.len().saturating_sub(1)]
            .iter()
            .all(|&b| is_space(b))
    }

    /// `=begin` ... `=end`. Called with the `=` consumed at a line start.
    fn embedded_document(&mut self) -> LexResult<bool> {
        let opens = b"begin"
            .iter()
            .zip(0isize..)
            .all(|(&b, i)| self.source.at(i) == Some(b))
            && self.source.at(5).is_some_and(is_space);
        if !opens {
            return Ok(false);
        }
        debug!(line = self.source.line() + 1, "embedded document");
        let start_line = self.source.line();
        loop {
            self.skip_to_line_end();
            if self.nextc().is_none() {
                return Err(self.syntax_error_at(
                    start_line,
                    DiagnosticKind::UnterminatedEmbeddedDocument,
                    "embedded document meets end of file",
                ));
            }
            match self.nextc() {
                None => {
                    return Err(self.syntax_error_at(
                        start_line,
                        DiagnosticKind::UnterminatedEmbeddedDocument,
                        "embedded document meets end of file",
                    ));
                }
                Some(b'=') => {
                    let closes = self.source.at(0) == Some(b'e')
                        && self.source.at(1) == Some(b'n')
                        && self.source.at(2) == Some(b'd')
                        && self.source.at(3).map_or(true, is_space);
                    if closes {
                        self.skip_to_line_end();
                        return Ok(true);
                    }
                }
                other => self.pushback(other),
            }
        }
    }

    /// Consume up to, not including, the next newline.
    fn skip_to_line_end(&mut self) {
        while let Some(c) = self.source.at(0) {
            if c == b'\n' {
                break;
            }
            self.source.read();
        }
    }

    /// `__END__` on a line of its own. Called with the `_` consumed.
    fn end_marker(&mut self) -> bool {
        self.pushback(Some(b'_'));
        if self.source.match_marker(b"__END__", false, true) {
            debug!(line = self.source.line(), "__END__ seen");
            self.end_seen = true;
            return true;
        }
        self.nextc();
        false
    }

    /// Byte-order mark and shebang handling before the first token.
    fn prepare(&mut self) {
        self.prepared = true;
        match self.source.at(0) {
            Some(b'#') => self.has_shebang = self.source.at(1) == Some(b'!'),
            Some(0xef) if self.source.at(1) == Some(0xbb) && self.source.at(2) == Some(0xbf) => {
                for _ in 0..3 {
                    self.source.read();
                }
                self.encoding = Encoding::Utf8;
                debug!("byte order mark; source is UTF-8");
            }
            _ => {}
        }
    }

    // === Cursor helpers ===

    #[inline]
    fn nextc(&mut self) -> Option<u8> {
        let c = self.source.read();
        match c {
            Some(b'\n') => self.newline_consumed(),
            None => self.note_end_of_input(),
            Some(_) => {}
        }
        c
    }

    /// A newline was consumed: jump past a heredoc body read out of order.
    #[inline]
    fn newline_consumed(&mut self) {
        if let Some(line) = self.heredoc_end.take() {
            self.source.set_line(line);
        }
    }

    fn note_end_of_input(&mut self) {
        if self.io_error.is_none() {
            self.io_error = self.source.take_io_error();
        }
    }

    #[inline]
    fn pushback(&mut self, c: Option<u8>) {
        self.source.unread(c);
    }

    #[inline]
    fn peek(&mut self, c: u8) -> bool {
        self.source.peek(c)
    }

    /// `name:` but not `name::`.
    #[inline]
    fn is_label_suffix(&mut self) -> bool {
        self.source.peek(b':') && !self.source.peek_at(b':', 1)
    }

    /// Argument position, after a space, not followed by a space: the
    /// `foo -1` / `foo *a` shape.
    #[inline]
    fn is_space_arg(&self, c: Option<u8>, space_seen: bool) -> bool {
        self.state.is_arg() && space_seen && !c.is_some_and(is_space)
    }

    fn newtok(&mut self) {
        self.tok.clear();
        self.token_line = self.source.line();
        self.token_column = self.source.column();
        self.token_offset = self.source.offset();
    }

    #[inline]
    fn tokadd(&mut self, c: u8) {
        self.tok.push(c);
    }

    /// The token buffer as a name value.
    fn tok_name(&self) -> TokenValue {
        TokenValue::Name(self.tok.clone())
    }

    /// Add the (possibly multi-byte) character starting with `c` to the
    /// token buffer.
    fn tokadd_mbchar(&mut self, c: u8) -> LexResult<()> {
        self.tokadd(c);
        if c < 0x80 {
            return Ok(());
        }
        let mut lookahead: SmallVec<[u8; 6]> = SmallVec::new();
        lookahead.push(c);
        for k in 0..5 {
            match self.source.at(k) {
                Some(b) => lookahead.push(b),
                None => break,
            }
        }
        let Some(len) = self.encoding.char_len(&lookahead) else {
            return Err(self.syntax_error(
                DiagnosticKind::InvalidMultibyteChar,
                format!("invalid multibyte char ({})", self.encoding),
            ));
        };
        for _ in 1..len {
            if let Some(b) = self.nextc() {
                self.tokadd(b);
            }
        }
        Ok(())
    }

    // === Positions and diagnostics ===

    fn token_position(&mut self) -> SourcePosition {
        let explicit = (self.source.line() != self.token_line)
            .then(|| SourcePosition::new(Arc::clone(self.tracker.file()), self.token_line));
        self.tracker
            .current(explicit.as_ref(), self.token_line, self.token_column == 0)
    }

    fn position(&mut self) -> SourcePosition {
        let line = self.source.line();
        let at_start = self.source.column() == 0;
        self.tracker.current(None, line, at_start)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.config.warnings_enabled {
            self.sink.report(diagnostic);
        }
    }

    /// Warn unconditionally.
    fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        if self.config.warnings_enabled {
            let position = self.position();
            self.sink.report(Diagnostic::warning(kind, message, position));
        }
    }

    /// Warn only in verbose mode.
    fn warn_verbose(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        if self.config.verbose {
            self.warn(kind, message);
        }
    }

    /// `a -b` where `a` is a local: binary minus, but it looks unary.
    fn warn_balanced(&mut self, c: Option<u8>, space_seen: bool, op: &str, syn: &str) {
        let quiet = LexState::CLASS
            | LexState::DOT
            | LexState::FNAME
            | LexState::ENDFN
            | LexState::ENDARG;
        if !self.last_state.intersects(quiet) && space_seen && !c.is_some_and(is_space) {
            self.warn(
                DiagnosticKind::AmbiguousOperator,
                format!(
                    "`{op}' after local variable or literal is interpreted as binary operator \
                     even though it seems like {syn}"
                ),
            );
        }
    }

    /// `foo -1`: treated as an argument, with a warning.
    fn arg_ambiguous(&mut self) -> bool {
        self.warn(
            DiagnosticKind::AmbiguousArgument,
            "Ambiguous first argument; make sure.",
        );
        true
    }

    /// Fatal error at the cursor, underlining the current token.
    #[cold]
    fn syntax_error(&mut self, kind: DiagnosticKind, message: impl Into<String>) -> Box<SyntaxError> {
        let position = self.position();
        let end = self.source.column();
        let start = if self.token_line == self.source.line() {
            self.token_column.min(end)
        } else {
            0
        };
        let columns = start..end.max(start + 1);
        self.build_error(kind, position, message, columns)
    }

    /// Fatal error attributed to an earlier line, such as the start of an
    /// unterminated literal.
    #[cold]
    fn syntax_error_at(
        &mut self,
        line: usize,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Box<SyntaxError> {
        let position = SourcePosition::new(Arc::clone(self.tracker.file()), line);
        let end = self.source.column();
        self.build_error(kind, position, message, end..end)
    }

    fn build_error(
        &mut self,
        kind: DiagnosticKind,
        position: SourcePosition,
        message: impl Into<String>,
        columns: Range<usize>,
    ) -> Box<SyntaxError> {
        let message = message.into();
        debug!(kind = kind.as_str(), line = position.line() + 1, %message, "syntax error");
        let mut line = self.source.current_line();
        line.truncate(self.config.error_line_limit);
        Box::new(SyntaxError::new(kind, position, message).with_line(&line, columns))
    }
}

impl<S: Source + std::fmt::Debug, W: DiagnosticSink> std::fmt::Debug for Lexer<S, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("source", &self.source)
            .field("state", &self.state)
            .field("paren_nest", &self.paren_nest)
            .field("brace_nest", &self.brace_nest)
            .field("strterm", &self.strterm)
            .finish_non_exhaustive()
    }
}

/// `ISSPACE`: horizontal whitespace or newline.
#[inline]
pub(crate) fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Bytes that may continue an identifier.
#[inline]
pub(crate) fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c >= 0x80
}

#[cfg(test)]
mod tests;
