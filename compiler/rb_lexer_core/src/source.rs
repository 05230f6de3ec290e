//! The cursor contract shared by both source backends.
//!
//! A [`Source`] hands out normalized *units*: source bytes with `"\r\n"`
//! folded into a single `b'\n'` and a lone `"\r"` replaced by `b' '`.
//! End of input is `None`. Units that were consumed can be pushed back with
//! [`Source::unread`], peeked with [`Source::at`] in either direction, and
//! matched against literal markers with [`Source::match_marker`].
//!
//! Bookkeeping that both backends share lives here too: the consumed-unit
//! [`History`] (which answers negative `at()` offsets and column queries)
//! and the [`Unit`] record stored in pushback queues.

use std::io;

/// Horizontal whitespace as the lexer sees it: space, tab, form feed,
/// vertical tab and carriage return.
#[inline]
pub fn is_horizontal_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\x0c' | b'\x0b' | b'\r')
}

/// A pushback-capable cursor over normalized source units.
///
/// # Invariants
///
/// - `unread(read())` is a no-op: offset, line and all subsequent `read()`
///   and `at()` results are restored.
/// - `at(k)` never moves the cursor; repeated calls with the same `k` agree.
/// - The line counter advances when a `b'\n'` unit is read and retreats
///   when one is unread.
pub trait Source {
    /// Consume and return the next unit, or `None` at end of input.
    fn read(&mut self) -> Option<u8>;

    /// Push `c` back so it is the next unit `read()` returns.
    ///
    /// When `c` is the unit that was just read, this undoes that read.
    /// Otherwise `c` is queued in front of the remaining input.
    /// Unreading `None` (end of input) does nothing.
    fn unread(&mut self, c: Option<u8>);

    /// Peek `offset` units relative to the next unread unit.
    ///
    /// Negative offsets look at consumed history (`at(-1)` is the unit most
    /// recently read). History covers at least the current and previous
    /// line. Out-of-range offsets return `None`.
    fn at(&mut self, offset: isize) -> Option<u8>;

    /// Zero-based line of the next unread unit.
    fn line(&self) -> usize;

    /// Move the line counter, used when a parked heredoc line is resumed.
    fn set_line(&mut self, line: usize);

    /// Byte offset into the original source of the next unread unit.
    fn offset(&self) -> usize;

    /// Units consumed since the start of the current line.
    fn column(&self) -> usize;

    /// The consumed part of the current line.
    fn line_prefix(&self) -> Vec<u8>;

    /// Resume a parked line: history becomes `prefix`, `rest` is queued in
    /// front of the remaining input, and the line counter becomes `line`.
    fn restore_line(&mut self, prefix: &[u8], rest: &[u8], line: usize);

    /// Line of a lone `"\r"` normalized to a space since the last call.
    ///
    /// Reported at most once per line.
    fn take_carriage_return(&mut self) -> Option<usize>;

    /// An I/O error that cut the input short, if any.
    fn take_io_error(&mut self) -> Option<io::Error>;

    /// Push back several units so `bytes[0]` is read next.
    fn unread_many(&mut self, bytes: &[u8]) {
        for &b in bytes.iter().rev() {
            self.unread(Some(b));
        }
    }

    /// Is the next unit `c`?
    #[inline]
    fn peek(&mut self, c: u8) -> bool {
        self.at(0) == Some(c)
    }

    /// Is the unit `n` places ahead `c`?
    #[inline]
    fn peek_at(&mut self, c: u8, n: isize) -> bool {
        self.at(n) == Some(c)
    }

    /// Was the unit just read the first one on its line?
    fn was_begin_of_line(&mut self) -> bool {
        self.at(-1).is_some() && matches!(self.at(-2), None | Some(b'\n'))
    }

    /// Try to match `marker` at the current position.
    ///
    /// With `indent`, leading horizontal whitespace is skipped first. With
    /// `check_newline`, the marker must be followed by a newline or end of
    /// input, and that newline is consumed. On failure the cursor is left
    /// exactly where it started.
    fn match_marker(&mut self, marker: &[u8], indent: bool, check_newline: bool) -> bool {
        let mut consumed = Vec::with_capacity(marker.len() + 1);

        if indent {
            while let Some(c) = self.at(0) {
                if !is_horizontal_space(c) {
                    break;
                }
                self.read();
                consumed.push(c);
            }
        }

        for &expected in marker {
            match self.read() {
                Some(c) if c == expected => consumed.push(c),
                other => {
                    self.unread(other);
                    self.unread_many(&consumed);
                    return false;
                }
            }
        }

        if check_newline {
            match self.read() {
                Some(b'\n') | None => {}
                other => {
                    self.unread(other);
                    self.unread_many(&consumed);
                    return false;
                }
            }
        }

        true
    }

    /// Read up to and including the next newline.
    ///
    /// Returns the line without its newline and whether a newline ended it
    /// (as opposed to end of input).
    fn read_line_bytes(&mut self) -> (Vec<u8>, bool) {
        let mut line = Vec::new();
        loop {
            match self.read() {
                Some(b'\n') => return (line, true),
                Some(c) => line.push(c),
                None => return (line, false),
            }
        }
    }

    /// The whole current line without its newline: the consumed prefix plus
    /// lookahead up to the end of the line. Does not move the cursor.
    fn current_line(&mut self) -> Vec<u8> {
        let mut line = self.line_prefix();
        let mut k = 0;
        while let Some(c) = self.at(k) {
            if c == b'\n' {
                break;
            }
            line.push(c);
            k += 1;
        }
        line
    }
}

/// One normalized unit plus the bookkeeping needed to undo or replay it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Unit {
    pub(crate) byte: u8,
    /// Raw source bytes this unit stands for (2 for `"\r\n"`, 0 for
    /// injected bytes that never came from the source).
    pub(crate) width: u8,
    /// Read straight from the primary input rather than from pushback.
    pub(crate) primary: bool,
    /// A lone `"\r"` that was normalized to a space.
    pub(crate) lone_cr: bool,
}

impl Unit {
    pub(crate) fn pushed(byte: u8, width: u8) -> Self {
        Unit {
            byte,
            width,
            primary: false,
            lone_cr: false,
        }
    }
}

/// Consumed units for the current line and the one before it.
#[derive(Clone, Debug, Default)]
pub(crate) struct History {
    units: Vec<Unit>,
    /// Index into `units` where the current line starts.
    line_start: usize,
}

impl History {
    pub(crate) fn push(&mut self, unit: Unit) {
        self.units.push(unit);
        if unit.byte == b'\n' {
            self.units.drain(..self.line_start);
            self.line_start = self.units.len();
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Unit> {
        let unit = self.units.pop()?;
        if self.line_start > self.units.len() {
            self.line_start = self
                .units
                .iter()
                .rposition(|u| u.byte == b'\n')
                .map_or(0, |i| i + 1);
        }
        Some(unit)
    }

    /// The unit `back` places behind the cursor (`back >= 1`).
    pub(crate) fn get(&self, back: usize) -> Option<u8> {
        if back == 0 || back > self.units.len() {
            return None;
        }
        Some(self.units[self.units.len() - back].byte)
    }

    pub(crate) fn column(&self) -> usize {
        self.units.len() - self.line_start
    }

    pub(crate) fn line_prefix(&self) -> Vec<u8> {
        self.units[self.line_start..].iter().map(|u| u.byte).collect()
    }

    pub(crate) fn replace_line_prefix(&mut self, prefix: &[u8]) {
        self.units.truncate(self.line_start);
        self.units
            .extend(prefix.iter().map(|&b| Unit::pushed(b, 0)));
    }
}

/// Tracks the once-per-line lone carriage return notice.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CarriageReturns {
    last_line: Option<usize>,
    pending: Option<usize>,
}

impl CarriageReturns {
    pub(crate) fn note(&mut self, line: usize) {
        if self.last_line.map_or(true, |last| line > last) {
            self.last_line = Some(line);
            self.pending = Some(line);
        }
    }

    pub(crate) fn take(&mut self) -> Option<usize> {
        self.pending.take()
    }
}
