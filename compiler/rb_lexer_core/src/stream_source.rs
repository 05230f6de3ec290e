//! Streaming source backend over any [`Read`].
//!
//! Bytes are pulled through a [`BufReader`] one at a time. A `"\r"` needs one
//! byte of read-ahead to decide between `"\r\n"` and a lone carriage return;
//! the extra byte is parked in `raw_pending`. Lookahead requested through
//! `at()` is decoded into the pushback queue so it is never read twice.
//!
//! An I/O error ends the input: the error is stored for
//! [`Source::take_io_error`] and every later read reports end of input.

use std::collections::VecDeque;
use std::io::{self, BufReader, ErrorKind, Read};

use tracing::debug;

use crate::source::{CarriageReturns, History, Unit};
use crate::Source;

/// Cursor over a byte stream.
pub struct StreamSource<R: Read> {
    reader: BufReader<R>,
    /// Raw byte read ahead while deciding a carriage return.
    raw_pending: Option<u8>,
    exhausted: bool,
    error: Option<io::Error>,
    /// Decoded units not yet handed out: pushback and `at()` lookahead.
    pending: VecDeque<Unit>,
    history: History,
    line: usize,
    offset: usize,
    carriage_returns: CarriageReturns,
}

impl<R: Read> StreamSource<R> {
    /// Wrap `reader`, starting on line 0.
    pub fn new(reader: R) -> Self {
        StreamSource {
            reader: BufReader::new(reader),
            raw_pending: None,
            exhausted: false,
            error: None,
            pending: VecDeque::new(),
            history: History::default(),
            line: 0,
            offset: 0,
            carriage_returns: CarriageReturns::default(),
        }
    }

    /// Number the first line `line` instead of 0.
    #[must_use]
    pub fn with_start_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Consume the cursor, returning the reader.
    ///
    /// Bytes already buffered or decoded are lost.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn raw_byte(&mut self) -> Option<u8> {
        if let Some(b) = self.raw_pending.take() {
            return Some(b);
        }
        if self.exhausted {
            return None;
        }
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => {
                    self.exhausted = true;
                    return None;
                }
                Ok(_) => return Some(buf[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!(error = %e, "source stream failed; treating as end of input");
                    self.exhausted = true;
                    self.error = Some(e);
                    return None;
                }
            }
        }
    }

    /// Decode the next unit from the raw stream.
    fn decode(&mut self) -> Option<Unit> {
        let b = self.raw_byte()?;
        if b != b'\r' {
            return Some(Unit {
                byte: b,
                width: 1,
                primary: true,
                lone_cr: false,
            });
        }
        match self.raw_byte() {
            Some(b'\n') => Some(Unit {
                byte: b'\n',
                width: 2,
                primary: true,
                lone_cr: false,
            }),
            next => {
                self.raw_pending = next;
                Some(Unit {
                    byte: b' ',
                    width: 1,
                    primary: true,
                    lone_cr: true,
                })
            }
        }
    }

    fn consume(&mut self, unit: Unit) {
        if unit.lone_cr {
            self.carriage_returns.note(self.line);
        }
        self.offset += usize::from(unit.width);
        self.history.push(unit);
        if unit.byte == b'\n' {
            self.line += 1;
        }
    }
}

impl<R: Read> Source for StreamSource<R> {
    fn read(&mut self) -> Option<u8> {
        let unit = match self.pending.pop_front() {
            Some(unit) => unit,
            None => self.decode()?,
        };
        self.consume(unit);
        Some(unit.byte)
    }

    fn unread(&mut self, c: Option<u8>) {
        let Some(c) = c else { return };
        let popped = self.history.pop();
        if c == b'\n' {
            self.line = self.line.saturating_sub(1);
        }
        let width = popped.map_or(0, |u| u.width);
        self.offset = self.offset.saturating_sub(usize::from(width));
        match popped {
            // Put the original unit back so a lone CR is still flagged.
            Some(unit) if unit.byte == c => self.pending.push_front(unit),
            _ => self.pending.push_front(Unit::pushed(c, width)),
        }
    }

    fn at(&mut self, offset: isize) -> Option<u8> {
        if offset < 0 {
            return self.history.get(offset.unsigned_abs());
        }
        let k = offset.unsigned_abs();
        while self.pending.len() <= k {
            let unit = self.decode()?;
            self.pending.push_back(unit);
        }
        self.pending.get(k).map(|u| u.byte)
    }

    fn line(&self) -> usize {
        self.line
    }

    fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn column(&self) -> usize {
        self.history.column()
    }

    fn line_prefix(&self) -> Vec<u8> {
        self.history.line_prefix()
    }

    fn restore_line(&mut self, prefix: &[u8], rest: &[u8], line: usize) {
        self.history.replace_line_prefix(prefix);
        for &b in rest.iter().rev() {
            self.pending.push_front(Unit::pushed(b, 0));
        }
        self.line = line;
    }

    fn take_carriage_return(&mut self) -> Option<usize> {
        self.carriage_returns.take()
    }

    fn take_io_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: Read> std::fmt::Debug for StreamSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSource")
            .field("line", &self.line)
            .field("offset", &self.offset)
            .field("pending", &self.pending.len())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
