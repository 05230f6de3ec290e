//! In-memory source backend.
//!
//! The whole input is available, so carriage-return normalization is done
//! lazily: a `"\r"` is decoded together with the byte after it at the moment
//! it is read or peeked. Unreading the unit that was just read simply moves
//! the position back over the raw bytes it covered.

use std::collections::VecDeque;
use std::io;

use crate::source::{CarriageReturns, History, Unit};
use crate::Source;

/// Cursor over a borrowed byte buffer.
#[derive(Clone, Debug)]
pub struct BytesSource<'a> {
    bytes: &'a [u8],
    /// Next raw byte of `bytes` to decode.
    pos: usize,
    /// Pushed-back units, consulted before `bytes`.
    pending: VecDeque<Unit>,
    history: History,
    line: usize,
    offset: usize,
    carriage_returns: CarriageReturns,
}

impl<'a> BytesSource<'a> {
    /// Create a cursor at the start of `bytes`, on line 0.
    pub fn new(bytes: &'a [u8]) -> Self {
        BytesSource {
            bytes,
            pos: 0,
            pending: VecDeque::new(),
            history: History::default(),
            line: 0,
            offset: 0,
            carriage_returns: CarriageReturns::default(),
        }
    }

    /// Create a cursor whose first line is numbered `line`.
    #[must_use]
    pub fn with_start_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Bytes not yet consumed from the buffer (pushback excluded).
    ///
    /// After `__END__` this is the data section.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Decode the unit starting at raw position `p`.
    #[inline]
    fn decode(&self, p: usize) -> Option<Unit> {
        let b = *self.bytes.get(p)?;
        let unit = if b == b'\r' {
            if self.bytes.get(p + 1) == Some(&b'\n') {
                Unit {
                    byte: b'\n',
                    width: 2,
                    primary: true,
                    lone_cr: false,
                }
            } else {
                Unit {
                    byte: b' ',
                    width: 1,
                    primary: true,
                    lone_cr: true,
                }
            }
        } else {
            Unit {
                byte: b,
                width: 1,
                primary: true,
                lone_cr: false,
            }
        };
        Some(unit)
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

impl Source for BytesSource<'_> {
    fn read(&mut self) -> Option<u8> {
        let unit = if let Some(unit) = self.pending.pop_front() {
            unit
        } else {
            let unit = self.decode(self.pos)?;
            self.pos += usize::from(unit.width);
            unit
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
            Some(unit) if unit.primary && unit.byte == c && self.pending.is_empty() => {
                self.pos -= usize::from(unit.width);
            }
            _ => self.pending.push_front(Unit::pushed(c, width)),
        }
    }

    fn at(&mut self, offset: isize) -> Option<u8> {
        if offset < 0 {
            return self.history.get(offset.unsigned_abs());
        }
        let mut k = offset.unsigned_abs();
        if let Some(unit) = self.pending.get(k) {
            return Some(unit.byte);
        }
        k -= self.pending.len();
        let mut p = self.pos;
        loop {
            let unit = self.decode(p)?;
            if k == 0 {
                return Some(unit.byte);
            }
            p += usize::from(unit.width);
            k -= 1;
        }
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
        None
    }

    fn read_line_bytes(&mut self) -> (Vec<u8>, bool) {
        // Fast path: no pushback and no carriage return before the newline,
        // so the raw bytes are already normalized.
        if self.pending.is_empty() {
            let rest = &self.bytes[self.pos..];
            let end = memchr::memchr(b'\n', rest).unwrap_or(rest.len());
            if memchr::memchr(b'\r', &rest[..end]).is_none() {
                let line = rest[..end].to_vec();
                for &b in &line {
                    self.consume(Unit {
                        byte: b,
                        width: 1,
                        primary: true,
                        lone_cr: false,
                    });
                }
                self.pos += end;
                if end < rest.len() {
                    self.pos += 1;
                    self.consume(Unit {
                        byte: b'\n',
                        width: 1,
                        primary: true,
                        lone_cr: false,
                    });
                    return (line, true);
                }
                return (line, false);
            }
        }

        let mut line = Vec::new();
        loop {
            match self.read() {
                Some(b'\n') => return (line, true),
                Some(c) => line.push(c),
                None => return (line, false),
            }
        }
    }
}

impl<'a> From<&'a str> for BytesSource<'a> {
    fn from(source: &'a str) -> Self {
        BytesSource::new(source.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for BytesSource<'a> {
    fn from(source: &'a [u8]) -> Self {
        BytesSource::new(source)
    }
}
