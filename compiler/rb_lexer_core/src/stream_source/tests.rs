use std::io::{self, ErrorKind, Read};

use crate::{BytesSource, Source, StreamSource};
use pretty_assertions::assert_eq;

/// Hands out one byte per call, interrupting every other call.
struct Trickle<'a> {
    bytes: &'a [u8],
    interrupt: bool,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::Error::new(ErrorKind::Interrupted, "try again"));
        }
        let Some((&first, rest)) = self.bytes.split_first() else {
            return Ok(0);
        };
        if buf.is_empty() {
            return Ok(0);
        }
        buf[0] = first;
        self.bytes = rest;
        Ok(1)
    }
}

/// Yields its bytes and then fails.
struct Broken<'a>(&'a [u8]);

impl Read for Broken<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() {
            return Err(io::Error::other("disk on fire"));
        }
        let n = self.0.len().min(buf.len());
        buf[..n].copy_from_slice(&self.0[..n]);
        self.0 = &self.0[n..];
        Ok(n)
    }
}

fn read_all(source: &mut impl Source) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(c) = source.read() {
        out.push(c);
    }
    out
}

// === Reading ===

#[test]
fn reads_from_slice() {
    let mut src = StreamSource::new(&b"a\nb"[..]);
    assert_eq!(read_all(&mut src), b"a\nb".to_vec());
    assert_eq!(src.line(), 1);
    assert_eq!(src.offset(), 3);
}

#[test]
fn retries_interrupted_reads() {
    let mut src = StreamSource::new(Trickle {
        bytes: b"x = 1\r\n",
        interrupt: false,
    });
    assert_eq!(read_all(&mut src), b"x = 1\n".to_vec());
    assert!(src.take_io_error().is_none());
}

#[test]
fn io_error_ends_input() {
    let mut src = StreamSource::new(Broken(b"ab"));
    assert_eq!(read_all(&mut src), b"ab".to_vec());
    let err = src.take_io_error();
    assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::Other));
    assert_eq!(src.read(), None);
}

// === Carriage returns ===

#[test]
fn crlf_and_lone_cr() {
    let mut src = StreamSource::new(&b"a\r\nb\rc\r"[..]);
    assert_eq!(read_all(&mut src), b"a\nb c ".to_vec());
    assert_eq!(src.offset(), 7);
    assert_eq!(src.take_carriage_return(), Some(1));
    assert_eq!(src.take_carriage_return(), None);
}

#[test]
fn lookahead_then_read_reports_carriage_return_once() {
    let mut src = StreamSource::new(&b"\rx"[..]);
    assert_eq!(src.at(1), Some(b'x'));
    assert_eq!(src.take_carriage_return(), None);
    assert_eq!(src.read(), Some(b' '));
    assert_eq!(src.take_carriage_return(), Some(0));
}

// === Pushback ===

#[test]
fn unread_of_read_is_identity() {
    let mut src = StreamSource::new(&b"ab\r\nc"[..]);
    src.read();
    src.read();
    let before = (src.offset(), src.line(), src.column());
    let c = src.read();
    src.unread(c);
    assert_eq!((src.offset(), src.line(), src.column()), before);
    assert_eq!(read_all(&mut src), b"\nc".to_vec());
}

#[test]
fn lookahead_does_not_move_cursor() {
    let mut src = StreamSource::new(&b"abc"[..]);
    assert_eq!(src.at(2), Some(b'c'));
    assert_eq!(src.at(3), None);
    assert_eq!(src.at(0), Some(b'a'));
    assert_eq!(src.offset(), 0);
    assert_eq!(read_all(&mut src), b"abc".to_vec());
}

// === Backend agreement ===

#[test]
fn matches_bytes_source_on_mixed_input() {
    let input = b"def f\r\n  x = <<EOS\rfoo\nEOS\n end\r";
    let mut stream = StreamSource::new(&input[..]);
    let mut bytes = BytesSource::new(input);
    loop {
        assert_eq!(stream.at(1), bytes.at(1));
        let (a, b) = (stream.read(), bytes.read());
        assert_eq!(a, b);
        assert_eq!(stream.offset(), bytes.offset());
        assert_eq!(stream.line(), bytes.line());
        assert_eq!(stream.column(), bytes.column());
        if a.is_none() {
            break;
        }
    }
}

#[test]
fn restore_line_replays_rest() {
    let mut src = StreamSource::new(&b"p <<A\nbody\nA\ntail"[..]);
    src.read();
    src.read();
    let prefix = src.line_prefix();
    let (mut rest, newline) = src.read_line_bytes();
    assert!(newline);
    rest.push(b'\n');
    src.read_line_bytes();
    assert!(src.match_marker(b"A", false, true));
    src.restore_line(&prefix, &rest, 0);
    assert_eq!(src.column(), 2);
    assert_eq!(read_all(&mut src), b"<<A\ntail".to_vec());
    assert_eq!(src.line(), 1);
}
