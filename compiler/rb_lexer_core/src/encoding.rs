//! Source encodings known to the lexer.
//!
//! Only the queries the lexer needs are modeled: name lookup for magic
//! comments, ASCII compatibility, and the byte width of the character at
//! a given position.

use std::fmt;

/// A source encoding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    UsAscii,
    /// Raw bytes (`BINARY`).
    Ascii8Bit,
    #[default]
    Utf8,
    Iso8859_1,
    EucJp,
    ShiftJis,
    Windows31j,
    Utf16Le,
    Utf16Be,
}

/// Canonical names and accepted aliases, compared case-insensitively.
const NAMES: &[(&str, Encoding)] = &[
    ("US-ASCII", Encoding::UsAscii),
    ("ASCII", Encoding::UsAscii),
    ("ANSI_X3.4-1968", Encoding::UsAscii),
    ("646", Encoding::UsAscii),
    ("ASCII-8BIT", Encoding::Ascii8Bit),
    ("BINARY", Encoding::Ascii8Bit),
    ("UTF-8", Encoding::Utf8),
    ("CP65001", Encoding::Utf8),
    ("ISO-8859-1", Encoding::Iso8859_1),
    ("ISO8859-1", Encoding::Iso8859_1),
    ("EUC-JP", Encoding::EucJp),
    ("eucJP", Encoding::EucJp),
    ("Shift_JIS", Encoding::ShiftJis),
    ("SJIS", Encoding::Windows31j),
    ("Windows-31J", Encoding::Windows31j),
    ("CP932", Encoding::Windows31j),
    ("csWindows31J", Encoding::Windows31j),
    ("UTF-16LE", Encoding::Utf16Le),
    ("UTF-16BE", Encoding::Utf16Be),
    ("UCS-2BE", Encoding::Utf16Be),
];

impl Encoding {
    /// Look up an encoding by name or alias, ignoring case.
    pub fn from_name(name: &[u8]) -> Option<Encoding> {
        NAMES
            .iter()
            .find(|(candidate, _)| candidate.as_bytes().eq_ignore_ascii_case(name))
            .map(|&(_, enc)| enc)
    }

    /// Canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::UsAscii => "US-ASCII",
            Encoding::Ascii8Bit => "ASCII-8BIT",
            Encoding::Utf8 => "UTF-8",
            Encoding::Iso8859_1 => "ISO-8859-1",
            Encoding::EucJp => "EUC-JP",
            Encoding::ShiftJis => "Shift_JIS",
            Encoding::Windows31j => "Windows-31J",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
        }
    }

    /// Do bytes below 0x80 mean the same thing as in ASCII?
    pub const fn is_ascii_compatible(self) -> bool {
        !matches!(self, Encoding::Utf16Le | Encoding::Utf16Be)
    }

    /// Width of the character starting at `bytes[0]`.
    ///
    /// Returns `None` for an invalid or truncated sequence (or empty input).
    pub fn char_len(self, bytes: &[u8]) -> Option<usize> {
        let &lead = bytes.first()?;
        match self {
            Encoding::UsAscii => (lead < 0x80).then_some(1),
            Encoding::Ascii8Bit | Encoding::Iso8859_1 => Some(1),
            Encoding::Utf8 => utf8_len(bytes),
            Encoding::EucJp => euc_jp_len(bytes),
            Encoding::ShiftJis | Encoding::Windows31j => shift_jis_len(bytes),
            Encoding::Utf16Le | Encoding::Utf16Be => utf16_len(self, bytes),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

fn utf8_len(bytes: &[u8]) -> Option<usize> {
    let lead = bytes[0];
    let (len, min_second, max_second) = match lead {
        0x00..=0x7F => return Some(1),
        0xC2..=0xDF => (2, 0x80, 0xBF),
        0xE0 => (3, 0xA0, 0xBF),
        0xED => (3, 0x80, 0x9F),
        0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80, 0xBF),
        0xF0 => (4, 0x90, 0xBF),
        0xF1..=0xF3 => (4, 0x80, 0xBF),
        0xF4 => (4, 0x80, 0x8F),
        _ => return None,
    };
    let tail = bytes.get(1..len)?;
    if !(min_second..=max_second).contains(&tail[0]) {
        return None;
    }
    tail[1..].iter().all(|&b| is_continuation(b)).then_some(len)
}

fn euc_jp_len(bytes: &[u8]) -> Option<usize> {
    let high = |b: u8| (0xA1..=0xFE).contains(&b);
    let second = bytes.get(1).copied();
    match bytes[0] {
        0x00..=0x7F => Some(1),
        // Half-width katakana.
        0x8E => second.filter(|b| (0xA1..=0xDF).contains(b)).map(|_| 2),
        // JIS X 0212.
        0x8F => {
            let tail = bytes.get(1..3)?;
            tail.iter().all(|&b| high(b)).then_some(3)
        }
        0xA1..=0xFE => second.filter(|&b| high(b)).map(|_| 2),
        _ => None,
    }
}

fn shift_jis_len(bytes: &[u8]) -> Option<usize> {
    let lead = bytes[0];
    match lead {
        0x00..=0x7F | 0xA1..=0xDF => Some(1),
        0x81..=0x9F | 0xE0..=0xFC => {
            let trail = *bytes.get(1)?;
            matches!(trail, 0x40..=0x7E | 0x80..=0xFC).then_some(2)
        }
        _ => None,
    }
}

fn utf16_len(enc: Encoding, bytes: &[u8]) -> Option<usize> {
    let unit = |i: usize| -> Option<u16> {
        let pair = bytes.get(i..i + 2)?;
        Some(if enc == Encoding::Utf16Le {
            u16::from_le_bytes([pair[0], pair[1]])
        } else {
            u16::from_be_bytes([pair[0], pair[1]])
        })
    };
    match unit(0)? {
        0xD800..=0xDBFF => matches!(unit(2)?, 0xDC00..=0xDFFF).then_some(4),
        0xDC00..=0xDFFF => None,
        _ => Some(2),
    }
}
