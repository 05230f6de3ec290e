//! Magic comments: `# -*- coding: utf-8 -*-`, `# frozen_string_literal: true`
//! and the older `# vim: set fileencoding=...` style coding lines.

use rb_diagnostic::{DiagnosticKind, DiagnosticSink, LexResult};
use rb_lexer_core::{Encoding, Source};
use tracing::debug;

use super::{is_space, Lexer};

/// Settings a magic comment can change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MagicKey {
    Coding,
    FrozenStringLiteral,
    WarnIndent,
    WarnPastScope,
}

impl MagicKey {
    /// Match a key, ignoring case and treating `-` as `_`.
    fn lookup(name: &[u8]) -> Option<MagicKey> {
        const KEYS: &[(&[u8], MagicKey)] = &[
            (b"coding", MagicKey::Coding),
            (b"encoding", MagicKey::Coding),
            (b"frozen_string_literal", MagicKey::FrozenStringLiteral),
            (b"warn_indent", MagicKey::WarnIndent),
            (b"warn_past_scope", MagicKey::WarnPastScope),
        ];
        let normalized: Vec<u8> = name
            .iter()
            .map(|&b| if b == b'-' { b'_' } else { b })
            .collect();
        KEYS.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&normalized))
            .map(|&(_, key)| key)
    }

    fn name(self) -> &'static str {
        match self {
            MagicKey::Coding => "coding",
            MagicKey::FrozenStringLiteral => "frozen_string_literal",
            MagicKey::WarnIndent => "warn_indent",
            MagicKey::WarnPastScope => "warn_past_scope",
        }
    }
}

/// Byte index just past the first `-*-` in `text[from..]`.
fn emacs_marker(text: &[u8], from: usize) -> Option<usize> {
    text.get(from..)?
        .windows(3)
        .position(|w| w == b"-*-")
        .map(|i| from + i + 3)
}

#[inline]
fn is_key_delimiter(c: u8) -> bool {
    matches!(c, b'\'' | b'"' | b':' | b';')
}

impl<S: Source, W: DiagnosticSink> Lexer<S, W> {
    /// Apply the `key: value` pairs of a comment line (the text after `#`).
    ///
    /// Returns `false` when the line does not have the shape of a magic
    /// comment at all, in which case the caller may still look for a
    /// free-form coding line.
    pub(super) fn magic_comment(&mut self, text: &[u8], at_top: bool) -> LexResult<bool> {
        if text.len() <= 7 {
            return Ok(false);
        }

        // `-*- ... -*-` marks the emacs form, where pairs are separated by
        // `;` and anything that is not a pair is skipped.
        let (mut body, emacs) = match emacs_marker(text, 0) {
            Some(begin) => {
                let Some(end) = emacs_marker(text, begin) else {
                    return Ok(false);
                };
                (&text[begin..end - 3], true)
            }
            None => (text, false),
        };

        while !body.is_empty() {
            let skip = body
                .iter()
                .position(|&c| !is_key_delimiter(c) && !is_space(c))
                .unwrap_or(body.len());
            body = &body[skip..];

            let key_len = body
                .iter()
                .position(|&c| is_key_delimiter(c) || is_space(c))
                .unwrap_or(body.len());
            let key = &body[..key_len];
            body = &body[key_len..];
            body = trim_start(body);
            if body.is_empty() {
                break;
            }
            if body[0] != b':' {
                if !emacs {
                    return Ok(false);
                }
                continue;
            }

            body = trim_start(&body[1..]);
            if body.is_empty() {
                break;
            }
            let value;
            if body[0] == b'"' {
                let mut i = 1;
                while i < body.len() && body[i] != b'"' {
                    if body[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                value = &body[1..i.min(body.len())];
                body = body.get(i + 1..).unwrap_or_default();
            } else {
                let len = body
                    .iter()
                    .position(|&c| c == b'"' || c == b';' || is_space(c))
                    .unwrap_or(body.len());
                value = &body[..len];
                body = &body[len..];
            }

            if emacs {
                let skip = body
                    .iter()
                    .position(|&c| c != b';' && !is_space(c))
                    .unwrap_or(body.len());
                body = &body[skip..];
            } else {
                body = trim_start(body);
                if !body.is_empty() {
                    return Ok(false);
                }
            }

            if let Some(key) = MagicKey::lookup(key) {
                self.apply_magic_comment(key, value, at_top)?;
            }
        }
        Ok(true)
    }

    fn apply_magic_comment(&mut self, key: MagicKey, value: &[u8], at_top: bool) -> LexResult<()> {
        debug!(key = key.name(), value = %String::from_utf8_lossy(value), "magic comment");
        match key {
            MagicKey::Coding => {
                if at_top {
                    self.set_encoding_name(value)?;
                }
            }
            MagicKey::FrozenStringLiteral => {
                if self.token_seen {
                    self.warn_verbose(
                        DiagnosticKind::IgnoredMagicComment,
                        format!("`{}' is ignored after any tokens", key.name()),
                    );
                    return Ok(());
                }
                if let Some(flag) = self.magic_boolean(key, value) {
                    self.frozen_string_literal = Some(flag);
                }
            }
            MagicKey::WarnIndent => {
                if let Some(flag) = self.magic_boolean(key, value) {
                    self.warn_indent = flag;
                }
            }
            MagicKey::WarnPastScope => {
                if let Some(flag) = self.magic_boolean(key, value) {
                    self.warn_past_scope = flag;
                }
            }
        }
        Ok(())
    }

    /// `true` / `false`, or a warning.
    fn magic_boolean(&mut self, key: MagicKey, value: &[u8]) -> Option<bool> {
        if value.eq_ignore_ascii_case(b"true") {
            return Some(true);
        }
        if value.eq_ignore_ascii_case(b"false") {
            return Some(false);
        }
        self.warn(
            DiagnosticKind::InvalidMagicCommentValue,
            format!(
                "invalid value for {}: {}",
                key.name(),
                String::from_utf8_lossy(value)
            ),
        );
        None
    }

    /// A free-form coding line such as `# vim: set fileencoding=utf-8 :`:
    /// `coding` followed by `:` or `=` and an encoding name.
    pub(super) fn set_file_encoding(&mut self, text: &[u8]) -> LexResult<()> {
        let mut from = 0;
        while let Some(found) = find_ignore_case(&text[from..], b"coding") {
            let after = from + found + b"coding".len();
            from = after;
            let rest = trim_start(&text[after..]);
            let Some((&sep, rest)) = rest.split_first() else {
                return Ok(());
            };
            if sep != b':' && sep != b'=' {
                continue;
            }
            let rest = trim_start(rest);
            let len = rest
                .iter()
                .position(|&c| !(c == b'-' || c == b'_' || c.is_ascii_alphanumeric()))
                .unwrap_or(rest.len());
            if len == 0 {
                return Ok(());
            }
            return self.set_encoding_name(&rest[..len]);
        }
        Ok(())
    }

    /// Switch the source encoding. Emacs line-ending suffixes such as
    /// `-unix` are ignored.
    fn set_encoding_name(&mut self, name: &[u8]) -> LexResult<()> {
        let name = strip_eol_suffix(name);
        let Some(encoding) = Encoding::from_name(name) else {
            return Err(self.syntax_error(
                DiagnosticKind::UnknownEncoding,
                format!("unknown encoding name: {}", String::from_utf8_lossy(name)),
            ));
        };
        if !encoding.is_ascii_compatible() {
            return Err(self.syntax_error(
                DiagnosticKind::IncompatibleEncoding,
                format!("{encoding} is not ASCII compatible"),
            ));
        }
        debug!(from = %self.encoding, to = %encoding, "source encoding changed");
        self.encoding = encoding;
        Ok(())
    }
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .position(|&c| !is_space(c))
        .unwrap_or(bytes.len());
    &bytes[skip..]
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

fn strip_eol_suffix(name: &[u8]) -> &[u8] {
    for suffix in [&b"-unix"[..], b"-dos", b"-mac"] {
        if name.len() > suffix.len() {
            let (head, tail) = name.split_at(name.len() - suffix.len());
            if tail.eq_ignore_ascii_case(suffix) {
                return head;
            }
        }
    }
    name
}

#[cfg(test)]
mod tests;
