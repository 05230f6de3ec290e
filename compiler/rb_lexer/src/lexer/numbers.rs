//! Numeric literals.
//!
//! Digits are collected into the token buffer with `_` separators removed.
//! A separator must sit between two digits: a doubled or trailing `_` is
//! fatal. The `r` and `i` suffixes wrap the value as a rational and/or an
//! imaginary number.

use rb_diagnostic::{DiagnosticKind, DiagnosticSink, LexResult};
use rb_lexer_core::Source;

use super::Lexer;
use crate::state::LexState;
use crate::token::TokenKind;
use crate::value::{Integer, Numeric, TokenValue};

/// Which suffixes may follow a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Suffix {
    rational: bool,
    imaginary: bool,
}

impl Suffix {
    const NONE: Suffix = Suffix {
        rational: false,
        imaginary: false,
    };
    const ALL: Suffix = Suffix {
        rational: true,
        imaginary: true,
    };
    /// After an exponent only `i` is allowed.
    const IMAGINARY: Suffix = Suffix {
        rational: false,
        imaginary: true,
    };
}

impl<S: Source, W: DiagnosticSink> Lexer<S, W> {
    /// Scan a number whose first digit `c` was consumed.
    pub(super) fn parse_number(&mut self, c: u8) -> LexResult<TokenKind> {
        self.state = LexState::END;
        self.tok.clear();

        if c == b'0' {
            if let Some(token) = self.prefixed_number()? {
                return Ok(token);
            }
        } else {
            self.tokadd(c);
        }
        self.decimal_number()
    }

    /// Numbers starting with `0`: `0x1f`, `0b101`, `0d19`, `0o17`, `017`
    /// and plain `0`. Returns `None` when a decimal scan should continue
    /// (`0.5`, `0e3`), with `0` already in the token buffer.
    fn prefixed_number(&mut self) -> LexResult<Option<TokenKind>> {
        let c = self.nextc();
        let (radix, empty_message): (u32, &str) = match c {
            Some(b'x' | b'X') => (16, "Hexadecimal number without hex-digits."),
            Some(b'b' | b'B') => (2, "Binary number without digits."),
            Some(b'd' | b'D') => (10, "Decimal number without digits."),
            Some(b'o' | b'O') => (8, "Numeric literal without digits."),
            Some(b'_' | b'0'..=b'7') => {
                self.pushback(c);
                return self.octal_digits().map(Some);
            }
            Some(b'8' | b'9') => {
                return Err(self.syntax_error(DiagnosticKind::InvalidNumber, "Illegal octal digit."));
            }
            Some(b'.' | b'e' | b'E') => {
                self.pushback(c);
                self.tokadd(b'0');
                return Ok(None);
            }
            _ => {
                self.pushback(c);
                let suffix = self.number_suffix(Suffix::ALL)?;
                return Ok(Some(self.integer_literal(Integer::Fixnum(0), suffix)));
            }
        };

        if radix == 8 {
            if !self.source.at(0).is_some_and(|d| d.is_ascii_digit()) {
                return Err(self.syntax_error(DiagnosticKind::InvalidNumber, empty_message));
            }
            return self.octal_digits().map(Some);
        }

        let mut trailing_underscore = false;
        while let Some(d) = self.nextc() {
            if d == b'_' {
                if trailing_underscore || self.tok.is_empty() {
                    self.pushback(Some(d));
                    break;
                }
                trailing_underscore = true;
            } else if char::from(d).is_digit(radix) {
                trailing_underscore = false;
                self.tokadd(d);
            } else {
                self.pushback(Some(d));
                break;
            }
        }

        if self.tok.is_empty() {
            return Err(self.syntax_error(DiagnosticKind::InvalidNumber, empty_message));
        }
        if trailing_underscore {
            return Err(self.trailing_underscore());
        }
        let value = self.integer_from_tok(radix);
        let suffix = self.number_suffix(Suffix::ALL)?;
        Ok(Some(self.integer_literal(value, suffix)))
    }

    /// Octal digits after a leading `0` or `0o`.
    fn octal_digits(&mut self) -> LexResult<TokenKind> {
        let mut trailing_underscore = false;
        loop {
            let c = self.nextc();
            match c {
                Some(b'_') => {
                    if trailing_underscore {
                        self.pushback(c);
                        break;
                    }
                    trailing_underscore = true;
                }
                Some(d @ b'0'..=b'7') => {
                    trailing_underscore = false;
                    self.tokadd(d);
                }
                Some(b'8' | b'9') => {
                    return Err(
                        self.syntax_error(DiagnosticKind::InvalidNumber, "Illegal octal digit.")
                    );
                }
                _ => {
                    self.pushback(c);
                    break;
                }
            }
        }
        if trailing_underscore {
            return Err(self.trailing_underscore());
        }
        let value = if self.tok.is_empty() {
            Integer::Fixnum(0)
        } else {
            self.integer_from_tok(8)
        };
        let suffix = self.number_suffix(Suffix::ALL)?;
        Ok(self.integer_literal(value, suffix))
    }

    /// Decimal integers and floats; the token buffer holds the digits seen
    /// so far.
    fn decimal_number(&mut self) -> LexResult<TokenKind> {
        let mut nondigit: Option<u8> = None;
        let mut seen_point: Option<usize> = None;
        let mut seen_e = false;

        loop {
            let c = self.nextc();
            match c {
                Some(d @ b'0'..=b'9') => {
                    nondigit = None;
                    self.tokadd(d);
                }
                Some(b'.') => {
                    if nondigit.is_some() {
                        self.pushback(c);
                        return Err(self.trailing_underscore());
                    }
                    if seen_point.is_some() || seen_e {
                        self.pushback(c);
                        break;
                    }
                    let next = self.nextc();
                    match next {
                        Some(d) if d.is_ascii_digit() => {
                            seen_point = Some(self.tok.len());
                            self.tokadd(b'.');
                            self.tokadd(d);
                        }
                        _ => {
                            self.pushback(next);
                            self.pushback(c);
                            break;
                        }
                    }
                }
                Some(e @ (b'e' | b'E')) => {
                    if nondigit.is_some() {
                        self.pushback(c);
                        return Err(self.trailing_underscore());
                    }
                    if seen_e {
                        self.pushback(c);
                        break;
                    }
                    let sign = self.nextc();
                    match sign {
                        Some(s @ (b'+' | b'-')) => {
                            self.tokadd(e);
                            self.tokadd(s);
                            nondigit = Some(s);
                        }
                        Some(d) if d.is_ascii_digit() => {
                            self.tokadd(e);
                            self.tokadd(d);
                        }
                        _ => {
                            self.pushback(sign);
                            self.pushback(c);
                            break;
                        }
                    }
                    seen_e = true;
                }
                Some(b'_') => {
                    if nondigit.is_some() {
                        self.pushback(c);
                        return Err(self.trailing_underscore());
                    }
                    nondigit = Some(b'_');
                }
                _ => {
                    self.pushback(c);
                    break;
                }
            }
        }

        match nondigit {
            Some(b'_') => return Err(self.trailing_underscore()),
            Some(sign) => {
                return Err(self.syntax_error(
                    DiagnosticKind::InvalidNumber,
                    format!("trailing `{}' in number", char::from(sign)),
                ));
            }
            None => {}
        }

        if seen_point.is_none() && !seen_e {
            let value = self.integer_from_tok(10);
            let suffix = self.number_suffix(Suffix::ALL)?;
            return Ok(self.integer_literal(value, suffix));
        }

        let suffix = self.number_suffix(if seen_e { Suffix::IMAGINARY } else { Suffix::ALL })?;
        if suffix.rational {
            let point = seen_point.unwrap_or(self.tok.len());
            let fraction_len = self.tok.len() - point - 1;
            let digits: String = self
                .tok
                .iter()
                .filter(|&&b| b != b'.')
                .map(|&b| char::from(b))
                .collect();
            let denominator = format!("1{}", "0".repeat(fraction_len));
            let value = Numeric::Rational {
                numerator: Integer::parse(&digits, 10),
                denominator: Integer::parse(&denominator, 10),
            };
            return Ok(self.number_literal(value, TokenKind::Rational, suffix));
        }

        let text = String::from_utf8_lossy(&self.tok).into_owned();
        let value = match text.parse::<f64>() {
            Ok(v) if v.is_infinite() || (v == 0.0 && has_nonzero_mantissa(&text)) => {
                self.warn(
                    DiagnosticKind::FloatOutOfRange,
                    format!("Float {text} out of range."),
                );
                v
            }
            Ok(v) => v,
            Err(_) => {
                return Err(self.syntax_error(
                    DiagnosticKind::InvalidNumber,
                    format!("invalid float literal {text}"),
                ));
            }
        };
        Ok(self.number_literal(Numeric::Float(value), TokenKind::Float, suffix))
    }

    /// Read `r`/`i` suffixes allowed by `allowed`.
    ///
    /// A suffix running into an identifier (`1if`, `2rx`) is not a suffix:
    /// everything read is put back. A literal followed by `.digit`
    /// (`0x1.5`, `1r.5`) is an error.
    fn number_suffix(&mut self, mut allowed: Suffix) -> LexResult<Suffix> {
        let mut result = Suffix::NONE;
        let mut consumed: Vec<u8> = Vec::new();
        loop {
            let c = self.nextc();
            match c {
                Some(b'i') if allowed.imaginary => {
                    result.imaginary = true;
                    allowed = Suffix::NONE;
                }
                Some(b'r') if allowed.rational => {
                    result.rational = true;
                    allowed.rational = false;
                }
                Some(b) if b >= 0x80 || b.is_ascii_alphabetic() || b == b'_' => {
                    self.pushback(c);
                    self.source.unread_many(&consumed);
                    return Ok(Suffix::NONE);
                }
                other => {
                    self.pushback(other);
                    if other == Some(b'.')
                        && self.source.at(1).is_some_and(|d| d.is_ascii_digit())
                    {
                        return Err(self.syntax_error(
                            DiagnosticKind::UnexpectedFraction,
                            "unexpected fraction part after numeric literal",
                        ));
                    }
                    return Ok(result);
                }
            }
            if let Some(b) = c {
                consumed.push(b);
            }
        }
    }

    fn integer_from_tok(&self, radix: u32) -> Integer {
        let digits: String = self.tok.iter().map(|&b| char::from(b)).collect();
        Integer::parse(&digits, radix)
    }

    fn integer_literal(&mut self, value: Integer, suffix: Suffix) -> TokenKind {
        let (value, kind) = if suffix.rational {
            (
                Numeric::Rational {
                    numerator: value,
                    denominator: Integer::Fixnum(1),
                },
                TokenKind::Rational,
            )
        } else {
            (Numeric::Integer(value), TokenKind::Integer)
        };
        self.number_literal(value, kind, suffix)
    }

    fn number_literal(&mut self, value: Numeric, kind: TokenKind, suffix: Suffix) -> TokenKind {
        if suffix.imaginary {
            self.value = TokenValue::Numeric(Numeric::Imaginary(Box::new(value)));
            return TokenKind::Imaginary;
        }
        self.value = TokenValue::Numeric(value);
        kind
    }

    #[cold]
    fn trailing_underscore(&mut self) -> Box<rb_diagnostic::SyntaxError> {
        self.syntax_error(DiagnosticKind::TrailingUnderscore, "Trailing '_' in number.")
    }
}

/// Does the mantissa of a float literal contain a non-zero digit? Used to
/// tell an underflow from a literal zero.
fn has_nonzero_mantissa(text: &str) -> bool {
    text.split(['e', 'E'])
        .next()
        .is_some_and(|mantissa| mantissa.bytes().any(|b| (b'1'..=b'9').contains(&b)))
}
