use std::fmt;

use crate::Severity;

/// Stable identifier for every problem the lexer can report.
///
/// Callers match on the kind rather than the message text, which follows
/// the reference interpreter's wording and may carry interpolated values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticKind {
    // === Unterminated constructs (fatal) ===
    /// String, symbol or word list hit end of input.
    UnterminatedString,
    /// Regexp literal hit end of input.
    UnterminatedRegexp,
    /// `%` literal with no opening delimiter before end of input.
    UnterminatedQuotedString,
    /// Heredoc terminator never found.
    UnterminatedHeredoc,
    /// Quoted heredoc identifier missing its closing quote.
    UnterminatedHeredocIdentifier,
    /// `=begin` without a matching `=end`.
    UnterminatedEmbeddedDocument,
    /// `\u{` without its closing brace.
    UnterminatedUnicodeEscape,
    /// `?` at end of input.
    IncompleteCharacterSyntax,

    // === Malformed tokens (fatal) ===
    /// Bad backslash escape.
    InvalidEscape,
    /// Bad `\u` escape or codepoint.
    InvalidUnicodeEscape,
    /// Malformed numeric literal.
    InvalidNumber,
    /// Numeric literal ending in `_`.
    TrailingUnderscore,
    /// `.5` style float.
    LeadingDotFloat,
    /// `1r.5` style fraction after a suffixed literal.
    UnexpectedFraction,
    /// Byte that cannot start any token.
    InvalidCharacter,
    /// Byte sequence invalid in the source encoding.
    InvalidMultibyteChar,
    /// Malformed `$`, `@` or `@@` variable name.
    InvalidVariableName,
    /// `%` followed by an unknown type letter.
    UnknownPercentLiteral,
    /// Regexp with an unknown option letter.
    UnknownRegexpOption,
    /// Symbol literal containing a NUL character.
    NulInSymbol,

    // === Encodings (fatal) ===
    /// Magic comment names an encoding that does not exist.
    UnknownEncoding,
    /// Magic comment names an encoding that is not ASCII compatible.
    IncompatibleEncoding,
    /// Literal mixes bytes from two encodings.
    MixedEncoding,

    // === Input (fatal) ===
    /// The source stream failed.
    Io,

    // === Warnings (advisory) ===
    /// Operator whose meaning depends on surrounding whitespace.
    AmbiguousOperator,
    /// Argument prefix or first argument that could be read two ways.
    AmbiguousArgument,
    /// Float literal outside the representable range.
    FloatOutOfRange,
    /// Lone `\r` in the middle of a line.
    CarriageReturn,
    /// `?` followed by whitespace.
    InvalidCharacterSyntax,
    /// `$N` larger than any match group can be.
    NthRefTooBig,
    /// Magic comment ignored because tokens were already seen.
    IgnoredMagicComment,
    /// Magic comment with an unsupported value.
    InvalidMagicCommentValue,
}

impl DiagnosticKind {
    /// Stable snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnterminatedString => "unterminated_string",
            DiagnosticKind::UnterminatedRegexp => "unterminated_regexp",
            DiagnosticKind::UnterminatedQuotedString => "unterminated_quoted_string",
            DiagnosticKind::UnterminatedHeredoc => "unterminated_heredoc",
            DiagnosticKind::UnterminatedHeredocIdentifier => "unterminated_heredoc_identifier",
            DiagnosticKind::UnterminatedEmbeddedDocument => "unterminated_embedded_document",
            DiagnosticKind::UnterminatedUnicodeEscape => "unterminated_unicode_escape",
            DiagnosticKind::IncompleteCharacterSyntax => "incomplete_character_syntax",
            DiagnosticKind::InvalidEscape => "invalid_escape",
            DiagnosticKind::InvalidUnicodeEscape => "invalid_unicode_escape",
            DiagnosticKind::InvalidNumber => "invalid_number",
            DiagnosticKind::TrailingUnderscore => "trailing_underscore",
            DiagnosticKind::LeadingDotFloat => "leading_dot_float",
            DiagnosticKind::UnexpectedFraction => "unexpected_fraction",
            DiagnosticKind::InvalidCharacter => "invalid_character",
            DiagnosticKind::InvalidMultibyteChar => "invalid_multibyte_char",
            DiagnosticKind::InvalidVariableName => "invalid_variable_name",
            DiagnosticKind::UnknownPercentLiteral => "unknown_percent_literal",
            DiagnosticKind::UnknownRegexpOption => "unknown_regexp_option",
            DiagnosticKind::NulInSymbol => "nul_in_symbol",
            DiagnosticKind::UnknownEncoding => "unknown_encoding",
            DiagnosticKind::IncompatibleEncoding => "incompatible_encoding",
            DiagnosticKind::MixedEncoding => "mixed_encoding",
            DiagnosticKind::Io => "io",
            DiagnosticKind::AmbiguousOperator => "ambiguous_operator",
            DiagnosticKind::AmbiguousArgument => "ambiguous_argument",
            DiagnosticKind::FloatOutOfRange => "float_out_of_range",
            DiagnosticKind::CarriageReturn => "carriage_return",
            DiagnosticKind::InvalidCharacterSyntax => "invalid_character_syntax",
            DiagnosticKind::NthRefTooBig => "nth_ref_too_big",
            DiagnosticKind::IgnoredMagicComment => "ignored_magic_comment",
            DiagnosticKind::InvalidMagicCommentValue => "invalid_magic_comment_value",
        }
    }

    /// The severity this kind is reported with.
    pub const fn severity(self) -> Severity {
        match self {
            DiagnosticKind::AmbiguousOperator
            | DiagnosticKind::AmbiguousArgument
            | DiagnosticKind::FloatOutOfRange
            | DiagnosticKind::CarriageReturn
            | DiagnosticKind::InvalidCharacterSyntax
            | DiagnosticKind::NthRefTooBig
            | DiagnosticKind::IgnoredMagicComment
            | DiagnosticKind::InvalidMagicCommentValue => Severity::Advisory,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
