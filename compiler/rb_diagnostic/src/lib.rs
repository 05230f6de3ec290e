//! Diagnostics for the Ruby lexer.
//!
//! Two severities flow through this crate:
//!
//! - **Fatal** problems abort the current parse. They travel as a boxed
//!   [`SyntaxError`] in the `Err` arm of [`LexResult`], carrying the
//!   offending line and a column range so callers can print MRI's
//!   caret-underlined report with [`render_syntax_error`].
//! - **Advisory** problems (warnings) are [`Diagnostic`] values handed to
//!   a caller-chosen [`DiagnosticSink`]. Scanning continues afterwards.
//!
//! Every diagnostic carries a [`DiagnosticKind`], a stable identifier that
//! callers can match on without parsing message text.

mod diagnostic;
mod emitter;
mod kind;
mod sink;
mod syntax_error;

pub use diagnostic::{Diagnostic, Severity};
pub use emitter::{render_syntax_error, CaretEmitter, ColorMode};
pub use kind::DiagnosticKind;
pub use sink::{DiagnosticConfig, DiagnosticQueue, DiagnosticSink, TracingSink};
pub use syntax_error::{LexResult, SyntaxError};
