//! Byte-level foundations for the Ruby lexer.
//!
//! This crate owns everything below the token level:
//!
//! - [`Source`]: a pushback-capable cursor over source bytes, with two
//!   backends that tokenize identically: [`BytesSource`] for in-memory
//!   buffers and [`StreamSource`] for any [`std::io::Read`].
//! - [`SourcePosition`] and [`PositionTracker`]: per-token line positions
//!   that are reused while the scanner stays on one line.
//! - [`Encoding`]: the handful of encoding queries the lexer needs
//!   (ASCII compatibility, multi-byte character width, name lookup).
//!
//! Both cursor backends normalize `"\r\n"` to `"\n"` and a lone `"\r"` to a
//! space. The lone-CR case is reported through
//! [`Source::take_carriage_return`] so the lexer can warn about it.

mod bytes_source;
mod encoding;
mod position;
mod source;
mod stream_source;

pub use bytes_source::BytesSource;
pub use encoding::Encoding;
pub use position::{PositionTracker, SourcePosition};
pub use source::{is_horizontal_space, Source};
pub use stream_source::StreamSource;
