//! A fail-fast decoder for TOML 1.0.0.
//!
//! [`parse`] consumes a complete document and returns an owned,
//! insertion-ordered [`Table`]. The first error terminates parsing and
//! carries its position; [`Error::diagnostics`] renders it with the
//! offending line and a caret.
//!
//! ```
//! let table = toml_decode::parse("answer = 42")?;
//! assert_eq!(table["answer"].as_integer(), Some(42));
//! # Ok::<(), toml_decode::Error>(())
//! ```
//!
//! Intermediate parse products live in a scratch arena that is released
//! when `parse` returns; the returned tree never borrows from the input.

pub mod datetime;
mod error;
mod lex;
mod parse;
mod value;

pub use error::{Category, Diagnostics, Error, ErrorKind};
pub use lex::{Pos, Quote, Span};
pub use value::{Table, Value};

use bumpalo::Bump;

/// Decodes a complete TOML document.
pub fn parse(input: &str) -> Result<Table, Error> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let bump = Bump::new();
    let root = parse::parse_document(&bump, input)?;
    Ok(value::table_from_node(&root))
}

/// Decodes a complete TOML document from raw bytes, validating that they
/// are well-formed UTF-8 first.
pub fn parse_bytes(input: &[u8]) -> Result<Table, Error> {
    match std::str::from_utf8(input) {
        Ok(text) => parse(text),
        Err(e) => {
            let valid = &input[..e.valid_up_to()];
            let line = valid.iter().filter(|&&b| b == b'\n').count() as u32;
            let line_start = valid
                .iter()
                .rposition(|&b| b == b'\n')
                .map(|i| i + 1)
                .unwrap_or(0);
            let pos = Pos::new(line, (valid.len() - line_start) as u32);
            Err(Error::new(ErrorKind::InvalidUtf8, Span::pos(pos)))
        }
    }
}

/// Like [`parse`], but renders the failure into a [`Diagnostics`] record
/// with line, column, and the offending input line.
pub fn parse_with_diagnostics(input: &str) -> Result<Table, Diagnostics> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    parse(input).map_err(|e| e.diagnostics(input))
}
