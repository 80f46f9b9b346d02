//! Errors raised while loading fonts.

use std::fmt;

use read_fonts::{types::Tag, ReadError};

/// An error produced by this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A table was missing or failed validation.
    MalformedFont(ReadError),
    /// A lookup contains a subtable in a format we don't implement.
    ///
    /// These are not fatal: the subtable never matches.
    UnsupportedFormat {
        table: Tag,
        lookup_index: u16,
        lookup_type: u16,
        format: u16,
    },
    /// No font in the stack maps the character.
    NoGlyphAvailable(char),
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        Error::MalformedFont(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedFont(err) => write!(f, "malformed font: {err}"),
            Error::UnsupportedFormat {
                table,
                lookup_index,
                lookup_type,
                format,
            } => write!(
                f,
                "{table} lookup {lookup_index}: unsupported subtable (type {lookup_type}, format {format})"
            ),
            Error::NoGlyphAvailable(ch) => write!(f, "no glyph for {ch:?} (U+{:04X})", *ch as u32),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MalformedFont(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = Error::UnsupportedFormat {
            table: Tag::new(b"GSUB"),
            lookup_index: 3,
            lookup_type: 1,
            format: 9,
        };
        assert_eq!(
            err.to_string(),
            "GSUB lookup 3: unsupported subtable (type 1, format 9)"
        );
        assert_eq!(
            Error::NoGlyphAvailable('é').to_string(),
            "no glyph for 'é' (U+00E9)"
        );
        let err: Error = ReadError::OutOfBounds.into();
        assert!(matches!(err, Error::MalformedFont(ReadError::OutOfBounds)));
    }
}
