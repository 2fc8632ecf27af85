//! Error types for compression and decompression.

use core::fmt;
use std::io;

use crate::symbol::Symbol;

/// The main error type for all operations of this crate.
#[derive(Debug)]
pub enum Error {
    /// The underlying byte source or sink failed.
    Io(io::Error),
    /// The input is not a valid compressed file.
    Format(FormatError),
    /// A caller-side invariant was broken.
    Precondition(PreconditionError),
}

/// Errors related to malformed compressed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The input ended before a structurally required bit could be read.
    UnexpectedEof,
    /// The serialized tree has more internal nodes than the alphabet allows.
    TreeTooLarge,
    /// The same symbol appears on more than one leaf.
    DuplicateSymbol,
    /// The serialized tree consists of a single leaf.
    DegenerateTree,
    /// The serialized tree has no end-of-stream leaf.
    MissingEndOfStream,
}

/// Errors caused by invalid input handed to the codec by its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    /// A tree was requested for a frequency table without any entries.
    EmptyFrequencyTable,
    /// A symbol was encoded that has no code in the code table.
    MissingCode(Symbol),
}

impl Error {
    /// Returns the format error, if this is one.
    pub fn as_format(&self) -> Option<FormatError> {
        match self {
            Self::Format(e) => Some(*e),
            _ => None,
        }
    }

    /// Map an error of a bit reader to a decoding error.
    ///
    /// Running out of input is a property of the file, not of the I/O layer, so it
    /// is reported as [`FormatError::UnexpectedEof`].
    pub(crate) fn from_read(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::Format(FormatError::UnexpectedEof)
        } else {
            Self::Io(e)
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Format(e) => write!(f, "not a valid compressed file: {e}"),
            Self::Precondition(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::TreeTooLarge => write!(f, "code tree is too large"),
            Self::DuplicateSymbol => write!(f, "code tree contains a symbol twice"),
            Self::DegenerateTree => write!(f, "code tree has no internal node"),
            Self::MissingEndOfStream => write!(f, "code tree has no end-of-stream symbol"),
        }
    }
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFrequencyTable => write!(f, "frequency table is empty"),
            Self::MissingCode(symbol) => write!(f, "no code assigned to {symbol}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::Precondition(e) => Some(e),
        }
    }
}

impl core::error::Error for FormatError {}
impl core::error::Error for PreconditionError {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<PreconditionError> for Error {
    fn from(e: PreconditionError) -> Self {
        Self::Precondition(e)
    }
}

/// Result type for compression and decompression operations.
pub type Result<T> = core::result::Result<T, Error>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

macro_rules! err {
    ($err:expr) => {
        Err($err.into())
    };
}

pub(crate) use bail;
pub(crate) use err;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_eof_becomes_format_error() {
        let e = Error::from_read(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert_eq!(e.as_format(), Some(FormatError::UnexpectedEof));

        let e = Error::from_read(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(e, Error::Io(_)));
    }

    #[test]
    fn display() {
        let e: Error = FormatError::UnexpectedEof.into();
        assert_eq!(
            e.to_string(),
            "not a valid compressed file: unexpected end of input"
        );

        let e: Error = PreconditionError::MissingCode(Symbol::Literal(b'a')).into();
        assert_eq!(e.to_string(), "no code assigned to 'a'");
    }
}
