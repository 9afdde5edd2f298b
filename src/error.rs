//! Error types

use core::fmt;

/// Errors raised while decoding, encoding or formatting watchface data.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The dictionary ended in the middle of a header or value.
    Truncated,
    /// A tuple carries a type tag outside the four known kinds.
    UnknownType(u8),
    /// An integer tuple has a width other than 1, 2 or 4 bytes.
    BadIntegerWidth(u16),
    /// A string tuple is missing its NUL terminator or is not UTF-8.
    BadString,
    /// Bytes remain after the last announced tuple.
    TrailingBytes,
    /// The dictionary holds more tuples than a message may carry.
    TooManyTuples,
    /// The output buffer cannot hold the encoded message.
    BufferFull,
    /// A display string does not fit its text buffer.
    TextOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => f.write_str("dictionary truncated"),
            Self::UnknownType(tag) => write!(f, "unknown tuple type {}", tag),
            Self::BadIntegerWidth(width) => write!(f, "bad integer width {}", width),
            Self::BadString => f.write_str("malformed string value"),
            Self::TrailingBytes => f.write_str("trailing bytes after dictionary"),
            Self::TooManyTuples => f.write_str("too many tuples"),
            Self::BufferFull => f.write_str("output buffer full"),
            Self::TextOverflow => f.write_str("text buffer overflow"),
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::TextOverflow
    }
}
