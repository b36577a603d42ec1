// bitmask/src/error.rs

//! Error types for encode and decode.

use core::fmt;

/// Failure while walking a record.
///
/// All variants describe a programming or schema mistake. None of them are
/// transient, and a failed call leaves no mask or destination state worth
/// trusting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A field's tag is not a base-10 integer.
    InvalidTag {
        /// Field carrying the tag.
        field: &'static str,
        /// The raw tag text.
        tag: &'static str,
    },
    /// A field's tag parsed, but lies outside `1..=64`.
    BitOutOfRange {
        /// Field carrying the tag.
        field: &'static str,
        /// The raw tag text.
        tag: &'static str,
    },
    /// Encode source is neither nil nor a record.
    NotARecord,
    /// Decode destination is nil or does not reference a writable record.
    NotARecordRef,
}

impl Error {
    /// Raw tag text that caused the error, if any.
    pub const fn tag(&self) -> Option<&'static str> {
        match self {
            Error::InvalidTag { tag, .. } | Error::BitOutOfRange { tag, .. } => Some(*tag),
            Error::NotARecord | Error::NotARecordRef => None,
        }
    }

    /// Name of the field that caused the error, if any.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Error::InvalidTag { field, .. } | Error::BitOutOfRange { field, .. } => Some(*field),
            Error::NotARecord | Error::NotARecordRef => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTag { field, tag } => {
                write!(f, "field '{}': invalid tag value: {}", field, tag)
            }
            Error::BitOutOfRange { field, tag } => {
                write!(f, "field '{}': bit should be within 1 to 64: {}", field, tag)
            }
            Error::NotARecord => f.write_str("source must be a record or a reference to a record"),
            Error::NotARecordRef => f.write_str("destination must be a reference to a record"),
        }
    }
}

impl core::error::Error for Error {}
