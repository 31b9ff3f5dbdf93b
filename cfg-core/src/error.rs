//! Error taxonomy and the diagnostic-carrying error type.
//!
//! Every failure is identified by an [`ErrorCode`] and wrapped in an
//! [`Error`] that also carries the offending token text and, for parse
//! errors, the source location. There is no "last error" side channel:
//! the error value is the whole diagnostic.

use std::fmt;

use crate::span::Location;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes for parse, lookup, and loader failures.
///
/// Using an enum instead of String eliminates heap allocation for the
/// common classification paths; the human-readable message is static.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// Identifier empty or containing a byte outside `[A-Za-z0-9._-]`
    InvalidIdentifier = 0,
    /// Number token failed integer syntax or conversion
    InvalidInteger,
    /// Number token failed decimal syntax or conversion
    InvalidDecimal,
    /// String token not wrapped in a pair of double quotes
    InvalidString,
    /// Boolean token other than exactly `true` or `false`
    InvalidBoolean,
    /// Value token whose first byte fits no kind (or empty value)
    InvalidValue,
    /// Numeric value outside the representable range
    OutOfRange,
    /// Loader could not open the file
    OpenFailed,
    /// Loader could not size the file, or the file is empty
    SizeFailed,
    /// Loader could not read the file contents
    ReadFailed,
    /// Lookup found no setting with the requested identifier
    NotFound,
    /// Kind guard tripped: the setting exists with a different kind
    Unknown,
}

impl ErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid identifier",
            Self::InvalidInteger => "invalid integer",
            Self::InvalidDecimal => "invalid decimal",
            Self::InvalidString => "invalid string",
            Self::InvalidBoolean => "invalid boolean",
            Self::InvalidValue => "invalid value",
            Self::OutOfRange => "out of range",
            Self::OpenFailed => "failed to open",
            Self::SizeFailed => "failed to get file size",
            Self::ReadFailed => "failed to read",
            Self::NotFound => "setting doesn't exist",
            Self::Unknown => "unexpected setting kind",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Error returned by parsing, loading, and kind-checked lookups.
///
/// `detail` holds the offending token or path; `location` is present for
/// errors raised while scanning a buffer and points at the start of the
/// offending token.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    location: Option<Location>,
    detail: String,
}

impl Error {
    /// Create an error with no source location (lookup and loader errors).
    pub fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            location: None,
            detail: detail.into(),
        }
    }

    /// Create an error pointing at a source location.
    pub fn at(code: ErrorCode, detail: impl Into<String>, location: Location) -> Self {
        Self {
            code,
            location: Some(location),
            detail: detail.into(),
        }
    }

    /// The error code.
    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Source location of the offending token, if the error came from a scan.
    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// The offending token text, identifier, or path.
    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Prepend context (e.g. the source path) to the detail text.
    pub(crate) fn prefix_detail(mut self, prefix: &str) -> Self {
        self.detail.insert_str(0, prefix);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.detail.is_empty(), self.location) {
            (true, None) => f.write_str(self.code.message()),
            (true, Some(loc)) => write!(f, "{} ({})", self.code.message(), loc),
            (false, None) => write!(f, "{}: {}", self.code.message(), self.detail),
            (false, Some(loc)) => {
                write!(f, "{}: {} ({})", self.code.message(), self.detail, loc)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_with_location() {
        let err = Error::at(ErrorCode::InvalidIdentifier, "bad key", Location::new(3, 1));
        assert_eq!(err.to_string(), "invalid identifier: bad key (3:1)");
    }

    #[test]
    fn test_display_without_location() {
        let err = Error::new(ErrorCode::NotFound, "volume");
        assert_eq!(err.to_string(), "setting doesn't exist: volume");
    }

    #[test]
    fn test_accessors() {
        let err = Error::at(ErrorCode::OutOfRange, "99999999999999999999", Location::new(1, 5));
        assert_eq!(err.code(), ErrorCode::OutOfRange);
        assert_eq!(err.location(), Some(Location::new(1, 5)));
        assert_eq!(err.detail(), "99999999999999999999");
    }
}
