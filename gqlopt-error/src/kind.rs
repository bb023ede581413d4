//! Error kinds for gqlopt operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to tell an integration bug (a malformed
/// option) apart from a runtime condition (a body that is not an error payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Option errors
    // =========================================================================
    /// An option reached a dispatch site in a shape it cannot be used in
    InvalidOption,

    // =========================================================================
    // Decode errors
    // =========================================================================
    /// A failed response body could not be decoded as an error payload
    DecodeFailed,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Network error
    NetworkFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::InvalidArgument => "InvalidArgument",

            // Option
            ErrorKind::InvalidOption => "InvalidOption",

            // Decode
            ErrorKind::DecodeFailed => "DecodeFailed",

            // IO
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",
            ErrorKind::NetworkFailed => "NetworkFailed",
        }
    }

    /// Check if this error kind is retryable by default.
    ///
    /// Decode failures are not: retrying is the transport layer's policy.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::NetworkFailed)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
