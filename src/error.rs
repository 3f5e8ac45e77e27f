//! Unified error type.

use std::fmt;
use std::net::AddrParseError;

/// The error type returned by the server's fallible operations.
///
/// Building and finalizing a [`Chain`](crate::middleware::Chain) never fails,
/// and application-level errors (404, 422, etc.) are expressed as
/// [`Response`](crate::Response) values. This type only surfaces
/// infrastructure failures: a bad bind address or a socket error.
#[derive(Debug)]
pub enum Error {
    /// The bind address is not a valid `host:port`.
    InvalidAddress(AddrParseError),
    /// Binding the listener failed.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddress(e) => write!(f, "invalid address: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidAddress(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<AddrParseError> for Error {
    fn from(e: AddrParseError) -> Self {
        Self::InvalidAddress(e)
    }
}
