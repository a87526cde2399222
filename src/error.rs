//! Error taxonomy for the parser and dumper.
//!
//! All errors abort the current parse/encode operation; the core performs
//! no local recovery and a faulted `Parser`/`Dumper` must not be reused.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while decoding or encoding an HTTP/1.1
/// message.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed syntax, inconsistent framing, numeric overflow, a violated
    /// chunk trailer, or mixed Transfer-Encoding/Content-Length.
    #[error("invalid HTTP message: {0}")]
    InvalidMessage(&'static str),

    /// A well-formed method token outside the closed method set.
    #[error("unknown request method")]
    UnknownMethod,

    /// A well-formed status code outside the closed status set.
    #[error("unknown status code: {0}")]
    UnknownStatus(u16),

    /// The start line exceeded `max_start_line_size`.
    #[error("start line too long")]
    StartLineTooLong,

    /// The header block exceeded `max_header_size`.
    #[error("header block too large")]
    HeaderTooLarge,

    /// Content-Length or cumulative chunk sizes exceeded `max_body_size`.
    #[error("body too large")]
    BodyTooLarge,

    /// Raised by a refill callback when the underlying stream has no more
    /// data to offer.
    #[error("end of stream")]
    EndOfStream,
}

impl Error {
    pub(crate) fn invalid(reason: &'static str) -> Error {
        Error::InvalidMessage(reason)
    }
}
