//! Response value type.

use crate::header::Header;
use crate::status::StatusCode;
use crate::version::Version;

/// A decoded (or about-to-be-encoded) HTTP/1.1 status line plus headers.
#[derive(Debug, Clone)]
pub struct Response {
    pub version: Version,
    pub status: StatusCode,
    pub reason: String,
    pub header: Header,
}

impl Response {
    /// A response using the status code's default reason phrase.
    pub fn new(version: Version, status: StatusCode) -> Response {
        Response {
            version,
            reason: status.reason().to_string(),
            status,
            header: Header::new(),
        }
    }
}

impl Default for Response {
    /// An empty `HTTP/1.1 200 OK`, overwritten field-by-field by `Parser`
    /// before the caller ever observes it.
    fn default() -> Response {
        Response::new(Version::HTTP_11, StatusCode::Ok)
    }
}
