//! Request value type.

use crate::header::Header;
use crate::method::Method;
use crate::uri::Uri;
use crate::version::Version;

/// A decoded (or about-to-be-encoded) HTTP/1.1 request line plus headers.
///
/// The body is not part of this type — it is streamed separately through
/// `Parser`/`Dumper`'s payload-view operations.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub header: Header,
}

impl Request {
    pub fn new(method: Method, uri: Uri, version: Version) -> Request {
        Request {
            method,
            uri,
            version,
            header: Header::new(),
        }
    }
}

impl Default for Request {
    /// An empty `GET / HTTP/1.1`, overwritten field-by-field by `Parser`
    /// before the caller ever observes it.
    fn default() -> Request {
        Request::new(Method::Get, Uri::default(), Version::HTTP_11)
    }
}
