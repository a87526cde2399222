//! A streaming HTTP/1.1 message codec.
//!
//! [`Parser`] decodes requests and responses (start-line, headers, and
//! Content-Length/chunked body framing) from anything implementing
//! [`Stream`]; [`Dumper`] encodes them back. Both work incrementally: a
//! `Parser`/`Dumper` never buffers an entire message, and payload bytes
//! are handed to the caller as borrowed views rather than copied out.
//!
//! ```no_run
//! use siren_httpcore::{Dumper, MemoryStream, Method, Request, Uri, Version};
//!
//! # fn run() -> siren_httpcore::Result<()> {
//! let mut dumper = Dumper::new(MemoryStream::new(), |_: &mut MemoryStream| Ok(()));
//! let request = Request::new(Method::Get, Uri::parse(b"/")?, Version::HTTP_11);
//! dumper.put_request(&request, false, 0)?;
//! # Ok(())
//! # }
//! ```

mod charclass;
mod connection;
mod dumper;
mod error;
mod header;
mod method;
mod numeric;
mod parser;
mod request;
mod response;
mod scan;
mod status;
mod stream;
mod uri;
mod version;

pub use connection::Connection;
pub use dumper::Dumper;
pub use error::{Error, Result};
pub use header::Header;
pub use method::Method;
pub use parser::{Parser, ParserConfig};
pub use request::Request;
pub use response::Response;
pub use status::StatusCode;
pub use stream::{end_of_stream, InputStream, MemoryStream, OutputStream, Stream};
pub use uri::Uri;
pub use version::Version;
