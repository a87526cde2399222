//! The streaming encoder.
//!
//! `Dumper` is the mirror image of `Parser`: it writes a `Request` or
//! `Response` start-line and header block to a `Stream`, then lets the
//! caller stream the body through `reserve_payload_buffer` /
//! `flush_payload_buffer`. Ported from `Dumper`
//! (`include/http/dumper.h`, `src/http/dumper.cc`).

use log::trace;

use crate::error::Result;
use crate::header::Header;
use crate::request::Request;
use crate::response::Response;
use crate::stream::{OutputStream, Stream};

/// The number of hex digits needed to print the largest possible `usize`
/// chunk size, matching the original's `(digits + 3) / 4`.
const fn hex_width() -> usize {
    (usize::BITS as usize + 3) / 4
}

/// Encodes a stream of HTTP/1.1 requests or responses plus their bodies.
///
/// A `Dumper` encodes one message at a time: call `put_request` or
/// `put_response` with the body framing decided up front, then stream the
/// body through `reserve_payload_buffer` / `flush_payload_buffer` until
/// `remaining_body_size()` (non-chunked) or a final zero-size flush
/// (chunked) ends it.
pub struct Dumper<S, F> {
    output: OutputStream<S, F>,
    body_is_chunked: bool,
    remaining_body_size: usize,
}

impl<S, F> Dumper<S, F>
where
    S: Stream,
    F: FnMut(&mut S) -> Result<()>,
{
    pub fn new(stream: S, drain: F) -> Self {
        Dumper {
            output: OutputStream::new(stream, drain),
            body_is_chunked: false,
            remaining_body_size: 0,
        }
    }

    pub fn body_is_chunked(&self) -> bool {
        self.body_is_chunked
    }

    pub fn remaining_body_size(&self) -> usize {
        self.remaining_body_size
    }

    pub fn stream(&self) -> &S {
        self.output.stream()
    }

    pub fn stream_mut(&mut self) -> &mut S {
        self.output.stream_mut()
    }

    /// Encode a request's start-line and headers. `body_size` is ignored
    /// when `body_is_chunked` is set.
    pub fn put_request(&mut self, request: &Request, body_is_chunked: bool, body_size: usize) -> Result<()> {
        debug_assert!(!self.body_is_chunked && self.remaining_body_size == 0);
        trace!(
            "encoding request {} {}: {}",
            request.method,
            request.version,
            if body_is_chunked { "chunked".to_string() } else { format!("Content-Length {}", body_size) }
        );
        self.dump_request_start_line(request)?;
        self.dump_header(&request.header, body_is_chunked, body_size)?;
        self.body_is_chunked = body_is_chunked;
        if !body_is_chunked {
            self.remaining_body_size = body_size;
        }
        Ok(())
    }

    /// Encode a response's start-line and headers. `body_size` is ignored
    /// when `body_is_chunked` is set.
    pub fn put_response(&mut self, response: &Response, body_is_chunked: bool, body_size: usize) -> Result<()> {
        debug_assert!(!self.body_is_chunked && self.remaining_body_size == 0);
        trace!("encoding response {} {}", response.version, response.status.code());
        self.dump_response_start_line(response)?;
        self.dump_header(&response.header, body_is_chunked, body_size)?;
        self.body_is_chunked = body_is_chunked;
        if !body_is_chunked {
            self.remaining_body_size = body_size;
        }
        Ok(())
    }

    /// Reserve room for `payload_buffer_size` bytes of payload. For a
    /// chunked body the returned slice already sits past room for the
    /// hex chunk-size prefix and its trailing CRLF, and before room for
    /// the chunk's own trailing CRLF — both get filled in by
    /// `flush_payload_buffer`.
    pub fn reserve_payload_buffer(&mut self, payload_buffer_size: usize) -> &mut [u8] {
        if self.body_is_chunked {
            let k = hex_width();
            let total = k + 2 + payload_buffer_size + 2;
            let buf = self.output.reserve_buffer(total);
            &mut buf[k + 2..k + 2 + payload_buffer_size]
        } else {
            assert!(payload_buffer_size <= self.remaining_body_size);
            self.output.reserve_buffer(payload_buffer_size)
        }
    }

    /// Commit `payload_buffer_size` bytes previously written into the
    /// slice returned by `reserve_payload_buffer`. A chunked flush of size
    /// zero ends the body (the terminating zero-size chunk).
    pub fn flush_payload_buffer(&mut self, payload_buffer_size: usize) -> Result<()> {
        if self.body_is_chunked {
            let k = hex_width();
            let total = k + 2 + payload_buffer_size + 2;
            let buf = self.output.reserve_buffer(total);
            let header = format!("{:01$X}", payload_buffer_size, k);
            buf[..k].copy_from_slice(header.as_bytes());
            buf[k] = b'\r';
            buf[k + 1] = b'\n';
            buf[k + 2 + payload_buffer_size] = b'\r';
            buf[k + 2 + payload_buffer_size + 1] = b'\n';
            self.output.flush_buffer(total)?;

            if payload_buffer_size == 0 {
                self.body_is_chunked = false;
                self.remaining_body_size = 0;
            }
        } else {
            assert!(payload_buffer_size <= self.remaining_body_size);
            self.output.flush_buffer(payload_buffer_size)?;
            self.remaining_body_size -= payload_buffer_size;
        }

        Ok(())
    }

    fn dump_request_start_line(&mut self, request: &Request) -> Result<()> {
        let mut line = String::new();
        line.push_str(request.method.name());
        line.push(' ');

        if request.uri.path.as_deref() == Some("*") {
            line.push('*');
        } else {
            if let Some(scheme) = &request.uri.scheme {
                line.push_str(scheme);
                line.push_str("://");

                if let Some(user_info) = &request.uri.user_info {
                    line.push_str(user_info);
                    line.push('@');
                }

                if let Some(host) = &request.uri.host {
                    line.push_str(host);
                }

                if let Some(port) = request.uri.port {
                    line.push(':');
                    line.push_str(&port.to_string());
                }
            }

            line.push_str(request.uri.path.as_deref().unwrap_or(""));

            if let Some(query) = &request.uri.query {
                line.push('?');
                line.push_str(query);
            }

            if let Some(fragment) = &request.uri.fragment {
                line.push('#');
                line.push_str(fragment);
            }
        }

        line.push(' ');
        line.push_str(&request.version.to_string());
        line.push_str("\r\n");
        self.write_bytes(line.as_bytes())
    }

    fn dump_response_start_line(&mut self, response: &Response) -> Result<()> {
        let line = format!(
            "{} {} {}\r\n",
            response.version,
            response.status.code(),
            response.reason
        );
        self.write_bytes(line.as_bytes())
    }

    /// Content-Length is written in base 8, matching the original's
    /// `sprintf(s, "Content-Length: %zo", bodySize)` (see `parser.rs`'s
    /// matching base-8 read and `SPEC_FULL.md` §5).
    fn dump_header(&mut self, header: &Header, body_is_chunked: bool, body_size: usize) -> Result<()> {
        let mut block = String::new();

        if body_is_chunked {
            block.push_str("Transfer-Encoding: chunked\r\n");
        } else {
            block.push_str(&format!("Content-Length: {:o}\r\n", body_size));
        }

        header.traverse(|_, name, value| {
            block.push_str(name);
            block.push_str(": ");
            block.push_str(value);
            block.push_str("\r\n");
            true
        });

        block.push_str("\r\n");
        self.write_bytes(block.as_bytes())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let buf = self.output.reserve_buffer(bytes.len());
        buf.copy_from_slice(bytes);
        self.output.flush_buffer(bytes.len())
    }
}
