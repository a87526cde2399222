//! The streaming decoder.
//!
//! `Parser` turns bytes pulled from a `Stream` into `Request`/`Response`
//! value types plus a payload-byte view, one message at a time. Ported
//! from the generic `Parser` class (`include/parser.h`, `src/parser.cc`) —
//! the original's dual request/response parser, distinct from the
//! request-only one in `src/http/parser.cc` that `method.rs`/`uri.rs`/
//! `version.rs` are grounded on for start-line token parsing.

use log::{trace, warn};

use crate::charclass::{is_printable_or_space, is_space};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::method::Method;
use crate::numeric::parse_usize;
use crate::request::Request;
use crate::response::Response;
use crate::scan::{scan_until_crlf, scan_until_crlf_crlf};
use crate::status::StatusCode;
use crate::stream::{InputStream, Stream};
use crate::uri::Uri;
use crate::version::Version;

/// Limits guarding against unbounded memory growth while decoding a
/// single message. Defaults match the original's.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    pub max_start_line_size: usize,
    pub max_header_size: usize,
    pub max_body_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_start_line_size: 4 * 1024,
            max_header_size: 16 * 1024,
            max_body_size: 64 * 1024,
        }
    }
}

/// Decodes a stream of HTTP/1.1 requests or responses plus their bodies.
///
/// A `Parser` decodes one message at a time: call `get_request` or
/// `get_response`, then drain the body through `peek_payload_data` /
/// `discard_payload_data` until `remaining_body_or_chunk_size()` reaches
/// zero before starting the next message.
pub struct Parser<S, F> {
    input: InputStream<S, F>,
    config: ParserConfig,
    body_is_chunked: bool,
    remaining_body_or_chunk_size: usize,
    max_chunk_size: usize,
}

impl<S, F> Parser<S, F>
where
    S: Stream,
    F: FnMut(&mut S) -> Result<()>,
{
    pub fn new(stream: S, refill: F, config: ParserConfig) -> Self {
        Parser {
            input: InputStream::new(stream, refill),
            config,
            body_is_chunked: false,
            remaining_body_or_chunk_size: 0,
            max_chunk_size: 0,
        }
    }

    pub fn body_is_chunked(&self) -> bool {
        self.body_is_chunked
    }

    pub fn remaining_body_or_chunk_size(&self) -> usize {
        self.remaining_body_or_chunk_size
    }

    pub fn stream(&self) -> &S {
        self.input.stream()
    }

    pub fn stream_mut(&mut self) -> &mut S {
        self.input.stream_mut()
    }

    /// Decode one request start-line, header block, and body framing.
    pub fn get_request(&mut self) -> Result<Request> {
        debug_assert!(!self.body_is_chunked && self.remaining_body_or_chunk_size == 0);
        let (method, uri, version) = self.parse_request_start_line()?;
        trace!("parsed request line: {} {:?} {}", method, uri.path, version);
        let mut request = Request::new(method, uri, version);
        self.parse_header(&mut request.header)?;
        let (chunked, size) = self.parse_body_or_chunk_size(&mut request.header).map_err(|e| {
            warn!("rejecting request: {}", e);
            e
        })?;
        trace!(
            "request body framing: {}",
            if chunked { "chunked".to_string() } else { format!("Content-Length {}", size) }
        );
        self.body_is_chunked = chunked;
        self.remaining_body_or_chunk_size = size;
        Ok(request)
    }

    /// Decode one response status-line, header block, and body framing.
    pub fn get_response(&mut self) -> Result<Response> {
        debug_assert!(!self.body_is_chunked && self.remaining_body_or_chunk_size == 0);
        let (version, status, reason) = self.parse_response_start_line()?;
        trace!("parsed status line: {} {} {}", version, status.code(), reason);
        let mut response = Response::new(version, status);
        response.reason = reason;
        self.parse_header(&mut response.header)?;
        let (chunked, size) = self.parse_body_or_chunk_size(&mut response.header).map_err(|e| {
            warn!("rejecting response: {}", e);
            e
        })?;
        self.body_is_chunked = chunked;
        self.remaining_body_or_chunk_size = size;
        Ok(response)
    }

    /// A view of up to `remaining_body_or_chunk_size()` unread payload
    /// bytes. Requesting the full remaining amount of a chunked body also
    /// requires the chunk's trailing CRLF to already be buffered.
    pub fn peek_payload_data(&mut self, payload_data_size: usize) -> Result<&[u8]> {
        assert!(payload_data_size <= self.remaining_body_or_chunk_size);

        if payload_data_size == self.remaining_body_or_chunk_size && self.body_is_chunked {
            let want = self.remaining_body_or_chunk_size + 2;
            let data = self.input.peek_data(want)?;
            if !(data[self.remaining_body_or_chunk_size] == b'\r'
                && data[self.remaining_body_or_chunk_size + 1] == b'\n')
            {
                warn!("chunk of size {} missing trailing CRLF", self.remaining_body_or_chunk_size);
                return Err(Error::invalid("chunk data missing trailing CRLF"));
            }
            Ok(data)
        } else {
            self.input.peek_data(self.remaining_body_or_chunk_size)
        }
    }

    /// Consume `payload_data_size` bytes previously returned by
    /// `peek_payload_data`. Draining the last byte of a chunk transparently
    /// parses the next chunk-size line, or clears `body_is_chunked` once
    /// the terminating zero-size chunk itself has been consumed.
    pub fn discard_payload_data(&mut self, payload_data_size: usize) -> Result<()> {
        assert!(payload_data_size <= self.remaining_body_or_chunk_size);

        if payload_data_size == self.remaining_body_or_chunk_size && self.body_is_chunked {
            self.input.discard_data(self.remaining_body_or_chunk_size + 2);

            if self.remaining_body_or_chunk_size == 0 {
                self.body_is_chunked = false;
            } else {
                self.remaining_body_or_chunk_size = self.parse_chunk_size()?;
            }
        } else {
            self.input.discard_data(payload_data_size);
            self.remaining_body_or_chunk_size -= payload_data_size;
        }

        Ok(())
    }

    fn parse_request_start_line(&mut self) -> Result<(Method, Uri, Version)> {
        let n = scan_until_crlf(&mut self.input, self.config.max_start_line_size, Error::StartLineTooLong)?;
        let line = {
            let data = self.input.peek_data(n)?;
            validate_printable_or_space(&data[..n - 2])?;
            data[..n - 2].to_vec()
        };
        self.input.discard_data(n);

        let (method_token, rest) = split_at_space(&line).ok_or_else(|| Error::invalid("missing request-line field"))?;
        let rest = skip_leading_space(rest);
        if rest.is_empty() {
            return Err(Error::invalid("missing request-target"));
        }
        let (uri_token, rest) = split_at_space(rest).ok_or_else(|| Error::invalid("missing request-line field"))?;
        let version_token = skip_leading_space(rest);
        if version_token.is_empty() {
            return Err(Error::invalid("missing HTTP version"));
        }

        let method = Method::parse(method_token)?;
        let uri = Uri::parse(uri_token)?;
        let version = Version::parse(version_token)?;
        Ok((method, uri, version))
    }

    fn parse_response_start_line(&mut self) -> Result<(Version, StatusCode, String)> {
        let n = scan_until_crlf(&mut self.input, self.config.max_start_line_size, Error::StartLineTooLong)?;
        let line = {
            let data = self.input.peek_data(n)?;
            validate_printable_or_space(&data[..n - 2])?;
            data[..n - 2].to_vec()
        };
        self.input.discard_data(n);

        let (version_token, rest) = split_at_space(&line).ok_or_else(|| Error::invalid("missing status-line field"))?;
        let rest = skip_leading_space(rest);
        if rest.is_empty() {
            return Err(Error::invalid("missing status code"));
        }
        let (status_token, rest) = split_at_space(rest).ok_or_else(|| Error::invalid("missing status-line field"))?;
        let reason_token = skip_leading_space(rest);
        if reason_token.is_empty() {
            return Err(Error::invalid("missing reason phrase"));
        }

        let version = Version::parse(version_token)?;
        let raw_status_code = parse_usize(status_token, 10)?;
        let status_code = u16::try_from(raw_status_code)
            .map_err(|_| Error::invalid("status code out of range"))?;
        let status = StatusCode::from_code(status_code).ok_or(Error::UnknownStatus(status_code))?;
        let reason = bytes_to_string(reason_token)?;
        Ok((version, status, reason))
    }

    fn parse_header(&mut self, header: &mut Header) -> Result<()> {
        header.reset();
        let peeked = self.input.peek_data(2)?;
        let header_has_fields = !(peeked[0] == b'\r' && peeked[1] == b'\n');

        let n = if header_has_fields {
            let n = scan_until_crlf_crlf(&mut self.input, self.config.max_header_size, Error::HeaderTooLarge)?;
            let block = {
                let data = self.input.peek_data(n)?;
                validate_printable_or_space(&data[..n - 4])?;
                data[..n - 2].to_vec()
            };
            parse_header_fields(&block, header)?;
            n
        } else {
            2
        };

        self.input.discard_data(n);
        Ok(())
    }

    /// Determine whether the body is Content-Length-framed or chunked, and
    /// its size, tombstoning the `Transfer-Encoding`/`Content-Length`
    /// fields that decided it.
    ///
    /// Per `spec.md`, Content-Length is parsed (and, in `dumper.rs`,
    /// encoded) in base 8 — the original's `ParseNumber<size_t, 8>` call,
    /// kept here rather than "fixed" to base 10 (see `SPEC_FULL.md` §5).
    fn parse_body_or_chunk_size(&mut self, header: &mut Header) -> Result<(bool, usize)> {
        header.sort();

        let mut chunked_indices = Vec::new();
        let mut duplicate_chunked = false;
        header.search("Transfer-Encoding", |index, value| {
            if value == "chunked" {
                if !chunked_indices.is_empty() {
                    duplicate_chunked = true;
                    return false;
                }
                chunked_indices.push(index);
            }
            true
        });
        if duplicate_chunked {
            return Err(Error::invalid("duplicate chunked Transfer-Encoding"));
        }
        let body_is_chunked = !chunked_indices.is_empty();
        for index in chunked_indices {
            header.remove_field(index);
        }

        let mut content_length_indices = Vec::new();
        let mut body_size: Option<usize> = None;
        let mut error: Option<Error> = None;
        header.search("Content-Length", |index, value| {
            if !value.is_empty() {
                if body_size.is_some() {
                    error = Some(Error::invalid("duplicate Content-Length"));
                    return false;
                }
                match parse_usize(value.as_bytes(), 8) {
                    Ok(size) => body_size = Some(size),
                    Err(e) => {
                        error = Some(e);
                        return false;
                    }
                }
            }
            content_length_indices.push(index);
            true
        });
        if let Some(e) = error {
            return Err(e);
        }
        for index in content_length_indices {
            header.remove_field(index);
        }

        if body_is_chunked {
            if body_size.is_some() {
                return Err(Error::invalid("both Content-Length and chunked Transfer-Encoding"));
            }
            let chunk_size = self.parse_first_chunk_size()?;
            Ok((true, chunk_size))
        } else if let Some(size) = body_size {
            if size > self.config.max_body_size {
                return Err(Error::BodyTooLarge);
            }
            Ok((false, size))
        } else {
            Ok((false, 0))
        }
    }

    fn parse_first_chunk_size(&mut self) -> Result<usize> {
        self.max_chunk_size = self.config.max_body_size;
        self.parse_chunk_size()
    }

    fn parse_chunk_size(&mut self) -> Result<usize> {
        let k = (usize::BITS as usize + 3) / 4;
        let n = scan_until_crlf(&mut self.input, k + 2, Error::InvalidMessage("chunk-size line too long"))?;
        let data = self.input.peek_data(n)?;
        let digits = &data[..n - 2];
        if digits.is_empty() {
            return Err(Error::invalid("empty chunk-size"));
        }
        let chunk_size = parse_usize(digits, 16)?;
        if chunk_size > self.max_chunk_size {
            return Err(Error::BodyTooLarge);
        }
        self.max_chunk_size -= chunk_size;
        self.input.discard_data(n);
        Ok(chunk_size)
    }
}

fn validate_printable_or_space(bytes: &[u8]) -> Result<()> {
    if bytes.iter().all(|&b| is_printable_or_space(b)) {
        Ok(())
    } else {
        Err(Error::invalid("non-printable byte in start-line or header"))
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    if bytes.contains(&0) {
        return Err(Error::invalid("embedded NUL"));
    }
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::invalid("invalid UTF-8"))
}

/// Split `bytes` at the first whitespace byte, returning the token before
/// it and the remainder starting at the whitespace byte itself. `None` if
/// there is no whitespace in `bytes` (the line ended before the field did).
fn split_at_space(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().position(|&b| is_space(b))?;
    Some((&bytes[..pos], &bytes[pos..]))
}

fn skip_leading_space(bytes: &[u8]) -> &[u8] {
    let pos = bytes.iter().position(|&b| !is_space(b)).unwrap_or(bytes.len());
    &bytes[pos..]
}

/// Split a header block (individual fields separated by CRLF, with no
/// trailing CRLFCRLF) into fields using the same two-byte lookahead used
/// by `scan::scan_until_crlf`, then hand each one to `parse_header_field`.
fn parse_header_fields(block: &[u8], header: &mut Header) -> Result<()> {
    let mut field_start = 0usize;
    loop {
        let mut field_end = field_start;
        loop {
            let c1 = block[field_end];
            let c2 = block.get(field_end + 1).copied();
            match c2 {
                Some(b'\n') => {
                    if c1 == b'\r' {
                        break;
                    }
                    field_end += 2;
                }
                Some(b'\r') => field_end += 1,
                _ => field_end += 2,
            }
        }
        parse_header_field(&block[field_start..field_end], header)?;
        field_start = field_end + 2;
        if field_start >= block.len() {
            break;
        }
    }
    Ok(())
}

fn parse_header_field(field: &[u8], header: &mut Header) -> Result<()> {
    let colon = field.iter().position(|&b| b == b':').ok_or_else(|| Error::invalid("header field missing colon"))?;
    if colon == 0 {
        return Err(Error::invalid("empty header field name"));
    }
    let name = bytes_to_string(&field[..colon])?;

    let value_bytes = &field[colon + 1..];
    let value_start = value_bytes.iter().position(|&b| !is_space(b)).unwrap_or(value_bytes.len());
    let value_end = value_bytes.iter().rposition(|&b| !is_space(b)).map(|i| i + 1).unwrap_or(value_start);
    let value = bytes_to_string(&value_bytes[value_start..value_end])?;

    header.add_field(name, value);
    Ok(())
}
