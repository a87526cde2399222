//! Request method catalog.
//!
//! A closed set of nine methods. Unlike the teacher crate's `Method` enum
//! (`enums::headers::Method`), which keeps an `Other(String)` fallback for
//! arbitrary tokens, this codec's method set is closed per the
//! specification: any token outside the nine below is `UnknownMethod`.

use std::fmt;

use crate::error::{Error, Result};

/// An HTTP/1.1 request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Canonical wire-uppercase name, e.g. `"GET"`.
    pub fn name(self) -> &'static str {
        match self {
            Method::Connect => "CONNECT",
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Trace => "TRACE",
        }
    }

    /// Parse a method token, matching the original trie: dispatch on the
    /// first byte (and, for `P`, the second) before comparing the rest of
    /// the token in one shot.
    pub fn parse(token: &[u8]) -> Result<Method> {
        if token.is_empty() {
            return Err(Error::UnknownMethod);
        }
        let method = match token[0] {
            b'C' if token == b"CONNECT" => Method::Connect,
            b'D' if token == b"DELETE" => Method::Delete,
            b'G' if token == b"GET" => Method::Get,
            b'H' if token == b"HEAD" => Method::Head,
            b'O' if token == b"OPTIONS" => Method::Options,
            b'P' if token.len() > 1 => match token[1] {
                b'A' if token == b"PATCH" => Method::Patch,
                b'O' if token == b"POST" => Method::Post,
                b'U' if token == b"PUT" => Method::Put,
                _ => return Err(Error::UnknownMethod),
            },
            b'T' if token == b"TRACE" => Method::Trace,
            _ => return Err(Error::UnknownMethod),
        };
        Ok(method)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_known_methods() {
        let cases = [
            ("CONNECT", Method::Connect),
            ("DELETE", Method::Delete),
            ("GET", Method::Get),
            ("HEAD", Method::Head),
            ("OPTIONS", Method::Options),
            ("PATCH", Method::Patch),
            ("POST", Method::Post),
            ("PUT", Method::Put),
            ("TRACE", Method::Trace),
        ];
        for (token, expected) in cases {
            assert_eq!(Method::parse(token.as_bytes()).unwrap(), expected);
            assert_eq!(expected.name(), token);
        }
    }

    #[test]
    fn rejects_unknown_and_lowercase() {
        assert!(Method::parse(b"get").is_err());
        assert!(Method::parse(b"FOO").is_err());
        assert!(Method::parse(b"").is_err());
        assert!(Method::parse(b"P").is_err());
        assert!(Method::parse(b"POSTER").is_err());
    }
}
