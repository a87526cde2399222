//! Black-box decode tests driving `Parser` the way a caller would: feed it
//! a complete wire-format message and read back the structured result.

use siren_httpcore::{end_of_stream, Error, MemoryStream, Method, Parser, ParserConfig, StatusCode};

fn parser(data: &[u8]) -> Parser<MemoryStream, impl FnMut(&mut MemoryStream) -> siren_httpcore::Result<()>> {
    Parser::new(
        MemoryStream::with_data(data.to_vec()),
        |_: &mut MemoryStream| end_of_stream(),
        ParserConfig::default(),
    )
}

#[test]
fn decodes_request_with_absolute_uri_and_headers() {
    let mut p = parser(
        b"GET http://example.com:8080/search?q=rust#top HTTP/1.1\r\n\
          Host: example.com\r\n\
          Accept: text/html\r\n\
          \r\n",
    );
    let request = p.get_request().unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.uri.scheme.as_deref(), Some("http"));
    assert_eq!(request.uri.host.as_deref(), Some("example.com"));
    assert_eq!(request.uri.port, Some(8080));
    assert_eq!(request.uri.path.as_deref(), Some("/search"));
    assert_eq!(request.uri.query.as_deref(), Some("q=rust"));
    assert_eq!(request.uri.fragment.as_deref(), Some("top"));
    assert_eq!(p.remaining_body_or_chunk_size(), 0);
    assert!(!p.body_is_chunked());
}

#[test]
fn decodes_request_with_content_length_body() {
    let mut p = parser(b"POST /items HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello");
    let request = p.get_request().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(p.remaining_body_or_chunk_size(), 5);
    assert!(!p.body_is_chunked());
    let body = p.peek_payload_data(5).unwrap().to_vec();
    assert_eq!(&body[..5], b"hello");
    p.discard_payload_data(5).unwrap();
    assert_eq!(p.remaining_body_or_chunk_size(), 0);
}

#[test]
fn content_length_is_read_in_base_eight() {
    // "10" in octal is 8 — a deviation from HTTP's decimal Content-Length
    // that this codec preserves rather than "fixes" (see SPEC_FULL.md §5).
    let mut p = parser(b"POST /x HTTP/1.1\r\nContent-Length: 10\r\n\r\n12345678");
    let request = p.get_request().unwrap();
    let _ = request;
    assert_eq!(p.remaining_body_or_chunk_size(), 8);
}

#[test]
fn decodes_chunked_request_body() {
    let mut p = parser(
        b"PUT /upload HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\ndata\r\n0\r\n\r\n",
    );
    let request = p.get_request().unwrap();
    assert_eq!(request.method, Method::Put);
    assert!(p.body_is_chunked());
    assert_eq!(p.remaining_body_or_chunk_size(), 4);

    let chunk = p.peek_payload_data(4).unwrap().to_vec();
    assert_eq!(&chunk[..4], b"data");
    p.discard_payload_data(4).unwrap();

    assert!(!p.body_is_chunked());
    assert_eq!(p.remaining_body_or_chunk_size(), 0);
}

#[test]
fn decodes_response_with_reason_phrase() {
    let mut p = parser(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
    let response = p.get_response().unwrap();
    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.reason, "Not Found");
    assert_eq!(p.remaining_body_or_chunk_size(), 0);
}

#[test]
fn rejects_unknown_status_code() {
    let mut p = parser(b"HTTP/1.1 420 Enhance Your Calm\r\nContent-Length: 0\r\n\r\n");
    let err = p.get_response().unwrap_err();
    assert!(matches!(err, Error::UnknownStatus(420)));
}

#[test]
fn rejects_unknown_method() {
    let mut p = parser(b"FROBNICATE / HTTP/1.1\r\n\r\n");
    assert!(p.get_request().is_err());
}

#[test]
fn mixed_content_length_and_chunked_is_rejected() {
    let mut p = parser(
        b"POST /x HTTP/1.1\r\nContent-Length: 5\r\nTransfer-Encoding: chunked\r\n\r\n",
    );
    assert!(p.get_request().is_err());
}

#[test]
fn header_fields_survive_in_insertion_order_until_queried() {
    let mut p = parser(b"GET / HTTP/1.1\r\nX-A: 1\r\nX-B: 2\r\n\r\n");
    let request = p.get_request().unwrap();
    let mut seen = Vec::new();
    request.header.traverse(|_, name, value| {
        seen.push((name.to_string(), value.to_string()));
        true
    });
    assert_eq!(
        seen,
        vec![("X-A".to_string(), "1".to_string()), ("X-B".to_string(), "2".to_string())]
    );
}
