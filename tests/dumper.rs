//! Black-box encode tests driving `Dumper` and checking the exact bytes
//! written to the wire.

use siren_httpcore::{Dumper, MemoryStream, Method, Request, Response, StatusCode, Uri, Version};

fn drain_to(sink: std::rc::Rc<std::cell::RefCell<Vec<u8>>>) -> impl FnMut(&mut MemoryStream) -> siren_httpcore::Result<()> {
    move |s: &mut MemoryStream| {
        sink.borrow_mut().extend_from_slice(s.data());
        let len = s.data().len();
        s.discard(len);
        Ok(())
    }
}

#[test]
fn encodes_request_with_content_length() {
    let sink = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut dumper = Dumper::new(MemoryStream::new(), drain_to(sink.clone()));

    let request = Request::new(Method::Get, Uri::parse(b"/items").unwrap(), Version::HTTP_11);
    dumper.put_request(&request, false, 3).unwrap();
    dumper.reserve_payload_buffer(3).copy_from_slice(b"abc");
    dumper.flush_payload_buffer(3).unwrap();

    let written = String::from_utf8(sink.borrow().clone()).unwrap();
    assert_eq!(written, "GET /items HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc");
}

#[test]
fn encodes_chunked_request() {
    let sink = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut dumper = Dumper::new(MemoryStream::new(), drain_to(sink.clone()));

    let request = Request::new(Method::Post, Uri::parse(b"/upload").unwrap(), Version::HTTP_11);
    dumper.put_request(&request, true, 0).unwrap();

    dumper.reserve_payload_buffer(3).copy_from_slice(b"abc");
    dumper.flush_payload_buffer(3).unwrap();
    dumper.reserve_payload_buffer(0);
    dumper.flush_payload_buffer(0).unwrap();

    let written = sink.borrow().clone();
    // The size header is fixed-width zero-padded hex (spec §4.4.3), so the
    // terminating chunk is "000...0\r\n\r\n", not a bare "0\r\n\r\n".
    let hex_width = (usize::BITS as usize + 3) / 4;
    let tail = format!(
        "{}\r\nabc\r\n{}\r\n\r\n",
        format!("{:01$X}", 3, hex_width),
        format!("{:01$X}", 0, hex_width)
    );
    assert!(written.ends_with(tail.as_bytes()));
    assert!(!dumper.body_is_chunked());
}

#[test]
fn encodes_response() {
    let sink = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut dumper = Dumper::new(MemoryStream::new(), drain_to(sink.clone()));

    let mut response = Response::new(Version::HTTP_11, StatusCode::Ok);
    response.header.add_field("X-Request-Id", "42");
    dumper.put_response(&response, false, 0).unwrap();

    let written = String::from_utf8(sink.borrow().clone()).unwrap();
    assert_eq!(
        written,
        "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nX-Request-Id: 42\r\n\r\n"
    );
}

#[test]
fn content_length_is_written_in_base_eight() {
    let sink = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut dumper = Dumper::new(MemoryStream::new(), drain_to(sink.clone()));

    let request = Request::new(Method::Get, Uri::parse(b"/").unwrap(), Version::HTTP_11);
    dumper.put_request(&request, false, 8).unwrap();

    let written = String::from_utf8(sink.borrow().clone()).unwrap();
    assert!(written.contains("Content-Length: 10\r\n"));
}
