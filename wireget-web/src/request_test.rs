use http::{HeaderValue, Method, Uri, header};

use crate::client::serialize_request;
use crate::request::Request;

#[test]
fn builder_defaults_to_http10_get() {
    let uri: Uri = "http://example.com/".parse().unwrap();
    let request = Request::builder(uri).build();

    assert_eq!(request.method, Method::GET);
    assert_eq!(request.http_version, "HTTP/1.0");
    assert!(request.headers.is_empty());
    assert!(request.body.is_empty());
}

#[test]
fn serializes_minimal_get() {
    let uri: Uri = "http://example.com/".parse().unwrap();
    let request = Request::builder(uri).build();

    let bytes = serialize_request(&request, "example.com", "/");
    assert_eq!(bytes, b"GET / HTTP/1.0\r\nHost: example.com\r\n\r\n".to_vec());
}

#[test]
fn serializes_headers_and_body() {
    let uri: Uri = "http://example.com/submit".parse().unwrap();
    let request = Request::builder(uri)
        .method(Method::POST)
        .http_version("HTTP/1.1")
        .header(header::ACCEPT, HeaderValue::from_static("*/*"))
        .body(b"payload".to_vec())
        .build();

    let bytes = serialize_request(&request, "example.com", "/submit");
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("POST /submit HTTP/1.1\r\nHost: example.com\r\n"));
    assert!(text.contains("accept: */*\r\n"));
    assert!(text.ends_with("\r\n\r\npayload"));
}
