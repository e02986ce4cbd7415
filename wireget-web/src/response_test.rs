use wireget_net::{Header, HeaderSet, HttpVersion, Response, StatusLine};

use crate::FetchResult;

fn result_with_body(body: &[u8]) -> FetchResult {
    let response = Response {
        line: StatusLine {
            version: HttpVersion::Http10,
            status_code: 200,
            reason: "OK".to_string(),
        },
        headers: HeaderSet::new(vec![Header {
            name: "Content-Type".to_string(),
            value: "text/plain".to_string(),
            raw_name: "Content-Type".to_string(),
        }]),
        body: body.to_vec(),
    };
    FetchResult::new(response, Vec::new())
}

#[test]
fn preview_clamps_to_short_bodies() {
    let result = result_with_body(b"OK");
    assert_eq!(result.body_preview(100), "OK");
}

#[test]
fn preview_truncates_long_bodies() {
    let result = result_with_body(b"hello world");
    assert_eq!(result.body_preview(5), "hello");
}

#[test]
fn preview_of_empty_body_is_empty() {
    let result = result_with_body(b"");
    assert_eq!(result.body_preview(100), "");
}

#[test]
fn content_type_lookup_is_case_insensitive() {
    let result = result_with_body(b"OK");
    assert_eq!(result.content_type(), Some("text/plain"));
}
