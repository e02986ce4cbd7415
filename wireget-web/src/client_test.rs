use std::net::SocketAddr;
use std::time::Duration;

use assert_matches::assert_matches;
use http::Uri;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use wireget_net::ParseErrorKind;

use crate::{Client, ClientConfig, FetchError, Request};

async fn start_canned_server(response: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let _ = stream.write_all(response).await;
        }
    });

    addr
}

fn request_for(addr: SocketAddr) -> Request {
    let uri: Uri = format!("http://{}/", addr).parse().unwrap();
    Request::builder(uri).build()
}

#[tokio::test]
async fn fetch_returns_parsed_response() {
    let addr = start_canned_server(
        b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\nContent-Length: 2\r\n\r\nOK",
    )
    .await;
    let client = Client::new(ClientConfig::default());

    let result = client.fetch(request_for(addr)).await.unwrap();
    assert_eq!(result.status(), 200);
    assert_eq!(result.content_type(), Some("text/html"));
    assert_eq!(result.body(), b"OK");
}

#[tokio::test]
async fn fetch_reads_close_delimited_body() {
    let addr = start_canned_server(b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nabc").await;
    let client = Client::new(ClientConfig::default());

    let result = client.fetch(request_for(addr)).await.unwrap();
    assert_eq!(result.body(), b"abc");
}

#[tokio::test]
async fn truncated_body_surfaces_parse_error() {
    let addr = start_canned_server(b"HTTP/1.0 200 OK\r\nContent-Length: 10\r\n\r\nfour").await;
    let client = Client::new(ClientConfig::default());

    let result = client.fetch(request_for(addr)).await;
    assert_matches!(
        result,
        Err(FetchError::Parse(error)) if error.kind == ParseErrorKind::TruncatedBody
    );
}

#[tokio::test]
async fn relative_target_is_rejected() {
    let uri: Uri = "/no-host".parse().unwrap();
    let client = Client::new(ClientConfig::default());

    let result = client.fetch(Request::builder(uri).build()).await;
    assert_matches!(result, Err(FetchError::MissingHost));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });

    let client = Client::new(ClientConfig {
        timeout: Duration::from_millis(100),
        ..ClientConfig::default()
    });

    let result = client.fetch(request_for(addr)).await;
    assert_matches!(result, Err(FetchError::TimedOut));
}
