use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use wireget_net::{Limits, ParseError, ParseErrorKind, ParseStatus, ResponseParser};

use crate::error::FetchError;
use crate::request::Request;
use crate::response::FetchResult;

const READ_CHUNK: usize = 8192;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub limits: Limits,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            limits: Limits::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub async fn fetch(&self, request: Request) -> Result<FetchResult, FetchError> {
        match timeout(self.config.timeout, self.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::TimedOut),
        }
    }

    async fn execute(&self, request: Request) -> Result<FetchResult, FetchError> {
        let uri = request.uri.clone();
        let host = uri.host().ok_or(FetchError::MissingHost)?.to_string();
        let port = uri.port_u16().unwrap_or(80);

        let mut stream = TcpStream::connect((host.as_str(), port)).await?;
        let request_bytes = serialize_request(
            &request,
            &host,
            uri.path_and_query().map(|v| v.as_str()).unwrap_or("/"),
        );
        stream.write_all(&request_bytes).await?;

        let mut parser = ResponseParser::with_limits(self.config.limits);
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let read = stream.read(&mut chunk).await?;

            if read == 0 {
                return match parser.finish() {
                    ParseStatus::Complete { message, warnings } => {
                        Ok(FetchResult::new(message, warnings))
                    }
                    ParseStatus::Error { error, .. } => Err(FetchError::Parse(error)),
                    ParseStatus::NeedMore { .. } => Err(FetchError::Parse(ParseError {
                        kind: ParseErrorKind::UnexpectedEndOfStream,
                        offset: 0,
                    })),
                };
            }

            match parser.push(&chunk[..read]) {
                ParseStatus::NeedMore { .. } => {}
                ParseStatus::Complete { message, warnings } => {
                    return Ok(FetchResult::new(message, warnings));
                }
                ParseStatus::Error { error, .. } => return Err(FetchError::Parse(error)),
            }
        }
    }
}

pub(crate) fn serialize_request(request: &Request, host: &str, path: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    let method = request.method.as_str();
    bytes.extend_from_slice(format!("{} {} {}\r\n", method, path, request.http_version).as_bytes());
    bytes.extend_from_slice(format!("Host: {}\r\n", host).as_bytes());
    for (name, value) in request.headers.iter() {
        bytes.extend_from_slice(name.as_str().as_bytes());
        bytes.extend_from_slice(b": ");
        bytes.extend_from_slice(value.as_bytes());
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(b"\r\n");
    bytes.extend_from_slice(&request.body);
    bytes
}
