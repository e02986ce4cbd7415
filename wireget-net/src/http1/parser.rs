use super::types::{
    Header, HeaderSet, HttpVersion, Limits, ParseError, ParseErrorKind, ParseWarning,
    ParseWarningKind, Response, StatusLine,
};

const LF: &[u8] = b"\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus<T> {
    NeedMore {
        warnings: Vec<ParseWarning>,
    },
    Complete {
        message: T,
        warnings: Vec<ParseWarning>,
    },
    Error {
        error: ParseError,
        warnings: Vec<ParseWarning>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    StatusLine,
    Headers,
    Body,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    ContentLength,
    CloseDelimited,
    NoBody,
}

/// Incremental HTTP/1.x response parser. Callers feed it raw transport
/// bytes with `push` and signal end-of-stream with `finish`; a body
/// without a Content-Length is only complete once `finish` is called.
#[derive(Debug)]
pub struct ResponseParser {
    state: ParseState,
    buffer: Vec<u8>,
    warnings: Vec<ParseWarning>,
    limits: Limits,
    offset: usize,
    head_start: usize,
    status: Option<StatusLine>,
    headers: HeaderSet,
    body: Vec<u8>,
    body_mode: BodyMode,
    remaining: usize,
    done: Option<Response>,
    failure: Option<ParseError>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            state: ParseState::StatusLine,
            buffer: Vec::new(),
            warnings: Vec::new(),
            limits,
            offset: 0,
            head_start: 0,
            status: None,
            headers: HeaderSet::default(),
            body: Vec::new(),
            body_mode: BodyMode::NoBody,
            remaining: 0,
            done: None,
            failure: None,
        }
    }

    pub fn push(&mut self, bytes: &[u8]) -> ParseStatus<Response> {
        self.buffer.extend_from_slice(bytes);
        self.advance(false)
    }

    /// Signals that the transport reached end-of-stream. Never returns
    /// `NeedMore` unless a message was already handed out.
    pub fn finish(&mut self) -> ParseStatus<Response> {
        self.advance(true)
    }

    fn advance(&mut self, eof: bool) -> ParseStatus<Response> {
        loop {
            match self.state {
                ParseState::StatusLine => {
                    let Some((line, start)) = self.take_line() else {
                        if let Err(error) = self.check_head_limit(self.buffer.len()) {
                            return self.fail(error);
                        }
                        if eof {
                            return self.fail(ParseError {
                                kind: ParseErrorKind::UnexpectedEndOfStream,
                                offset: self.offset + self.buffer.len(),
                            });
                        }
                        return self.need_more();
                    };
                    if let Err(error) = self.check_head_limit(0) {
                        return self.fail(error);
                    }
                    match parse_status_line(&line, start, &mut self.warnings) {
                        Ok(status) => {
                            self.status = Some(status);
                            self.state = ParseState::Headers;
                        }
                        Err(error) => return self.fail(error),
                    }
                }
                ParseState::Headers => {
                    let Some((line, start)) = self.take_line() else {
                        if let Err(error) = self.check_head_limit(self.buffer.len()) {
                            return self.fail(error);
                        }
                        if eof {
                            return self.fail(ParseError {
                                kind: ParseErrorKind::UnexpectedEndOfStream,
                                offset: self.offset + self.buffer.len(),
                            });
                        }
                        return self.need_more();
                    };
                    if let Err(error) = self.check_head_limit(0) {
                        return self.fail(error);
                    }
                    if line.is_empty() {
                        if let Err(error) = self.plan_body() {
                            return self.fail(error);
                        }
                        self.state = ParseState::Body;
                    } else {
                        match parse_header_line(&line, start) {
                            Ok(header) => self.headers.push(header),
                            Err(error) => return self.fail(error),
                        }
                    }
                }
                ParseState::Body => match self.body_mode {
                    BodyMode::ContentLength => {
                        let take = self.buffer.len().min(self.remaining);
                        self.body.extend(self.buffer.drain(..take));
                        self.offset += take;
                        self.remaining -= take;
                        if self.remaining == 0 {
                            self.seal();
                            continue;
                        }
                        if eof {
                            return self.fail(ParseError {
                                kind: ParseErrorKind::TruncatedBody,
                                offset: self.offset,
                            });
                        }
                        return self.need_more();
                    }
                    BodyMode::CloseDelimited => {
                        if self.body.len() + self.buffer.len() > self.limits.max_body_bytes {
                            return self.fail(ParseError {
                                kind: ParseErrorKind::BodyTooLarge,
                                offset: self.offset,
                            });
                        }
                        let take = self.buffer.len();
                        self.body.extend(self.buffer.drain(..));
                        self.offset += take;
                        if eof {
                            self.seal();
                            continue;
                        }
                        return self.need_more();
                    }
                    BodyMode::NoBody => self.seal(),
                },
                ParseState::Done => {
                    if let Some(message) = self.done.take() {
                        let warnings = std::mem::take(&mut self.warnings);
                        return ParseStatus::Complete { message, warnings };
                    }
                    if self.buffer.is_empty() {
                        return ParseStatus::NeedMore {
                            warnings: Vec::new(),
                        };
                    }
                    // Leftover bytes after a completed message start the
                    // next one on the same connection.
                    self.reset();
                }
                ParseState::Failed => {
                    let error = self.failure.clone().unwrap_or(ParseError {
                        kind: ParseErrorKind::UnexpectedEndOfStream,
                        offset: self.offset,
                    });
                    return ParseStatus::Error {
                        error,
                        warnings: std::mem::take(&mut self.warnings),
                    };
                }
            }
        }
    }

    fn take_line(&mut self) -> Option<(Vec<u8>, usize)> {
        let newline = twoway::find_bytes(&self.buffer, LF)?;
        let start = self.offset;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        self.offset += line.len();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        } else {
            self.warnings.push(ParseWarning {
                kind: ParseWarningKind::BareLineFeed,
                offset: start,
            });
        }
        Some((line, start))
    }

    fn plan_body(&mut self) -> Result<(), ParseError> {
        let no_body = self
            .status
            .as_ref()
            .is_some_and(|line| status_has_no_body(line.status_code));
        let length = self.headers.content_length();

        self.body_mode = if no_body || length == Some(0) {
            BodyMode::NoBody
        } else if let Some(length) = length {
            if length > self.limits.max_body_bytes {
                return Err(ParseError {
                    kind: ParseErrorKind::BodyTooLarge,
                    offset: self.offset,
                });
            }
            self.remaining = length;
            BodyMode::ContentLength
        } else {
            BodyMode::CloseDelimited
        };

        Ok(())
    }

    fn seal(&mut self) {
        if let Some(line) = self.status.take() {
            let headers = std::mem::take(&mut self.headers);
            let body = std::mem::take(&mut self.body);
            self.done = Some(Response {
                line,
                headers,
                body,
            });
        }
        self.state = ParseState::Done;
    }

    fn reset(&mut self) {
        self.state = ParseState::StatusLine;
        self.head_start = self.offset;
        self.status = None;
        self.headers = HeaderSet::default();
        self.body = Vec::new();
        self.body_mode = BodyMode::NoBody;
        self.remaining = 0;
    }

    // `pending` counts buffered bytes that are known to still belong to
    // the head (no complete line in the buffer yet).
    fn check_head_limit(&self, pending: usize) -> Result<(), ParseError> {
        if (self.offset - self.head_start) + pending > self.limits.max_header_bytes {
            return Err(ParseError {
                kind: ParseErrorKind::HeaderTooLarge,
                offset: self.limits.max_header_bytes,
            });
        }
        Ok(())
    }

    fn need_more(&self) -> ParseStatus<Response> {
        ParseStatus::NeedMore {
            warnings: self.warnings.clone(),
        }
    }

    fn fail(&mut self, error: ParseError) -> ParseStatus<Response> {
        self.state = ParseState::Failed;
        self.failure = Some(error.clone());
        ParseStatus::Error {
            error,
            warnings: std::mem::take(&mut self.warnings),
        }
    }
}

fn parse_status_line(
    line: &[u8],
    offset: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Result<StatusLine, ParseError> {
    let text = std::str::from_utf8(line).map_err(|_| ParseError {
        kind: ParseErrorKind::MalformedStatusLine,
        offset,
    })?;

    let mut parts = text.splitn(3, ' ');
    let version_raw = parts.next().unwrap_or("");
    let status_raw = parts.next().ok_or(ParseError {
        kind: ParseErrorKind::MalformedStatusLine,
        offset,
    })?;
    let reason = parts.next().unwrap_or("").trim();

    let version = parse_http_version(version_raw, offset, warnings)?;
    let status_code = parse_status_code(status_raw, offset)?;

    Ok(StatusLine {
        version,
        status_code,
        reason: reason.to_string(),
    })
}

fn parse_http_version(
    token: &str,
    offset: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Result<HttpVersion, ParseError> {
    let digits = token.strip_prefix("HTTP/").ok_or(ParseError {
        kind: ParseErrorKind::MalformedStatusLine,
        offset,
    })?;
    let bytes = digits.as_bytes();
    if bytes.len() != 3 || !bytes[0].is_ascii_digit() || bytes[1] != b'.' || !bytes[2].is_ascii_digit()
    {
        return Err(ParseError {
            kind: ParseErrorKind::MalformedStatusLine,
            offset,
        });
    }

    let major = bytes[0] - b'0';
    let minor = bytes[2] - b'0';
    Ok(match (major, minor) {
        (1, 0) => HttpVersion::Http10,
        (1, 1) => HttpVersion::Http11,
        _ => {
            warnings.push(ParseWarning {
                kind: ParseWarningKind::UnknownVersion(token.to_string()),
                offset,
            });
            HttpVersion::Other { major, minor }
        }
    })
}

fn parse_status_code(field: &str, offset: usize) -> Result<u16, ParseError> {
    let bytes = field.as_bytes();
    if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(ParseError {
            kind: ParseErrorKind::MalformedStatusLine,
            offset,
        });
    }
    let code = field.parse::<u16>().map_err(|_| ParseError {
        kind: ParseErrorKind::MalformedStatusLine,
        offset,
    })?;
    if !(100..=599).contains(&code) {
        return Err(ParseError {
            kind: ParseErrorKind::MalformedStatusLine,
            offset,
        });
    }
    Ok(code)
}

fn parse_header_line(line: &[u8], offset: usize) -> Result<Header, ParseError> {
    let text = std::str::from_utf8(line).map_err(|_| ParseError {
        kind: ParseErrorKind::MalformedHeaderLine,
        offset,
    })?;

    // Obsolete line folding is not honored.
    if text.starts_with(' ') || text.starts_with('\t') {
        return Err(ParseError {
            kind: ParseErrorKind::MalformedHeaderLine,
            offset,
        });
    }

    let (raw_name, value) = text.split_once(':').ok_or(ParseError {
        kind: ParseErrorKind::MalformedHeaderLine,
        offset,
    })?;

    let name = raw_name.trim();
    if name.is_empty() || name.bytes().any(|byte| byte.is_ascii_control()) {
        return Err(ParseError {
            kind: ParseErrorKind::MalformedHeaderLine,
            offset,
        });
    }

    Ok(Header {
        name: name.to_string(),
        value: value.trim().to_string(),
        raw_name: raw_name.to_string(),
    })
}

fn status_has_no_body(status_code: u16) -> bool {
    status_code / 100 == 1 || status_code == 204 || status_code == 304
}
