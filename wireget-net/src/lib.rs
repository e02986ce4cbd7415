mod http1;

pub use http1::{
    Header, HeaderSet, HttpVersion, Limits, ParseError, ParseErrorKind, ParseStatus, ParseWarning,
    ParseWarningKind, Response, ResponseParser, StatusLine, read_response,
};
