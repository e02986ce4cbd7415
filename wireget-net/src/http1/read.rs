use std::io::Read;

use super::parser::{ParseStatus, ResponseParser};
use super::types::{Limits, ParseError, ParseErrorKind, ParseWarning, Response};

const READ_CHUNK: usize = 8192;

/// Pulls bytes from any sequential source and drives the parser to a
/// single complete response. Transport failures surface as
/// `UnexpectedEndOfStream`; a clean close is only an error when the
/// message was not yet complete.
pub fn read_response<R: Read>(
    mut reader: R,
    limits: Limits,
) -> Result<(Response, Vec<ParseWarning>), ParseError> {
    let mut parser = ResponseParser::with_limits(limits);
    let mut chunk = [0u8; READ_CHUNK];
    let mut total = 0usize;

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => {
                return Err(ParseError {
                    kind: ParseErrorKind::UnexpectedEndOfStream,
                    offset: total,
                });
            }
        };

        let status = if read == 0 {
            parser.finish()
        } else {
            total += read;
            parser.push(&chunk[..read])
        };

        match status {
            ParseStatus::NeedMore { .. } => {
                if read == 0 {
                    return Err(ParseError {
                        kind: ParseErrorKind::UnexpectedEndOfStream,
                        offset: total,
                    });
                }
            }
            ParseStatus::Complete { message, warnings } => return Ok((message, warnings)),
            ParseStatus::Error { error, .. } => return Err(error),
        }
    }
}
