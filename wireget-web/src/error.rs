use thiserror::Error;
use wireget_net::ParseError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request target is missing a host")]
    MissingHost,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse response: {0:?}")]
    Parse(ParseError),
    #[error("request timed out")]
    TimedOut,
}
