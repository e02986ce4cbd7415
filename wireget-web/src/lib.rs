mod client;
#[cfg(test)]
mod client_test;
mod error;
mod request;
#[cfg(test)]
mod request_test;
mod response;
#[cfg(test)]
mod response_test;

pub use client::{Client, ClientConfig};
pub use error::FetchError;
pub use request::{Request, RequestBuilder};
pub use response::FetchResult;
