use std::time::Duration;

use super::BoxError;
use super::helpers::{BadScheme, Canceled, TimedOut};
use super::types::{Error, Kind};

/// Creates an `Error` for invalid request options.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a request error.
pub fn request<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Request).with(e.into())
}

/// Creates an `Error` for connection establishment failures.
pub fn connect<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Connect).with(e.into())
}

/// Creates an `Error` for a body error.
pub fn body<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Body).with(e.into())
}

/// Creates the `ETIMEDOUT` error synthesized by the response deadline.
pub fn timed_out(after: Duration) -> Error {
    Error::new(Kind::Timeout).with(TimedOut(after))
}

pub fn canceled() -> Error {
    Error::new(Kind::Canceled).with(Canceled)
}

pub fn bad_scheme(scheme: &str) -> Error {
    Error::new(Kind::Builder).with(BadScheme(scheme.to_owned()))
}
