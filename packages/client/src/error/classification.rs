use std::error::Error as StdError;
use std::io;

use super::helpers::TimedOut;
use super::types::{Error, Kind};

impl Error {
    /// Returns true if the error comes from invalid request options.
    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        if matches!(self.inner.kind, Kind::Timeout) {
            return true;
        }

        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<TimedOut>() {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if io.kind() == io::ErrorKind::TimedOut {
                    return true;
                }
            }
            source = err.source();
        }

        false
    }

    /// Returns true if the error is related to the request
    #[must_use]
    pub fn is_request(&self) -> bool {
        matches!(self.inner.kind, Kind::Request)
    }

    /// Returns true if the error is related to connect, including CONNECT tunnels
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self.inner.kind, Kind::Connect)
    }

    /// Returns true if the error is related to the response body
    #[must_use]
    pub fn is_body(&self) -> bool {
        matches!(self.inner.kind, Kind::Body)
    }

    /// Returns true if the request was aborted before it settled
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self.inner.kind, Kind::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::{builder, canceled, connect, timed_out};

    #[test]
    fn timeout_error_carries_code_and_duration() {
        let err = timed_out(Duration::from_millis(100));
        assert!(err.is_timeout());
        assert_eq!(err.code(), Some("ETIMEDOUT"));
        assert_eq!(err.to_string(), "ETIMEDOUT: 100 ms");
    }

    #[test]
    fn io_timeouts_are_classified_as_timeouts() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out");
        let err = connect(io);
        assert!(err.is_connect());
        assert!(err.is_timeout());
        assert_eq!(err.code(), None);
    }

    #[test]
    fn kinds_are_exclusive() {
        let err = builder("bad header");
        assert!(err.is_builder());
        assert!(!err.is_request());
        assert!(!err.is_timeout());
        assert!(canceled().is_canceled());
    }
}
