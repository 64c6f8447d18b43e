use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `decorquest_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while composing, issuing or awaiting a request.
pub struct Error {
    pub(crate) inner: Box<Inner>,
}

pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) source: Option<Box<dyn StdError + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Invalid options: unparseable URL, unsupported scheme, bad header value.
    Builder,
    /// Failure while writing the request or reading the response head.
    Request,
    /// Connection establishment failed, including TLS and CONNECT tunnels.
    Connect,
    /// No response arrived before the configured deadline.
    Timeout,
    /// Reading the response body failed.
    Body,
    /// The request was aborted before it settled.
    Canceled,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner { kind, source: None }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// Errno-style code for errors that have one, e.g. `ETIMEDOUT`.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self.inner.kind {
            Kind::Timeout => Some("ETIMEDOUT"),
            Kind::Canceled => Some("ECANCELED"),
            _ => None,
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("decorquest::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.inner.kind {
            Kind::Builder => "invalid request options",
            Kind::Request => "error sending request",
            Kind::Connect => "error establishing connection",
            Kind::Timeout => "ETIMEDOUT",
            Kind::Body => "response body error",
            Kind::Canceled => "request canceled",
        };
        match self.inner.source {
            Some(ref source) => write!(f, "{prefix}: {source}"),
            None => f.write_str(prefix),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
