//! The base request primitive.
//!
//! [`Requester`] is the one contract every layer of a chain implements: the
//! [`Dispatcher`] at the bottom, which picks a transport by scheme, and every
//! decorator stacked on top of it.

mod transport;

use std::sync::Arc;

pub use transport::{HttpTransport, HttpsTransport};

use crate::config::TransportConfig;
use crate::connect::Connector;
use crate::http::{RequestHandle, ResponseCallback};
use crate::options::{RequestOptions, Scheme};

/// Issue a request described by `options`.
///
/// Implementations must treat `options` as read-only input: a layer that
/// needs different options clones them and forwards the clone. The returned
/// handle is the caller's only way to observe and control the request.
pub trait Requester: Send + Sync {
    /// # Errors
    ///
    /// Returns a builder error for options that cannot be turned into a
    /// request. Connection and protocol failures are delivered on the handle.
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle>;
}

impl<R: Requester + ?Sized> Requester for &R {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        (**self).request(options, callback)
    }
}

impl<R: Requester + ?Sized> Requester for Box<R> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        (**self).request(options, callback)
    }
}

impl<R: Requester + ?Sized> Requester for Arc<R> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        (**self).request(options, callback)
    }
}

/// Routes each request to the transport for its scheme.
#[derive(Debug, Clone)]
pub struct Dispatcher<H = HttpTransport, S = HttpsTransport> {
    http: H,
    https: S,
}

impl Dispatcher {
    /// Plain and TLS transports sharing one connector built from `config`.
    ///
    /// # Errors
    ///
    /// Returns a connect error if the TLS client cannot be configured.
    pub fn new(config: TransportConfig) -> crate::Result<Self> {
        let connector = Arc::new(Connector::new(config)?);
        Ok(Self {
            http: HttpTransport::new(Arc::clone(&connector)),
            https: HttpsTransport::new(connector),
        })
    }
}

impl<H, S> Dispatcher<H, S> {
    pub fn from_transports(http: H, https: S) -> Self {
        Self { http, https }
    }
}

impl<H: Requester, S: Requester> Requester for Dispatcher<H, S> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        tracing::trace!(
            target: "decorquest::dispatch",
            scheme = %options.scheme,
            method = %options.method,
            host = %options.hostname,
            "dispatching"
        );
        match options.scheme {
            Scheme::Http => self.http.request(options, callback),
            Scheme::Https => self.https.request(options, callback),
        }
    }
}
