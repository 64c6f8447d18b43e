//! The standard decorator stack behind a cloneable handle.

use std::fmt;
use std::sync::Arc;

use decorquest_client::{
    BasicAuth, Cookies, DisablePooling, Dispatcher, ForwardProxy, Jar, RequestHandle,
    RequestOptions, Requester, RequesterExt, Response, ResponseCallback, ResponseTimeout, Result,
    TransportConfig, Tunneling,
};
use http::Method;

use crate::builder::{IntoTarget, RequestBuilder};

/// `timeout(proxy(tunnel(no-pool(cookies(auth(dispatcher))))))`
pub type StandardStack =
    ResponseTimeout<ForwardProxy<Tunneling<DisablePooling<Cookies<BasicAuth<Dispatcher>>>>>>;

/// An HTTP client running every request through the standard stack.
///
/// Clones share the stack, including the default cookie jar.
#[derive(Clone)]
pub struct Client {
    stack: Arc<StandardStack>,
}

impl Client {
    /// A client with the default [`TransportConfig`].
    ///
    /// # Errors
    ///
    /// Returns a connect error if the TLS client cannot be configured.
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// # Errors
    ///
    /// Returns a connect error if the TLS client cannot be configured.
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        let stack = Dispatcher::new(config)?
            .with_auth()
            .with_cookies()
            .without_pooling()
            .with_tunnel()
            .with_proxy()
            .with_timeout();
        Ok(Self {
            stack: Arc::new(stack),
        })
    }

    pub fn request(&self, method: Method, target: impl IntoTarget) -> RequestBuilder {
        RequestBuilder::new(self.clone(), method, target)
    }

    pub fn get(&self, target: impl IntoTarget) -> RequestBuilder {
        self.request(Method::GET, target)
    }

    pub fn post(&self, target: impl IntoTarget) -> RequestBuilder {
        self.request(Method::POST, target)
    }

    pub fn put(&self, target: impl IntoTarget) -> RequestBuilder {
        self.request(Method::PUT, target)
    }

    pub fn patch(&self, target: impl IntoTarget) -> RequestBuilder {
        self.request(Method::PATCH, target)
    }

    pub fn delete(&self, target: impl IntoTarget) -> RequestBuilder {
        self.request(Method::DELETE, target)
    }

    pub fn head(&self, target: impl IntoTarget) -> RequestBuilder {
        self.request(Method::HEAD, target)
    }

    /// Issue `options` and wait for the response head.
    ///
    /// # Errors
    ///
    /// Returns the first error of the request: invalid options, connection
    /// failure, `ETIMEDOUT` from the response deadline, or cancellation.
    pub async fn send(&self, options: &RequestOptions) -> Result<Response> {
        tracing::debug!(
            target: "decorquest::client",
            method = %options.method,
            host = %options.hostname,
            path = %options.path,
            "sending request"
        );
        self.stack.request(options, None)?.response().await
    }

    /// Issue `options` and return its handle, for callers that want to run
    /// `callback` on the response head or abort the request.
    ///
    /// # Errors
    ///
    /// Returns a builder error for invalid options.
    pub fn issue(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> Result<RequestHandle> {
        self.stack.request(options, callback)
    }

    /// The jar used by requests that opt into `JarOption::Default`, once one
    /// of them has been sent.
    pub fn default_jar(&self) -> Option<&Jar> {
        // timeout -> proxy -> tunnel -> no-pool -> cookies
        self.stack.inner().inner().inner().inner().default_jar()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
