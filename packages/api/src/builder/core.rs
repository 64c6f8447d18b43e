//! Core `RequestBuilder` structure and base functionality

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use decorquest_client::{JarOption, RequestOptions, Response, Result};
use http::Method;
use url::Url;

use crate::client::Client;

/// Anything that names the target of a request.
pub trait IntoTarget {
    /// # Errors
    ///
    /// Returns a builder error for relative URLs, URLs without a host and
    /// schemes other than `http`/`https`.
    fn into_options(self) -> Result<RequestOptions>;
}

impl IntoTarget for &str {
    fn into_options(self) -> Result<RequestOptions> {
        RequestOptions::parse(self)
    }
}

impl IntoTarget for String {
    fn into_options(self) -> Result<RequestOptions> {
        RequestOptions::parse(&self)
    }
}

impl IntoTarget for &Url {
    fn into_options(self) -> Result<RequestOptions> {
        RequestOptions::parse(self.as_str())
    }
}

impl IntoTarget for Url {
    fn into_options(self) -> Result<RequestOptions> {
        RequestOptions::parse(self.as_str())
    }
}

impl IntoTarget for RequestOptions {
    fn into_options(self) -> Result<RequestOptions> {
        Ok(self)
    }
}

/// Fluent construction of [`RequestOptions`], sent through a [`Client`].
///
/// Errors met while building are kept and reported by [`send`](Self::send)
/// or [`build`](Self::build).
pub struct RequestBuilder {
    pub(crate) client: Client,
    pub(crate) options: Result<RequestOptions>,
    pub(crate) debug_enabled: bool,
}

impl RequestBuilder {
    pub fn new(client: Client, method: Method, target: impl IntoTarget) -> Self {
        let options = target.into_options().map(|mut options| {
            options.method = method;
            options
        });
        Self {
            client,
            options,
            debug_enabled: false,
        }
    }

    /// Apply `f` to the options unless an earlier step failed.
    pub(crate) fn map(mut self, f: impl FnOnce(&mut RequestOptions)) -> Self {
        if let Ok(options) = &mut self.options {
            f(options);
        }
        self
    }

    /// Replace the options with `error` unless an earlier step failed.
    pub(crate) fn fail(mut self, error: decorquest_client::Error) -> Self {
        if self.options.is_ok() {
            self.options = Err(error);
        }
        self
    }

    /// Log the request and its outcome through `log`.
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.debug_enabled = true;
        self
    }

    /// Send cookies from, and store cookies into, the client's default jar.
    #[must_use]
    pub fn default_jar(self) -> Self {
        self.map(|options| options.jar = Some(JarOption::Default))
    }

    /// Send cookies from, and store cookies into, `jar`.
    #[must_use]
    pub fn jar(self, jar: impl Into<JarOption>) -> Self {
        let jar = jar.into();
        self.map(|options| options.jar = Some(jar))
    }

    /// Route the request through the proxy at `url`,
    /// `scheme://[user:pass@]host:port`.
    #[must_use]
    pub fn proxy(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.map(|options| options.proxy = Some(url))
    }

    /// Fail with `ETIMEDOUT` when no response head arrives within `timeout`.
    #[must_use]
    pub fn response_timeout(self, timeout: Duration) -> Self {
        self.map(|options| options.response_timeout = Some(timeout))
    }

    /// Bind outgoing sockets to `address`.
    #[must_use]
    pub fn local_address(self, address: IpAddr) -> Self {
        self.map(|options| options.local_address = Some(address))
    }

    /// The options this builder would send.
    ///
    /// # Errors
    ///
    /// Returns the first error met while building.
    pub fn build(self) -> Result<RequestOptions> {
        self.options
    }

    /// Send the request and wait for the response head.
    ///
    /// # Errors
    ///
    /// Returns the first error met while building, or the request's error.
    pub async fn send(self) -> Result<Response> {
        let options = self.options?;
        if self.debug_enabled {
            log::debug!(
                "decorquest: {} {}://{}{}",
                options.method,
                options.scheme,
                options.authority(),
                options.path
            );
        }

        let result = self.client.send(&options).await;
        if self.debug_enabled {
            match &result {
                Ok(response) => log::debug!("decorquest: {} {}", options.method, response.status()),
                Err(error) => log::debug!("decorquest: {} failed: {}", options.method, error),
            }
        }
        result
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("options", &self.options)
            .field("debug_enabled", &self.debug_enabled)
            .finish_non_exhaustive()
    }
}
