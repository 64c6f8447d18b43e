//! Builder methods for [`TransportConfig`]

use std::time::Duration;

use http::HeaderValue;

use super::core::{RootCertificates, TransportConfig};

impl TransportConfig {
    /// Set the connection timeout
    ///
    /// Only covers the TCP handshake (to the origin or to the proxy). The time
    /// to the first response byte is bounded per request by the timeout
    /// decorator instead.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use decorquest_client::config::TransportConfig;
    ///
    /// let config = TransportConfig::default()
    ///     .with_connect_timeout(Duration::from_secs(5));
    /// assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
    /// ```
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Wait for the operating system to give up on connecting.
    #[must_use]
    pub fn without_connect_timeout(mut self) -> Self {
        self.connect_timeout = None;
        self
    }

    #[must_use]
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Select the trust anchors used to verify TLS servers
    ///
    /// # Examples
    /// ```
    /// use decorquest_client::config::{RootCertificates, TransportConfig};
    ///
    /// let config = TransportConfig::default()
    ///     .with_root_certificates(RootCertificates::Native);
    /// assert_eq!(config.root_certificates, RootCertificates::Native);
    /// ```
    #[must_use]
    pub fn with_root_certificates(mut self, roots: RootCertificates) -> Self {
        self.root_certificates = roots;
        self
    }

    /// Set the `User-Agent` added to requests that do not set one; `None`
    /// sends no `User-Agent` at all.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: Option<HeaderValue>) -> Self {
        self.user_agent = user_agent;
        self
    }
}
