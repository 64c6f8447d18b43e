//! Core transport configuration structure and defaults

use std::time::Duration;

use http::HeaderValue;

/// Which trust anchors verify TLS servers, origin and proxy alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootCertificates {
    /// Mozilla roots bundled with the crate.
    #[default]
    WebPki,
    /// The platform certificate store, falling back to the bundled roots when
    /// it cannot be loaded.
    Native,
}

/// Configuration of the dispatcher's transports.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Bound on establishing the TCP connection; `None` leaves it to the OS.
    pub connect_timeout: Option<Duration>,

    /// Enable `TCP_NODELAY`
    pub nodelay: bool,

    /// Trust anchors for TLS
    pub root_certificates: RootCertificates,

    /// `User-Agent` sent when the request does not carry one
    pub user_agent: Option<HeaderValue>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(30)),
            nodelay: true,
            root_certificates: RootCertificates::default(),
            user_agent: Some(HeaderValue::from_static(concat!(
                "decorquest/",
                env!("CARGO_PKG_VERSION")
            ))),
        }
    }
}
