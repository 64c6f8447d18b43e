//! CONNECT tunnels through HTTP(S) proxies.
//!
//! A [`TunnelAgent`] is the connection-pool override the tunnel decorator
//! installs on a request. The transport asks it for a connection instead of
//! dialing the origin itself. Each of the four [`TunnelKind`]s negotiates its
//! own way: the proxy leg is plain TCP or TLS, the target leg inside the
//! tunnel is plain or TLS.

use std::fmt;
use std::net::IpAddr;

use http::HeaderMap;

use crate::connect::{BoxedIo, Connector, establish_connect_tunnel};
use crate::options::{Agent, Scheme};

/// Failure of the CONNECT handshake; reported as a connect error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TunnelError {
    #[error("proxy refused CONNECT: {0}")]
    Rejected(String),
    #[error("proxy closed the connection during CONNECT")]
    Closed,
    #[error("CONNECT response head exceeds {0} bytes")]
    HeadTooLarge(usize),
}

/// Negotiation strategy, keyed by `(target scheme, proxy scheme)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunnelKind {
    HttpOverHttp,
    HttpOverHttps,
    HttpsOverHttp,
    HttpsOverHttps,
}

impl TunnelKind {
    #[must_use]
    pub fn select(target: Scheme, proxy: Scheme) -> Self {
        match (target, proxy) {
            (Scheme::Http, Scheme::Http) => TunnelKind::HttpOverHttp,
            (Scheme::Http, Scheme::Https) => TunnelKind::HttpOverHttps,
            (Scheme::Https, Scheme::Http) => TunnelKind::HttpsOverHttp,
            (Scheme::Https, Scheme::Https) => TunnelKind::HttpsOverHttps,
        }
    }

    #[must_use]
    pub fn target(self) -> Scheme {
        match self {
            TunnelKind::HttpOverHttp | TunnelKind::HttpOverHttps => Scheme::Http,
            TunnelKind::HttpsOverHttp | TunnelKind::HttpsOverHttps => Scheme::Https,
        }
    }

    #[must_use]
    pub fn proxy(self) -> Scheme {
        match self {
            TunnelKind::HttpOverHttp | TunnelKind::HttpsOverHttp => Scheme::Http,
            TunnelKind::HttpOverHttps | TunnelKind::HttpsOverHttps => Scheme::Https,
        }
    }

    /// Selection key, e.g. `"https-over-http"`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            TunnelKind::HttpOverHttp => "http-over-http",
            TunnelKind::HttpOverHttps => "http-over-https",
            TunnelKind::HttpsOverHttp => "https-over-http",
            TunnelKind::HttpsOverHttps => "https-over-https",
        }
    }
}

impl fmt::Display for TunnelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where the tunnel goes and what the CONNECT request carries.
#[derive(Clone, PartialEq)]
pub struct TunnelOptions {
    pub proxy_host: String,
    pub proxy_port: u16,
    pub local_address: Option<IpAddr>,
    /// `user:pass` for `Proxy-Authorization: Basic`.
    pub proxy_auth: Option<String>,
    /// Snapshot of the caller's headers, sent on the CONNECT request.
    pub headers: HeaderMap,
}

impl fmt::Debug for TunnelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TunnelOptions")
            .field("proxy_host", &self.proxy_host)
            .field("proxy_port", &self.proxy_port)
            .field("local_address", &self.local_address)
            .field("proxy_auth", &self.proxy_auth.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers)
            .finish()
    }
}

/// Tunnel-capable connection-pool handle, owned by the single request it was
/// built for.
#[derive(Debug, Clone, PartialEq)]
pub struct TunnelAgent {
    kind: TunnelKind,
    options: TunnelOptions,
}

impl TunnelAgent {
    #[must_use]
    pub fn new(kind: TunnelKind, options: TunnelOptions) -> Self {
        Self { kind, options }
    }

    #[must_use]
    pub fn kind(&self) -> TunnelKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &TunnelOptions {
        &self.options
    }

    /// `host:port` of the proxy this agent connects to.
    #[must_use]
    pub fn proxy_address(&self) -> String {
        format!("{}:{}", self.options.proxy_host, self.options.proxy_port)
    }

    /// Open a connection to `target_host:target_port` through the proxy.
    ///
    /// # Errors
    ///
    /// Returns a connect error if the proxy cannot be reached, a TLS
    /// handshake fails, or the proxy does not accept the CONNECT request.
    pub async fn connect(
        &self,
        connector: &Connector,
        target_host: &str,
        target_port: u16,
    ) -> crate::Result<BoxedIo> {
        let target = authority(target_host, target_port);
        let proxy_authorization = self
            .options
            .proxy_auth
            .as_deref()
            .map(crate::auth::basic_auth)
            .transpose()?;

        tracing::debug!(
            target: "decorquest::tunnel",
            kind = %self.kind,
            proxy = %self.proxy_address(),
            authority = %target,
            "opening tunnel"
        );

        let mut proxy = connector
            .tcp(
                &self.options.proxy_host,
                self.options.proxy_port,
                self.options.local_address,
            )
            .await?;
        let tls = connector.tls();
        let headers = &self.options.headers;
        let auth = proxy_authorization.as_ref();

        match self.kind {
            TunnelKind::HttpOverHttp => {
                establish_connect_tunnel(&mut proxy, &target, headers, auth).await?;
                Ok(Box::new(proxy))
            }
            TunnelKind::HttpsOverHttp => {
                establish_connect_tunnel(&mut proxy, &target, headers, auth).await?;
                let stream = crate::tls::handshake(tls, target_host, proxy).await?;
                Ok(Box::new(stream))
            }
            TunnelKind::HttpOverHttps => {
                let mut proxy = crate::tls::handshake(tls, &self.options.proxy_host, proxy).await?;
                establish_connect_tunnel(&mut proxy, &target, headers, auth).await?;
                Ok(Box::new(proxy))
            }
            TunnelKind::HttpsOverHttps => {
                let mut proxy = crate::tls::handshake(tls, &self.options.proxy_host, proxy).await?;
                establish_connect_tunnel(&mut proxy, &target, headers, auth).await?;
                let stream = crate::tls::handshake(tls, target_host, proxy).await?;
                Ok(Box::new(stream))
            }
        }
    }
}

fn authority(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Builds the connection-pool handle for a tunnel.
///
/// The tunnel decorator only decides *that* a tunnel is needed and with which
/// strategy; how the handle is made is up to the builder, so tests and
/// alternative transports can substitute their own.
pub trait TunnelBuilder: Send + Sync {
    /// # Errors
    ///
    /// Implementations report invalid tunnel settings as builder errors.
    fn build(&self, kind: TunnelKind, options: TunnelOptions) -> crate::Result<Agent>;
}

/// Builds [`TunnelAgent`]s negotiated by this crate's transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectTunnel;

impl TunnelBuilder for ConnectTunnel {
    fn build(&self, kind: TunnelKind, options: TunnelOptions) -> crate::Result<Agent> {
        Ok(Agent::Tunnel(TunnelAgent::new(kind, options)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_key_reflects_scheme_pair() {
        assert_eq!(
            TunnelKind::select(Scheme::Https, Scheme::Http).key(),
            "https-over-http"
        );
        assert_eq!(
            TunnelKind::select(Scheme::Https, Scheme::Https).to_string(),
            "https-over-https"
        );
        assert_ne!(
            TunnelKind::select(Scheme::Https, Scheme::Http),
            TunnelKind::select(Scheme::Https, Scheme::Https)
        );
    }

    #[test]
    fn kind_round_trips_its_schemes() {
        for kind in [
            TunnelKind::HttpOverHttp,
            TunnelKind::HttpOverHttps,
            TunnelKind::HttpsOverHttp,
            TunnelKind::HttpsOverHttps,
        ] {
            assert_eq!(TunnelKind::select(kind.target(), kind.proxy()), kind);
        }
    }

    #[test]
    fn debug_redacts_proxy_credentials() {
        let options = TunnelOptions {
            proxy_host: "proxy.test".to_owned(),
            proxy_port: 3128,
            local_address: None,
            proxy_auth: Some("user:secret".to_owned()),
            headers: HeaderMap::new(),
        };
        let debug = format!("{:?}", TunnelAgent::new(TunnelKind::HttpsOverHttp, options));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("proxy.test"));
    }

    #[test]
    fn ipv6_targets_are_bracketed() {
        assert_eq!(authority("::1", 443), "[::1]:443");
        assert_eq!(authority("target.test", 443), "target.test:443");
    }
}
