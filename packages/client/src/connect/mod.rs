//! Connection establishment: TCP (optionally bound to a local address), TLS,
//! and CONNECT negotiation for tunnels.

mod http_connect;

use std::io;
use std::net::{IpAddr, SocketAddr};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpSocket, TcpStream};
use tokio_rustls::TlsConnector;

pub use http_connect::{HEADER_SECTION_MAX_LENGTH, establish_connect_tunnel};

use crate::config::TransportConfig;

/// A byte stream a request can be written to.
pub trait Io: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> Io for T {}

pub type BoxedIo = Box<dyn Io>;

/// Opens connections on behalf of the transports and tunnels.
pub struct Connector {
    config: TransportConfig,
    tls: TlsConnector,
}

impl Connector {
    /// # Errors
    ///
    /// Returns a connect error if the TLS client cannot be configured.
    pub fn new(config: TransportConfig) -> crate::Result<Self> {
        let tls = crate::tls::connector(config.root_certificates)?;
        Ok(Self { config, tls })
    }

    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    #[must_use]
    pub fn tls(&self) -> &TlsConnector {
        &self.tls
    }

    /// Open a TCP connection to `host:port`, trying every resolved address in
    /// order, bound to `local_address` when one is given.
    ///
    /// # Errors
    ///
    /// Returns a connect error if resolution fails, no address accepts the
    /// connection, or the configured connect timeout elapses.
    pub async fn tcp(
        &self,
        host: &str,
        port: u16,
        local_address: Option<IpAddr>,
    ) -> crate::Result<TcpStream> {
        let connecting = connect_any(host, port, local_address);
        let stream = match self.config.connect_timeout {
            Some(limit) => match tokio::time::timeout(limit, connecting).await {
                Ok(connected) => connected,
                Err(_) => Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connecting to {host}:{port} timed out"),
                )),
            },
            None => connecting.await,
        }
        .map_err(crate::error::connect)?;

        if self.config.nodelay {
            if let Err(e) = stream.set_nodelay(true) {
                tracing::debug!(target: "decorquest::connect", "set_nodelay failed: {}", e);
            }
        }
        Ok(stream)
    }

    /// Open a connection straight to the origin, with TLS when `tls` is set.
    ///
    /// # Errors
    ///
    /// Returns a connect error if the TCP connection or the TLS handshake
    /// fails.
    pub async fn direct(
        &self,
        host: &str,
        port: u16,
        local_address: Option<IpAddr>,
        tls: bool,
    ) -> crate::Result<BoxedIo> {
        let stream = self.tcp(host, port, local_address).await?;
        tracing::trace!(target: "decorquest::connect", host, port, tls, "connected");
        if tls {
            let stream = crate::tls::handshake(&self.tls, host, stream).await?;
            Ok(Box::new(stream))
        } else {
            Ok(Box::new(stream))
        }
    }
}

async fn connect_any(
    host: &str,
    port: u16,
    local_address: Option<IpAddr>,
) -> io::Result<TcpStream> {
    let mut last_error = None;

    for addr in tokio::net::lookup_host((host, port)).await? {
        if let Some(local) = local_address {
            if local.is_ipv4() != addr.is_ipv4() {
                continue;
            }
        }
        match connect_one(addr, local_address).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no usable address for {host}:{port}"),
        )
    }))
}

async fn connect_one(addr: SocketAddr, local_address: Option<IpAddr>) -> io::Result<TcpStream> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    if let Some(local) = local_address {
        socket.bind(SocketAddr::new(local, 0))?;
    }
    socket.connect(addr).await
}
