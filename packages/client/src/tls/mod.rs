//! TLS client setup shared by direct HTTPS connections and tunnels.

use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::config::RootCertificates;

/// Build a TLS connector trusting `roots`.
///
/// # Errors
///
/// Returns a connect error if the crypto provider rejects the default
/// protocol versions.
pub fn connector(roots: RootCertificates) -> crate::Result<TlsConnector> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(crate::error::connect)?
        .with_root_certificates(root_store(roots))
        .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}

fn root_store(roots: RootCertificates) -> RootCertStore {
    let mut root_store = RootCertStore::empty();

    if roots == RootCertificates::Native {
        let loaded = rustls_native_certs::load_native_certs();
        let (added, ignored) = root_store.add_parsable_certificates(loaded.certs);
        for err in &loaded.errors {
            tracing::warn!(target: "decorquest::tls", "certificate load error: {}", err);
        }
        tracing::debug!(
            target: "decorquest::tls",
            added,
            ignored,
            "loaded native root certificates"
        );
        if !root_store.is_empty() {
            return root_store;
        }
    }

    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    root_store
}

/// Run a TLS handshake for `host` over `stream`.
///
/// # Errors
///
/// Returns a connect error if `host` is not a valid server name or the
/// handshake fails.
pub async fn handshake<S>(
    connector: &TlsConnector,
    host: &str,
    stream: S,
) -> crate::Result<TlsStream<S>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let server_name = ServerName::try_from(host.to_owned()).map_err(|e| {
        crate::error::connect(format!("invalid TLS server name {host:?}: {e}"))
    })?;

    connector
        .connect(server_name, stream)
        .await
        .map_err(crate::error::connect)
}
