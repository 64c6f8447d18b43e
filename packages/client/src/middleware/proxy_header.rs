use http::header::{HOST, PROXY_AUTHORIZATION};

use crate::dispatch::Requester;
use crate::http::headers::header_value;
use crate::http::{RequestHandle, ResponseCallback};
use crate::options::{RequestOptions, Scheme};
use crate::proxy::ProxyConfig;

/// Sends plain-text requests that carry `options.proxy` to the proxy.
///
/// The copy forwarded downstream connects to the proxy's address while its
/// `Host` header names the real destination. `https` requests pass through;
/// they are tunneled instead.
#[derive(Debug, Clone)]
pub struct ForwardProxy<R> {
    inner: R,
}

impl<R> ForwardProxy<R> {
    pub fn wrap(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Requester> Requester for ForwardProxy<R> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        let proxy = match (&options.proxy, options.scheme) {
            (Some(proxy), Scheme::Http) => ProxyConfig::parse(proxy)?,
            _ => return self.inner.request(options, callback),
        };

        tracing::trace!(
            target: "decorquest::proxy",
            proxy = %proxy.authority(),
            "forwarding through proxy"
        );

        let target = header_value(options.authority())?;
        let mut options = options.clone();
        options.headers.insert(HOST, target);
        options.hostname = proxy.host;
        options.port = Some(proxy.port);
        if let Some(credentials) = proxy.credentials.as_deref() {
            options
                .headers
                .insert(PROXY_AUTHORIZATION, crate::auth::basic_auth(credentials)?);
        }

        self.inner.request(&options, callback)
    }
}
