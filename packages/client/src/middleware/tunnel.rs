use crate::dispatch::Requester;
use crate::http::{RequestHandle, ResponseCallback};
use crate::options::{RequestOptions, Scheme};
use crate::proxy::ProxyConfig;
use crate::tunnel::{ConnectTunnel, TunnelBuilder, TunnelKind, TunnelOptions};

/// Routes `https` requests that carry `options.proxy` through a CONNECT
/// tunnel, by installing a tunnel agent built for the request.
///
/// Plain `http` requests pass through; [`ForwardProxy`](super::ForwardProxy)
/// handles them.
#[derive(Debug, Clone)]
pub struct Tunneling<R, B = ConnectTunnel> {
    inner: R,
    builder: B,
}

impl<R> Tunneling<R> {
    pub fn wrap(inner: R) -> Self {
        Self::with_builder(inner, ConnectTunnel)
    }
}

impl<R, B> Tunneling<R, B> {
    pub fn with_builder(inner: R, builder: B) -> Self {
        Self { inner, builder }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Requester, B: TunnelBuilder> Requester for Tunneling<R, B> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        let proxy = match (&options.proxy, options.scheme) {
            (Some(proxy), Scheme::Https) => ProxyConfig::parse(proxy)?,
            _ => return self.inner.request(options, callback),
        };

        let kind = TunnelKind::select(options.scheme, proxy.scheme);
        let agent = self.builder.build(
            kind,
            TunnelOptions {
                proxy_host: proxy.host,
                proxy_port: proxy.port,
                local_address: options.local_address,
                proxy_auth: proxy.credentials,
                headers: options.headers.clone(),
            },
        )?;

        let mut options = options.clone();
        options.agent = Some(agent);
        self.inner.request(&options, callback)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use http::HeaderValue;

    use super::*;
    use crate::middleware::testing::Recorder;
    use crate::options::Agent;

    fn tunneled(url: &str, proxy: &str) -> RequestOptions {
        let mut options = RequestOptions::parse(url).unwrap();
        options.proxy = Some(proxy.to_owned());
        options
    }

    fn tunnel_of(options: &RequestOptions) -> crate::tunnel::TunnelAgent {
        options
            .agent
            .as_ref()
            .and_then(Agent::tunnel)
            .cloned()
            .expect("tunnel agent installed")
    }

    #[tokio::test]
    async fn strategy_follows_proxy_scheme() {
        let requester = Tunneling::wrap(Recorder::new());

        requester
            .request(&tunneled("https://target.test/", "http://proxy.test:8080"), None)
            .unwrap();
        let over_http = tunnel_of(&requester.inner().last());

        requester
            .request(&tunneled("https://target.test/", "https://proxy.test:8443"), None)
            .unwrap();
        let over_https = tunnel_of(&requester.inner().last());

        assert_eq!(over_http.kind().key(), "https-over-http");
        assert_eq!(over_https.kind().key(), "https-over-https");
        assert_eq!(over_http.proxy_address(), "proxy.test:8080");
        assert_eq!(over_https.proxy_address(), "proxy.test:8443");
    }

    #[tokio::test]
    async fn tunnel_carries_request_context() {
        let requester = Tunneling::wrap(Recorder::new());
        let mut options = tunneled("https://target.test/", "http://u:p@proxy.test");
        options.local_address = Some(IpAddr::V4(Ipv4Addr::LOCALHOST));
        options
            .headers
            .insert("x-trace", HeaderValue::from_static("abc"));

        requester.request(&options, None).unwrap();

        let sent = requester.inner().last();
        let tunnel = tunnel_of(&sent);
        assert_eq!(tunnel.options().proxy_port, 80);
        assert_eq!(tunnel.options().proxy_auth.as_deref(), Some("u:p"));
        assert_eq!(tunnel.options().local_address, options.local_address);
        assert_eq!(tunnel.options().headers["x-trace"], "abc");
        assert_eq!(sent.hostname, "target.test");
        assert_eq!(sent.headers, options.headers);
        assert_eq!(options.agent, None);
    }

    #[tokio::test]
    async fn plain_requests_are_not_tunneled() {
        let requester = Tunneling::wrap(Recorder::new());
        let options = tunneled("http://target.test/", "http://proxy.test:8080");

        requester.request(&options, None).unwrap();

        assert_eq!(requester.inner().last(), options);
    }

    #[tokio::test]
    async fn custom_builder_is_used() {
        struct Refusing;

        impl TunnelBuilder for Refusing {
            fn build(&self, kind: TunnelKind, _: TunnelOptions) -> crate::Result<Agent> {
                Err(crate::error::builder(format!("no {kind}")))
            }
        }

        let requester = Tunneling::with_builder(Recorder::new(), Refusing);
        let err = requester
            .request(&tunneled("https://target.test/", "http://proxy.test:8080"), None)
            .unwrap_err();

        assert!(err.to_string().contains("https-over-http"));
        assert!(requester.inner().seen().is_empty());
    }
}
