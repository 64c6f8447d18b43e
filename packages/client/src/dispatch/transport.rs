//! HTTP/1.1 exchange over a freshly opened connection.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONNECTION, HOST, USER_AGENT};
use http::{HeaderValue, Request};
use http_body_util::Full;
use hyper_util::rt::TokioIo;
use tokio::task::JoinHandle;

use super::Requester;
use crate::connect::{BoxedIo, Connector};
use crate::http::{RequestHandle, Response, ResponseCallback, response};
use crate::options::{Agent, RequestOptions};

/// Plain-text transport for `http` requests.
#[derive(Clone)]
pub struct HttpTransport {
    connector: Arc<Connector>,
}

impl HttpTransport {
    pub fn new(connector: Arc<Connector>) -> Self {
        Self { connector }
    }
}

impl Requester for HttpTransport {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        issue(&self.connector, options, false, callback)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

/// TLS transport for `https` requests.
#[derive(Clone)]
pub struct HttpsTransport {
    connector: Arc<Connector>,
}

impl HttpsTransport {
    pub fn new(connector: Arc<Connector>) -> Self {
        Self { connector }
    }
}

impl Requester for HttpsTransport {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        issue(&self.connector, options, true, callback)
    }
}

impl fmt::Debug for HttpsTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpsTransport").finish_non_exhaustive()
    }
}

/// Where the exchange task connects to.
enum Route {
    Direct { tls: bool },
    Tunnel(crate::tunnel::TunnelAgent),
}

fn issue(
    connector: &Arc<Connector>,
    options: &RequestOptions,
    tls: bool,
    callback: Option<ResponseCallback>,
) -> crate::Result<RequestHandle> {
    let request = build_request(connector, options)?;
    let route = match &options.agent {
        Some(Agent::Tunnel(tunnel)) => Route::Tunnel(tunnel.clone()),
        _ => Route::Direct { tls },
    };
    let connector = Arc::clone(connector);
    let host = options.hostname.clone();
    let port = options.port_or_default();
    let local_address = options.local_address;

    RequestHandle::spawn(callback, async move {
        let io = match route {
            Route::Direct { tls } => connector.direct(&host, port, local_address, tls).await?,
            Route::Tunnel(tunnel) => tunnel.connect(&connector, &host, port).await?,
        };
        exchange(io, request).await
    })
}

fn build_request(
    connector: &Connector,
    options: &RequestOptions,
) -> crate::Result<Request<Full<Bytes>>> {
    let mut headers = options.headers.clone();
    if !headers.contains_key(HOST) {
        headers.insert(HOST, crate::http::headers::header_value(options.authority())?);
    }
    if let Some(user_agent) = &connector.config().user_agent {
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, user_agent.clone());
        }
    }
    if matches!(options.agent, Some(Agent::NoPool)) {
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
    }

    let mut request = Request::builder()
        .method(options.method.clone())
        .uri(options.path.as_str())
        .body(Full::new(options.body.clone().unwrap_or_default()))
        .map_err(crate::error::builder)?;
    *request.headers_mut() = headers;
    Ok(request)
}

/// Aborts the connection driver unless disarmed, so a dropped or failed
/// exchange never leaves its socket open.
struct AbortOnDrop(Option<JoinHandle<()>>);

impl AbortOnDrop {
    fn disarm(mut self) {
        self.0.take();
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(task) = self.0.take() {
            task.abort();
        }
    }
}

async fn exchange(io: BoxedIo, request: Request<Full<Bytes>>) -> crate::Result<Response> {
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(io))
        .await
        .map_err(crate::error::request)?;

    let driver = AbortOnDrop(Some(tokio::spawn(async move {
        if let Err(err) = conn.await {
            tracing::debug!(target: "decorquest::transport", "connection error: {}", err);
        }
    })));

    let head = sender
        .send_request(request)
        .await
        .map_err(crate::error::request)?;

    // The driver keeps running until the body has been read.
    driver.disarm();
    Ok(head.map(response::boxed))
}
