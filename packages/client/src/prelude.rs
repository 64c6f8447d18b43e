//! The types most callers need to build and issue a request.

pub use crate::config::{RootCertificates, TransportConfig};
pub use crate::cookie::{CookieStore, Jar, JarOption};
pub use crate::dispatch::{Dispatcher, HttpTransport, HttpsTransport, Requester};
pub use crate::error::{Error, Kind, Result};
pub use crate::http::{Control, RequestHandle, Response, ResponseBody, ResponseCallback};
pub use crate::middleware::{
    BasicAuth, Cookies, DisablePooling, ForwardProxy, RequesterExt, ResponseTimeout, Tunneling,
};
pub use crate::options::{Agent, RequestOptions, Scheme};
pub use crate::proxy::ProxyConfig;
pub use crate::tunnel::{ConnectTunnel, TunnelAgent, TunnelBuilder, TunnelKind, TunnelOptions};

pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
pub use url::Url;
