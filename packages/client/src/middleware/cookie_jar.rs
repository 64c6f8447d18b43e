use std::sync::{Arc, OnceLock};

use http::header::COOKIE;

use crate::cookie::{CookieStore, Jar, JarOption, set_cookie_values};
use crate::dispatch::Requester;
use crate::http::headers::host_header_hostname;
use crate::http::{RequestHandle, ResponseCallback};
use crate::options::RequestOptions;

/// Sends stored cookies with requests that opt in through `options.jar`, and
/// stores the `Set-Cookie` values of their responses.
///
/// `JarOption::Default` uses a jar owned by this decorator, created on first
/// use and shared by clones of it. `JarOption::Custom` uses the caller's
/// store for that request.
#[derive(Debug, Clone)]
pub struct Cookies<R> {
    inner: R,
    default_jar: Arc<OnceLock<Jar>>,
}

impl<R> Cookies<R> {
    pub fn wrap(inner: R) -> Self {
        Self {
            inner,
            default_jar: Arc::new(OnceLock::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// The decorator-owned jar, once a request has asked for it.
    pub fn default_jar(&self) -> Option<&Jar> {
        self.default_jar.get()
    }

    fn store(&self, jar: &JarOption) -> Arc<dyn CookieStore> {
        match jar {
            JarOption::Default => Arc::new(self.default_jar.get_or_init(Jar::new).clone()),
            JarOption::Custom(store) => Arc::clone(store),
        }
    }
}

impl<R: Requester> Requester for Cookies<R> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        let Some(jar) = &options.jar else {
            return self.inner.request(options, callback);
        };
        let store = self.store(jar);
        let url = cookie_url(options)?;

        let mut options = options.clone();
        if let Some(cookies) = store.select(&url) {
            options.headers.insert(COOKIE, cookies);
        }

        let callback: ResponseCallback = Box::new(move |response| {
            store.ingest(&mut set_cookie_values(response.headers()), &url);
            if let Some(callback) = callback {
                callback(response);
            }
        });
        self.inner.request(&options, Some(callback))
    }
}

/// The URL cookies are matched against and stored for: the host named by an
/// explicit `Host` header, else the hostname, with the request's path.
fn cookie_url(options: &RequestOptions) -> crate::Result<url::Url> {
    let host = host_header_hostname(&options.headers).unwrap_or_else(|| options.hostname.clone());
    let host = if host.contains(':') {
        format!("[{host}]")
    } else {
        host
    };
    let raw = format!("{}://{}{}", options.scheme, host, options.pathname());
    url::Url::parse(&raw).map_err(crate::error::builder)
}
