//! HTTP Cookies

use std::fmt;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use http::HeaderValue;

use super::utils::format_cookie_header;

/// Storage behind the cookie decorator.
///
/// Implementations are shared by every request that opts into the same jar,
/// possibly concurrently, so both methods take `&self`.
pub trait CookieStore: Send + Sync {
    /// Serialize every cookie that applies to `url` as one `Cookie` header
    /// value, or `None` when nothing matches.
    fn select(&self, url: &url::Url) -> Option<HeaderValue>;

    /// Store the `Set-Cookie` values of a response to a request for `url`.
    ///
    /// Every value is handled on its own: one that fails to parse or is
    /// refused by the store is dropped without affecting the others.
    fn ingest(&self, set_cookie: &mut dyn Iterator<Item = &HeaderValue>, url: &url::Url);
}

/// How a request opts into cookie handling.
#[derive(Clone)]
pub enum JarOption {
    /// Use the jar owned by the decorator, created on first use.
    Default,
    /// Use a caller-owned store.
    Custom(Arc<dyn CookieStore>),
}

impl JarOption {
    pub fn custom<S: CookieStore + 'static>(store: S) -> Self {
        JarOption::Custom(Arc::new(store))
    }
}

impl From<Jar> for JarOption {
    fn from(jar: Jar) -> Self {
        JarOption::Custom(Arc::new(jar))
    }
}

impl fmt::Debug for JarOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JarOption::Default => f.write_str("Default"),
            JarOption::Custom(store) => {
                write!(f, "Custom({:p})", Arc::as_ptr(store).cast::<()>())
            }
        }
    }
}

impl PartialEq for JarOption {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JarOption::Default, JarOption::Default) => true,
            (JarOption::Custom(a), JarOption::Custom(b)) => {
                std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
            }
            _ => false,
        }
    }
}

/// A good default `CookieStore` implementation.
///
/// Cookies are keyed by `(name, domain, path)`; a later cookie with the same
/// key replaces the earlier one. A cookie without a `Domain` attribute is
/// bound to the host of the request it was received for, at the moment it is
/// stored, and only ever sent back to that exact host. A cookie without a
/// `Path` attribute applies to every path on its host. Expired cookies are
/// skipped when selecting.
///
/// Clones share the same underlying store.
#[derive(Debug, Default)]
pub struct Jar(Arc<RwLock<cookie_store::CookieStore>>);

impl Jar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie to this jar as if `url` had responded with it.
    ///
    /// # Example
    ///
    /// ```
    /// use decorquest_client::cookie::Jar;
    ///
    /// let url = "https://yolo.local".parse::<url::Url>().unwrap();
    ///
    /// let jar = Jar::default();
    /// jar.add_cookie_str("foo=bar; Domain=yolo.local", &url);
    /// assert_eq!(jar.cookies_for(&url).as_deref(), Some("foo=bar"));
    /// ```
    pub fn add_cookie_str(&self, cookie: &str, url: &url::Url) {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            self.ingest(&mut std::iter::once(&value), url);
        }
    }

    /// The `Cookie` header value that would be sent to `url`.
    #[must_use]
    pub fn cookies_for(&self, url: &url::Url) -> Option<String> {
        self.select(url)
            .and_then(|value| value.to_str().ok().map(str::to_owned))
    }

    /// Number of stored cookies, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read().map_or(0, |store| store.iter_any().count())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut store) = self.0.write() {
            store.clear();
        }
    }
}

impl Clone for Jar {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl CookieStore for Jar {
    fn select(&self, url: &url::Url) -> Option<HeaderValue> {
        let s = match self.0.read() {
            Ok(store) => format_cookie_header(store.get_request_values(url)),
            Err(_) => return None,
        };

        if s.is_empty() {
            return None;
        }

        HeaderValue::from_maybe_shared(Bytes::from(s)).ok()
    }

    fn ingest(&self, set_cookie: &mut dyn Iterator<Item = &HeaderValue>, url: &url::Url) {
        let cookies: Vec<_> = set_cookie
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| cookie::Cookie::parse(value).ok())
            .map(|mut cookie| {
                // Pathless cookies cover the whole host, not the request's directory.
                if cookie.path().is_none() {
                    cookie.set_path("/");
                }
                cookie.into_owned()
            })
            .collect();

        if cookies.is_empty() {
            return;
        }

        if let Ok(mut store) = self.0.write() {
            for cookie in &cookies {
                // Refused cookies (bad domain, expired on arrival) are dropped one by one.
                let _ = store.insert_raw(cookie, url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> url::Url {
        s.parse().unwrap()
    }

    #[test]
    fn cookie_without_domain_is_host_only() {
        let jar = Jar::new();
        jar.add_cookie_str("sid=42; Path=/", &url("http://api.example.com/login"));

        assert_eq!(
            jar.cookies_for(&url("http://api.example.com/")).as_deref(),
            Some("sid=42")
        );
        assert_eq!(jar.cookies_for(&url("http://example.com/")), None);
        assert_eq!(jar.cookies_for(&url("http://www.api.example.com/")), None);
    }

    #[test]
    fn explicit_domain_matches_subdomains() {
        let jar = Jar::new();
        jar.add_cookie_str("a=1; Domain=example.com; Path=/", &url("http://example.com/"));

        assert_eq!(
            jar.cookies_for(&url("http://www.example.com/")).as_deref(),
            Some("a=1")
        );
    }

    #[test]
    fn same_key_overwrites() {
        let jar = Jar::new();
        let origin = url("http://example.com/");
        jar.add_cookie_str("a=1; Path=/", &origin);
        jar.add_cookie_str("a=2; Path=/", &origin);

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.cookies_for(&origin).as_deref(), Some("a=2"));
    }

    #[test]
    fn path_scoping_applies() {
        let jar = Jar::new();
        let origin = url("http://example.com/app/login");
        jar.add_cookie_str("scoped=1; Path=/app", &origin);

        assert!(jar.cookies_for(&url("http://example.com/app/x")).is_some());
        assert!(jar.cookies_for(&url("http://example.com/other")).is_none());
    }

    #[test]
    fn pathless_cookie_applies_to_the_whole_host() {
        let jar = Jar::new();
        jar.add_cookie_str("sid=1", &url("http://example.com/account/login"));

        assert_eq!(jar.cookies_for(&url("http://example.com/")).as_deref(), Some("sid=1"));
        assert_eq!(
            jar.cookies_for(&url("http://example.com/catalog/page/2")).as_deref(),
            Some("sid=1")
        );
    }

    #[test]
    fn expired_cookies_are_not_selected() {
        let jar = Jar::new();
        let origin = url("http://example.com/");
        jar.add_cookie_str("old=1; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT", &origin);

        assert_eq!(jar.cookies_for(&origin), None);
    }

    #[test]
    fn malformed_values_do_not_poison_the_batch() {
        let jar = Jar::new();
        let origin = url("http://example.com/");
        let values = [
            HeaderValue::from_static("first=1; Path=/"),
            HeaderValue::from_static("=; ;"),
            HeaderValue::from_static("third=3; Path=/"),
        ];
        jar.ingest(&mut values.iter(), &origin);

        let sent = jar.cookies_for(&origin).unwrap();
        assert!(sent.contains("first=1"));
        assert!(sent.contains("third=3"));
        assert_eq!(jar.len(), 2);
    }

    #[test]
    fn clones_share_state() {
        let jar = Jar::new();
        let other = jar.clone();
        jar.add_cookie_str("a=1", &url("http://example.com/"));
        assert_eq!(other.len(), 1);
        other.clear();
        assert!(jar.is_empty());
    }

    #[test]
    fn jar_option_equality_is_identity() {
        let jar: Arc<dyn CookieStore> = Arc::new(Jar::new());
        let a = JarOption::Custom(Arc::clone(&jar));
        let b = JarOption::Custom(jar);
        assert_eq!(a, b);
        assert_ne!(a, JarOption::custom(Jar::new()));
        assert_eq!(JarOption::Default, JarOption::Default);
    }
}
