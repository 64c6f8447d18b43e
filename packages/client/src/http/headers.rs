//! Header helpers

use http::header::HOST;
use http::{HeaderMap, HeaderValue};

use crate::options::strip_brackets;

/// The hostname named by an explicit `Host` header, without port or
/// IPv6 brackets.
pub fn host_header_hostname(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(HOST)?.to_str().ok()?.trim();
    if host.is_empty() {
        return None;
    }
    Some(strip_brackets(split_port(host)).to_owned())
}

/// Drop a trailing `:port` from an authority, leaving IPv6 literals intact.
fn split_port(authority: &str) -> &str {
    if authority.starts_with('[') {
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => authority,
    }
}

/// Build a header value, reporting invalid bytes as a builder error.
pub(crate) fn header_value(value: String) -> crate::Result<HeaderValue> {
    HeaderValue::try_from(value).map_err(crate::error::builder)
}
