//! Cookie header utilities

use http::{HeaderMap, HeaderValue};

/// Format name/value pairs as a `Cookie` header value, in iteration order.
pub fn format_cookie_header<'a, I>(cookies: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    cookies
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// All `Set-Cookie` values of a response, in the order they were received.
pub fn set_cookie_values(headers: &HeaderMap) -> impl Iterator<Item = &HeaderValue> + '_ {
    headers.get_all(http::header::SET_COOKIE).iter()
}
