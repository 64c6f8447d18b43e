use http::header::AUTHORIZATION;

use crate::dispatch::Requester;
use crate::http::{RequestHandle, ResponseCallback};
use crate::options::RequestOptions;

/// Turns `options.auth` into an `Authorization: Basic` header.
///
/// The header derived from `auth` replaces one the caller set directly.
#[derive(Debug, Clone)]
pub struct BasicAuth<R> {
    inner: R,
}

impl<R> BasicAuth<R> {
    pub fn wrap(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Requester> Requester for BasicAuth<R> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        let Some(credentials) = options.auth.as_deref() else {
            return self.inner.request(options, callback);
        };

        let mut options = options.clone();
        options
            .headers
            .insert(AUTHORIZATION, crate::auth::basic_auth(credentials)?);
        self.inner.request(&options, callback)
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;
    use crate::middleware::testing::Recorder;
    use crate::options::Scheme;

    #[tokio::test]
    async fn adds_basic_header_on_a_copy() {
        let requester = BasicAuth::wrap(Recorder::new());
        let mut options = RequestOptions::new(Scheme::Http, "example.com");
        options.auth = Some("user:pass".to_owned());
        options
            .headers
            .insert("x-keep", HeaderValue::from_static("1"));
        let before = options.clone();

        requester.request(&options, None).unwrap();

        let sent = requester.inner().last();
        assert_eq!(sent.headers[AUTHORIZATION], "Basic dXNlcjpwYXNz");
        assert_eq!(sent.headers["x-keep"], "1");
        assert_eq!(options, before);
        assert!(!options.headers.contains_key(AUTHORIZATION));
    }

    #[tokio::test]
    async fn auth_wins_over_caller_header() {
        let requester = BasicAuth::wrap(Recorder::new());
        let mut options = RequestOptions::new(Scheme::Http, "example.com");
        options.auth = Some("a:b".to_owned());
        options
            .headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer t"));

        requester.request(&options, None).unwrap();

        assert_eq!(requester.inner().last().headers[AUTHORIZATION], "Basic YTpi");
    }

    #[tokio::test]
    async fn without_auth_options_are_forwarded_as_is() {
        let requester = BasicAuth::wrap(Recorder::new());
        let options = RequestOptions::new(Scheme::Https, "example.com");

        requester.request(&options, None).unwrap();

        assert_eq!(requester.inner().last(), options);
    }
}
