//! Header management for the request builder

use decorquest_client::error;
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::builder::core::RequestBuilder;

impl RequestBuilder {
    /// Add a header, replacing any value already set under `key`.
    ///
    /// # Examples
    /// ```no_run
    /// # fn run() -> decorquest::Result<()> {
    /// let client = decorquest::Client::new()?;
    /// let request = client
    ///     .get("http://example.com/")
    ///     .header("x-request-id", "42")
    ///     .build()?;
    /// assert_eq!(request.headers["x-request-id"], "42");
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        let name: Result<HeaderName, http::Error> = HeaderName::try_from(key).map_err(Into::into);
        let value: Result<HeaderValue, http::Error> =
            HeaderValue::try_from(value).map_err(Into::into);
        match (name, value) {
            (Ok(name), Ok(value)) => self.map(|options| {
                options.headers.insert(name, value);
            }),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("dropping invalid header: {e}");
                self.fail(error::builder(e))
            }
        }
    }

    /// Merge `headers` into the request, replacing values under the same names.
    #[must_use]
    pub fn headers(self, headers: HeaderMap) -> Self {
        self.map(|options| {
            let mut last = None;
            for (name, value) in headers {
                // `None` names continue the previous one.
                let Some(name) = name.or_else(|| last.clone()) else {
                    continue;
                };
                if last.as_ref() != Some(&name) {
                    options.headers.remove(&name);
                }
                options.headers.append(name.clone(), value);
                last = Some(name);
            }
        })
    }
}
