//! Request body handling

use bytes::Bytes;
use http::HeaderValue;
use http::header::CONTENT_TYPE;

use crate::builder::core::RequestBuilder;

impl RequestBuilder {
    /// Send `body` as-is.
    #[must_use]
    pub fn body(self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.map(|options| options.body = Some(body))
    }

    /// Send `text` as `text/plain; charset=utf-8` unless a content type is
    /// already set.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.map(|options| {
            options
                .headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("text/plain; charset=utf-8"));
            options.body = Some(Bytes::from(text));
        })
    }
}
