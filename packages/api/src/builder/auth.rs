//! Authentication methods for the request builder

use http::HeaderValue;
use http::header::AUTHORIZATION;

use crate::builder::core::RequestBuilder;

impl RequestBuilder {
    /// Authenticate with HTTP Basic credentials.
    ///
    /// The `Authorization` header is derived when the request is sent and
    /// takes precedence over one set with [`header`](Self::header).
    #[must_use]
    pub fn basic_auth(self, username: &str, password: Option<&str>) -> Self {
        let credentials = match password {
            Some(password) => format!("{username}:{password}"),
            None => format!("{username}:"),
        };
        self.map(|options| options.auth = Some(credentials))
    }

    /// Set an `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer_auth(self, token: &str) -> Self {
        match HeaderValue::try_from(format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.header(AUTHORIZATION, value)
            }
            Err(e) => self.fail(decorquest_client::error::builder(e)),
        }
    }
}
