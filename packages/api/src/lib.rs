//! decorquest
//!
//! Outbound HTTP(S) requests through a composable decorator chain: Basic
//! auth, cookie jars, forward proxies, CONNECT tunnels and response
//! deadlines, stacked around a scheme-dispatching transport.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # async fn run() -> decorquest::Result<()> {
//! let client = decorquest::Client::new()?;
//! let response = client
//!     .get("https://example.com/")
//!     .default_jar()
//!     .proxy("http://proxy.internal:3128")
//!     .response_timeout(Duration::from_secs(10))
//!     .send()
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```
//!
//! The decorators themselves live in [`decorquest_client`] and can be
//! stacked in any other order around any [`Requester`].

#![deny(unsafe_code)]

pub mod builder;
pub mod client;

pub use builder::{IntoTarget, RequestBuilder};
pub use client::{Client, StandardStack};

pub use decorquest_client::http::response;
pub use decorquest_client::{
    Agent, CookieStore, Error, Jar, JarOption, Kind, RequestHandle, RequestOptions, Requester,
    RequesterExt, Response, ResponseCallback, Result, RootCertificates, Scheme, TransportConfig,
};

/// Send a `GET` for `target` through a fresh [`Client`].
///
/// # Errors
///
/// Returns the client construction error or the request's error.
pub async fn get(target: impl IntoTarget) -> Result<Response> {
    Client::new()?.get(target).send().await
}
