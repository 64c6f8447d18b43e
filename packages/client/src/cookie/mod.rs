//! Cookie jar used by the cookie decorator.
//!
//! - [`CookieStore`]: the narrow select/ingest interface the decorator talks to
//! - [`Jar`]: the default RFC 6265 store, safe to share across concurrent requests
//! - header utilities for `Cookie` values

pub mod core;
pub mod utils;

pub use self::core::*;

pub use utils::*;
