//! Transport configuration
//!
//! Settings of the base request primitive. Per-request behavior (auth,
//! cookies, proxying, response deadlines) lives in `RequestOptions` and the
//! decorators, not here.

pub mod builders;
pub mod core;

pub use self::core::{RootCertificates, TransportConfig};
