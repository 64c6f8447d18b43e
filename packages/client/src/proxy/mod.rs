//! Forward proxy URLs, as carried by `RequestOptions::proxy`.

mod config;

pub use config::{ProxyConfig, ProxyError};
