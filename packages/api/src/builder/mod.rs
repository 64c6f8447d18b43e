//! Fluent request builder
//!
//! Builds [`RequestOptions`](decorquest_client::RequestOptions) step by step
//! and sends them through a [`Client`](crate::Client).

pub mod auth;
pub mod body;
pub mod core;
pub mod headers;

pub use self::core::{IntoTarget, RequestBuilder};
