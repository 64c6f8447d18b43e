//! Request handles, responses and header helpers shared by the transport and
//! the decorators.

pub mod handle;
pub mod headers;
pub mod response;

pub use handle::{Control, RequestHandle, ResponseCallback};
pub use response::{Response, ResponseBody};
