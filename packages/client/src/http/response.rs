//! Response type delivered on a [`RequestHandle`](super::RequestHandle).

use bytes::Bytes;
use http_body::Body;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};

/// Boxed response body; body errors are reported as [`Kind::Body`](crate::error::Kind::Body).
pub type ResponseBody = UnsyncBoxBody<Bytes, crate::Error>;

/// A response whose head has arrived; the body streams on demand.
pub type Response = http::Response<ResponseBody>;

/// Box a hyper body into a [`ResponseBody`].
pub fn boxed(body: hyper::body::Incoming) -> ResponseBody {
    body.map_err(crate::error::body).boxed_unsync()
}

/// A complete in-memory body.
pub fn full(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    Empty::new().map_err(|never| match never {}).boxed_unsync()
}

/// The body length when it is known up front, e.g. from `Content-Length`.
pub fn content_length(response: &Response) -> Option<u64> {
    response.body().size_hint().exact()
}

/// Read the whole body of `response`.
///
/// # Errors
///
/// Returns a body error if the connection fails while the body is read.
pub async fn bytes(response: Response) -> crate::Result<Bytes> {
    Ok(response.into_body().collect().await?.to_bytes())
}

/// Read the whole body of `response` as UTF-8, replacing invalid sequences.
///
/// # Errors
///
/// Returns a body error if the connection fails while the body is read.
pub async fn text(response: Response) -> crate::Result<String> {
    let bytes = bytes(response).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn full_bodies_know_their_length() {
        let response = http::Response::new(full("hello"));
        assert_eq!(content_length(&response), Some(5));
        assert_eq!(text(response).await.unwrap(), "hello");
    }
}
