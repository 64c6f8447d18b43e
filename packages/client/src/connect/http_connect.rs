//! HTTP CONNECT tunnel establishment
//!
//! Sends a CONNECT request for the target authority over an already open
//! proxy connection and waits for the proxy to accept it.

use http::header::{HOST, PROXY_AUTHORIZATION};
use http::{HeaderMap, HeaderValue};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::tunnel::TunnelError;

/// How much data to read for the CONNECT response head before it's considered invalid.
pub const HEADER_SECTION_MAX_LENGTH: usize = 8192;

/// Establish an HTTP CONNECT tunnel to `target` (`host:port`) through the
/// proxy at the other end of `stream`.
///
/// `headers` are sent along with the CONNECT request, except `Host`, which
/// always names the target. `proxy_authorization` replaces any
/// `Proxy-Authorization` found in `headers`.
///
/// Only the response head is consumed; on success the stream is positioned
/// at the first byte relayed from the target.
///
/// # Errors
///
/// Returns a connect error if writing fails, the proxy closes the connection,
/// answers with anything but `200`, or sends an oversized response head.
pub async fn establish_connect_tunnel<S>(
    stream: &mut S,
    target: &str,
    headers: &HeaderMap,
    proxy_authorization: Option<&HeaderValue>,
) -> crate::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = connect_request(target, headers, proxy_authorization);
    stream
        .write_all(&request)
        .await
        .map_err(crate::error::connect)?;
    stream.flush().await.map_err(crate::error::connect)?;

    let head = read_response_head(stream).await?;
    let status_line = head.lines().next().unwrap_or_default();

    match status_line.split_whitespace().nth(1) {
        Some("200") => {
            tracing::debug!(target: "decorquest::tunnel", authority = target, "CONNECT tunnel established");
            Ok(())
        }
        _ => Err(crate::error::connect(TunnelError::Rejected(
            status_line.trim().to_owned(),
        ))),
    }
}

fn connect_request(
    target: &str,
    headers: &HeaderMap,
    proxy_authorization: Option<&HeaderValue>,
) -> Vec<u8> {
    let mut request = format!("CONNECT {target} HTTP/1.1\r\nHost: {target}\r\n").into_bytes();

    for (name, value) in headers {
        if name == HOST || (name == PROXY_AUTHORIZATION && proxy_authorization.is_some()) {
            continue;
        }
        push_header(&mut request, name.as_str(), value);
    }
    if let Some(value) = proxy_authorization {
        push_header(&mut request, PROXY_AUTHORIZATION.as_str(), value);
    }

    request.extend_from_slice(b"\r\n");
    request
}

fn push_header(request: &mut Vec<u8>, name: &str, value: &HeaderValue) {
    request.extend_from_slice(name.as_bytes());
    request.extend_from_slice(b": ");
    request.extend_from_slice(value.as_bytes());
    request.extend_from_slice(b"\r\n");
}

/// Read up to and including the blank line ending the response head, one byte
/// at a time so nothing past it is consumed.
async fn read_response_head<S>(stream: &mut S) -> crate::Result<String>
where
    S: AsyncRead + Unpin,
{
    let mut head = Vec::with_capacity(256);
    let mut byte = [0_u8; 1];

    while !head.ends_with(b"\r\n\r\n") {
        if head.len() >= HEADER_SECTION_MAX_LENGTH {
            return Err(crate::error::connect(TunnelError::HeadTooLarge(
                HEADER_SECTION_MAX_LENGTH,
            )));
        }
        let read = stream
            .read(&mut byte)
            .await
            .map_err(crate::error::connect)?;
        if read == 0 {
            return Err(crate::error::connect(TunnelError::Closed));
        }
        head.push(byte[0]);
    }

    Ok(String::from_utf8_lossy(&head).into_owned())
}

#[cfg(test)]
mod tests {
    use tokio::io::duplex;

    use super::*;

    #[test]
    fn request_names_target_and_carries_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("ignored.test"));
        headers.insert("x-trace", HeaderValue::from_static("abc"));
        let auth = HeaderValue::from_static("Basic dXNlcjpwYXNz");

        let request = String::from_utf8(connect_request("target.test:443", &headers, Some(&auth)))
            .unwrap();

        assert!(request.starts_with("CONNECT target.test:443 HTTP/1.1\r\nHost: target.test:443\r\n"));
        assert!(request.contains("x-trace: abc\r\n"));
        assert!(request.contains("proxy-authorization: Basic dXNlcjpwYXNz\r\n"));
        assert!(!request.contains("ignored.test"));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[tokio::test]
    async fn accepts_200_and_leaves_payload_unread() {
        let (mut client, mut proxy) = duplex(1024);
        let proxy_side = tokio::spawn(async move {
            let mut buf = vec![0_u8; 512];
            let _ = proxy.read(&mut buf).await.unwrap();
            proxy
                .write_all(b"HTTP/1.1 200 Connection established\r\n\r\nhello")
                .await
                .unwrap();
            proxy
        });

        establish_connect_tunnel(&mut client, "target.test:443", &HeaderMap::new(), None)
            .await
            .unwrap();

        let mut relayed = [0_u8; 5];
        client.read_exact(&mut relayed).await.unwrap();
        assert_eq!(&relayed, b"hello");
        drop(proxy_side.await.unwrap());
    }

    #[tokio::test]
    async fn rejection_is_a_connect_error() {
        let (mut client, mut proxy) = duplex(1024);
        tokio::spawn(async move {
            let mut buf = vec![0_u8; 512];
            let _ = proxy.read(&mut buf).await.unwrap();
            proxy
                .write_all(b"HTTP/1.1 407 Proxy Authentication Required\r\n\r\n")
                .await
                .unwrap();
        });

        let err = establish_connect_tunnel(&mut client, "target.test:443", &HeaderMap::new(), None)
            .await
            .unwrap_err();
        assert!(err.is_connect());
        assert!(err.to_string().contains("407"));
    }

    #[tokio::test]
    async fn early_close_is_a_connect_error() {
        let (mut client, proxy) = duplex(1024);
        drop(proxy);

        let err = establish_connect_tunnel(&mut client, "target.test:443", &HeaderMap::new(), None)
            .await
            .unwrap_err();
        assert!(err.is_connect());
    }
}
