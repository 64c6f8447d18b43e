//! Basic authentication utilities

use std::io::Write;

use base64::prelude::BASE64_STANDARD;
use base64::write::EncoderWriter;
use http::HeaderValue;

/// Encode `user:pass` credentials as a sensitive `Basic` header value.
///
/// # Errors
///
/// Returns a builder error if the credentials contain bytes that cannot
/// appear in a header.
pub fn basic_auth(credentials: &str) -> crate::Result<HeaderValue> {
    let mut buf = b"Basic ".to_vec();
    {
        let mut encoder = EncoderWriter::new(&mut buf, &BASE64_STANDARD);
        encoder
            .write_all(credentials.as_bytes())
            .map_err(crate::error::builder)?;
    }
    let mut header = HeaderValue::from_bytes(&buf).map_err(crate::error::builder)?;
    header.set_sensitive(true);
    Ok(header)
}
