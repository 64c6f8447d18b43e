use std::time::Duration;

use crate::dispatch::Requester;
use crate::http::{Control, RequestHandle, ResponseCallback};
use crate::options::RequestOptions;

/// Bounds the time from issuing a request to its response head by
/// `options.response_timeout`.
///
/// When the deadline passes first, the handle settles with an `ETIMEDOUT`
/// error and the exchange is aborted, closing its connection. A response that
/// arrives first disarms the deadline. Reading the body is not bounded. A zero
/// timeout counts as unset.
#[derive(Debug, Clone)]
pub struct ResponseTimeout<R> {
    inner: R,
}

impl<R> ResponseTimeout<R> {
    pub fn wrap(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Requester> Requester for ResponseTimeout<R> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        let handle = self.inner.request(options, callback)?;
        if let Some(after) = options.response_timeout.filter(|after| !after.is_zero()) {
            tokio::spawn(deadline(handle.control(), after));
        }
        Ok(handle)
    }
}

async fn deadline(control: Control, after: Duration) {
    tokio::select! {
        () = control.settled() => {}
        () = tokio::time::sleep(after) => {
            if control.fail(crate::error::timed_out(after)) {
                tracing::debug!(
                    target: "decorquest::timeout",
                    "no response after {} ms, aborting",
                    after.as_millis()
                );
                control.abort();
            }
        }
    }
}
