//! Per-request result channel.
//!
//! A [`RequestHandle`] settles exactly once: with the response, with a
//! transport error, with an error delivered through [`Control::fail`] (the
//! response deadline uses this), or with a cancellation. Later outcomes are
//! discarded.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, watch};
use tokio::task::AbortHandle;

use super::response::Response;

/// Invoked with the response head before it is delivered on the handle.
///
/// Decorators wrap the callback they receive to add response-side behavior,
/// so callbacks run innermost-first on the way out.
pub type ResponseCallback = Box<dyn FnOnce(&Response) + Send + 'static>;

struct Settle {
    slot: Mutex<Option<Outcome>>,
    settled: watch::Sender<bool>,
}

type Outcome = oneshot::Sender<crate::Result<Response>>;

impl Settle {
    /// Take the right to settle. The handle counts as settled from here on.
    fn claim(&self) -> Option<Outcome> {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }?;
        self.settled.send_replace(true);
        Some(sender)
    }

    fn settle(&self, outcome: crate::Result<Response>) -> bool {
        let Some(sender) = self.claim() else {
            return false;
        };
        // The receiver is gone when the caller dropped the handle.
        let _ = sender.send(outcome);
        true
    }

    fn is_settled(&self) -> bool {
        *self.settled.borrow()
    }
}

/// Settles the handle as canceled if the exchange task ends without settling
/// it, e.g. because it was aborted.
struct SettleOnDrop(Arc<Settle>);

impl Drop for SettleOnDrop {
    fn drop(&mut self) {
        self.0.settle(Err(crate::error::canceled()));
    }
}

/// Cloneable control surface of an in-flight request.
#[derive(Clone)]
pub struct Control {
    settle: Arc<Settle>,
    task: AbortHandle,
}

impl Control {
    /// Deliver `error` as the outcome of the request.
    ///
    /// Returns `false`, and discards `error`, if the request already settled.
    pub fn fail(&self, error: crate::Error) -> bool {
        self.settle.settle(Err(error))
    }

    /// Cancel the exchange task, closing its connection.
    ///
    /// An unsettled request settles with a cancellation error.
    pub fn abort(&self) {
        self.settle.settle(Err(crate::error::canceled()));
        self.task.abort();
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settle.is_settled()
    }

    /// Resolves once the request has settled, whatever the outcome.
    pub async fn settled(&self) {
        let mut settled = self.settle.settled.subscribe();
        let _ = settled.wait_for(|settled| *settled).await;
    }
}

/// Handle to a request that has been issued.
pub struct RequestHandle {
    outcome: oneshot::Receiver<crate::Result<Response>>,
    control: Control,
}

impl RequestHandle {
    /// Issue `exchange` on the current tokio runtime.
    ///
    /// When `exchange` yields a response, `callback` runs with it before it is
    /// delivered, unless the handle settled in the meantime. Once the callback
    /// has started, the response is the outcome: a concurrent
    /// [`Control::fail`] returns `false`.
    ///
    /// # Errors
    ///
    /// Returns a request error when called outside a tokio runtime.
    pub fn spawn<F>(callback: Option<ResponseCallback>, exchange: F) -> crate::Result<Self>
    where
        F: Future<Output = crate::Result<Response>> + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(crate::error::request)?;

        let (sender, outcome) = oneshot::channel();
        let (settled, _) = watch::channel(false);
        let settle = Arc::new(Settle {
            slot: Mutex::new(Some(sender)),
            settled,
        });

        let guard = SettleOnDrop(Arc::clone(&settle));
        let task = runtime.spawn(async move {
            let result = exchange.await;
            let Some(sender) = guard.0.claim() else {
                return;
            };
            if let (Ok(response), Some(callback)) = (&result, callback) {
                callback(response);
            }
            let _ = sender.send(result);
        });

        Ok(Self {
            outcome,
            control: Control {
                settle,
                task: task.abort_handle(),
            },
        })
    }

    /// Wait for the outcome of the request.
    ///
    /// # Errors
    ///
    /// Returns the transport error, the error delivered through
    /// [`Control::fail`], or a cancellation error.
    pub async fn response(self) -> crate::Result<Response> {
        self.outcome
            .await
            .unwrap_or_else(|_| Err(crate::error::canceled()))
    }

    #[must_use]
    pub fn control(&self) -> Control {
        self.control.clone()
    }

    /// See [`Control::abort`].
    pub fn abort(&self) {
        self.control.abort();
    }

    /// See [`Control::fail`].
    pub fn fail(&self, error: crate::Error) -> bool {
        self.control.fail(error)
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.control.is_settled()
    }
}

impl std::fmt::Debug for RequestHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandle")
            .field("settled", &self.is_settled())
            .finish()
    }
}
