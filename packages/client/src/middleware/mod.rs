//! Request decorators.
//!
//! Each decorator wraps an inner [`Requester`] and is itself a `Requester`,
//! so any subset can be stacked in any order. A decorator never touches the
//! caller's options: when it has something to change it clones them, changes
//! the fields of its own concern and forwards the clone. Response-side work is
//! done by wrapping the callback, which makes it run in the reverse order of
//! nesting.

pub mod agent_policy;
pub mod auth;
pub mod cookie_jar;
pub mod proxy_header;
pub mod timeout;
pub mod tunnel;

pub use agent_policy::DisablePooling;
pub use auth::BasicAuth;
pub use cookie_jar::Cookies;
pub use proxy_header::ForwardProxy;
pub use timeout::ResponseTimeout;
pub use tunnel::Tunneling;

use crate::dispatch::Requester;
use crate::tunnel::{ConnectTunnel, TunnelBuilder};

/// Builder-style wrapping for any [`Requester`].
///
/// ```no_run
/// use decorquest_client::{Dispatcher, RequesterExt, TransportConfig};
///
/// # fn build() -> decorquest_client::Result<()> {
/// let requester = Dispatcher::new(TransportConfig::default())?
///     .with_auth()
///     .with_cookies()
///     .without_pooling()
///     .with_tunnel()
///     .with_proxy()
///     .with_timeout();
/// # let _ = requester;
/// # Ok(())
/// # }
/// ```
pub trait RequesterExt: Requester + Sized {
    fn with_auth(self) -> BasicAuth<Self> {
        BasicAuth::wrap(self)
    }

    fn with_cookies(self) -> Cookies<Self> {
        Cookies::wrap(self)
    }

    fn with_proxy(self) -> ForwardProxy<Self> {
        ForwardProxy::wrap(self)
    }

    fn with_tunnel(self) -> Tunneling<Self, ConnectTunnel> {
        Tunneling::wrap(self)
    }

    fn with_tunnel_builder<B: TunnelBuilder>(self, builder: B) -> Tunneling<Self, B> {
        Tunneling::with_builder(self, builder)
    }

    fn with_timeout(self) -> ResponseTimeout<Self> {
        ResponseTimeout::wrap(self)
    }

    fn without_pooling(self) -> DisablePooling<Self> {
        DisablePooling::wrap(self)
    }
}

impl<R: Requester + Sized> RequesterExt for R {}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use crate::dispatch::Requester;
    use crate::http::{RequestHandle, Response, ResponseCallback, response};
    use crate::options::RequestOptions;

    type Reply = Box<dyn Fn() -> Response + Send + Sync>;

    /// Records the options it is called with and answers immediately.
    pub(crate) struct Recorder {
        seen: Mutex<Vec<RequestOptions>>,
        reply: Reply,
    }

    impl Recorder {
        pub(crate) fn new() -> Self {
            Self::replying(|| http::Response::new(response::empty()))
        }

        pub(crate) fn replying<F>(reply: F) -> Self
        where
            F: Fn() -> Response + Send + Sync + 'static,
        {
            Self {
                seen: Mutex::new(Vec::new()),
                reply: Box::new(reply),
            }
        }

        pub(crate) fn seen(&self) -> Vec<RequestOptions> {
            self.seen.lock().unwrap().clone()
        }

        pub(crate) fn last(&self) -> RequestOptions {
            self.seen().pop().expect("no request recorded")
        }
    }

    impl Requester for Recorder {
        fn request(
            &self,
            options: &RequestOptions,
            callback: Option<ResponseCallback>,
        ) -> crate::Result<RequestHandle> {
            self.seen.lock().unwrap().push(options.clone());
            let reply = (self.reply)();
            RequestHandle::spawn(callback, async move { Ok(reply) })
        }
    }
}
