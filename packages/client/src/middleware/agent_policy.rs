use crate::dispatch::Requester;
use crate::http::{RequestHandle, ResponseCallback};
use crate::options::{Agent, RequestOptions};

/// Opts requests without an explicit agent out of connection reuse.
#[derive(Debug, Clone)]
pub struct DisablePooling<R> {
    inner: R,
}

impl<R> DisablePooling<R> {
    pub fn wrap(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Requester> Requester for DisablePooling<R> {
    fn request(
        &self,
        options: &RequestOptions,
        callback: Option<ResponseCallback>,
    ) -> crate::Result<RequestHandle> {
        if options.agent.is_some() {
            return self.inner.request(options, callback);
        }
        let mut options = options.clone();
        options.agent = Some(Agent::NoPool);
        self.inner.request(&options, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::testing::Recorder;
    use crate::options::Scheme;

    #[tokio::test]
    async fn unset_agent_becomes_no_pool() {
        let requester = DisablePooling::wrap(Recorder::new());
        let options = RequestOptions::new(Scheme::Http, "example.com");

        requester.request(&options, None).unwrap();

        assert_eq!(requester.inner().last().agent, Some(Agent::NoPool));
        assert_eq!(options.agent, None);
    }

    #[tokio::test]
    async fn explicit_agent_passes_through() {
        let requester = DisablePooling::wrap(Recorder::new());
        let mut options = RequestOptions::new(Scheme::Http, "example.com");
        options.agent = Some(Agent::KeepAlive);

        requester.request(&options, None).unwrap();

        assert_eq!(requester.inner().last(), options);
    }
}
