use crate::tunnel::TunnelAgent;

/// Connection-pool override carried by [`RequestOptions::agent`](super::RequestOptions).
///
/// `None` in the options means "transport default". Every exchange opens its
/// own connection either way; the variants only shape what the server is told.
#[derive(Debug, Clone, PartialEq)]
pub enum Agent {
    /// Leave the HTTP/1.1 default in place: no `Connection` header is sent.
    KeepAlive,
    /// One connection per request: `Connection: close`, never reused.
    NoPool,
    /// Reach the target through a CONNECT tunnel opened on a proxy.
    Tunnel(TunnelAgent),
}

impl Agent {
    #[must_use]
    pub fn tunnel(&self) -> Option<&TunnelAgent> {
        match self {
            Agent::Tunnel(tunnel) => Some(tunnel),
            _ => None,
        }
    }
}
