/**
 * Request context — the inbound request a hit is reported for.
 *
 * The hosting application fills this in from whatever request type its
 * web framework uses (see the `metrika_http` addon for `http::Request`)
 * and passes it to every client operation. The client only reads it.
 */
use crate::protocol::resolve;

/**
 * Snapshot of the inbound request.
 *
 * All fields default to empty; missing values simply produce shorter hits
 * (no referrer, empty `X-Real-IP`, and so on).
 */
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Whether the inbound connection was TLS.
    pub secure: bool,

    /// Value of the `Host` header, port included when non-default.
    pub host: String,

    /// Path and query of the inbound request, e.g. `/page?id=1`.
    pub request_uri: String,

    /// Value of the `Referer` header.
    pub referrer: String,

    /// Address of the visitor, forwarded as `X-Real-IP`.
    pub real_ip: String,

    /// Visitor's user agent, forwarded as `User-Agent`.
    pub user_agent: String,
}

impl RequestContext {
    /// Context for `host` with everything else empty.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn request_uri(mut self, request_uri: impl Into<String>) -> Self {
        self.request_uri = request_uri.into();
        self
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    pub fn real_ip(mut self, real_ip: impl Into<String>) -> Self {
        self.real_ip = real_ip.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Absolute URL of the inbound request.
    pub fn current_url(&self) -> String {
        resolve::current_url(self)
    }
}
