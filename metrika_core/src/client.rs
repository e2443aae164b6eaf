/**
 * The Metrika client — turns named events into hits and hands them to a
 * transport.
 *
 * Every operation follows the same path:
 * 1. Resolve URLs against the current request (`protocol::resolve`).
 * 2. Build a `HitPayload` with the operation's mode flags.
 * 3. Encode it into form fields (`protocol::encoder`).
 * 4. Send it once through the `Transport` and report `true` / `false`.
 *
 * Operations never panic and never return errors: losing a hit must not
 * break the request that triggered it. Failures are logged via `tracing`.
 */
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::context::RequestContext;
use crate::error::{Error, HitError};
use crate::protocol::constants::{
    CALL_TIMEOUT, CONNECT_TIMEOUT, DEFAULT_ENCODING, DEFAULT_ENDPOINT, NO_INDEX, RN_MAX, WATCH_PATH,
};
use crate::protocol::encoder::{is_blank, Encoder, HitPayload};
use crate::protocol::modes::{self, HitModes, ModeValue};
use crate::protocol::resolve::absolute_url;
use crate::transport::{HitRequest, HttpTransport, Transport};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/**
 * Configuration for a `Client`.
 *
 * Only `counter_id` is required; everything else has defaults.
 * Implements `From<&str>`, `From<String>` and `From<u64>` so a bare
 * counter id can be passed wherever options are expected.
 *
 * Can also be deserialized (e.g. from a JSON or TOML config section);
 * timeouts are given in whole seconds there.
 *
 * # Example
 * ```ignore
 * let client = metrika_core::Client::new(metrika_core::Options {
 *     counter_id: "123456".into(),
 *     counter_class: 2,
 *     ..Default::default()
 * })?;
 * ```
 */
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Counter number from the Metrika interface.
    pub counter_id: String,

    /// Counter class; `0` means none and is not sent.
    pub counter_class: u32,

    /// Page encoding reported in the `en:` token.
    pub encoding: String,

    /// Collector origin. Only worth changing for tests and proxies.
    pub endpoint: String,

    #[serde(deserialize_with = "duration_secs")]
    pub connect_timeout: Duration,

    /// Upper bound on a whole hit, response drain included.
    #[serde(deserialize_with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            counter_id: String::new(),
            counter_class: 0,
            encoding: DEFAULT_ENCODING.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            timeout: CALL_TIMEOUT,
        }
    }
}

impl From<&str> for Options {
    fn from(counter_id: &str) -> Self {
        Self {
            counter_id: counter_id.to_string(),
            ..Default::default()
        }
    }
}

impl From<String> for Options {
    fn from(counter_id: String) -> Self {
        Self {
            counter_id,
            ..Default::default()
        }
    }
}

impl From<u64> for Options {
    fn from(counter_id: u64) -> Self {
        Self::from(counter_id.to_string())
    }
}

impl Options {
    /// Checks the counter id and the endpoint.
    pub fn validate(&self) -> Result<(), Error> {
        if self.counter_id.is_empty() {
            return Err(Error::EmptyCounterId);
        }

        if self
            .counter_id
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
        {
            return Err(Error::InvalidCounterId(self.counter_id.clone()));
        }

        let invalid = |reason: &str| Error::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: reason.to_string(),
        };

        let url = Url::parse(&self.endpoint).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        Ok(())
    }
}

fn duration_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}

// ---------------------------------------------------------------------------
// PageHit — arguments of `Client::page_hit`
// ---------------------------------------------------------------------------

/**
 * A page view.
 *
 * `url` and `referrer` fall back to the current request's URL and
 * `Referer` header when left as `None`. Relative values are resolved
 * against the current URL.
 */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageHit {
    pub url: Option<String>,
    pub title: String,
    pub referrer: Option<String>,

    /// Visit parameters sent along with the hit.
    pub params: Option<Value>,

    /// Sent as `ut`, e.g. `noindex`.
    pub index_directive: Option<String>,
}

impl PageHit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn index_directive(mut self, directive: impl Into<String>) -> Self {
        self.index_directive = Some(directive.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/**
 * Sends hits for one counter.
 *
 * Holds only immutable state, so one instance can serve every request of
 * an application from any number of threads. The request context is passed
 * to each call.
 */
pub struct Client<T = HttpTransport> {
    counter_id: String,
    encoder: Encoder,
    transport: T,
}

impl Client<HttpTransport> {
    /**
     * Creates a client that delivers through `HttpTransport`.
     *
     * Returns `Err` if the counter id is empty or malformed, or the
     * endpoint is not an http(s) URL.
     */
    pub fn new(options: impl Into<Options>) -> Result<Self, Error> {
        let options = options.into();
        options.validate()?;

        let transport =
            HttpTransport::new(&options.endpoint, options.connect_timeout, options.timeout);
        Ok(Self::build(options, transport))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client that delivers through a custom transport.
    pub fn with_transport(options: impl Into<Options>, transport: T) -> Result<Self, Error> {
        let options = options.into();
        options.validate()?;
        Ok(Self::build(options, transport))
    }

    fn build(options: Options, transport: T) -> Self {
        Self {
            encoder: Encoder::new(options.counter_class, options.encoding),
            counter_id: options.counter_id,
            transport,
        }
    }

    pub fn counter_id(&self) -> &str {
        &self.counter_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /**
     * Sends a page view.
     *
     * Missing `url` / `referrer` default to the current URL and the
     * `Referer` header; both are made absolute against the current URL.
     */
    pub fn page_hit(&self, ctx: &RequestContext, hit: PageHit) -> bool {
        let current = ctx.current_url();
        let url = hit.url.unwrap_or_else(|| current.clone());
        let referrer = hit.referrer.unwrap_or_else(|| ctx.referrer.clone());

        let payload = HitPayload {
            page_url: absolute_url(&url, &current),
            referrer: absolute_url(&referrer, &current),
            title: hit.title,
            params: hit.params,
            modes: HitModes::new().with(modes::INDEX, hit.index_directive),
        };

        self.finish("page_hit", self.dispatch(ctx, &payload))
    }

    /**
     * Reports a goal.
     *
     * With a target the hit goes to `goal://<host>/<target>` with the
     * current URL as referrer; with an empty target it is a plain hit on the
     * current URL with the `Referer` header as referrer.
     */
    pub fn reach_goal(&self, ctx: &RequestContext, target: &str, params: Option<Value>) -> bool {
        let (page_url, referrer) = if target.is_empty() {
            (ctx.current_url(), ctx.referrer.clone())
        } else {
            (format!("goal://{}/{target}", ctx.host), ctx.current_url())
        };

        let payload = HitPayload {
            page_url,
            referrer,
            params,
            ..Default::default()
        };

        self.finish("reach_goal", self.dispatch(ctx, &payload))
    }

    /**
     * Reports a click on an outbound link. The URL is sent as given and is
     * marked `noindex`. Returns `false` without sending if `url` is empty.
     */
    pub fn external_link(&self, ctx: &RequestContext, url: &str, title: &str) -> bool {
        let result = if url.is_empty() {
            Err(HitError::InputSkipped("url"))
        } else {
            let payload = HitPayload {
                page_url: url.to_string(),
                referrer: ctx.current_url(),
                title: title.to_string(),
                params: None,
                modes: HitModes::new()
                    .with(modes::LINK, ModeValue::Flag)
                    .with(modes::INDEX, NO_INDEX),
            };
            self.dispatch(ctx, &payload)
        };

        self.finish("external_link", result)
    }

    /**
     * Reports a file download. A relative `url` (`/file.zip`, `report.pdf`)
     * is resolved against the origin of the current URL; `cdn.example.com/a.zip`
     * is read as a host. Returns `false` without sending if `url` is empty.
     */
    pub fn file_download(&self, ctx: &RequestContext, url: &str, title: &str) -> bool {
        let result = if url.is_empty() {
            Err(HitError::InputSkipped("url"))
        } else {
            let current = ctx.current_url();
            let payload = HitPayload {
                page_url: absolute_url(url, &current),
                referrer: current,
                title: title.to_string(),
                params: None,
                modes: HitModes::new()
                    .with(modes::DOWNLOAD, ModeValue::Flag)
                    .with(modes::LINK, ModeValue::Flag),
            };
            self.dispatch(ctx, &payload)
        };

        self.finish("file_download", result)
    }

    /**
     * Sends visit parameters on their own. Returns `false` without sending
     * if `data` is blank (`null`, `{}`, `[]`, ...).
     */
    pub fn report_params(&self, ctx: &RequestContext, data: Value) -> bool {
        let result = if is_blank(&data) {
            Err(HitError::InputSkipped("params"))
        } else {
            let payload = HitPayload {
                params: Some(data),
                modes: HitModes::new().with(modes::PARAMS, ModeValue::Flag),
                ..Default::default()
            };
            self.dispatch(ctx, &payload)
        };

        self.finish("report_params", result)
    }

    /// Marks the current visit as not a bounce.
    pub fn not_bounce(&self, ctx: &RequestContext) -> bool {
        let payload = HitPayload {
            modes: HitModes::new().with(modes::NOT_BOUNCE, ModeValue::Flag),
            ..Default::default()
        };

        self.finish("not_bounce", self.dispatch(ctx, &payload))
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    /// Encodes `payload` and sends it once.
    fn dispatch(&self, ctx: &RequestContext, payload: &HitPayload) -> Result<(), HitError> {
        let body = self.encoder.encode(payload).to_body();
        let path = watch_path(&self.counter_id, rand::rng().random_range(0..=RN_MAX));

        let request = HitRequest {
            path: &path,
            body: &body,
            real_ip: &ctx.real_ip,
            user_agent: &ctx.user_agent,
        };

        self.transport.send(&request)?;
        Ok(())
    }

    fn finish(&self, operation: &'static str, result: Result<(), HitError>) -> bool {
        match result {
            Ok(()) => {
                debug!(counter = %self.counter_id, operation, "hit sent");
                true
            }
            Err(err @ HitError::InputSkipped(_)) => {
                debug!(counter = %self.counter_id, operation, error = %err, "hit skipped");
                false
            }
            Err(err) => {
                warn!(counter = %self.counter_id, operation, error = %err, "hit not sent");
                false
            }
        }
    }
}

/// `/watch/<counter>/1?rn=<rn>&wmode=2`
fn watch_path(counter_id: &str, rn: u32) -> String {
    format!("{WATCH_PATH}{counter_id}/1?rn={rn}&wmode=2")
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::error::SendError;

    /// A request as the spy saw it.
    #[derive(Clone, Debug)]
    struct Sent {
        path: String,
        body: String,
        real_ip: String,
        user_agent: String,
    }

    impl Sent {
        fn field(&self, name: &str) -> Option<&str> {
            self.body
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v)
        }
    }

    /// Records every request; optionally fails them all.
    #[derive(Default)]
    struct SpyTransport {
        sent: Mutex<Vec<Sent>>,
        fail_connect: bool,
    }

    impl SpyTransport {
        fn failing() -> Self {
            Self {
                fail_connect: true,
                ..Default::default()
            }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().expect("spy lock").clone()
        }
    }

    impl Transport for SpyTransport {
        fn send(&self, request: &HitRequest<'_>) -> Result<(), SendError> {
            if self.fail_connect {
                return Err(SendError::Connection("refused".into()));
            }
            self.sent.lock().expect("spy lock").push(Sent {
                path: request.path.to_string(),
                body: request.body.to_string(),
                real_ip: request.real_ip.to_string(),
                user_agent: request.user_agent.to_string(),
            });
            Ok(())
        }
    }

    fn client() -> (Client<Arc<SpyTransport>>, Arc<SpyTransport>) {
        let spy = Arc::new(SpyTransport::default());
        let options = Options {
            counter_id: "123456".into(),
            counter_class: 0,
            encoding: "utf-8".into(),
            ..Default::default()
        };
        let client = Client::with_transport(options, spy.clone()).expect("valid options");
        (client, spy)
    }

    fn ctx() -> RequestContext {
        RequestContext::new("example.ru")
            .request_uri("/page")
            .referrer("http://ya.ru/search?text=x")
            .real_ip("198.51.100.1")
            .user_agent("TestAgent/1.0")
    }

    fn only(spy: &SpyTransport) -> Sent {
        let sent = spy.sent();
        assert_eq!(sent.len(), 1, "expected one request, got {sent:?}");
        sent.into_iter().next().expect("one request")
    }

    // -----------------------------------------------------------------------
    // Options
    // -----------------------------------------------------------------------

    #[test]
    fn test_options_defaults() {
        let options = Options::from("42");
        assert_eq!(options.counter_id, "42");
        assert_eq!(options.counter_class, 0);
        assert_eq!(options.encoding, "utf-8");
        assert_eq!(options.endpoint, "https://mc.yandex.ru");
        assert_eq!(options.connect_timeout, Duration::from_secs(3));
        assert_eq!(Options::from(42u64).counter_id, "42");
    }

    #[test]
    fn test_options_validation() {
        assert!(matches!(Options::default().validate(), Err(Error::EmptyCounterId)));
        assert!(matches!(Options::from("1/2").validate(), Err(Error::InvalidCounterId(_))));

        let bad_endpoint = Options {
            endpoint: "ftp://mc.yandex.ru".into(),
            ..Options::from("1")
        };
        assert!(matches!(bad_endpoint.validate(), Err(Error::InvalidEndpoint { .. })));

        let not_a_url = Options {
            endpoint: "mc.yandex.ru".into(),
            ..Options::from("1")
        };
        assert!(matches!(not_a_url.validate(), Err(Error::InvalidEndpoint { .. })));

        assert!(Options::from("123456").validate().is_ok());
    }

    #[test]
    fn test_options_deserialize() {
        let options: Options = serde_json::from_str(
            r#"{"counter_id": "777", "counter_class": 2, "connect_timeout": 5}"#,
        )
        .expect("valid config");

        assert_eq!(options.counter_id, "777");
        assert_eq!(options.counter_class, 2);
        assert_eq!(options.connect_timeout, Duration::from_secs(5));
        assert_eq!(options.timeout, CALL_TIMEOUT);
        assert_eq!(options.encoding, "utf-8");
    }

    #[test]
    fn test_new_rejects_empty_counter() {
        assert!(Client::new("").is_err());
        assert!(Client::new("123456").is_ok());
    }

    // -----------------------------------------------------------------------
    // Request envelope
    // -----------------------------------------------------------------------

    #[test]
    fn test_watch_path() {
        assert_eq!(watch_path("123456", 42), "/watch/123456/1?rn=42&wmode=2");
    }

    #[test]
    fn test_request_carries_path_and_visitor() {
        let (client, spy) = client();
        assert!(client.not_bounce(&ctx()));

        let sent = only(&spy);
        let rn: u32 = sent
            .path
            .strip_prefix("/watch/123456/1?rn=")
            .and_then(|rest| rest.strip_suffix("&wmode=2"))
            .and_then(|rn| rn.parse().ok())
            .expect("rn in path");
        assert!(rn <= RN_MAX);
        assert_eq!(sent.real_ip, "198.51.100.1");
        assert_eq!(sent.user_agent, "TestAgent/1.0");
    }

    #[test]
    fn test_counter_class_is_sent() {
        let spy = Arc::new(SpyTransport::default());
        let options = Options {
            counter_class: 5,
            ..Options::from("1")
        };
        let client = Client::with_transport(options, spy.clone()).expect("valid options");

        assert!(client.not_bounce(&ctx()));
        assert_eq!(only(&spy).field("cnt-class"), Some("5"));
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    #[test]
    fn test_page_hit_defaults_to_current_request() {
        let (client, spy) = client();
        assert!(client.page_hit(&ctx(), PageHit::new()));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), Some("http%3A%2F%2Fexample.ru%2Fpage"));
        assert_eq!(
            sent.field("page-ref"),
            Some("http%3A%2F%2Fya.ru%2Fsearch%3Ftext%3Dx")
        );
        assert_eq!(sent.field("browser-info"), Some("ar:1:en:utf-8"));
        assert_eq!(sent.field("ut"), None);
    }

    #[test]
    fn test_page_hit_with_relative_urls_and_extras() {
        let (client, spy) = client();
        let hit = PageHit::new()
            .url("/index.html")
            .title("Main page")
            .referrer("/back.html")
            .params(json!({"level1": {"level2": 1}}))
            .index_directive("noindex");

        assert!(client.page_hit(&ctx().secure(true), hit));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), Some("https%3A%2F%2Fexample.ru%2Findex.html"));
        assert_eq!(sent.field("page-ref"), Some("https%3A%2F%2Fexample.ru%2Fback.html"));
        assert_eq!(sent.field("browser-info"), Some("ar:1:en:utf-8:t:Main+page"));
        assert_eq!(
            sent.field("site-info"),
            Some("%7B%22level1%22%3A%7B%22level2%22%3A1%7D%7D")
        );
        assert_eq!(sent.field("ut"), Some("noindex"));
    }

    #[test]
    fn test_page_hit_empty_referrer_is_omitted() {
        let (client, spy) = client();
        let ctx = RequestContext::new("example.ru").request_uri("/");

        assert!(client.page_hit(&ctx, PageHit::new()));
        assert_eq!(only(&spy).field("page-ref"), None);
    }

    #[test]
    fn test_reach_goal_with_target() {
        let (client, spy) = client();
        let ctx = RequestContext::new("example.ru").request_uri("/here");

        assert!(client.reach_goal(&ctx, "back", None));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), Some("goal%3A%2F%2Fexample.ru%2Fback"));
        assert_eq!(sent.field("page-ref"), Some("http%3A%2F%2Fexample.ru%2Fhere"));
        assert_eq!(sent.field("browser-info"), Some("ar:1:en:utf-8"));
    }

    #[test]
    fn test_reach_goal_without_target() {
        let (client, spy) = client();
        assert!(client.reach_goal(&ctx(), "", Some(json!({"plan": "pro"}))));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), Some("http%3A%2F%2Fexample.ru%2Fpage"));
        assert_eq!(
            sent.field("page-ref"),
            Some("http%3A%2F%2Fya.ru%2Fsearch%3Ftext%3Dx")
        );
        assert_eq!(sent.field("site-info"), Some("%7B%22plan%22%3A%22pro%22%7D"));
    }

    #[test]
    fn test_external_link() {
        let (client, spy) = client();
        assert!(client.external_link(&ctx(), "http://yandex.ru", "Yandex"));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), Some("http%3A%2F%2Fyandex.ru"));
        assert_eq!(sent.field("page-ref"), Some("http%3A%2F%2Fexample.ru%2Fpage"));
        assert_eq!(sent.field("browser-info"), Some("ar:1:ln:1:en:utf-8:t:Yandex"));
        assert_eq!(sent.field("ut"), Some("noindex"));
    }

    /**
     * External links are sent as given, even when relative.
     */
    #[test]
    fn test_external_link_is_not_resolved() {
        let (client, spy) = client();
        assert!(client.external_link(&ctx(), "/out", ""));
        assert_eq!(only(&spy).field("page-url"), Some("%2Fout"));
    }

    #[test]
    fn test_external_link_empty_url_skips_transport() {
        let (client, spy) = client();
        assert!(!client.external_link(&ctx(), "", "title"));
        assert!(spy.sent().is_empty());
    }

    #[test]
    fn test_file_download_relative() {
        let (client, spy) = client();
        let ctx = RequestContext::new("example.ru").request_uri("/page");

        assert!(client.file_download(&ctx, "/file.zip", ""));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), Some("http%3A%2F%2Fexample.ru%2Ffile.zip"));
        assert_eq!(sent.field("page-ref"), Some("http%3A%2F%2Fexample.ru%2Fpage"));

        let info = sent.field("browser-info").expect("browser-info");
        assert!(info.contains("dl:1:ln:1:en:utf-8"), "browser-info: {info}");
        assert_eq!(info.matches("ar:").count(), 1);
    }

    #[test]
    fn test_file_download_bare_file_name() {
        let (client, spy) = client();
        let ctx = RequestContext::new("example.ru").request_uri("/docs/");

        assert!(client.file_download(&ctx, "report.pdf", ""));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), Some("http%3A%2F%2Fexample.ru%2Freport.pdf"));
    }

    #[test]
    fn test_file_download_absolute_with_title() {
        let (client, spy) = client();
        assert!(client.file_download(&ctx(), "http://cdn.example.ru/a.pdf", "Price list"));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), Some("http%3A%2F%2Fcdn.example.ru%2Fa.pdf"));
        assert_eq!(
            sent.field("browser-info"),
            Some("ar:1:dl:1:ln:1:en:utf-8:t:Price+list")
        );
    }

    #[test]
    fn test_file_download_empty_url_skips_transport() {
        let (client, spy) = client();
        assert!(!client.file_download(&ctx(), "", ""));
        assert!(spy.sent().is_empty());
    }

    #[test]
    fn test_report_params() {
        let (client, spy) = client();
        assert!(client.report_params(&ctx(), json!({"level1": {"level2": 1}})));

        let sent = only(&spy);
        assert_eq!(sent.field("page-url"), None);
        assert_eq!(sent.field("page-ref"), None);
        assert_eq!(sent.field("browser-info"), Some("ar:1:pa:1:en:utf-8"));
        assert_eq!(
            sent.field("site-info"),
            Some("%7B%22level1%22%3A%7B%22level2%22%3A1%7D%7D")
        );
    }

    #[test]
    fn test_report_params_blank_skips_transport() {
        let (client, spy) = client();
        assert!(!client.report_params(&ctx(), json!({})));
        assert!(!client.report_params(&ctx(), Value::Null));
        assert!(spy.sent().is_empty());
    }

    #[test]
    fn test_not_bounce() {
        let (client, spy) = client();
        assert!(client.not_bounce(&ctx()));

        let sent = only(&spy);
        assert_eq!(sent.body, "browser-info=ar:1:nb:1:en:utf-8");
    }

    #[test]
    fn test_transport_failure_returns_false() {
        let client = Client::with_transport("123456", SpyTransport::failing()).expect("valid options");

        assert!(!client.not_bounce(&ctx()));
        assert!(!client.page_hit(&ctx(), PageHit::new()));
        assert!(client.transport().sent().is_empty());
    }

    /**
     * One client shared by several threads; every hit gets through.
     */
    #[test]
    fn test_concurrent_hits() {
        let (client, spy) = client();
        let client = Arc::new(client);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let client = Arc::clone(&client);
                std::thread::spawn(move || {
                    let ctx = RequestContext::new("example.ru").request_uri(format!("/p{i}"));
                    client.page_hit(&ctx, PageHit::new())
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().expect("thread"));
        }
        assert_eq!(spy.sent().len(), 8);
    }
}
