/**
 * Protocol constants for the Metrika collector.
 *
 * Values that are fixed by the collector protocol and shared by the
 * encoder, the client and the transport.
 */
use std::time::Duration;

/// Collector origin. Hits are POSTed over TLS to port 443 of this host.
pub const DEFAULT_ENDPOINT: &str = "https://mc.yandex.ru";

/// Path prefix of the watch handler; the counter id follows it.
pub const WATCH_PATH: &str = "/watch/";

/// Default value of the `en:` token in `browser-info`.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Upper bound (inclusive) of the cache-busting `rn` query parameter.
pub const RN_MAX: u32 = 100_000;

/// Time allowed to establish the TLS connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Upper bound on a whole hit: connect, write and response drain.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Value sent as `ut` for external links so the collector does not index them.
pub const NO_INDEX: &str = "noindex";
