/*!
 * HTTP transport for delivering hits to the Metrika collector.
 *
 * A blocking `ureq` agent posts the form body from the caller's thread.
 * There is no background worker and nothing to flush on shutdown.
 *
 * Delivery contract:
 * - **Single attempt**: no retries, no redirects.
 * - **One connection per hit**: idle pooling is disabled and every
 *   request carries `Connection: close`.
 * - **Write = delivered**: once the whole body has been handed to the
 *   connection, nothing that happens afterwards fails the hit. The status
 *   code is never inspected, and a stalled, reset or truncated response
 *   only shows up in the debug log.
 */

use std::io::{self, Read};
use std::time::Duration;

use tracing::debug;
use ureq::{Agent, SendBody, Timeout};

use super::{HitRequest, Transport};
use crate::error::SendError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/**
 * `ureq::Agent` configured for the collector.
 *
 * Created once per `Client`; safe to share between threads.
 */
pub struct HttpTransport {
    agent: Agent,

    /// Collector origin without a trailing slash, e.g. `https://mc.yandex.ru`.
    endpoint: String,
}

impl HttpTransport {
    /**
     * Creates a transport for `endpoint`.
     *
     * Timeouts:
     * - `connect_timeout` for DNS + TCP + TLS
     * - `timeout` for the whole call, response drain included
     */
    pub fn new(endpoint: &str, connect_timeout: Duration, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_connect(Some(connect_timeout))
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .max_redirects(0)
            .max_idle_connections(0)
            .max_idle_connections_per_host(0)
            .build()
            .into();

        Self {
            agent,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HitRequest<'_>) -> Result<(), SendError> {
        let url = format!("{}{}", self.endpoint, request.path);
        debug!(%url, bytes = request.body.len(), "posting hit");

        /*
         * `Content-Length` is set explicitly so the reader body is sent
         * length-delimited, not chunked. `Host` comes from the URL.
         */
        let mut body = TrackedBody::new(request.body.as_bytes());
        let result = self
            .agent
            .post(&url)
            .header("X-Real-IP", request.real_ip)
            .header("User-Agent", request.user_agent)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .header("Content-Length", request.body.len())
            .header("Connection", "close")
            .send(SendBody::from_reader(&mut body));

        match result {
            Ok(response) => {
                let status = response.status().as_u16();

                match response.into_body().read_to_vec() {
                    Ok(bytes) => debug!(status, bytes = bytes.len(), "collector responded"),
                    Err(err) => debug!(status, error = %err, "response drain failed, hit counts as sent"),
                }

                Ok(())
            }
            Err(err) => classify(err, body.consumed),
        }
    }
}

/**
 * Request body that remembers whether ureq has taken all of it.
 *
 * ureq reads the body straight into the connection's output buffer and
 * transmits each read before asking for more, so once the slice is empty
 * the request is on the wire and any later failure belongs to the
 * response.
 */
struct TrackedBody<'a> {
    remaining: &'a [u8],
    consumed: bool,
}

impl<'a> TrackedBody<'a> {
    fn new(body: &'a [u8]) -> Self {
        Self {
            remaining: body,
            consumed: body.is_empty(),
        }
    }
}

impl Read for TrackedBody<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.remaining.read(buf)?;
        if self.remaining.is_empty() {
            self.consumed = true;
        }
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/**
 * Maps a `ureq` failure onto the delivery contract.
 *
 * `body_consumed` says whether the whole body was handed to the
 * connection before the failure.
 *
 * - send-phase timeouts → `SendError::Write`, even on the last chunk
 * - anything else after the body was consumed → `Ok(())`: a stalled,
 *   reset or malformed response is a drain failure
 * - before that, resolve / connect / TLS problems → `SendError::Connection`
 *   and failures while writing the request → `SendError::Write`
 */
fn classify(err: ureq::Error, body_consumed: bool) -> Result<(), SendError> {
    match err {
        ureq::Error::Timeout(Timeout::SendRequest | Timeout::SendBody | Timeout::Await100) => {
            Err(SendError::Write(err.to_string()))
        }
        _ if body_consumed => {
            debug!(error = %err, "request written, response lost; hit counts as sent");
            Ok(())
        }
        ureq::Error::Timeout(Timeout::RecvResponse | Timeout::RecvBody) | ureq::Error::Protocol(_) => {
            debug!(error = %err, "no usable response, hit counts as sent");
            Ok(())
        }
        ureq::Error::Http(_) | ureq::Error::BadUri(_) => Err(SendError::Write(err.to_string())),
        ureq::Error::Io(ref io_err) => match io_err.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::NotFound
            | io::ErrorKind::TimedOut => Err(SendError::Connection(err.to_string())),
            io::ErrorKind::UnexpectedEof => {
                debug!(error = %err, "collector closed before answering, hit counts as sent");
                Ok(())
            }
            _ => Err(SendError::Write(err.to_string())),
        },
        other => Err(SendError::Connection(other.to_string())),
    }
}
