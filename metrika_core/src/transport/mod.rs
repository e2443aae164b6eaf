/*!
 * Transport layer — how a hit reaches the collector.
 *
 * - `http` — `ureq`-based delivery to the Metrika collector
 *
 * The `Transport` trait is the seam between the client and the network;
 * anything that can deliver a `HitRequest` can stand in for `HttpTransport`.
 */

pub mod http;

use std::sync::Arc;

use crate::error::SendError;

pub use http::HttpTransport;

/// One hit, ready for delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitRequest<'a> {
    /// Path and query on the collector host, e.g. `/watch/123/1?rn=42&wmode=2`.
    pub path: &'a str,

    /// `application/x-www-form-urlencoded` body.
    pub body: &'a str,

    /// Visitor address for `X-Real-IP`. May be empty.
    pub real_ip: &'a str,

    /// Visitor user agent for `User-Agent`. May be empty.
    pub user_agent: &'a str,
}

/**
 * Delivers hits to the collector.
 *
 * `Ok(())` means the request was written; the collector's answer does not
 * matter. Implementations make a single attempt and never retry.
 */
pub trait Transport: Send + Sync {
    fn send(&self, request: &HitRequest<'_>) -> Result<(), SendError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HitRequest<'_>) -> Result<(), SendError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HitRequest<'_>) -> Result<(), SendError> {
        (**self).send(request)
    }
}
