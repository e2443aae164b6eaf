/*!
 * Metrika Core — the internal SDK engine.
 *
 * Builds Yandex.Metrika hits on the server side and delivers them to the
 * collector. End users should depend on the `metrika` facade crate
 * instead, which re-exports everything here together with the
 * request-context addon.
 *
 * # Module structure
 *
 * - `protocol/` — what we send: constants, mode flags, URL resolution, encoder
 * - `transport/` — how we deliver: `Transport` trait, `ureq` client
 * - `context` — the inbound request a hit is reported for
 * - `client` — named operations: page hit, goal, link, download, params, not-bounce
 * - `error` — configuration and delivery errors
 */

mod client;
mod context;
mod error;
mod protocol;
mod transport;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use client::{Client, Options, PageHit};
pub use context::RequestContext;
pub use error::{Error, HitError, SendError};
pub use protocol::constants::{DEFAULT_ENCODING, DEFAULT_ENDPOINT};
pub use protocol::encoder::{Encoder, HitPayload, WireFields};
pub use protocol::modes::{HitModes, ModeValue};
pub use protocol::resolve::{absolute_url, current_url};
pub use transport::{HitRequest, HttpTransport, Transport};

/// Flag names understood by the collector, for building custom `HitModes`.
pub mod modes {
    pub use crate::protocol::modes::{ARRIVED, DOWNLOAD, INDEX, LINK, NOT_BOUNCE, PARAMS};
}
