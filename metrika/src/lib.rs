/*!
 * Metrika — server-side Yandex.Metrika hits for Rust.
 *
 * Applications depend on this crate alone. It re-exports the core
 * SDK and the `http` request-context addon, and can hold one process-wide
 * client for applications that report to a single counter.
 *
 * # Quick start
 *
 * ```ignore
 * fn main() -> Result<(), metrika::InitError> {
 *     metrika::init("123456")?;
 *
 *     // inside a request handler:
 *     let ctx = metrika::context_from_request(&request);
 *     if let Some(counter) = metrika::client() {
 *         counter.page_hit(&ctx, metrika::PageHit::new().title("Main page"));
 *         counter.reach_goal(&ctx, "signup", None);
 *     }
 *     Ok(())
 * }
 * ```
 *
 * # With options
 *
 * ```ignore
 * metrika::init(metrika::Options {
 *     counter_id: "123456".into(),
 *     counter_class: 1,
 *     encoding: "windows-1251".into(),
 *     ..Default::default()
 * })?;
 * ```
 *
 * Applications that talk to several counters, or want a custom
 * `Transport`, build `metrika::Client` values directly instead.
 */

use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use metrika_core::{
    absolute_url, current_url, modes, Client, Encoder, Error, HitError, HitModes, HitPayload,
    HitRequest, HttpTransport, ModeValue, Options, PageHit, RequestContext, SendError, Transport,
    WireFields, DEFAULT_ENCODING, DEFAULT_ENDPOINT,
};
pub use metrika_http::{context_from_parts, context_from_request, http};

// ---------------------------------------------------------------------------
// Global client
// ---------------------------------------------------------------------------

static GLOBAL_CLIENT: OnceLock<Client> = OnceLock::new();

/// Why `init` failed.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Options(#[from] Error),

    #[error("the Metrika client is already initialized")]
    AlreadyInitialized,
}

/**
 * Builds the process-wide client.
 *
 * Accepts a counter id (`"123456"`, `123456u64`) or full `Options`.
 * Returns `Err` on invalid options or when called a second time.
 */
pub fn init(options: impl Into<Options>) -> Result<&'static Client, InitError> {
    if GLOBAL_CLIENT.get().is_some() {
        return Err(InitError::AlreadyInitialized);
    }

    let client = Client::new(options)?;

    GLOBAL_CLIENT
        .set(client)
        .map_err(|_| InitError::AlreadyInitialized)?;

    GLOBAL_CLIENT.get().ok_or(InitError::AlreadyInitialized)
}

/// The process-wide client, or `None` before `init`.
pub fn client() -> Option<&'static Client> {
    GLOBAL_CLIENT.get()
}
