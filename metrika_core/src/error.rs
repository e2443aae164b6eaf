/**
 * Error types.
 *
 * None of these reach the caller of a hit operation; those return `bool`
 * and log the error through `tracing`. `Error` is returned when building
 * a client from invalid options.
 */

/// Invalid client configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("counter id must not be empty")]
    EmptyCounterId,

    #[error("counter id {0:?} contains characters not allowed in a URL path")]
    InvalidCounterId(String),

    #[error("invalid collector endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Why a transport could not deliver a hit.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The connection to the collector could not be established.
    #[error("could not connect to the collector: {0}")]
    Connection(String),

    /// Connected, but the request could not be written in full.
    #[error("could not write the hit: {0}")]
    Write(String),
}

/// Why a hit operation returned `false`.
#[derive(Debug, thiserror::Error)]
pub enum HitError {
    /// A required argument was empty, so nothing was sent.
    #[error("{0} is empty, hit skipped")]
    InputSkipped(&'static str),

    #[error(transparent)]
    Send(#[from] SendError),
}
