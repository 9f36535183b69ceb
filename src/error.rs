use bytes::Bytes;
use hyper::StatusCode;

/// Result type for HyScores client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`Client`](crate::Client) and
/// [`blocking::Client`](crate::blocking::Client) operations.
///
/// The first three variants make up the business taxonomy of the service;
/// everything else is a transport-level failure passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token-gated operation was invoked while no token is set.
    ///
    /// Call [`login`](crate::Client::login) first.
    #[error("no authentication token is set")]
    TokenUnavailable,

    /// Login did not yield a usable token, either because the service
    /// rejected the credentials or because the response had an
    /// unexpected shape.
    #[error("authentication failed: login response carried no token")]
    Auth,

    /// The service could not resolve the requested nickname and answered
    /// with a non-object `result`.
    #[error("nickname could not be resolved: {0}")]
    InvalidName(serde_json::Value),

    /// The base URL or a joined endpoint URL failed to parse.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building the TLS configuration failed.
    #[error("tls error: {0}")]
    Tls(#[from] rustls::Error),

    /// Building the outbound request failed.
    #[error("http error: {0}")]
    Request(#[from] hyper::http::Error),

    /// Executing the request failed (connect, dns, broken pipe, ...).
    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// Receiving the response body failed.
    #[error("body error: {0}")]
    Body(#[from] hyper::Error),

    /// The service answered with a non-success status code.
    #[error("status code {status}, response: {body:?}")]
    Status { status: StatusCode, body: Bytes },

    /// The response body was not the expected JSON shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured timeout elapsed before the response was received.
    #[error("request timed out")]
    Timeout,

    /// Spawning the runtime of the blocking client failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
