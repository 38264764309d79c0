use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a non-2xx, non-401 status. Terminal; the
    /// pipeline never retries these.
    #[error("request to {url} failed: {status}")]
    Request { url: String, status: StatusCode },
    /// The response body did not match the expected shape.
    #[error("unexpected response body from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// Persisting the token pair failed.
    #[error("token storage failed: {0}")]
    Storage(#[from] std::io::Error),
    /// The client was disposed while the call was pending or before it started.
    #[error("operation aborted")]
    Aborted,
    /// Network-level failure before any status was received.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
