//! Error types for the inference client.

use thiserror::Error;

/// Result type alias for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Errors that can occur while running a prediction.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// No API token configured.
    #[error("Replicate API token not configured")]
    MissingToken,

    /// The inference API could not be reached.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with an error status.
    #[error("HTTP {status} - {body}")]
    Api { status: u16, body: String },

    /// The response is not a prediction.
    #[error("could not parse response, raw body: {0}")]
    InvalidResponse(String),

    /// The prediction finished without success.
    #[error("prediction {id} {status}: {message}")]
    PredictionFailed {
        id: String,
        status: String,
        message: String,
    },

    /// The prediction did not finish in time.
    #[error("prediction {id} still {status} after {waited_secs}s")]
    Timeout {
        id: String,
        status: String,
        waited_secs: u64,
    },

    /// A succeeded prediction had no usable output.
    #[error("prediction {0} succeeded without an output URL")]
    MissingOutput(String),

    /// The system browser could not be launched.
    #[error("failed to open browser: {0}")]
    Browser(#[source] std::io::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
