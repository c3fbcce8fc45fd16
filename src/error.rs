use thiserror::Error;

/// Errors raised while reading from the compute unit
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {process}")]
    Status {
        process: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode {action} response: {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Process {process} returned an error: {message}")]
    Process { process: String, message: String },

    #[error("Process {process} returned no messages for {action}")]
    EmptyResponse { process: String, action: String },
}
