//! Error types for the Blackout Rugby client.

use thiserror::Error;

/// Errors that can occur when talking to the Blackout Rugby API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Network or HTTP transport failure.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Failure inside the retry middleware.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),

    /// The response body was not valid JSON.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The API answered but reported a status other than `Ok`.
    #[error("BR API error: {0}")]
    Api(String),

    /// The response JSON lacks an expected field or has the wrong shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid base URL or other client setting.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The key file is missing, unreadable or incomplete.
    #[error("Credentials error: {0}")]
    Credentials(String),
}
