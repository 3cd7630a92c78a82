use std::path::PathBuf;

use thiserror::Error;

/// Errors from the remote workout service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No access token in config, environment or token file
    #[error(
        "Garmin access token not configured. Set access_token in config, \
         GARMIN_ACCESS_TOKEN, or write the token to '{}'",
        .0.display()
    )]
    NotConfigured(PathBuf),
    #[error("Failed to read token file '{}': {source}", path.display())]
    TokenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid access token: {0}")]
    InvalidToken(String),
    #[error("Failed to start HTTP runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success response from Garmin
    #[error("Garmin returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response from Garmin: {0}")]
    Decode(String),
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
