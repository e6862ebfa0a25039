use thiserror::Error;

/// Failures a property source can report.
///
/// The `Display` text is what ends up in the store's `error` field.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to listings backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listings backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode listings: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not read listings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid listing {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("{0}")]
    Other(String),
}
