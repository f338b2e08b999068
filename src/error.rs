use thiserror::Error;

pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("quote body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("quote has no string field `{0}`")]
    MissingField(&'static str),

    #[error("could not write {key} to bucket {bucket}: {reason}")]
    Storage {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("invalid value for {name}: {reason}")]
    Config { name: &'static str, reason: String },
}

impl ArchiveError {
    pub(crate) fn network(url: &str, reason: impl ToString) -> Self {
        ArchiveError::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The local client could not be set up (TLS backend, builder options).
    pub(crate) fn http_client(e: reqwest::Error) -> Self {
        ArchiveError::Config {
            name: "http client",
            reason: e.to_string(),
        }
    }
}
