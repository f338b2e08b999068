use std::env;
use std::time::Duration;

use crate::error::{ArchiveError, Result};

pub const DEFAULT_ENDPOINT_URL: &str = "https://api.coindesk.com/v1/bpi/currentprice.json";
pub const DEFAULT_BUCKET_NAME: &str = "bpi-price-bucket-00001";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const ENDPOINT_URL_VAR: &str = "BPI_ENDPOINT_URL";
const BUCKET_NAME_VAR: &str = "BPI_BUCKET_NAME";
const REQUEST_TIMEOUT_VAR: &str = "BPI_REQUEST_TIMEOUT_SECS";

/// Where quotes come from and where they are archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiverConfig {
    pub endpoint_url: String,
    pub bucket_name: String,
    pub request_timeout: Duration,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        ArchiverConfig {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl ArchiverConfig {
    pub fn new(endpoint_url: impl Into<String>, bucket_name: impl Into<String>) -> Self {
        ArchiverConfig {
            endpoint_url: endpoint_url.into(),
            bucket_name: bucket_name.into(),
            ..Default::default()
        }
    }

    /// Builds the config from `BPI_*` environment variables, falling back to
    /// the defaults for any that are unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ArchiverConfig::default();
        if let Some(url) = lookup(ENDPOINT_URL_VAR) {
            if url.trim().is_empty() {
                return Err(ArchiveError::Config {
                    name: ENDPOINT_URL_VAR,
                    reason: "must not be empty".to_string(),
                });
            }
            config.endpoint_url = url;
        }
        if let Some(bucket) = lookup(BUCKET_NAME_VAR) {
            if bucket.trim().is_empty() {
                return Err(ArchiveError::Config {
                    name: BUCKET_NAME_VAR,
                    reason: "must not be empty".to_string(),
                });
            }
            config.bucket_name = bucket;
        }
        if let Some(secs) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|e| ArchiveError::Config {
                name: REQUEST_TIMEOUT_VAR,
                reason: format!("{}", e),
            })?;
            if secs == 0 {
                return Err(ArchiveError::Config {
                    name: REQUEST_TIMEOUT_VAR,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
