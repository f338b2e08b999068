pub mod config;
pub mod error;
pub mod quote;
pub mod store;
pub mod telemetry;

use serde::Serialize;
use tracing::info;

pub use config::ArchiverConfig;
pub use error::{ArchiveError, Result};
pub use quote::{storage_key, HttpQuoteSource, QuoteSource};
pub use store::{ObjectStore, S3ObjectStore, StorageObject};

/// What a successful run wrote, for logging by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedQuote {
    pub bucket: String,
    pub key: String,
    pub bytes: usize,
}

/// Fetches the current quote and stores it verbatim, keyed by its timestamp.
///
/// Steps run strictly in order and any failure aborts the run: nothing is
/// written unless the quote was fetched, parsed and keyed. Writes are
/// unconditional, so two quotes with the same `time.updated` overwrite each
/// other.
pub struct QuoteArchiver<Q, S> {
    config: ArchiverConfig,
    source: Q,
    store: S,
}

impl<Q: QuoteSource, S: ObjectStore> QuoteArchiver<Q, S> {
    pub fn new(config: ArchiverConfig, source: Q, store: S) -> Self {
        QuoteArchiver {
            config,
            source,
            store,
        }
    }

    pub fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    /// Everything `archive` does short of the write.
    pub async fn preview(&self) -> Result<StorageObject> {
        let quote = self.source.fetch_quote().await?;
        StorageObject::from_quote(&self.config.bucket_name, &quote)
    }

    pub async fn archive(&self) -> Result<ArchivedQuote> {
        let object = self.preview().await?;
        self.store.put_object(&object).await?;
        info!(bucket = %object.bucket, key = %object.key, "quote archived");
        Ok(ArchivedQuote {
            bucket: object.bucket,
            key: object.key,
            bytes: object.body.len(),
        })
    }
}

impl QuoteArchiver<HttpQuoteSource, S3ObjectStore> {
    /// Wires the HTTP source and S3 store from `config` and ambient AWS credentials.
    pub async fn from_config(config: ArchiverConfig) -> Result<Self> {
        let source = HttpQuoteSource::new(&config)?;
        let store = S3ObjectStore::from_env().await;
        Ok(QuoteArchiver::new(config, source, store))
    }
}
