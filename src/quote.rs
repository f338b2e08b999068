use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ArchiverConfig;
use crate::error::{ArchiveError, Result};

/// Suffix appended to a quote's timestamp to form its object key.
pub const KEY_SUFFIX: &str = " BPI.json";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Anything that can hand back the current price quote as a JSON document.
#[async_trait]
pub trait QuoteSource {
    async fn fetch_quote(&self) -> Result<Value>;
}

/// Reads `time.updated`, the only field of a quote that is ever inspected.
pub fn quote_timestamp(quote: &Value) -> Result<&str> {
    quote
        .get("time")
        .and_then(|time| time.get("updated"))
        .and_then(Value::as_str)
        .ok_or(ArchiveError::MissingField("time.updated"))
}

pub fn storage_key(quote: &Value) -> Result<String> {
    let updated = quote_timestamp(quote)?;
    Ok(format!("{}{}", updated, KEY_SUFFIX))
}

#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    url: String,
    client: reqwest::Client,
}

impl HttpQuoteSource {
    pub fn new(config: &ArchiverConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(ArchiveError::http_client)?;
        Ok(HttpQuoteSource {
            url: config.endpoint_url.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch_quote(&self) -> Result<Value> {
        debug!(url = %self.url, "fetching quote");
        let res = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ArchiveError::network(&self.url, e))?;

        let status = res.status();
        if !status.is_success() {
            error!(url = %self.url, %status, "quote request failed");
            return Err(ArchiveError::network(
                &self.url,
                format!("upstream responded with status {}", status),
            ));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| ArchiveError::network(&self.url, e))?;
        debug!(bytes = body.len(), "quote received");
        let quote = serde_json::from_slice(&body)?;
        Ok(quote)
    }
}
