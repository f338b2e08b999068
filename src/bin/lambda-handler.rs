use bpi_archiver::telemetry::{init_logging, LogFormat};
use bpi_archiver::{ArchiverConfig, HttpQuoteSource, QuoteArchiver, S3ObjectStore};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

type Archiver = QuoteArchiver<HttpQuoteSource, S3ObjectStore>;

/// The trigger payload carries nothing we need. Failures go back to the
/// runtime, which logs them and marks the invocation failed.
pub(crate) async fn handler(event: LambdaEvent<Value>, archiver: &Archiver) -> Result<(), Error> {
    info!(request_id = %event.context.request_id, "archiving quote");
    let archived = archiver.archive().await?;
    info!(key = %archived.key, bytes = archived.bytes, "done");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging(LogFormat::Json, "info");

    let config = ArchiverConfig::from_env()?;
    info!(endpoint = %config.endpoint_url, bucket = %config.bucket_name, "starting");
    let archiver = QuoteArchiver::from_config(config).await?;

    lambda_runtime::run(service_fn(|event| handler(event, &archiver))).await?;
    Ok(())
}
