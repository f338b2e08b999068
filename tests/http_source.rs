use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::types::ObjectCannedAcl;
use bpi_archiver::{
    ArchiveError, ArchiverConfig, HttpQuoteSource, ObjectStore, QuoteArchiver, QuoteSource,
    Result, StorageObject,
};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const QUOTE: &str = r#"{"time":{"updated":"Jan 1, 2024 00:00:00 UTC","updatedISO":"2024-01-01T00:00:00+00:00"},"disclaimer":"Test data","chartName":"Bitcoin","bpi":{"USD":{"code":"USD","rate":"42,265.1864","rate_float":42265.1864}}}"#;

/// Answers exactly one request with the given status line and body.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });
    format!("http://{}/v1/bpi/currentprice.json", addr)
}

fn source_for(url: &str) -> HttpQuoteSource {
    let mut config = ArchiverConfig::new(url, "bpi-test-bucket");
    config.request_timeout = Duration::from_secs(5);
    HttpQuoteSource::new(&config).unwrap()
}

/// Clones share the same list, so a test can keep one and hand the other over.
#[derive(Clone, Default)]
struct MemoryStore {
    objects: Arc<Mutex<Vec<StorageObject>>>,
}

impl MemoryStore {
    fn written(&self) -> Vec<StorageObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, object: &StorageObject) -> Result<()> {
        self.objects.lock().unwrap().push(object.clone());
        Ok(())
    }
}

#[tokio::test]
async fn fetches_and_parses_quote() {
    let url = serve_once("200 OK", QUOTE).await;
    let quote = source_for(&url).fetch_quote().await.unwrap();
    assert_eq!(quote["time"]["updated"], "Jan 1, 2024 00:00:00 UTC");
    assert_eq!(quote["bpi"]["USD"]["rate_float"], 42265.1864);
}

#[tokio::test]
async fn invalid_json_is_parse_error() {
    let url = serve_once("200 OK", "<html>maintenance</html>").await;
    let err = source_for(&url).fetch_quote().await.unwrap_err();
    assert!(matches!(err, ArchiveError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn error_status_is_network_error() {
    let url = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;
    let err = source_for(&url).fetch_quote().await.unwrap_err();
    match err {
        ArchiveError::Network { url: failed, reason } => {
            assert_eq!(failed, url);
            assert!(reason.contains("503"), "reason was {}", reason);
        }
        other => panic!("expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let url = format!("http://{}/v1/bpi/currentprice.json", addr);
    let err = source_for(&url).fetch_quote().await.unwrap_err();
    assert!(matches!(err, ArchiveError::Network { .. }), "got {:?}", err);
}

#[tokio::test]
async fn archives_http_quote_byte_for_byte() {
    let url = serve_once("200 OK", QUOTE).await;
    let config = ArchiverConfig::new(url.as_str(), "bpi-test-bucket");
    let source = HttpQuoteSource::new(&config).unwrap();
    let store = MemoryStore::default();
    let archiver = QuoteArchiver::new(config, source, store.clone());

    let archived = archiver.archive().await.unwrap();
    assert_eq!(archived.key, "Jan 1, 2024 00:00:00 UTC BPI.json");
    assert_eq!(archived.bytes, QUOTE.len());

    let written = store.written();
    assert_eq!(written.len(), 1);
    let object = &written[0];
    assert_eq!(object.bucket, "bpi-test-bucket");
    assert_eq!(object.key, "Jan 1, 2024 00:00:00 UTC BPI.json");
    assert_eq!(object.body, QUOTE);
    assert_eq!(object.content_type, "application/json");
    assert_eq!(object.acl, ObjectCannedAcl::PublicRead);

    let upstream: Value = serde_json::from_str(QUOTE).unwrap();
    let stored: Value = serde_json::from_str(&object.body).unwrap();
    assert_eq!(stored, upstream);
}

#[tokio::test]
async fn preview_matches_upstream_without_writing() {
    let url = serve_once("200 OK", QUOTE).await;
    let config = ArchiverConfig::new(url.as_str(), "bpi-test-bucket");
    let source = HttpQuoteSource::new(&config).unwrap();
    let store = MemoryStore::default();
    let archiver = QuoteArchiver::new(config, source, store.clone());

    let object = archiver.preview().await.unwrap();
    assert_eq!(object.body, QUOTE);
    assert_eq!(object.content_type, "application/json");
    assert!(store.written().is_empty());
}
