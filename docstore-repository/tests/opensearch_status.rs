//! Status handling of `OpenSearchProvider` against a local HTTP stub.
//!
//! Each stub answers every request with one canned status and body, so the
//! tests see exactly what the provider makes of a given status.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use docstore_repository::{
    DeleteResult, DocumentStoreClient, DocumentStoreConfig, DocumentStoreError,
    DocumentStoreProvider, OpenSearchProvider, RetryPolicy,
};
use docstore_shared::SearchQuery;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const NOT_FOUND_DOCUMENT: &str = r#"{"_index":"demoitem","_id":"X","found":false}"#;
const NOT_FOUND_INDEX: &str = r#"{"error":{"type":"index_not_found_exception","reason":"no such index [demoitem]"},"status":404}"#;
const UNAVAILABLE: &str = r#"{"error":"unavailable"}"#;

struct StubServer {
    url: String,
    requests: Arc<AtomicUsize>,
}

impl StubServer {
    /// Answer every request with `status` and `body`.
    async fn replying(status: u16, body: &'static str) -> Self {
        Self::start(Some((status, body))).await
    }

    /// Accept requests and never answer them.
    async fn silent() -> Self {
        Self::start(None).await
    }

    async fn start(reply: Option<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let counter = Arc::clone(&counter);
                tokio::spawn(async move {
                    if read_request(&mut socket).await.is_err() {
                        return;
                    }
                    counter.fetch_add(1, Ordering::SeqCst);
                    match reply {
                        Some((status, body)) => {
                            let response = format!(
                                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                status,
                                body.len(),
                                body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        }
                        None => {
                            tokio::time::sleep(Duration::from_secs(60)).await;
                        }
                    }
                });
            }
        });

        Self { url, requests }
    }

    fn provider(&self) -> OpenSearchProvider {
        OpenSearchProvider::new(&self.url).unwrap()
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Read one request: headers, then `Content-Length` bytes of body.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < end + 4 + length {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Err(std::io::ErrorKind::UnexpectedEof.into());
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        return Ok(());
    }
}

fn quick_retry(max_attempts: u32) -> DocumentStoreConfig {
    DocumentStoreConfig::default().with_retry(RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(10),
    })
}

#[tokio::test]
async fn test_missing_document_is_a_value() {
    let stub = StubServer::replying(404, NOT_FOUND_DOCUMENT).await;
    let provider = stub.provider();

    assert!(provider.get_document("demoitem", "X").await.unwrap().is_none());
    assert!(provider.get_source("demoitem", "X").await.unwrap().is_none());
    assert_eq!(
        provider.delete_document("demoitem", "X").await.unwrap(),
        DeleteResult::NotFound
    );
}

#[tokio::test]
async fn test_missing_index_on_read_is_a_value() {
    let stub = StubServer::replying(404, NOT_FOUND_INDEX).await;
    let provider = stub.provider();

    assert!(provider.get_document("demoitem", "X").await.unwrap().is_none());
    assert_eq!(
        provider.delete_document("demoitem", "X").await.unwrap(),
        DeleteResult::NotFound
    );
}

#[tokio::test]
async fn test_delete_missing_index_is_request_error() {
    let stub = StubServer::replying(404, NOT_FOUND_INDEX).await;

    let err = stub.provider().delete_index("demoitem").await.unwrap_err();
    assert!(matches!(err, DocumentStoreError::RequestError(_)));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_gateway_statuses_are_transport_errors() {
    for status in [502, 503, 504] {
        let stub = StubServer::replying(status, UNAVAILABLE).await;
        let provider = stub.provider();

        let err = provider.get_document("demoitem", "X").await.unwrap_err();
        assert!(
            matches!(err, DocumentStoreError::TransportError(_)),
            "status {} gave {:?}",
            status,
            err
        );

        let query = SearchQuery::multi_match("demoitem", "아이폰", ["title", "description"]);
        let err = provider.search(&query).await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::TransportError(_)));
    }
}

#[tokio::test]
async fn test_bad_request_is_request_error() {
    let stub = StubServer::replying(400, r#"{"error":{"type":"parsing_exception"}}"#).await;
    let query = SearchQuery::multi_match("demoitem", "아이폰", ["title"]);

    let err = stub.provider().search(&query).await.unwrap_err();
    assert!(matches!(err, DocumentStoreError::RequestError(_)));
}

#[tokio::test]
async fn test_client_retries_unavailable_store() {
    let stub = StubServer::replying(503, UNAVAILABLE).await;
    let client = DocumentStoreClient::with_config(Box::new(stub.provider()), quick_retry(3));

    let err = client.get("demoitem", "X").await.unwrap_err();
    assert!(matches!(err, DocumentStoreError::TransportError(_)));
    assert_eq!(stub.requests(), 3);
}

#[tokio::test]
async fn test_client_does_not_retry_rejected_request() {
    let stub = StubServer::replying(404, NOT_FOUND_INDEX).await;
    let client = DocumentStoreClient::with_config(Box::new(stub.provider()), quick_retry(3));

    let err = client.delete_index("demoitem").await.unwrap_err();
    assert!(matches!(err, DocumentStoreError::RequestError(_)));
    assert_eq!(stub.requests(), 1);
}

#[tokio::test]
async fn test_unanswered_request_hits_deadline() {
    let stub = StubServer::silent().await;
    let client = DocumentStoreClient::new(Box::new(stub.provider()))
        .with_deadline(Duration::from_millis(200));

    let err = client.get("demoitem", "X").await.unwrap_err();
    assert!(matches!(err, DocumentStoreError::TimeoutError(_)));
}

#[tokio::test]
async fn test_found_document_with_unsupported_fields() {
    let stub = StubServer::replying(
        200,
        r#"{"_index":"demoitem","_id":"X","_version":1,"found":true,"_source":{"title":"아이폰 6S Plus","description":null,"tags":["used"]}}"#,
    )
    .await;

    let found = stub
        .provider()
        .get_document("demoitem", "X")
        .await
        .unwrap()
        .expect("document should be returned");
    assert_eq!(found.source.len(), 1);
    assert_eq!(found.source["title"].as_str(), Some("아이폰 6S Plus"));
}
