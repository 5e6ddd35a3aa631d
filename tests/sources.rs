//! Document download and source resolution against the in-process stub.

mod common;

use common::{docx_bytes, Stub, StubBehaviour};
use dws_addin::config::DOCX_CONTENT_TYPE;
use dws_addin::{resolve_source, DocumentSource, DwsError, UrlSource};
use std::io::Write;
use std::time::Duration;

fn serving(body: Vec<u8>) -> StubBehaviour {
    StubBehaviour {
        content_type: DOCX_CONTENT_TYPE,
        body,
        ..Default::default()
    }
}

// ── UrlSource ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn url_source_downloads_body() {
    let stub = Stub::start(serving(docx_bytes())).await;
    let source = UrlSource::new(stub.download_url(), 5).unwrap();

    let bytes = source.fetch().await.unwrap().unwrap();

    assert_eq!(bytes.as_slice(), docx_bytes().as_slice());
    let sent = stub.downloads();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "GET");
    // downloads carry no API credential
    assert!(sent[0].authorization.is_none());
}

#[tokio::test]
async fn url_source_downloads_again_on_every_fetch() {
    let stub = Stub::start(serving(docx_bytes())).await;
    let source = UrlSource::new(stub.download_url(), 5).unwrap();

    source.fetch().await.unwrap();
    source.fetch().await.unwrap();

    assert_eq!(stub.downloads().len(), 2);
}

#[tokio::test]
async fn url_source_non_success_status_is_download_failed() {
    let stub = Stub::start(StubBehaviour::status(404)).await;
    let source = UrlSource::new(stub.download_url(), 5).unwrap();

    match source.fetch().await {
        Err(DwsError::DownloadFailed { url, reason }) => {
            assert_eq!(url, stub.download_url());
            assert!(reason.contains("404"), "got: {reason}");
        }
        other => panic!("expected DownloadFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn url_source_slow_server_is_download_timeout() {
    let stub = Stub::start(StubBehaviour {
        delay: Duration::from_secs(3),
        ..serving(docx_bytes())
    })
    .await;
    let source = UrlSource::new(stub.download_url(), 1).unwrap();

    match source.fetch().await {
        Err(DwsError::DownloadTimeout { url, secs }) => {
            assert_eq!(url, stub.download_url());
            assert_eq!(secs, 1);
        }
        other => panic!("expected DownloadTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn url_source_empty_body_is_absent() {
    let stub = Stub::start(serving(Vec::new())).await;
    let source = UrlSource::new(stub.download_url(), 5).unwrap();

    assert!(source.fetch().await.unwrap().is_none());
    assert_eq!(stub.downloads().len(), 1);
}

// ── resolve_source ───────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_source_downloads_urls() {
    let stub = Stub::start(serving(docx_bytes())).await;
    let source = resolve_source(&stub.download_url(), 5).unwrap();

    let bytes = source.fetch().await.unwrap().unwrap();

    assert_eq!(bytes.as_slice(), docx_bytes().as_slice());
    assert_eq!(stub.downloads().len(), 1);
}

#[tokio::test]
async fn resolve_source_reads_local_paths() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&docx_bytes()).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let source = resolve_source(&path, 5).unwrap();

    let bytes = source.fetch().await.unwrap().unwrap();
    assert_eq!(bytes.as_slice(), docx_bytes().as_slice());
}

#[tokio::test]
async fn resolve_source_missing_path_is_file_not_found() {
    let source = resolve_source("/no/such/dir/report.docx", 5).unwrap();
    assert!(matches!(
        source.fetch().await,
        Err(DwsError::FileNotFound { .. })
    ));
}
