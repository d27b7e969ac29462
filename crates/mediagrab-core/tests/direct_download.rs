//! Integration tests: direct media downloads against a local HTTP server.

mod common;

use common::media_server::{self, ContentLength, ServerOptions};
use mediagrab_core::config::GrabConfig;
use mediagrab_core::direct::{fetch_direct, DirectOptions};
use mediagrab_core::extractor::YtDlp;
use mediagrab_core::{Downloader, FetchError};
use tempfile::tempdir;

fn body(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}

#[test]
fn download_matches_declared_length() {
    let body = body(3 * 1024 * 1024 + 17);
    let base = media_server::start(body.clone());
    let dir = tempdir().unwrap();

    let url = format!("{}/media/clip.mp4", base);
    let path = fetch_direct(&url, dir.path(), &DirectOptions::default()).expect("download");

    assert_eq!(path, dir.path().join("clip.mp4"));
    let content = std::fs::read(&path).unwrap();
    assert_eq!(content.len(), body.len(), "file size must match Content-Length");
    assert_eq!(content, body);
}

#[test]
fn download_without_content_length() {
    let body = body(200 * 1024);
    let base = media_server::start_with_options(
        body.clone(),
        ServerOptions {
            content_length: ContentLength::Omit,
            ..Default::default()
        },
    );
    let dir = tempdir().unwrap();

    let url = format!("{}/song.mp3", base);
    let path = fetch_direct(&url, dir.path(), &DirectOptions::default()).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

#[test]
fn empty_body_creates_empty_file() {
    let base = media_server::start(Vec::new());
    let dir = tempdir().unwrap();

    let url = format!("{}/empty.wav", base);
    let path = fetch_direct(&url, dir.path(), &DirectOptions::default()).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn http_error_leaves_no_file() {
    let base = media_server::start_with_options(
        b"<html>not found</html>".to_vec(),
        ServerOptions {
            status: "404 Not Found",
            ..Default::default()
        },
    );
    let dir = tempdir().unwrap();

    let err = fetch_direct(&format!("{}/missing.mp4", base), dir.path(), &DirectOptions::default())
        .unwrap_err();
    match err {
        FetchError::Http { code, .. } => assert_eq!(code, 404),
        other => panic!("expected HTTP error, got {:?}", other),
    }
    assert!(!dir.path().join("missing.mp4").exists());
}

#[test]
fn truncated_body_is_rejected_and_removed() {
    let base = media_server::start_with_options(
        body(4096),
        ServerOptions {
            content_length: ContentLength::Declared(10_000),
            ..Default::default()
        },
    );
    let dir = tempdir().unwrap();

    let err = fetch_direct(&format!("{}/short.mkv", base), dir.path(), &DirectOptions::default())
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Curl(_) | FetchError::PartialTransfer { .. }),
        "unexpected error: {:?}",
        err
    );
    assert!(!dir.path().join("short.mkv").exists());
}

#[test]
fn redirect_is_followed_and_named_after_request_url() {
    let body = body(10_000);
    let target = media_server::start(body.clone());
    let redirector = media_server::start_with_options(
        Vec::new(),
        ServerOptions {
            redirect_to: Some(format!("{}/cdn/abc123.bin", target)),
            ..Default::default()
        },
    );
    let dir = tempdir().unwrap();

    let url = format!("{}/watch/clip.mov", redirector);
    let path = fetch_direct(&url, dir.path(), &DirectOptions::default()).unwrap();
    assert_eq!(path, dir.path().join("clip.mov"));
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

#[test]
fn url_without_basename_uses_default_name() {
    let base = media_server::start(b"abc".to_vec());
    let dir = tempdir().unwrap();

    let path = fetch_direct(&format!("{}/", base), dir.path(), &DirectOptions::default()).unwrap();
    assert_eq!(path, dir.path().join("downloaded_file.mp4"));
}

#[test]
fn pipeline_downloads_direct_url_into_new_directory() {
    let body = body(64 * 1024);
    let base = media_server::start(body.clone());
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("output");

    let cfg = GrabConfig::default();
    let downloader = Downloader::with_backend(&cfg, Box::new(YtDlp::new(cfg.extractor.clone())));
    let path = downloader
        .download(&format!("{}/clip.mp4", base), &out)
        .expect("direct download through pipeline");

    assert_eq!(path, out.join("clip.mp4"));
    assert_eq!(std::fs::read(&path).unwrap().len(), body.len());
}

#[test]
fn unreachable_host_returns_none() {
    let tmp = tempdir().unwrap();
    let downloader = Downloader::new(&GrabConfig::default());

    assert_eq!(downloader.download("http://127.0.0.1:1/x.mp4", tmp.path()), None);
    assert!(!tmp.path().join("x.mp4").exists());
}
