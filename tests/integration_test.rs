//! Integration tests for xv.
//!
//! These tests verify end-to-end functionality including:
//! - Ingesting a data export into `SQLite`
//! - Relationship resolution and display formatting
//! - The web routes, exercised against the real router

use http_body_util::BodyExt;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use xv::config::{AVATAR_DIR, MEDIA_DIR, META_DIR};
use xv::render::Formatter;
use xv::resolve::Resolver;
use xv::server::{router, AppContext};
use xv::translate::build_translator;
use xv::{Config, DataPaths, Ingestor, Storage};

/// Create a data root with a small, fully linked set of documents.
fn create_test_export(dir: &TempDir) -> PathBuf {
    let root = dir.path().to_path_buf();
    fs::create_dir_all(root.join(META_DIR)).unwrap();
    fs::create_dir_all(root.join(MEDIA_DIR)).unwrap();
    fs::create_dir_all(root.join(AVATAR_DIR)).unwrap();

    let alice = serde_json::json!({
        "id": 1, "name": "Alice", "nick": "alice",
        "followers_count": 1200, "friends_count": 300, "statuses_count": 5000,
        "description": "test account",
        "profile_image": "",
    });
    let bob = serde_json::json!({
        "id": 2, "name": "Bob", "nick": "bob",
    });

    write_doc(&root, serde_json::json!({
        "tweet_id": 100,
        "date": "2023-06-15 10:30:00",
        "lang": "en",
        "content": "original tweet with a link http://t.co/abc123 here",
        "favorite_count": 1500,
        "user": alice,
    }));
    write_doc(&root, serde_json::json!({
        "tweet_id": 101,
        "date": "2023-06-16 09:00:00",
        "content": "quoting the original",
        "quote_id": 100,
        "user": bob,
    }));
    write_doc(&root, serde_json::json!({
        "tweet_id": 102,
        "date": "2023-07-01 12:00:00",
        "content": "a reply in the thread",
        "reply_id": 100,
        "conversation_id": 100,
        "user": bob,
    }));
    write_doc(&root, serde_json::json!({
        "tweet_id": 103,
        "date": "2022-01-01 00:00:00",
        "content": "older tweet with media",
        "user": alice,
    }));

    fs::write(root.join(MEDIA_DIR).join("103_1.jpg"), b"jpeg bytes").unwrap();
    fs::write(root.join(MEDIA_DIR).join("103_2.mp4"), b"mp4 bytes").unwrap();
    root
}

fn write_doc(root: &Path, doc: serde_json::Value) {
    let id = doc["tweet_id"].as_i64().unwrap();
    fs::write(
        root.join(META_DIR).join(format!("{id}.json")),
        doc.to_string(),
    )
    .unwrap();
}

fn ingest(root: &Path) -> Storage {
    let mut config = Config::default();
    config.ingest.delay_ms = 0;
    let mut ingestor = Ingestor::new(root, &config).unwrap();
    let report = ingestor.run().unwrap();
    assert_eq!(report.failed, 0);
    Storage::open(DataPaths::new(root).db_path()).unwrap()
}

/// The ingestor uses a blocking HTTP client, so in async tests it runs
/// on its own thread, outside the runtime.
fn ingest_off_runtime(root: &Path) -> Storage {
    let root = root.to_path_buf();
    std::thread::spawn(move || ingest(&root)).join().unwrap()
}

/// Serve a tiny image payload on a local socket, counting requests.
fn image_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            counter.fetch_add(1, Ordering::SeqCst);
            let body = b"image bytes";
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
    });
    (base, hits)
}

fn test_context(root: &Path) -> AppContext {
    let paths = DataPaths::new(root);
    let config = Config::default();
    AppContext {
        storage: Arc::new(Storage::open_existing(paths.db_path()).unwrap()),
        formatter: Formatter::new(paths.avatar_dir()),
        translator: build_translator(&config.translation),
        view: config.view.clone(),
    }
}

#[test]
fn ingest_then_query_round_trip() {
    let dir = TempDir::new().unwrap();
    let root = create_test_export(&dir);
    let storage = ingest(&root);

    assert_eq!(storage.count_tweets().unwrap(), 4);
    assert_eq!(storage.count_users().unwrap(), 2);
    assert_eq!(storage.count_media().unwrap(), 2);

    // newest first
    let timeline = storage.timeline(1, 20).unwrap();
    let ids: Vec<i64> = timeline.iter().map(|t| t.tweet_id).collect();
    assert_eq!(ids, vec![102, 101, 100, 103]);

    // media discovered by filename prefix, sorted
    let with_media = storage.tweet_by_id(103).unwrap().unwrap();
    assert_eq!(with_media.media_files, vec!["103_1.jpg", "103_2.mp4"]);
}

#[test]
fn shared_avatar_url_is_downloaded_once() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    fs::create_dir_all(root.join(META_DIR)).unwrap();
    let (base, hits) = image_server();
    let url = format!("{base}/avatar.png");

    write_doc(
        &root,
        serde_json::json!({
            "tweet_id": 1,
            "date": "2023-01-01 00:00:00",
            "user": {"id": 1, "nick": "alice", "profile_image": url},
        }),
    );
    write_doc(
        &root,
        serde_json::json!({
            "tweet_id": 2,
            "date": "2023-01-02 00:00:00",
            "user": {"id": 2, "nick": "bob", "profile_image": url},
        }),
    );
    ingest(&root);

    // keyed by URL hash, not by user id
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    let avatars = DataPaths::new(&root).avatar_dir();
    assert!(avatars.join("avatar_1.png").exists());
    // the second user shares the ledger entry and keeps no local copy
    assert!(!avatars.join("avatar_2.png").exists());
}

#[test]
fn reingest_downloads_nothing_for_ledgered_urls() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    fs::create_dir_all(root.join(META_DIR)).unwrap();
    let (base, hits) = image_server();

    write_doc(
        &root,
        serde_json::json!({
            "tweet_id": 1,
            "date": "2023-01-01 00:00:00",
            "user": {
                "id": 1, "nick": "alice",
                "profile_image": format!("{base}/face.jpg"),
                "profile_banner": format!("{base}/banner.jpg"),
            },
        }),
    );
    ingest(&root);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // a fresh run reloads the ledger from disk and fetches nothing
    ingest(&root);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn resolution_attaches_relations_both_ways() {
    let dir = TempDir::new().unwrap();
    let root = create_test_export(&dir);
    let storage = ingest(&root);
    let resolver = Resolver::new(&storage);

    // forward: the quoting tweet embeds its target
    let quoting = resolver
        .resolve(storage.tweet_by_id(101).unwrap().unwrap())
        .unwrap();
    assert_eq!(quoting.quote.as_ref().map(|t| t.tweet_id), Some(100));

    // reverse: the original picks up its first quoter and replier
    let original = resolver
        .resolve(storage.tweet_by_id(100).unwrap().unwrap())
        .unwrap();
    assert_eq!(original.quoted_by.as_ref().map(|t| t.tweet_id), Some(101));
    assert_eq!(original.replied_by.as_ref().map(|t| t.tweet_id), Some(102));
}

#[test]
fn formatting_produces_local_paths_and_markup() {
    let dir = TempDir::new().unwrap();
    let root = create_test_export(&dir);
    let storage = ingest(&root);
    let paths = DataPaths::new(&root);

    let formatter = Formatter::new(paths.avatar_dir());
    let resolver = Resolver::new(&storage);
    let mut view = resolver
        .resolve(storage.tweet_by_id(103).unwrap().unwrap())
        .unwrap();
    formatter.apply_view(&mut view);

    assert_eq!(
        view.tweet.media_files,
        vec!["img/103_1.jpg", "img/103_2.mp4"]
    );
    // no cached avatar file, so the placeholder is used
    assert!(view
        .tweet
        .user_avatar
        .as_deref()
        .is_some_and(|a| a.contains("placeholder")));
}

#[tokio::test]
async fn web_pages_render() {
    let dir = TempDir::new().unwrap();
    let root = create_test_export(&dir);
    drop(ingest_off_runtime(&root));
    let app = router(test_context(&root), &DataPaths::new(&root));

    for (uri, marker) in [
        ("/", "original tweet"),
        ("/user/1", "@alice"),
        ("/tweet/100", "view link"),
        ("/search?q=thread", "a reply in the thread"),
        ("/search?year=2022", "older tweet"),
        ("/stats", "Most active users"),
    ] {
        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "GET {uri}");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains(marker), "GET {uri} missing {marker:?}");
    }
}

#[tokio::test]
async fn missing_tweet_returns_404_page() {
    let dir = TempDir::new().unwrap();
    let root = create_test_export(&dir);
    drop(ingest_off_runtime(&root));
    let app = router(test_context(&root), &DataPaths::new(&root));

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/tweet/999999")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&body).contains("Not found"));
}

#[tokio::test]
async fn media_api_returns_fragment_and_total() {
    let dir = TempDir::new().unwrap();
    let root = create_test_export(&dir);
    drop(ingest_off_runtime(&root));
    let app = router(test_context(&root), &DataPaths::new(&root));

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/user/1/media?page=1")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 1);
    assert!(json["html"].as_str().unwrap().contains("img/103_1.jpg"));
}

#[tokio::test]
async fn translate_api_fails_cleanly_without_key() {
    let dir = TempDir::new().unwrap();
    let root = create_test_export(&dir);
    drop(ingest_off_runtime(&root));
    let app = router(test_context(&root), &DataPaths::new(&root));

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/translate")
                .header("content-type", "application/json")
                .body(axum::body::Body::from(
                    serde_json::json!({"content": "hello", "target_lang": "ja"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn languages_api_lists_supported_codes() {
    let dir = TempDir::new().unwrap();
    let root = create_test_export(&dir);
    drop(ingest_off_runtime(&root));
    let app = router(test_context(&root), &DataPaths::new(&root));

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/languages")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["languages"].as_object().unwrap().len(), 12);
    assert_eq!(json["languages"]["ja"], "日本語");
}
