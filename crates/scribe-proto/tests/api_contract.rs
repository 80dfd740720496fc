//! API client contract tests against an in-process stub backend.
//!
//! The stub speaks the documented HTTP contract (`/api/transcriptions`,
//! `/api/transcribe`, `/api/search?q=`) so these tests pin down exactly what
//! the client sends and how it normalizes failures.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use scribe_proto::api::{ApiClient, FETCH_FALLBACK, SEARCH_FALLBACK, UPLOAD_FALLBACK};
use scribe_proto::record::TranscriptionRecord;

fn sample_records() -> Vec<TranscriptionRecord> {
    vec![
        TranscriptionRecord {
            id: 1,
            file_name: "test.wav".to_string(),
            transcription: "Test transcription".to_string(),
            created_at: "2024-03-19T12:00:00".to_string(),
        },
        TranscriptionRecord {
            id: 2,
            file_name: "meeting.mp3".to_string(),
            transcription: "Quarterly planning notes".to_string(),
            created_at: "2024-03-20T09:30:00".to_string(),
        },
    ]
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    addr
}

fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(&format!("http://{addr}"))
}

#[tokio::test]
async fn list_all_returns_the_full_collection() {
    let router = Router::new().route(
        "/api/transcriptions",
        get(|| async { Json(sample_records()) }),
    );
    let client = client_for(serve(router).await);

    let outcome = client.list_all().await;
    assert!(outcome.is_ok(), "unexpected error: {:?}", outcome.error);
    assert_eq!(outcome.data, sample_records());
}

#[tokio::test]
async fn empty_query_short_circuits_to_list_all() {
    let search_hits = Arc::new(AtomicUsize::new(0));
    let hits = search_hits.clone();
    let router = Router::new()
        .route(
            "/api/transcriptions",
            get(|| async { Json(sample_records()) }),
        )
        .route(
            "/api/search",
            get(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                async { Json(Vec::<TranscriptionRecord>::new()) }
            }),
        );
    let client = client_for(serve(router).await);

    let listed = client.list_all().await;
    let searched = client.search("").await;
    assert_eq!(searched.data, listed.data);
    assert!(searched.is_ok());
    assert_eq!(
        search_hits.load(Ordering::SeqCst),
        0,
        "empty query must never hit the search endpoint"
    );
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

#[tokio::test]
async fn search_sends_the_query_as_q() {
    let router = Router::new().route(
        "/api/search",
        get(|Query(params): Query<SearchParams>| async move {
            assert_eq!(params.q, "quarterly planning");
            let matched: Vec<TranscriptionRecord> = sample_records()
                .into_iter()
                .filter(|r| r.transcription.to_lowercase().contains("quarterly"))
                .collect();
            Json(matched)
        }),
    );
    let client = client_for(serve(router).await);

    let outcome = client.search("quarterly planning").await;
    assert!(outcome.is_ok());
    assert_eq!(outcome.data.len(), 1);
    assert_eq!(outcome.data[0].id, 2);
}

#[tokio::test]
async fn upload_posts_a_single_multipart_file_part() {
    async fn transcribe(mut multipart: Multipart) -> Json<serde_json::Value> {
        let field = multipart
            .next_field()
            .await
            .expect("read multipart")
            .expect("one part expected");
        assert_eq!(field.name(), Some("file"));
        assert_eq!(field.file_name(), Some("clip.wav"));
        assert_eq!(field.content_type(), Some("audio/wav"));
        let bytes = field.bytes().await.expect("part bytes");
        assert_eq!(&bytes[..], b"RIFF-not-really-audio");
        assert!(
            multipart.next_field().await.expect("end of parts").is_none(),
            "exactly one part expected"
        );
        Json(json!({
            "message": "File transcribed successfully",
            "file_name": "clip.wav",
            "transcription": "hello from the stub"
        }))
    }

    let router = Router::new().route("/api/transcribe", post(transcribe));
    let client = client_for(serve(router).await);

    // The part's file_name is pinned above, so the fixture keeps its real
    // name and a per-test directory avoids collisions instead.
    let dir = std::env::temp_dir().join(format!("scribe-upload-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("fixture dir");
    let path = dir.join("clip.wav");
    std::fs::write(&path, b"RIFF-not-really-audio").expect("write fixture");

    let outcome = client.upload(&path).await;
    let _ = std::fs::remove_dir_all(&dir);

    assert!(outcome.is_ok(), "unexpected error: {:?}", outcome.error);
    let reply = outcome.data.expect("upload reply");
    assert_eq!(reply.file_name, "clip.wav");
    assert_eq!(reply.transcription, "hello from the stub");
}

#[tokio::test]
async fn structured_error_body_is_surfaced_verbatim() {
    let router = Router::new().route(
        "/api/transcribe",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Transcription failed"})),
            )
        }),
    );
    let client = client_for(serve(router).await);

    let path = std::env::temp_dir().join(format!("scribe-err-{}.wav", std::process::id()));
    std::fs::write(&path, b"x").expect("write fixture");
    let outcome = client.upload(&path).await;
    let _ = std::fs::remove_file(&path);

    assert_eq!(outcome.error.as_deref(), Some("Transcription failed"));
    assert!(outcome.data.is_none());
}

#[tokio::test]
async fn unstructured_failure_uses_the_operation_fallback() {
    let router = Router::new()
        .route(
            "/api/transcriptions",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/api/search",
            get(|| async { (StatusCode::BAD_GATEWAY, "boom") }),
        );
    let client = client_for(serve(router).await);

    let listed = client.list_all().await;
    assert_eq!(listed.error.as_deref(), Some(FETCH_FALLBACK));
    assert!(listed.data.is_empty());

    let searched = client.search("anything").await;
    assert_eq!(searched.error.as_deref(), Some(SEARCH_FALLBACK));
    assert!(searched.data.is_empty());
}

#[tokio::test]
async fn transport_failure_uses_the_operation_fallback() {
    // Bind then drop a listener so the port is known-closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = client_for(addr);

    let listed = client.list_all().await;
    assert_eq!(listed.error.as_deref(), Some(FETCH_FALLBACK));
    assert!(listed.data.is_empty());

    let path = std::env::temp_dir().join(format!("scribe-noconn-{}.wav", std::process::id()));
    std::fs::write(&path, b"x").expect("write fixture");
    let uploaded = client.upload(&path).await;
    let _ = std::fs::remove_file(&path);
    assert_eq!(uploaded.error.as_deref(), Some(UPLOAD_FALLBACK));
    assert!(uploaded.data.is_none());
}

#[tokio::test]
async fn missing_upload_file_reports_the_fallback_without_a_request() {
    // No server at all: a local read failure must short-circuit into the
    // same outcome shape.
    let client = ApiClient::new("http://127.0.0.1:1");
    let outcome = client
        .upload(std::path::Path::new("/definitely/not/here.wav"))
        .await;
    assert_eq!(outcome.error.as_deref(), Some(UPLOAD_FALLBACK));
    assert!(outcome.data.is_none());
}
