//! Route-level tests over an in-process router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use docqa_core::error::Result;
use docqa_core::{SpanScorer, WindowScores, CHAT_NO_INFORMATION, NO_RELEVANT_DOCUMENTS};
use docqa_server::config::ServerConfig;
use docqa_server::state::AppState;
use docqa_server::ApiServer;

/// A scorer that never finds a span. Route tests exercise the HTTP
/// layer; span semantics are covered in the core crate.
struct NoopScorer;

#[async_trait]
impl SpanScorer for NoopScorer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.split_whitespace().map(|_| 1).collect())
    }

    fn decode(&self, _ids: &[u32]) -> Result<String> {
        Ok(String::new())
    }

    fn window_len(&self) -> usize {
        512
    }

    fn special_token_overhead(&self) -> usize {
        3
    }

    async fn score(&self, _question: &str, context: &str) -> Result<WindowScores> {
        let len = self.encode(context)?.len() + 3;
        Ok(WindowScores {
            input_ids: vec![1; len],
            start_scores: vec![f32::NEG_INFINITY; len],
            end_scores: vec![f32::NEG_INFINITY; len],
        })
    }
}

/// A scorer whose forward pass always fails, for the degraded path.
struct FailingScorer;

#[async_trait]
impl SpanScorer for FailingScorer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.split_whitespace().map(|_| 1).collect())
    }

    fn decode(&self, _ids: &[u32]) -> Result<String> {
        Ok(String::new())
    }

    fn window_len(&self) -> usize {
        512
    }

    fn special_token_overhead(&self) -> usize {
        3
    }

    async fn score(&self, _question: &str, _context: &str) -> Result<WindowScores> {
        Err(docqa_core::QaError::Scorer {
            model: "failing".to_string(),
            message: "forward pass failed".to_string(),
        })
    }
}

fn test_router() -> Router {
    let config = ServerConfig::default();
    let state = AppState::new(config.clone(), Arc::new(NoopScorer)).unwrap();
    ApiServer::new(config, state).build_router()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(filename: &str, content: &str) -> Request<Body> {
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn info_endpoint_names_the_service() {
    let response = test_router()
        .oneshot(Request::builder().uri("/api/info").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "docqa-server");
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let response = test_router()
        .oneshot(json_request("POST", "/api/query", json!({"query": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn query_on_empty_store_answers_softly() {
    let response = test_router()
        .oneshot(json_request("POST", "/api/query", json!({"query": "what is a lease?"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["response"], NO_RELEVANT_DOCUMENTS);
    assert_eq!(body["has_answer"], false);
    assert_eq!(body["sources"], json!([]));
}

#[tokio::test]
async fn chat_on_empty_store_returns_fixed_reply() {
    let response = test_router()
        .oneshot(json_request("POST", "/api/chat", json!({"input": "hello there"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["response"], CHAT_NO_INFORMATION);
}

#[tokio::test]
async fn upload_then_manage_document_lifecycle() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(upload_request("lease.txt", "The tenant must give thirty days notice.\n\nRent is due monthly."))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let uploaded = body_json(response).await;
    let id = uploaded["id"].as_str().unwrap().to_string();
    assert_eq!(uploaded["filename"], "lease.txt");
    assert!(id.starts_with("doc_"));

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/api/documents").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing["total_count"], 1);
    assert_eq!(listing["documents"][0]["source"], "lease.txt");

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/documents/{id}/preview"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let preview = body_json(response).await;
    assert_eq!(preview["word_count"], 11);
    assert_eq!(preview["paragraph_count"], 2);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/documents/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder().uri(format!("/api/documents/{id}")).body(Body::empty()).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_upload_ingests_nothing() {
    let router = test_router();

    let response =
        router.clone().oneshot(upload_request("contract.pdf", "%PDF-1.4")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(Request::builder().uri("/api/documents").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing["total_count"], 0);
}

#[tokio::test]
async fn embed_documents_reports_the_batch() {
    let router = test_router();

    let request = json!({
        "documents": [
            {"document": "First document about leases.", "metadata": {"source": "a.txt"}},
            {"document": "Second document about notices.", "metadata": {"source": "b.txt"}},
        ]
    });
    let response =
        router.clone().oneshot(json_request("POST", "/api/embed-documents", request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    assert_eq!(report["total"], 2);
    assert_eq!(report["inserted"], 2);
    assert_eq!(report["failed_batches"], json!([]));

    let response = router
        .oneshot(Request::builder().uri("/api/documents").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing["total_count"], 2);
}

#[tokio::test]
async fn scorer_failure_answers_ok_with_the_displayable_message() {
    let config = ServerConfig::default();
    let state = AppState::new(config.clone(), Arc::new(FailingScorer)).unwrap();
    let router = ApiServer::new(config, state).build_router();

    // Identical stored and query text guarantees retrieval passes the
    // similarity threshold, so the failure comes from the scorer.
    let text = "the notice period is thirty days";
    let ingest = json!({"documents": [{"document": text, "metadata": {"source": "lease.txt"}}]});
    let response =
        router.clone().oneshot(json_request("POST", "/api/embed-documents", ingest)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(json_request("POST", "/api/query", json!({"query": text})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let message = body["response"].as_str().unwrap();
    assert!(
        message.starts_with("Error processing your question:"),
        "unexpected message: {message}"
    );
    assert_eq!(body["has_answer"], false);
    assert_eq!(body["confidence"], 0.0);
    assert_eq!(body["sources"], json!([]));
}

#[tokio::test]
async fn empty_embed_documents_batch_is_rejected() {
    let response = test_router()
        .oneshot(json_request("POST", "/api/embed-documents", json!({"documents": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
