//! Integration tests for the Lectern API.
//!
//! Exercises both pipelines end-to-end through the router with mock
//! services: fixture HTML in place of a live headless render, deterministic
//! embeddings, an in-memory index, and scripted completions. Each test is
//! independent with its own state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use lectern_api::create_router;
use lectern_api::handlers::{HealthResponse, SubmitLinkResponse};
use lectern_api::state::AppState;
use lectern_providers::{
    EmbeddingService, InMemoryIndex, MockEmbedding, MockGeneration, VectorIndex,
};
use lectern_rag::{IngestPipeline, QueryPipeline};
use lectern_scrape::{FixtureRenderer, PageRenderer};

// =============================================================================
// Helpers
// =============================================================================

const JANE_HTML: &str = r##"
    <html><body>
      <div class="NameTitle__Name-dowf0z-0">
        <span>Jane</span>
        <span class="NameTitle__LastNameWrapper-dowf0z-2">Doe"</span>
      </div>
      <div class="NameTitle__Title-dowf0z-1">
        <a class="TeacherDepartment__StyledDepartmentLink-fl79e8-0 iMmVHb" href="#">
          <b>Computer Science department</b>
        </a>
      </div>
      <div class="RatingValue__Numerator-qw8sqy-2">4.5</div>
    </body></html>
"##;

struct TestHarness {
    index: Arc<InMemoryIndex>,
    generator: Arc<MockGeneration>,
    state: AppState,
}

/// Build a full AppState around mock services.
fn make_harness(renderer: FixtureRenderer, chunks: Vec<&str>) -> TestHarness {
    let index = Arc::new(InMemoryIndex::new());
    let embedder = Arc::new(MockEmbedding::new());
    let generator = Arc::new(MockGeneration::new(chunks));

    let ingest = IngestPipeline::new(
        Arc::new(renderer) as Arc<dyn PageRenderer>,
        Arc::clone(&embedder) as Arc<dyn EmbeddingService>,
        Arc::clone(&index) as Arc<dyn VectorIndex>,
    );
    let query = QueryPipeline::new(
        Arc::clone(&embedder) as Arc<dyn EmbeddingService>,
        Arc::clone(&index) as Arc<dyn VectorIndex>,
        Arc::clone(&generator) as Arc<dyn lectern_providers::GenerationService>,
    );

    TestHarness {
        index,
        generator,
        state: AppState::new(ingest, query),
    }
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

// =============================================================================
// Ingestion pipeline
// =============================================================================

#[tokio::test]
async fn test_submit_link_ingests_professor() {
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec![]);
    let app = create_router(harness.state.clone());

    let resp = app
        .oneshot(post_json(
            "/api/submit-link",
            r#"{"link":"https://example.com/prof123"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let parsed: SubmitLinkResponse =
        serde_json::from_str(&body_string(resp).await).unwrap();
    assert!(parsed.success);

    let meta = harness.index.get("Jane Doe").unwrap();
    assert_eq!(meta.name, "Jane Doe");
    assert_eq!(meta.subject, "Computer Science");
    assert_eq!(meta.stars, "4.5");
    assert_eq!(meta.url, "https://example.com/prof123");
}

#[tokio::test]
async fn test_submit_link_extraction_failure_makes_no_upsert() {
    let harness = make_harness(
        FixtureRenderer::new("<html><body>nothing here</body></html>"),
        vec![],
    );
    let app = create_router(harness.state.clone());

    let resp = app
        .oneshot(post_json(
            "/api/submit-link",
            r#"{"link":"https://example.com/prof123"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let parsed: SubmitLinkResponse =
        serde_json::from_str(&body_string(resp).await).unwrap();
    assert!(!parsed.success);
    assert!(parsed.message.is_some());
    assert_eq!(harness.index.len(), 0);
}

#[tokio::test]
async fn test_resubmit_overwrites_single_record() {
    // First snapshot of the page.
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec![]);
    let app = create_router(harness.state.clone());
    let resp = app
        .oneshot(post_json(
            "/api/submit-link",
            r#"{"link":"https://example.com/prof123"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Second snapshot with a different rating, same professor name, against
    // the same index.
    let updated = JANE_HTML.replace("4.5", "3.9");
    let embedder = Arc::new(MockEmbedding::new());
    let ingest = IngestPipeline::new(
        Arc::new(FixtureRenderer::new(updated)) as Arc<dyn PageRenderer>,
        Arc::clone(&embedder) as Arc<dyn EmbeddingService>,
        Arc::clone(&harness.index) as Arc<dyn VectorIndex>,
    );
    let query = QueryPipeline::new(
        embedder,
        Arc::clone(&harness.index) as Arc<dyn VectorIndex>,
        Arc::new(MockGeneration::new(vec![])),
    );
    let app2 = create_router(AppState::new(ingest, query));
    let resp2 = app2
        .oneshot(post_json(
            "/api/submit-link",
            r#"{"link":"https://example.com/prof123"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp2.status(), StatusCode::OK);

    assert_eq!(harness.index.len(), 1);
    assert_eq!(harness.index.get("Jane Doe").unwrap().stars, "3.9");
}

#[tokio::test]
async fn test_submit_link_missing_body_field_is_client_error() {
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec![]);
    let app = create_router(harness.state);

    let resp = app
        .oneshot(post_json("/api/submit-link", r#"{"url":"wrong-key"}"#))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

// =============================================================================
// Query pipeline
// =============================================================================

#[tokio::test]
async fn test_chat_streams_completion_text() {
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec!["Try ", "Jane Doe."]);

    // Seed the index through the real ingestion path.
    let app = create_router(harness.state.clone());
    app.oneshot(post_json(
        "/api/submit-link",
        r#"{"link":"https://example.com/prof123"}"#,
    ))
    .await
    .unwrap();

    let app = create_router(harness.state.clone());
    let resp = app
        .oneshot(post_json(
            "/api/chat",
            r#"[{"role":"user","content":"Who teaches algorithms well?"}]"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "Try Jane Doe.");

    // The generator saw system + the single augmented user turn.
    let sent = harness.generator.last_messages().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].content.starts_with("Who teaches algorithms well?"));
    assert!(sent[1].content.contains("Professor: Jane Doe"));
    assert!(sent[1].content.contains("Stars: 4.5"));
}

#[tokio::test]
async fn test_chat_prior_turns_pass_through_unmodified() {
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec!["ok"]);
    let app = create_router(harness.state.clone());

    let resp = app
        .oneshot(post_json(
            "/api/chat",
            r#"[
                {"role":"user","content":"hello"},
                {"role":"assistant","content":"hi there"},
                {"role":"user","content":"recommend someone"}
            ]"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let sent = harness.generator.last_messages().unwrap();
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[1].content, "hello");
    assert_eq!(sent[2].content, "hi there");
    assert!(sent[3].content.starts_with("recommend someone"));
}

#[tokio::test]
async fn test_chat_empty_chunks_emit_nothing() {
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec!["A", "", "B"]);
    let app = create_router(harness.state);

    let resp = app
        .oneshot(post_json(
            "/api/chat",
            r#"[{"role":"user","content":"anything"}]"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "AB");
}

#[tokio::test]
async fn test_chat_empty_array_is_400() {
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec![]);
    let app = create_router(harness.state);

    let resp = app.oneshot(post_json("/api/chat", "[]")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_invalid_body_is_client_error() {
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec![]);
    let app = create_router(harness.state);

    let resp = app
        .oneshot(post_json("/api/chat", r#"{"not":"an array"}"#))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let harness = make_harness(FixtureRenderer::new(JANE_HTML), vec![]);
    let app = create_router(harness.state);

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
}
