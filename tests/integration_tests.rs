use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceExt;

use concierge::config::AppConfig;
use concierge::db;
use concierge::db::seed;
use concierge::handlers;
use concierge::services::catalog::sqlite::SqliteCatalog;
use concierge::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
        llm_provider: "none".to_string(),
        anthropic_api_key: "".to_string(),
        anthropic_model: "".to_string(),
        search_limit: 10,
    }
}

fn test_state() -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    seed::seed_demo_inventory(&conn).unwrap();
    let db = Arc::new(Mutex::new(conn));

    Arc::new(AppState {
        db: Arc::clone(&db),
        config: test_config(),
        catalog: Box::new(SqliteCatalog::new(db)),
        llm: None,
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/search", post(handlers::search::search))
        .route(
            "/api/listings/:category",
            get(handlers::listings::list_category),
        )
        .route("/api/admin/status", get(handlers::admin::get_status))
        .route("/api/admin/seed", post(handlers::admin::seed_inventory))
        .with_state(state)
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn chat(app: &Router, session_id: &str, message: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "/api/chat",
            serde_json::json!({ "session_id": session_id, "message": message }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let app = test_app(test_state());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ── Chat flow ──

#[tokio::test]
async fn test_chat_complete_request_returns_results_immediately() {
    let app = test_app(test_state());
    let body = chat(&app, "s-complete", "Helicopter from Zurich to Milan for 4 passengers").await;

    assert!(body["awaiting"].is_null());
    let total = body["results"]["total_count"].as_u64().unwrap();
    assert!(total >= 1, "expected at least one helicopter, got {total}");
    assert!(body["results"]["by_category"]["helicopter"].is_array());
}

#[tokio::test]
async fn test_chat_slot_filling_asks_in_fixed_order() {
    let app = test_app(test_state());
    let session = "s-slots";

    let body = chat(&app, session, "I need a private jet").await;
    assert_eq!(body["awaiting"], "from");

    let body = chat(&app, session, "Zurich").await;
    assert_eq!(body["awaiting"], "to");

    let body = chat(&app, session, "Milan").await;
    assert_eq!(body["awaiting"], "passengers");

    let body = chat(&app, session, "6").await;
    assert!(body["awaiting"].is_null());
    assert!(body["results"]["total_count"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_chat_direct_intent_bypasses_slot_filling() {
    let app = test_app(test_state());
    let body = chat(&app, "s-direct", "empty legs to Dubai").await;

    assert!(body["awaiting"].is_null());
    assert!(body["results"]["total_count"].as_u64().unwrap() >= 1);
    let legs = body["results"]["by_category"]["empty_leg"].as_array().unwrap();
    assert!(legs
        .iter()
        .any(|leg| leg["subtitle"].as_str().unwrap().contains("Dubai")));
}

#[tokio::test]
async fn test_chat_resets_after_search_dispatch() {
    let app = test_app(test_state());
    let session = "s-reset";

    let body = chat(&app, session, "empty legs to Dubai").await;
    assert!(body["results"]["total_count"].as_u64().unwrap() >= 1);

    // A completed search must not leave slots behind: the next unrelated
    // message starts from scratch instead of short-circuiting.
    let body = chat(&app, session, "hello").await;
    assert!(body["awaiting"].is_null());
    assert!(body["results"].is_null());
}

#[tokio::test]
async fn test_chat_zero_results_files_custom_request() {
    let state = test_state();
    let app = test_app(Arc::clone(&state));

    let body = chat(&app, "s-custom", "yacht to Tromso for 99 passengers").await;
    assert!(body["awaiting"].is_null());
    assert_eq!(body["results"]["total_count"], 0);
    assert!(body["reply"].as_str().unwrap().contains("custom"));

    let db = state.db.lock().unwrap();
    let count: i64 = db
        .query_row("SELECT COUNT(*) FROM custom_requests", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let app = test_app(test_state());
    let response = app
        .oneshot(json_request(
            "/api/chat",
            serde_json::json!({ "session_id": "s-bad", "message": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ── Structured search ──

#[tokio::test]
async fn test_search_endpoint_aggregates_across_categories() {
    let app = test_app(test_state());
    let response = app
        .oneshot(json_request(
            "/api/search",
            serde_json::json!({ "passengers": 4, "location": "Dubai" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    // Seeded Dubai inventory spans empty legs, cars and adventures
    assert!(body["results"]["total_count"].as_u64().unwrap() >= 3);
    assert!(body["failures"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_endpoint_respects_category_subset() {
    let app = test_app(test_state());
    let response = app
        .oneshot(json_request(
            "/api/search",
            serde_json::json!({ "categories": ["car"], "location": "Dubai" }),
        ))
        .await
        .unwrap();
    let body = response_json(response).await;

    let by_category = body["results"]["by_category"].as_object().unwrap();
    assert_eq!(by_category.len(), 1);
    assert!(by_category.contains_key("car"));
}

// ── Listings ──

#[tokio::test]
async fn test_listings_by_category() {
    let app = test_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/listings/jet")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_listings_unknown_category_is_404() {
    let app = test_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/listings/submarine")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ── Admin ──

#[tokio::test]
async fn test_admin_status_requires_token() {
    let app = test_app(test_state());
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/status")
                .header("Authorization", "Bearer test-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["inventory"]["jets"], 3);
}
