pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/competencies",
            get(handlers::handle_list_competencies),
        )
        .route("/api/v1/matches", post(handlers::handle_match))
        .route(
            "/api/v1/occupations/:code",
            get(handlers::handle_get_occupation),
        )
        .route(
            "/api/v1/mappings/status",
            get(handlers::handle_mapping_status),
        )
        .route("/api/v1/mappings/stats", get(handlers::handle_mapping_stats))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::matching::engine::tests::{sample_store, MemoryStore};
    use crate::matching::engine::{LimitMode, MatchEngine};

    fn app(store: MemoryStore) -> Router {
        build_router(AppState {
            engine: Arc::new(MatchEngine::new(Arc::new(store), LimitMode::PostRanking)),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(MemoryStore::default()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_competencies() {
        let (status, body) = send(app(MemoryStore::default()), get("/api/v1/competencies")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["competencies"].as_array().unwrap().len(), 8);
        assert_eq!(body["competencies"][0], "Communication");
    }

    #[tokio::test]
    async fn test_match_endpoint() {
        let request = post_json(
            "/api/v1/matches",
            json!({ "competencies": ["Teamwork", "Technology"], "limit": 5 }),
        );
        let (status, body) = send(app(sample_store()), request).await;
        assert_eq!(status, StatusCode::OK);
        let matches = body["matches"].as_array().unwrap();
        let developer = matches
            .iter()
            .find(|m| m["onetsoc_code"] == "15-1252.00")
            .unwrap();
        assert_eq!(developer["match_score"], 80);
    }

    #[tokio::test]
    async fn test_match_rejects_empty_selection() {
        let request = post_json("/api/v1/matches", json!({ "competencies": [] }));
        let (status, body) = send(app(sample_store()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_store_failure_is_empty_list() {
        let mut store = sample_store();
        store.failing.insert("find_mappings_by_competencies");
        let request = post_json("/api/v1/matches", json!({ "competencies": ["Technology"] }));
        let (status, body) = send(app(store), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matches"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_occupation_is_404() {
        let (status, body) = send(app(sample_store()), get("/api/v1/occupations/99-9999.99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_occupation_detail() {
        let (status, body) = send(app(sample_store()), get("/api/v1/occupations/15-1252.00")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Software Developers");
        assert_eq!(body["top_competencies"][0]["competency_name"], "Technology");
        assert_eq!(body["job_zone"], Value::Null);
    }

    #[tokio::test]
    async fn test_mapping_status_and_stats() {
        let (_, body) = send(app(sample_store()), get("/api/v1/mappings/status")).await;
        assert_eq!(body["exists"], true);

        let (_, body) = send(app(sample_store()), get("/api/v1/mappings/stats")).await;
        assert_eq!(body["totalMappings"], 3);
        assert_eq!(body["coveragePercentage"], 75);
    }

    #[tokio::test]
    async fn test_mapping_stats_null_on_failure() {
        let mut store = sample_store();
        store.failing.insert("count_mappings");
        let (status, body) = send(app(store), get("/api/v1/mappings/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }
}
