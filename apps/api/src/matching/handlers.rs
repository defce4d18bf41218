//! Axum route handlers for the competency match API.
//!
//! These relay the engine's fail-soft results: store failures show up as an
//! empty list, `false` or `null`, never as a 5xx.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::engine::{DetailedJobInfo, MappingStats};
use crate::matching::scoring::JobMatch;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub competencies: Vec<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<JobMatch>,
}

#[derive(Debug, Serialize)]
pub struct CompetenciesResponse {
    pub competencies: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct MappingStatusResponse {
    pub exists: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/competencies
pub async fn handle_list_competencies(State(state): State<AppState>) -> Json<CompetenciesResponse> {
    Json(CompetenciesResponse {
        competencies: state.engine.all_competencies(),
    })
}

/// POST /api/v1/matches
///
/// Ranks occupations against the selected competencies.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if request.competencies.iter().all(|c| c.trim().is_empty()) {
        return Err(AppError::Validation(
            "competencies must contain at least one name".to_string(),
        ));
    }

    let matches = state
        .engine
        .match_jobs(&request.competencies, request.limit)
        .await;

    Ok(Json(MatchResponse { matches }))
}

/// GET /api/v1/occupations/:code
pub async fn handle_get_occupation(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DetailedJobInfo>, AppError> {
    state
        .engine
        .detailed_job_info(&code)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Occupation {code} not found")))
}

/// GET /api/v1/mappings/status
pub async fn handle_mapping_status(State(state): State<AppState>) -> Json<MappingStatusResponse> {
    Json(MappingStatusResponse {
        exists: state.engine.mappings_exist().await,
    })
}

/// GET /api/v1/mappings/stats
///
/// `null` when the counts could not be read.
pub async fn handle_mapping_stats(State(state): State<AppState>) -> Json<Option<MappingStats>> {
    Json(state.engine.mapping_stats().await)
}
