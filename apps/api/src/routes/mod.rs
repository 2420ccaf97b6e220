pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::matching::handlers as matching;
use crate::resumes::handlers as resumes;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;

/// Upload cap. Covers any realistic resume file with room to spare.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload_resume).get(resumes::handle_list_resumes),
        )
        .route("/api/v1/resumes/:id", get(resumes::handle_get_resume))
        // Analysis API
        .route(
            "/api/v1/resumes/:id/analyze",
            post(analysis::handle_analyze_resume),
        )
        .route(
            "/api/v1/resumes/:id/analysis",
            get(analysis::handle_latest_analysis),
        )
        .route("/api/v1/analyses/:id", get(analysis::handle_get_analysis))
        // Job match API
        .route("/api/v1/matches", post(matching::handle_create_match))
        .route("/api/v1/matches/:id", get(matching::handle_get_match))
        .route(
            "/api/v1/matches/:id/gap-responses",
            post(matching::handle_submit_gap_responses),
        )
        .route(
            "/api/v1/matches/:id/tailored-resume",
            post(matching::handle_generate_tailored_resume),
        )
        // Roadmap API
        .route(
            "/api/v1/roadmaps",
            post(roadmap::handle_create_roadmap).get(roadmap::handle_list_roadmaps),
        )
        .route("/api/v1/roadmaps/:id", get(roadmap::handle_get_roadmap))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
