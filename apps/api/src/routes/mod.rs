pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::pages::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Settings
        .route(
            "/api/v1/settings",
            get(handlers::handle_get_settings).patch(handlers::handle_update_setting),
        )
        .route("/api/v1/settings/reset", post(handlers::handle_reset_settings))
        // Error boundaries
        .route("/api/v1/boundaries", get(handlers::handle_boundary_states))
        .route("/api/v1/boundaries/reset", post(handlers::handle_reset_boundary))
        // Interviews
        .route(
            "/api/v1/interviews",
            get(handlers::handle_interviews_page).post(handlers::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            patch(handlers::handle_update_interview).delete(handlers::handle_delete_interview),
        )
        // Questions
        .route(
            "/api/v1/interviews/:id/questions",
            get(handlers::handle_questions_page).post(handlers::handle_add_question),
        )
        .route(
            "/api/v1/interviews/:id/questions/generate",
            post(handlers::handle_generate_questions),
        )
        .route(
            "/api/v1/questions/:id",
            patch(handlers::handle_update_question).delete(handlers::handle_delete_question),
        )
        // Applicants
        .route(
            "/api/v1/interviews/:id/applicants",
            get(handlers::handle_applicants_page).post(handlers::handle_add_applicant),
        )
        .route(
            "/api/v1/applicants/:id",
            patch(handlers::handle_update_applicant).delete(handlers::handle_delete_applicant),
        )
        // Taking an interview
        .route("/api/v1/applicants/:id/take", get(handlers::handle_take_page))
        .route("/api/v1/applicants/:id/answers", post(handlers::handle_submit_answer))
        .route(
            "/api/v1/answers/:id",
            patch(handlers::handle_update_answer).delete(handlers::handle_delete_answer),
        )
        .route(
            "/api/v1/applicants/:id/complete",
            post(handlers::handle_complete_interview),
        )
        // Feedback
        .route(
            "/api/v1/interviews/:interview_id/applicants/:applicant_id/feedback",
            get(handlers::handle_feedback_page),
        )
        .with_state(state)
}
