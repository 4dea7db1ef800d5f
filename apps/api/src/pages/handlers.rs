//! Axum route handlers for the page API.
//!
//! Page loads and the AI question workflow run through `run_mounted`. Each
//! page view is loaded and rendered inside its own error boundary.

use std::collections::BTreeMap;
use std::future::Future;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::boundary::{BoundaryState, ErrorBoundary, RenderFault};
use crate::errors::AppError;
use crate::models::answer::Answer;
use crate::models::applicant::Applicant;
use crate::models::interview::{Interview, NewInterview};
use crate::models::question::Question;
use crate::pages::applicants::{self, ApplicantInput};
use crate::pages::mount::run_mounted;
use crate::pages::questions::{self, GenerationResult, QuestionInput};
use crate::pages::take::{self, AnswerEdit, AnswerInput};
use crate::pages::{feedback, interviews};
use crate::settings::Settings;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetSettingsRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResetViewRequest {
    pub view: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Loads a page view and renders it inside that view's error boundary.
///
/// Every attempt runs `load` again. Backend, not-found and AI errors are page
/// state and come back as they are; only render faults are retried. A view
/// whose boundary gives up keeps serving its fallback until reset.
async fn render_page<T, F, Fut>(
    state: &AppState,
    label: &'static str,
    view: String,
    load: F,
) -> Result<Json<Value>, AppError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    if let Some(fallback) = state.boundaries.fallback_for(&view) {
        return Err(AppError::Render(fallback));
    }

    let mut boundary = ErrorBoundary::new(&view).with_reporter(state.fault_reporter.clone());
    let rendered = boundary
        .run(|| {
            let page = run_mounted(label, load());
            async move {
                match page.await {
                    Ok(page) => serde_json::to_value(&page).map(Ok).map_err(RenderFault::from),
                    Err(e) => Ok(Err(e)),
                }
            }
        })
        .await;

    match rendered {
        Ok(page) => page.map(Json),
        Err(fallback) => {
            state.boundaries.trip(boundary);
            Err(AppError::Render(fallback))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings.current())
}

/// PATCH /api/v1/settings
pub async fn handle_update_setting(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingRequest>,
) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.settings.update_setting(&request.key, &request.value)?))
}

/// POST /api/v1/settings/reset
pub async fn handle_reset_settings(
    State(state): State<AppState>,
    Json(request): Json<ResetSettingsRequest>,
) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.settings.reset_settings(request.confirm)?))
}

// ────────────────────────────────────────────────────────────────────────────
// Error boundaries
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/boundaries
pub async fn handle_boundary_states(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, BoundaryState>> {
    Json(state.boundaries.states())
}

/// POST /api/v1/boundaries/reset
pub async fn handle_reset_boundary(
    State(state): State<AppState>,
    Json(request): Json<ResetViewRequest>,
) -> Json<BoundaryState> {
    Json(state.boundaries.reset(&request.view))
}

// ────────────────────────────────────────────────────────────────────────────
// Interviews
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interviews
pub async fn handle_interviews_page(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let settings = state.settings.current();
    let s = state.clone();
    render_page(&state, "interviews page", "interviews".to_string(), move || {
        let s = s.clone();
        async move { interviews::load_interviews_page(s.rest.as_ref(), &settings).await }
    })
    .await
}

/// POST /api/v1/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    Json(request): Json<NewInterview>,
) -> Result<(StatusCode, Json<Interview>), AppError> {
    let created = interviews::create_interview(state.rest.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<NewInterview>,
) -> Result<Json<Interview>, AppError> {
    Ok(Json(interviews::update_interview(state.rest.as_ref(), id, request).await?))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    interviews::delete_interview(state.rest.as_ref(), &state.provenance, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Questions
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interviews/:id/questions
pub async fn handle_questions_page(
    State(state): State<AppState>,
    Path(interview_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let settings = state.settings.current();
    let s = state.clone();
    let view = format!("questions/{interview_id}");
    render_page(&state, "questions page", view, move || {
        let s = s.clone();
        async move {
            questions::load_questions_page(s.rest.as_ref(), &s.provenance, &settings, interview_id)
                .await
        }
    })
    .await
}

/// POST /api/v1/interviews/:id/questions
pub async fn handle_add_question(
    State(state): State<AppState>,
    Path(interview_id): Path<i64>,
    Json(request): Json<QuestionInput>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    let created = questions::add_question(state.rest.as_ref(), interview_id, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/v1/interviews/:id/questions/generate
///
/// Drafts questions with the AI, saves them one by one, and returns the
/// refreshed page plus a full/partial/none report. The save loop runs once and
/// finishes even if the client disconnects; only the refresh is retried.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Path(interview_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let settings = state.settings.current();
    let s = state.clone();
    let report = run_mounted("question generation", async move {
        questions::generate_and_save(s.rest.as_ref(), s.ai.as_ref(), &s.provenance, interview_id)
            .await
    })
    .await?;

    let s = state.clone();
    let view = format!("questions/{interview_id}");
    render_page(&state, "questions page", view, move || {
        let s = s.clone();
        let report = report.clone();
        async move {
            let page =
                questions::load_questions_page(s.rest.as_ref(), &s.provenance, &settings, interview_id)
                    .await?;
            Ok::<_, AppError>(GenerationResult { report, page })
        }
    })
    .await
}

/// PATCH /api/v1/questions/:id
pub async fn handle_update_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<QuestionInput>,
) -> Result<Json<Question>, AppError> {
    Ok(Json(questions::edit_question(state.rest.as_ref(), id, request).await?))
}

/// DELETE /api/v1/questions/:id
pub async fn handle_delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    questions::remove_question(state.rest.as_ref(), &state.provenance, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Applicants
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interviews/:id/applicants
pub async fn handle_applicants_page(
    State(state): State<AppState>,
    Path(interview_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let settings = state.settings.current();
    let s = state.clone();
    let view = format!("applicants/{interview_id}");
    render_page(&state, "applicants page", view, move || {
        let s = s.clone();
        async move { applicants::load_applicants_page(s.rest.as_ref(), &settings, interview_id).await }
    })
    .await
}

/// POST /api/v1/interviews/:id/applicants
pub async fn handle_add_applicant(
    State(state): State<AppState>,
    Path(interview_id): Path<i64>,
    Json(request): Json<ApplicantInput>,
) -> Result<(StatusCode, Json<Applicant>), AppError> {
    let created = applicants::add_applicant(state.rest.as_ref(), interview_id, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/applicants/:id
pub async fn handle_update_applicant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ApplicantInput>,
) -> Result<Json<Applicant>, AppError> {
    Ok(Json(applicants::edit_applicant(state.rest.as_ref(), id, request).await?))
}

/// DELETE /api/v1/applicants/:id
pub async fn handle_delete_applicant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    applicants::remove_applicant(state.rest.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Taking an interview
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/applicants/:id/take
pub async fn handle_take_page(
    State(state): State<AppState>,
    Path(applicant_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let settings = state.settings.current();
    let s = state.clone();
    let view = format!("take/{applicant_id}");
    render_page(&state, "take interview page", view, move || {
        let s = s.clone();
        async move { take::load_take_page(s.rest.as_ref(), &settings, applicant_id).await }
    })
    .await
}

/// POST /api/v1/applicants/:id/answers
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(applicant_id): Path<i64>,
    Json(request): Json<AnswerInput>,
) -> Result<(StatusCode, Json<Answer>), AppError> {
    let answer = take::submit_answer(state.rest.as_ref(), applicant_id, request).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

/// PATCH /api/v1/answers/:id
pub async fn handle_update_answer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AnswerEdit>,
) -> Result<Json<Answer>, AppError> {
    Ok(Json(take::edit_answer(state.rest.as_ref(), id, request).await?))
}

/// DELETE /api/v1/answers/:id
pub async fn handle_delete_answer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    take::remove_answer(state.rest.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/applicants/:id/complete
pub async fn handle_complete_interview(
    State(state): State<AppState>,
    Path(applicant_id): Path<i64>,
) -> Result<Json<Applicant>, AppError> {
    Ok(Json(take::complete_interview(state.rest.as_ref(), applicant_id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Feedback
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interviews/:interview_id/applicants/:applicant_id/feedback
pub async fn handle_feedback_page(
    State(state): State<AppState>,
    Path((interview_id, applicant_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    let settings = state.settings.current();
    let s = state.clone();
    let view = format!("feedback/{interview_id}/{applicant_id}");
    render_page(&state, "feedback page", view, move || {
        let s = s.clone();
        async move {
            feedback::load_feedback_page(
                s.rest.as_ref(),
                s.ai.as_ref(),
                &settings,
                interview_id,
                applicant_id,
            )
            .await
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::Instant;

    use crate::testing::{app_state, FakeRest};

    /// Serializes only once the data behind it is ready.
    struct Flaky(bool);

    impl Serialize for Flaky {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.0 {
                return Err(serde::ser::Error::custom("view not ready"));
            }
            serializer.serialize_str("ready")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_reloads_the_page_and_recovers() {
        let state = app_state(Arc::new(FakeRest::new()));
        let loads = Arc::new(AtomicU32::new(0));
        let counter = loads.clone();
        let start = Instant::now();

        let Json(body) = render_page(&state, "questions page", "questions/1".to_string(), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, AppError>(Flaky(n < 2)) }
        })
        .await
        .unwrap();

        assert_eq!(body, json!("ready"));
        assert_eq!(loads.load(Ordering::SeqCst), 3);
        // 1s + 2s
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert!(state.boundaries.states().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_view_stays_tripped_until_reset() {
        let state = app_state(Arc::new(FakeRest::new()));
        let broken = Arc::new(AtomicBool::new(true));
        let loads = Arc::new(AtomicU32::new(0));
        let loader = || {
            let broken = broken.clone();
            let loads = loads.clone();
            move || {
                loads.fetch_add(1, Ordering::SeqCst);
                let fail = broken.load(Ordering::SeqCst);
                async move { Ok::<_, AppError>(Flaky(fail)) }
            }
        };
        let view = || "feedback/1/2".to_string();

        let err = render_page(&state, "feedback page", view(), loader()).await.unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
        assert_eq!(loads.load(Ordering::SeqCst), 4);

        // Served from the tripped boundary without loading again.
        let err = render_page(&state, "feedback page", view(), loader()).await.unwrap_err();
        match err {
            AppError::Render(fallback) => assert_eq!(fallback.view, "feedback/1/2"),
            other => panic!("expected a render fault, got {other:?}"),
        }
        assert_eq!(loads.load(Ordering::SeqCst), 4);

        broken.store(false, Ordering::SeqCst);
        assert_eq!(state.boundaries.reset("feedback/1/2"), BoundaryState::Normal);
        let Json(body) = render_page(&state, "feedback page", view(), loader()).await.unwrap();
        assert_eq!(body, json!("ready"));
        assert_eq!(loads.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_errors_are_not_retried() {
        let state = app_state(Arc::new(FakeRest::new()));
        let loads = Arc::new(AtomicU32::new(0));
        let counter = loads.clone();
        let start = Instant::now();

        let err = render_page(&state, "questions page", "questions/9".to_string(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Err::<Flaky, _>(AppError::NotFound("Interview 9 not found".to_string())) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
