//! Feedback page: assembles an applicant's transcript and asks the AI for an
//! assessment. Regenerated on every visit; nothing is stored.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::interview_ai::feedback::{
    build_interview_responses, ApplicantFeedback, FeedbackRequest, InterviewResponse,
};
use crate::interview_ai::InterviewAi;
use crate::records::{answers, applicants, interviews, questions};
use crate::rest::RestBackend;
use crate::settings::Settings;
use crate::ui::theme::ButtonVariant;
use crate::ui::{page_styles, Component, Style};

use super::{applicant_not_found, interview_not_found};

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackPage {
    pub applicant_id: i64,
    pub applicant_name: String,
    pub email_address: String,
    pub interview_title: String,
    pub job_role: String,
    pub responses: Vec<InterviewResponse>,
    pub feedback: ApplicantFeedback,
    pub styles: BTreeMap<String, Style>,
}

fn styles(settings: &Settings) -> BTreeMap<String, Style> {
    page_styles(
        settings,
        &[
            ("score_card", Component::Card),
            ("transcript_card", Component::Card),
            ("regenerate_button", Component::Button(ButtonVariant::Secondary)),
            ("back_button", Component::Button(ButtonVariant::Primary)),
            ("generating", Component::Spinner),
        ],
    )
}

pub async fn load_feedback_page(
    rest: &dyn RestBackend,
    ai: &dyn InterviewAi,
    settings: &Settings,
    interview_id: i64,
    applicant_id: i64,
) -> Result<FeedbackPage, AppError> {
    let (interview, applicant, rows, given) = tokio::try_join!(
        interviews::get_interview(rest, interview_id),
        applicants::get_applicant(rest, applicant_id),
        questions::list_questions(rest, interview_id),
        answers::list_answers(rest, applicant_id),
    )?;
    let interview = interview.ok_or_else(|| interview_not_found(interview_id))?;
    let applicant = applicant
        .filter(|a| a.interview_id == interview_id)
        .ok_or_else(|| applicant_not_found(applicant_id))?;
    if rows.is_empty() {
        return Err(AppError::Validation(
            "This interview has no questions to assess".to_string(),
        ));
    }

    let responses = build_interview_responses(&rows, &given);
    let request = FeedbackRequest {
        applicant_name: applicant.display_name(),
        job_role: interview.job_role.clone(),
        interview_responses: responses.clone(),
    };
    let feedback = ai
        .generate_applicant_feedback(&request)
        .await
        .map_err(|e| AppError::llm("Feedback generation failed", e))?;
    info!(
        "Feedback for applicant {applicant_id}: {}/100",
        feedback.overall_score
    );

    Ok(FeedbackPage {
        applicant_id,
        applicant_name: request.applicant_name,
        email_address: applicant.email_address,
        interview_title: interview.title,
        job_role: interview.job_role,
        responses,
        feedback,
        styles: styles(settings),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview_ai::feedback::NO_RESPONSE;
    use crate::testing::{FakeAi, FakeRest};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn setup() -> (FakeRest, i64, i64) {
        let rest = FakeRest::new();
        let interview = rest.seed(
            "interview",
            json!({"title": "Backend", "job_role": "Rust Engineer"}),
        );
        let q1 = rest.seed(
            "question",
            json!({"interview_id": interview, "question": "What is Send?", "difficulty": "Easy"}),
        );
        rest.seed(
            "question",
            json!({"interview_id": interview, "question": "What is Sync?", "difficulty": "Advanced"}),
        );
        let applicant = rest.seed(
            "applicant",
            json!({"interview_id": interview, "firstname": "Ada", "surname": "Lovelace",
                   "email_address": "ada@x.io", "interview_status": "Completed"}),
        );
        rest.seed(
            "application_answer",
            json!({"interview_id": interview, "question_id": q1, "applicant_id": applicant,
                   "response": "Safe to move across threads"}),
        );
        (rest, interview, applicant)
    }

    #[tokio::test]
    async fn test_transcript_uses_sentinel_for_missing_answers() {
        let (rest, interview, applicant) = setup();
        let ai = FakeAi::with_drafts(&[]);

        let page = load_feedback_page(&rest, &ai, &Settings::default(), interview, applicant)
            .await
            .unwrap();

        assert_eq!(page.applicant_name, "Ada Lovelace");
        assert_eq!(page.responses[0].answer, "Safe to move across threads");
        assert_eq!(page.responses[1].answer, NO_RESPONSE);
        let sent = ai.last_feedback_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.job_role, "Rust Engineer");
        assert_eq!(sent.interview_responses, page.responses);
        assert_eq!(page.feedback.overall_score, 78);
    }

    #[tokio::test]
    async fn test_missing_interview_never_calls_ai() {
        let (rest, _, applicant) = setup();
        let ai = FakeAi::with_drafts(&[]);

        let err = load_feedback_page(&rest, &ai, &Settings::default(), 999, applicant)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(ai.feedback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_applicant_of_other_interview_is_not_found() {
        let (rest, _, applicant) = setup();
        let other = rest.seed("interview", json!({"title": "X", "job_role": "Y"}));
        let ai = FakeAi::with_drafts(&[]);
        let err = load_feedback_page(&rest, &ai, &Settings::default(), other, applicant)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ai_failure_surfaces_as_retryable() {
        let (rest, interview, applicant) = setup();
        let err = load_feedback_page(&rest, &FakeAi::failing(), &Settings::default(), interview, applicant)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_fails_whole_page() {
        let (rest, interview, applicant) = setup();
        rest.fail_reads();
        let ai = FakeAi::with_drafts(&[]);
        let err = load_feedback_page(&rest, &ai, &Settings::default(), interview, applicant)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Rest(_)));
        assert_eq!(ai.feedback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_answers_fetch_fails_whole_page() {
        let (rest, interview, applicant) = setup();
        rest.fail_reads_of("application_answer");
        let ai = FakeAi::with_drafts(&[]);

        let err = load_feedback_page(&rest, &ai, &Settings::default(), interview, applicant)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Rest(_)));
        assert_eq!(rest.call_count("GET question"), 1);
        assert_eq!(ai.feedback_calls.load(Ordering::SeqCst), 0);
    }
}
