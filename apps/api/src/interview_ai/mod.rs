//! AI completion client for interviews: question drafting and applicant feedback.
//!
//! `AppState` holds an `Arc<dyn InterviewAi>`; `LlmInterviewAi` is the
//! production backend. Calls are never retried here. Callers surface the
//! failure with a retry action instead.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm_client::{LlmClient, LlmError};
use crate::models::question::Difficulty;

pub mod feedback;
pub mod prompts;

use feedback::{ApplicantFeedback, FeedbackRequest};
use prompts::{FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM, QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};

/// How many questions one generation request asks for.
pub const QUESTIONS_PER_REQUEST: usize = 5;

/// A question drafted by the model, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub difficulty: Difficulty,
}

#[async_trait]
pub trait InterviewAi: Send + Sync {
    async fn generate_questions(
        &self,
        job_role: &str,
        existing_questions: &[String],
    ) -> Result<Vec<GeneratedQuestion>, LlmError>;

    async fn generate_applicant_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<ApplicantFeedback, LlmError>;
}

pub struct LlmInterviewAi(pub LlmClient);

#[async_trait]
impl InterviewAi for LlmInterviewAi {
    async fn generate_questions(
        &self,
        job_role: &str,
        existing_questions: &[String],
    ) -> Result<Vec<GeneratedQuestion>, LlmError> {
        let prompt = QUESTIONS_PROMPT_TEMPLATE
            .replace("{count}", &QUESTIONS_PER_REQUEST.to_string())
            .replace("{job_role}", job_role)
            .replace("{existing_json}", &serde_json::to_string_pretty(existing_questions)?);

        let drafts: Vec<GeneratedQuestion> = self.0.call_json(&prompt, QUESTIONS_SYSTEM).await?;
        info!("Model drafted {} questions for role '{job_role}'", drafts.len());
        Ok(drafts)
    }

    async fn generate_applicant_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<ApplicantFeedback, LlmError> {
        let prompt = FEEDBACK_PROMPT_TEMPLATE
            .replace("{applicant_name}", &request.applicant_name)
            .replace("{job_role}", &request.job_role)
            .replace(
                "{responses_json}",
                &serde_json::to_string_pretty(&request.interview_responses)?,
            );

        self.0.call_json(&prompt, FEEDBACK_SYSTEM).await
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Drops blank drafts and drafts that repeat an existing question or an
/// earlier draft, comparing case- and whitespace-insensitively.
pub fn dedupe_generated(
    existing_questions: &[String],
    drafts: Vec<GeneratedQuestion>,
) -> Vec<GeneratedQuestion> {
    let mut seen: HashSet<String> = existing_questions.iter().map(|q| normalize(q)).collect();
    drafts
        .into_iter()
        .filter_map(|mut draft| {
            draft.question = draft.question.trim().to_string();
            let key = normalize(&draft.question);
            (!key.is_empty() && seen.insert(key)).then_some(draft)
        })
        .collect()
}
