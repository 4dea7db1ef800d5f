//! Questions page and the AI question workflow.
//!
//! Generated drafts are persisted one create call at a time. Each saved row's
//! id is tagged as AI-generated; each rejected draft is recorded and the loop
//! carries on. The page is always re-fetched afterwards so it shows exactly
//! what the backend holds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::batch::{run_sequential, BatchOutcome};
use crate::errors::AppError;
use crate::interview_ai::{dedupe_generated, GeneratedQuestion, InterviewAi};
use crate::models::interview::Interview;
use crate::models::question::{Difficulty, NewQuestion, Question, QuestionSource, TaggedQuestion};
use crate::provenance::ProvenanceCache;
use crate::records::{interviews, questions};
use crate::rest::{RestBackend, RestError};
use crate::settings::Settings;
use crate::ui::theme::ButtonVariant;
use crate::ui::{page_styles, Component, Style};

use super::{interview_not_found, require_text};

/// Failed drafts are named by at most this many characters.
pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct QuestionsPage {
    pub interview: Interview,
    pub questions: Vec<TaggedQuestion>,
    pub ai_count: usize,
    pub manual_count: usize,
    pub styles: BTreeMap<String, Style>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionInput {
    pub question: String,
    pub difficulty: Difficulty,
}

/// Result of persisting a batch of generated drafts.
#[derive(Debug, Clone, Serialize)]
pub struct PersistReport {
    pub outcome: BatchOutcome,
    pub requested: usize,
    pub saved_ids: Vec<i64>,
    pub failed_previews: Vec<String>,
    /// User-facing banner; `None` when everything was saved.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub report: PersistReport,
    pub page: QuestionsPage,
}

fn styles(settings: &Settings) -> BTreeMap<String, Style> {
    page_styles(
        settings,
        &[
            ("question_card", Component::Card),
            ("add_button", Component::Button(ButtonVariant::Primary)),
            ("generate_button", Component::Button(ButtonVariant::Secondary)),
            ("delete_button", Component::Button(ButtonVariant::Danger)),
            ("editor_modal", Component::Modal),
            ("generating", Component::Spinner),
        ],
    )
}

pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

pub async fn load_questions_page(
    rest: &dyn RestBackend,
    provenance: &ProvenanceCache,
    settings: &Settings,
    interview_id: i64,
) -> Result<QuestionsPage, AppError> {
    let (interview, rows) = tokio::try_join!(
        interviews::get_interview(rest, interview_id),
        questions::list_questions(rest, interview_id),
    )?;
    let interview = interview.ok_or_else(|| interview_not_found(interview_id))?;

    let questions = provenance.tag(interview_id, rows);
    let ai_count = questions
        .iter()
        .filter(|q| q.source == QuestionSource::Ai)
        .count();

    Ok(QuestionsPage {
        interview,
        manual_count: questions.len() - ai_count,
        ai_count,
        questions,
        styles: styles(settings),
    })
}

async fn require_interview(rest: &dyn RestBackend, interview_id: i64) -> Result<Interview, AppError> {
    interviews::get_interview(rest, interview_id)
        .await?
        .ok_or_else(|| interview_not_found(interview_id))
}

pub async fn add_question(
    rest: &dyn RestBackend,
    interview_id: i64,
    input: QuestionInput,
) -> Result<Question, AppError> {
    let text = require_text("question", &input.question)?;
    require_interview(rest, interview_id).await?;
    let created = questions::create_question(
        rest,
        &NewQuestion {
            interview_id,
            question: text,
            difficulty: input.difficulty,
        },
    )
    .await?;
    info!("Added question {} to interview {interview_id}", created.id);
    Ok(created)
}

async fn require_question(rest: &dyn RestBackend, id: i64) -> Result<Question, AppError> {
    questions::get_question(rest, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))
}

pub async fn edit_question(
    rest: &dyn RestBackend,
    id: i64,
    input: QuestionInput,
) -> Result<Question, AppError> {
    let text = require_text("question", &input.question)?;
    let existing = require_question(rest, id).await?;
    questions::update_question(
        rest,
        id,
        &NewQuestion {
            interview_id: existing.interview_id,
            question: text,
            difficulty: input.difficulty,
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))
}

/// Deletes a question and drops its AI tag, if any.
pub async fn remove_question(
    rest: &dyn RestBackend,
    provenance: &ProvenanceCache,
    id: i64,
) -> Result<(), AppError> {
    let existing = require_question(rest, id).await?;
    questions::delete_question(rest, id).await?;
    provenance.forget(existing.interview_id, id)?;
    Ok(())
}

/// Saves drafts one at a time, tagging each saved id as AI-generated.
pub async fn persist_generated(
    rest: &dyn RestBackend,
    provenance: &ProvenanceCache,
    interview_id: i64,
    drafts: Vec<GeneratedQuestion>,
) -> PersistReport {
    let result = run_sequential(drafts, move |draft| async move {
        let created = questions::create_question(
            rest,
            &NewQuestion {
                interview_id,
                question: draft.question,
                difficulty: draft.difficulty,
            },
        )
        .await?;
        // The row exists remotely even if tagging fails; keep counting it as saved.
        if let Err(e) = provenance.mark_ai(interview_id, created.id) {
            error!("Saved question {} but could not tag it as AI-generated: {e}", created.id);
        }
        Ok::<_, RestError>(created.id)
    })
    .await;

    for failure in &result.failed {
        warn!(
            "Generated question #{} rejected: {} ({:?})",
            failure.index + 1,
            failure.error,
            preview(&failure.item.question)
        );
    }

    let outcome = result.outcome();
    let requested = result.total();
    let saved = result.succeeded.len();
    let failed_previews: Vec<String> = result
        .failed
        .iter()
        .map(|f| preview(&f.item.question))
        .collect();

    let message = match outcome {
        BatchOutcome::Full => {
            info!("Saved all {saved} generated questions for interview {interview_id}");
            None
        }
        BatchOutcome::Partial => Some(format!(
            "Saved {saved} of {requested} generated questions. {} failed: {}",
            failed_previews.len(),
            failed_previews
                .iter()
                .map(|p| format!("\"{p}\""))
                .collect::<Vec<_>>()
                .join(", ")
        )),
        BatchOutcome::None => {
            Some("Failed to save the generated questions. Please try again.".to_string())
        }
    };

    PersistReport {
        outcome,
        requested,
        saved_ids: result.succeeded,
        failed_previews,
        message,
    }
}

/// Drafts new questions for the interview's role, saves them, and returns
/// the refreshed page with a report of what was saved.
/// Drafts questions for the interview's role and saves the new ones.
pub async fn generate_and_save(
    rest: &dyn RestBackend,
    ai: &dyn InterviewAi,
    provenance: &ProvenanceCache,
    interview_id: i64,
) -> Result<PersistReport, AppError> {
    let (interview, existing) = tokio::try_join!(
        interviews::get_interview(rest, interview_id),
        questions::list_questions(rest, interview_id),
    )?;
    let interview = interview.ok_or_else(|| interview_not_found(interview_id))?;

    let existing_texts: Vec<String> = existing.into_iter().map(|q| q.question).collect();
    let drafts = ai
        .generate_questions(&interview.job_role, &existing_texts)
        .await
        .map_err(|e| AppError::llm("Question generation failed", e))?;
    let drafts = dedupe_generated(&existing_texts, drafts);
    if drafts.is_empty() {
        return Err(AppError::Llm(
            "Question generation returned no new questions".to_string(),
        ));
    }

    Ok(persist_generated(rest, provenance, interview_id, drafts).await)
}
