//! Applicant-facing interview: see the questions, answer them one by one,
//! then mark the interview as completed.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::answer::{Answer, NewAnswer};
use crate::models::applicant::{Applicant, ApplicantStatus};
use crate::models::question::Difficulty;
use crate::records::{answers, applicants, interviews, questions};
use crate::rest::RestBackend;
use crate::settings::Settings;
use crate::ui::theme::ButtonVariant;
use crate::ui::{page_styles, Component, Style};

use super::{applicant_not_found, interview_not_found, require_text};

#[derive(Debug, Clone, Serialize)]
pub struct TakeQuestion {
    pub id: i64,
    pub question: String,
    pub difficulty: Difficulty,
    pub answered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TakeInterviewPage {
    pub applicant_id: i64,
    pub applicant_name: String,
    pub interview_title: String,
    pub job_role: String,
    pub description: String,
    pub questions: Vec<TakeQuestion>,
    pub answered: usize,
    pub completed: bool,
    pub styles: BTreeMap<String, Style>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_id: i64,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerEdit {
    pub answer: String,
}

fn styles(settings: &Settings) -> BTreeMap<String, Style> {
    page_styles(
        settings,
        &[
            ("question_card", Component::Card),
            ("submit_button", Component::Button(ButtonVariant::Primary)),
            ("skip_button", Component::Button(ButtonVariant::Secondary)),
            ("finish_modal", Component::Modal),
            ("saving", Component::Spinner),
        ],
    )
}

async fn require_applicant(rest: &dyn RestBackend, id: i64) -> Result<Applicant, AppError> {
    applicants::get_applicant(rest, id)
        .await?
        .ok_or_else(|| applicant_not_found(id))
}

fn ensure_open(applicant: &Applicant) -> Result<(), AppError> {
    if applicant.interview_status == ApplicantStatus::Completed {
        return Err(AppError::Validation(
            "This interview has already been completed".to_string(),
        ));
    }
    Ok(())
}

fn answer_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Answer {id} not found"))
}

/// An existing answer whose applicant can still change it.
async fn open_answer(rest: &dyn RestBackend, id: i64) -> Result<Answer, AppError> {
    let answer = answers::get_answer(rest, id)
        .await?
        .ok_or_else(|| answer_not_found(id))?;
    ensure_open(&require_applicant(rest, answer.applicant_id).await?)?;
    Ok(answer)
}

pub async fn load_take_page(
    rest: &dyn RestBackend,
    settings: &Settings,
    applicant_id: i64,
) -> Result<TakeInterviewPage, AppError> {
    let applicant = require_applicant(rest, applicant_id).await?;
    let (interview, rows, given) = tokio::try_join!(
        interviews::get_interview(rest, applicant.interview_id),
        questions::list_questions(rest, applicant.interview_id),
        answers::list_answers(rest, applicant_id),
    )?;
    let interview = interview.ok_or_else(|| interview_not_found(applicant.interview_id))?;

    let answered_ids: HashSet<i64> = given
        .iter()
        .filter(|a| !a.answer.is_empty())
        .map(|a| a.question_id)
        .collect();
    let questions: Vec<TakeQuestion> = rows
        .into_iter()
        .map(|q| TakeQuestion {
            answered: answered_ids.contains(&q.id),
            id: q.id,
            question: q.question,
            difficulty: q.difficulty,
        })
        .collect();

    Ok(TakeInterviewPage {
        applicant_id,
        applicant_name: applicant.display_name(),
        interview_title: interview.title,
        job_role: interview.job_role,
        description: interview.description,
        answered: questions.iter().filter(|q| q.answered).count(),
        questions,
        completed: applicant.interview_status == ApplicantStatus::Completed,
        styles: styles(settings),
    })
}

/// Records one answer. Each question can be answered once, and only before
/// the applicant has completed the interview.
pub async fn submit_answer(
    rest: &dyn RestBackend,
    applicant_id: i64,
    input: AnswerInput,
) -> Result<Answer, AppError> {
    let text = require_text("answer", &input.answer)?;
    let applicant = require_applicant(rest, applicant_id).await?;
    ensure_open(&applicant)?;

    let (question, given) = tokio::try_join!(
        questions::get_question(rest, input.question_id),
        answers::list_answers(rest, applicant_id),
    )?;
    let question = question
        .filter(|q| q.interview_id == applicant.interview_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Question {} is not part of this interview",
                input.question_id
            ))
        })?;
    if given
        .iter()
        .any(|a| a.question_id == question.id && !a.answer.is_empty())
    {
        return Err(AppError::Validation(format!(
            "Question {} has already been answered",
            question.id
        )));
    }

    let answer = answers::create_answer(
        rest,
        &NewAnswer {
            interview_id: applicant.interview_id,
            question_id: question.id,
            applicant_id,
            answer: text,
        },
    )
    .await?;
    info!("Applicant {applicant_id} answered question {}", question.id);
    Ok(answer)
}

pub async fn edit_answer(
    rest: &dyn RestBackend,
    id: i64,
    input: AnswerEdit,
) -> Result<Answer, AppError> {
    let text = require_text("answer", &input.answer)?;
    let answer = open_answer(rest, id).await?;
    let update = NewAnswer {
        interview_id: answer.interview_id,
        question_id: answer.question_id,
        applicant_id: answer.applicant_id,
        answer: text,
    };
    answers::update_answer(rest, id, &update)
        .await?
        .ok_or_else(|| answer_not_found(id))
}

pub async fn remove_answer(rest: &dyn RestBackend, id: i64) -> Result<(), AppError> {
    open_answer(rest, id).await?;
    answers::delete_answer(rest, id).await?;
    info!("Answer {id} removed");
    Ok(())
}

pub async fn complete_interview(
    rest: &dyn RestBackend,
    applicant_id: i64,
) -> Result<Applicant, AppError> {
    require_applicant(rest, applicant_id).await?;
    let applicant = applicants::set_applicant_status(rest, applicant_id, ApplicantStatus::Completed)
        .await?
        .ok_or_else(|| applicant_not_found(applicant_id))?;
    info!("Applicant {applicant_id} completed interview {}", applicant.interview_id);
    Ok(applicant)
}
