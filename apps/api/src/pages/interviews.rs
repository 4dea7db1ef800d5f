//! Interviews page: every interview with its question and applicant counts.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::applicant::ApplicantStatus;
use crate::models::interview::{Interview, NewInterview};
use crate::provenance::ProvenanceCache;
use crate::records::{applicants, interviews, questions};
use crate::rest::RestBackend;
use crate::settings::Settings;
use crate::ui::theme::ButtonVariant;
use crate::ui::{page_styles, Component, Style};

use super::{interview_not_found, require_text};

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSummary {
    #[serde(flatten)]
    pub interview: Interview,
    pub question_count: usize,
    pub applicant_count: usize,
    pub completed_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewsPage {
    pub interviews: Vec<InterviewSummary>,
    pub styles: BTreeMap<String, Style>,
}

fn styles(settings: &Settings) -> BTreeMap<String, Style> {
    page_styles(
        settings,
        &[
            ("card", Component::Card),
            ("create_button", Component::Button(ButtonVariant::Primary)),
            ("edit_button", Component::Button(ButtonVariant::Secondary)),
            ("delete_button", Component::Button(ButtonVariant::Danger)),
            ("confirm_modal", Component::Modal),
            ("loading", Component::Spinner),
        ],
    )
}

pub async fn load_interviews_page(
    rest: &dyn RestBackend,
    settings: &Settings,
) -> Result<InterviewsPage, AppError> {
    let (all_interviews, all_questions, all_applicants) = tokio::try_join!(
        interviews::list_interviews(rest),
        questions::list_all_questions(rest),
        applicants::list_all_applicants(rest),
    )?;

    let mut question_counts: HashMap<i64, usize> = HashMap::new();
    for q in &all_questions {
        *question_counts.entry(q.interview_id).or_default() += 1;
    }
    let mut applicant_counts: HashMap<i64, (usize, usize)> = HashMap::new();
    for a in &all_applicants {
        let entry = applicant_counts.entry(a.interview_id).or_default();
        entry.0 += 1;
        if a.interview_status == ApplicantStatus::Completed {
            entry.1 += 1;
        }
    }

    let interviews = all_interviews
        .into_iter()
        .map(|interview| {
            let (applicant_count, completed_count) =
                applicant_counts.get(&interview.id).copied().unwrap_or_default();
            InterviewSummary {
                question_count: question_counts.get(&interview.id).copied().unwrap_or_default(),
                applicant_count,
                completed_count,
                interview,
            }
        })
        .collect();

    Ok(InterviewsPage {
        interviews,
        styles: styles(settings),
    })
}

fn validated(input: NewInterview) -> Result<NewInterview, AppError> {
    Ok(NewInterview {
        title: require_text("title", &input.title)?,
        job_role: require_text("job_role", &input.job_role)?,
        description: input.description.trim().to_string(),
        status: input.status,
    })
}

pub async fn create_interview(
    rest: &dyn RestBackend,
    input: NewInterview,
) -> Result<Interview, AppError> {
    let created = interviews::create_interview(rest, &validated(input)?).await?;
    info!("Created interview {} '{}'", created.id, created.title);
    Ok(created)
}

pub async fn update_interview(
    rest: &dyn RestBackend,
    id: i64,
    input: NewInterview,
) -> Result<Interview, AppError> {
    interviews::update_interview(rest, id, &validated(input)?)
        .await?
        .ok_or_else(|| interview_not_found(id))
}

/// Deletes the interview and forgets its local AI tags.
pub async fn delete_interview(
    rest: &dyn RestBackend,
    provenance: &ProvenanceCache,
    id: i64,
) -> Result<(), AppError> {
    interviews::get_interview(rest, id)
        .await?
        .ok_or_else(|| interview_not_found(id))?;
    interviews::delete_interview(rest, id).await?;
    provenance.clear(id)?;
    info!("Deleted interview {id}");
    Ok(())
}
