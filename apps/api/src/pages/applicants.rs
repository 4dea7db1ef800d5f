//! Applicants page for one interview.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::applicant::{Applicant, ApplicantStatus, NewApplicant};
use crate::models::interview::Interview;
use crate::records::{applicants, interviews};
use crate::rest::RestBackend;
use crate::settings::Settings;
use crate::ui::theme::ButtonVariant;
use crate::ui::{page_styles, Component, Style};

use super::{applicant_not_found, interview_not_found, require_text};

#[derive(Debug, Clone, Serialize)]
pub struct ApplicantsPage {
    pub interview: Interview,
    pub applicants: Vec<Applicant>,
    pub styles: BTreeMap<String, Style>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicantInput {
    #[serde(default)]
    pub title: Option<String>,
    pub firstname: String,
    pub surname: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub email_address: String,
    #[serde(default)]
    pub interview_status: Option<ApplicantStatus>,
}

fn styles(settings: &Settings) -> BTreeMap<String, Style> {
    page_styles(
        settings,
        &[
            ("applicant_card", Component::Card),
            ("add_button", Component::Button(ButtonVariant::Primary)),
            ("feedback_button", Component::Button(ButtonVariant::Secondary)),
            ("delete_button", Component::Button(ButtonVariant::Danger)),
            ("editor_modal", Component::Modal),
            ("loading", Component::Spinner),
        ],
    )
}

pub async fn load_applicants_page(
    rest: &dyn RestBackend,
    settings: &Settings,
    interview_id: i64,
) -> Result<ApplicantsPage, AppError> {
    let (interview, applicants) = tokio::try_join!(
        interviews::get_interview(rest, interview_id),
        applicants::list_applicants(rest, interview_id),
    )?;

    Ok(ApplicantsPage {
        interview: interview.ok_or_else(|| interview_not_found(interview_id))?,
        applicants,
        styles: styles(settings),
    })
}

fn validated(interview_id: i64, input: ApplicantInput) -> Result<NewApplicant, AppError> {
    let email = require_text("email_address", &input.email_address)?;
    if !email.contains('@') {
        return Err(AppError::Validation(format!("'{email}' is not an email address")));
    }
    let optional = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    Ok(NewApplicant {
        interview_id,
        title: optional(input.title),
        firstname: require_text("firstname", &input.firstname)?,
        surname: require_text("surname", &input.surname)?,
        phone_number: optional(input.phone_number),
        email_address: email,
        interview_status: ApplicantStatus::NotStarted,
    })
}

pub async fn add_applicant(
    rest: &dyn RestBackend,
    interview_id: i64,
    input: ApplicantInput,
) -> Result<Applicant, AppError> {
    // New applicants always start fresh, whatever status the client sent.
    let applicant = validated(interview_id, input)?;
    interviews::get_interview(rest, interview_id)
        .await?
        .ok_or_else(|| interview_not_found(interview_id))?;
    let created = applicants::create_applicant(rest, &applicant).await?;
    info!("Added applicant {} to interview {interview_id}", created.id);
    Ok(created)
}

pub async fn edit_applicant(
    rest: &dyn RestBackend,
    id: i64,
    input: ApplicantInput,
) -> Result<Applicant, AppError> {
    let existing = applicants::get_applicant(rest, id)
        .await?
        .ok_or_else(|| applicant_not_found(id))?;
    // An omitted status keeps the current one.
    let status = input.interview_status.unwrap_or(existing.interview_status);
    let mut update = validated(existing.interview_id, input)?;
    update.interview_status = status;
    applicants::update_applicant(rest, id, &update)
        .await?
        .ok_or_else(|| applicant_not_found(id))
}

pub async fn remove_applicant(rest: &dyn RestBackend, id: i64) -> Result<(), AppError> {
    applicants::get_applicant(rest, id)
        .await?
        .ok_or_else(|| applicant_not_found(id))?;
    applicants::delete_applicant(rest, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRest;
    use serde_json::json;

    fn input(email: &str) -> ApplicantInput {
        ApplicantInput {
            title: Some(" ".to_string()),
            firstname: "Grace".to_string(),
            surname: "Hopper".to_string(),
            phone_number: None,
            email_address: email.to_string(),
            interview_status: None,
        }
    }

    #[tokio::test]
    async fn test_new_applicant_starts_not_started() {
        let rest = FakeRest::new();
        let id = rest.seed("interview", json!({"title": "T", "job_role": "R"}));
        let created = add_applicant(&rest, id, input("grace@navy.mil")).await.unwrap();
        assert_eq!(created.interview_status, ApplicantStatus::NotStarted);
        assert_eq!(created.title, None);

        let page = load_applicants_page(&rest, &Settings::default(), id).await.unwrap();
        assert_eq!(page.applicants.len(), 1);
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_status() {
        let rest = FakeRest::new();
        let id = rest.seed("interview", json!({"title": "T", "job_role": "R"}));
        let completed = ApplicantInput {
            interview_status: Some(ApplicantStatus::Completed),
            ..input("grace@navy.mil")
        };

        let created = add_applicant(&rest, id, completed).await.unwrap();
        assert_eq!(created.interview_status, ApplicantStatus::NotStarted);
        assert_eq!(rest.rows("applicant")[0]["interview_status"], json!("Not Started"));
    }

    #[tokio::test]
    async fn test_rejects_bad_email() {
        let rest = FakeRest::new();
        let id = rest.seed("interview", json!({"title": "T", "job_role": "R"}));
        let err = add_applicant(&rest, id, input("nope")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_interview_page_is_not_found() {
        let rest = FakeRest::new();
        let err = load_applicants_page(&rest, &Settings::default(), 12).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_edit_keeps_completed_status() {
        let rest = FakeRest::new();
        let interview = rest.seed("interview", json!({"title": "T", "job_role": "R"}));
        let id = rest.seed(
            "applicant",
            json!({"interview_id": interview, "firstname": "A", "surname": "B",
                   "email_address": "a@b.c", "interview_status": "Completed"}),
        );
        let updated = edit_applicant(&rest, id, input("new@b.c")).await.unwrap();
        assert_eq!(updated.email_address, "new@b.c");
        assert_eq!(updated.interview_status, ApplicantStatus::Completed);
    }
}
