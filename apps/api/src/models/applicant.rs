use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicantStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: i64,
    pub interview_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub firstname: String,
    pub surname: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub email_address: String,
    #[serde(default)]
    pub interview_status: ApplicantStatus,
}

impl Applicant {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname.trim(), self.surname.trim())
            .trim()
            .to_string()
    }
}

/// Body for creating or replacing an applicant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplicant {
    pub interview_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub firstname: String,
    pub surname: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub email_address: String,
    #[serde(default)]
    pub interview_status: ApplicantStatus,
}
