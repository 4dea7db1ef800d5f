use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: i64,
    pub title: String,
    pub job_role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: InterviewStatus,
}

/// Body for creating or replacing an interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInterview {
    pub title: String,
    pub job_role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: InterviewStatus,
}
