//! Applicant feedback: the transcript sent to the model and the structured
//! assessment it returns. Feedback lives for one page visit and is never stored.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::answer::Answer;
use crate::models::question::{Difficulty, Question};

/// Stand-in answer for questions the applicant never answered.
pub const NO_RESPONSE: &str = "No response provided";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewResponse {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRequest {
    pub applicant_name: String,
    pub job_role: String,
    pub interview_responses: Vec<InterviewResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityProfile {
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub communication_style: String,
    #[serde(deserialize_with = "percentage")]
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAnalysis {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub technical_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantFeedback {
    #[serde(deserialize_with = "percentage")]
    pub overall_score: u8,
    pub recommendation: String,
    pub personality_profile: PersonalityProfile,
    pub performance_analysis: PerformanceAnalysis,
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
}

/// Accepts any JSON number and clamps it into 0..=100.
fn percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(if raw.is_nan() { 0 } else { raw.round().clamp(0.0, 100.0) as u8 })
}

/// Pairs each question, in order, with the applicant's answer to it.
pub fn build_interview_responses(
    questions: &[Question],
    answers: &[Answer],
) -> Vec<InterviewResponse> {
    questions
        .iter()
        .map(|q| {
            let answer = answers
                .iter()
                .filter(|a| a.question_id == q.id)
                .map(|a| a.answer.as_str())
                .find(|text| !text.is_empty())
                .unwrap_or(NO_RESPONSE);
            InterviewResponse {
                question: q.question.clone(),
                answer: answer.to_string(),
                difficulty: q.difficulty,
            }
        })
        .collect()
}
