use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column names the backend has used for the answer text, in lookup order.
pub const ANSWER_TEXT_FIELDS: [&str; 5] = ["answer", "response", "answer_text", "text", "content"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub applicant_id: i64,
    pub question_id: i64,
    pub interview_id: i64,
    /// Normalized answer text; empty when no known column carried any.
    pub answer: String,
}

/// Body for recording an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnswer {
    pub interview_id: i64,
    pub question_id: i64,
    pub applicant_id: i64,
    pub answer: String,
}

impl Answer {
    /// Builds an answer from a raw backend row, taking the text from the
    /// first non-blank candidate column.
    pub fn from_row(row: &Value) -> Option<Self> {
        let int = |key: &str| row.get(key).and_then(Value::as_i64);
        let answer = ANSWER_TEXT_FIELDS
            .iter()
            .filter_map(|key| row.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|text| !text.is_empty())
            .unwrap_or_default()
            .to_string();

        Some(Self {
            id: int("id")?,
            applicant_id: int("applicant_id")?,
            question_id: int("question_id")?,
            interview_id: int("interview_id")?,
            answer,
        })
    }
}
