use serde::{Deserialize, Serialize};

/// Question difficulty. Shared by manual and AI-generated questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    #[serde(alias = "Medium")]
    Intermediate,
    #[serde(alias = "Hard")]
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub interview_id: i64,
    pub question: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Body for creating or replacing a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub interview_id: i64,
    pub question: String,
    pub difficulty: Difficulty,
}

/// Where a question came from. Client-side only, never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    Manual,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedQuestion {
    #[serde(flatten)]
    pub question: Question,
    pub source: QuestionSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_accepts_aliases() {
        let d: Difficulty = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(d, Difficulty::Intermediate);
        let d: Difficulty = serde_json::from_str("\"Hard\"").unwrap();
        assert_eq!(d, Difficulty::Advanced);
    }

    #[test]
    fn test_tagged_question_flattens() {
        let tagged = TaggedQuestion {
            question: Question {
                id: 3,
                interview_id: 1,
                question: "What is ownership?".to_string(),
                difficulty: Difficulty::Easy,
            },
            source: QuestionSource::Ai,
        };
        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["source"], "ai");
    }
}
