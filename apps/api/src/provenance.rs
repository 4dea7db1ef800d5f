//! AI provenance tags for questions.
//!
//! The backend has no `source` column, so the ids of AI-generated questions
//! are kept per interview in the local store and intersected with fetched
//! rows at load time. Tags do not follow the user to another machine.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;

use crate::models::question::{Question, QuestionSource, TaggedQuestion};
use crate::store::{LocalStore, StoreError};

fn key(interview_id: i64) -> String {
    format!("ai-questions:{interview_id}")
}

fn parse_ids(value: Option<&Value>) -> BTreeSet<i64> {
    value
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

#[derive(Clone)]
pub struct ProvenanceCache {
    store: Arc<LocalStore>,
}

impl ProvenanceCache {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn ai_ids(&self, interview_id: i64) -> BTreeSet<i64> {
        parse_ids(self.store.get(&key(interview_id)).as_ref())
    }

    pub fn mark_ai(&self, interview_id: i64, question_id: i64) -> Result<(), StoreError> {
        self.store.update(&key(interview_id), |old| {
            let mut ids = parse_ids(old);
            ids.insert(question_id);
            Some(Value::from(ids.into_iter().collect::<Vec<_>>()))
        })
    }

    pub fn forget(&self, interview_id: i64, question_id: i64) -> Result<(), StoreError> {
        self.store.update(&key(interview_id), |old| {
            let mut ids = parse_ids(old);
            ids.remove(&question_id);
            (!ids.is_empty()).then(|| Value::from(ids.into_iter().collect::<Vec<_>>()))
        })
    }

    /// Drops every tag recorded for an interview.
    pub fn clear(&self, interview_id: i64) -> Result<(), StoreError> {
        self.store.remove(&key(interview_id))
    }

    pub fn tag(&self, interview_id: i64, questions: Vec<Question>) -> Vec<TaggedQuestion> {
        let ai_ids = self.ai_ids(interview_id);
        questions
            .into_iter()
            .map(|question| TaggedQuestion {
                source: if ai_ids.contains(&question.id) {
                    QuestionSource::Ai
                } else {
                    QuestionSource::Manual
                },
                question,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;

    fn question(id: i64) -> Question {
        Question {
            id,
            interview_id: 1,
            question: format!("Question {id}"),
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn test_only_marked_ids_are_ai() {
        let cache = ProvenanceCache::new(Arc::new(LocalStore::in_memory()));
        cache.mark_ai(1, 2).unwrap();
        cache.mark_ai(1, 4).unwrap();

        let tagged = cache.tag(1, (1..=5).map(question).collect());
        for t in tagged {
            let expected = if t.question.id == 2 || t.question.id == 4 {
                QuestionSource::Ai
            } else {
                QuestionSource::Manual
            };
            assert_eq!(t.source, expected, "question {}", t.question.id);
        }
    }

    #[test]
    fn test_tags_are_scoped_per_interview() {
        let cache = ProvenanceCache::new(Arc::new(LocalStore::in_memory()));
        cache.mark_ai(1, 7).unwrap();
        assert!(cache.ai_ids(2).is_empty());
        assert_eq!(cache.tag(2, vec![question(7)])[0].source, QuestionSource::Manual);
    }

    #[test]
    fn test_forget_last_id_removes_key() {
        let store = Arc::new(LocalStore::in_memory());
        let cache = ProvenanceCache::new(store.clone());
        cache.mark_ai(3, 9).unwrap();
        cache.forget(3, 9).unwrap();
        assert_eq!(store.get("ai-questions:3"), None);
    }

    #[test]
    fn test_clearing_cache_loses_provenance() {
        let cache = ProvenanceCache::new(Arc::new(LocalStore::in_memory()));
        cache.mark_ai(1, 1).unwrap();
        cache.clear(1).unwrap();
        assert_eq!(cache.tag(1, vec![question(1)])[0].source, QuestionSource::Manual);
    }
}
