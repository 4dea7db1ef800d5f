//! In-memory stand-ins for the REST backend and the AI client.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::boundary::{BoundaryRegistry, TracingReporter};
use crate::interview_ai::feedback::{
    ApplicantFeedback, FeedbackRequest, PerformanceAnalysis, PersonalityProfile,
};
use crate::interview_ai::{GeneratedQuestion, InterviewAi};
use crate::llm_client::LlmError;
use crate::models::question::Difficulty;
use crate::provenance::ProvenanceCache;
use crate::rest::{RestBackend, RestError};
use crate::settings::SettingsStore;
use crate::state::AppState;
use crate::store::LocalStore;

type RejectFn = Box<dyn Fn(&str, &Value) -> bool + Send + Sync>;

/// Table backend that understands `resource?col=eq.value` filters.
pub struct FakeRest {
    tables: Mutex<BTreeMap<String, Vec<Value>>>,
    next_id: AtomicUsize,
    reject_post: Mutex<Option<RejectFn>>,
    fail_reads: Mutex<bool>,
    failing_resources: Mutex<BTreeSet<String>>,
    pub calls: Mutex<Vec<String>>,
}

fn decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn parse_path(path: &str) -> (String, Vec<(String, String)>) {
    let (resource, query) = path.split_once('?').unwrap_or((path, ""));
    let filters = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter_map(|(col, op)| op.strip_prefix("eq.").map(|v| (col.to_string(), decode(v))))
        .collect();
    (resource.trim_start_matches('/').to_string(), filters)
}

fn matches(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(col, expected)| match row.get(col) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

impl FakeRest {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(BTreeMap::new()),
            next_id: AtomicUsize::new(1),
            reject_post: Mutex::new(None),
            fail_reads: Mutex::new(false),
            failing_resources: Mutex::new(BTreeSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Inserts a row directly, assigning an id. Returns the id.
    pub fn seed(&self, resource: &str, mut row: Value) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        row["id"] = json!(id);
        self.tables
            .lock()
            .unwrap()
            .entry(resource.to_string())
            .or_default()
            .push(row);
        id
    }

    pub fn rows(&self, resource: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes POSTs for which `reject` returns true fail with a 400.
    pub fn reject_posts_where(&self, reject: impl Fn(&str, &Value) -> bool + Send + Sync + 'static) {
        *self.reject_post.lock().unwrap() = Some(Box::new(reject));
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }

    /// Makes GETs against one resource fail while the rest keep working.
    pub fn fail_reads_of(&self, resource: &str) {
        self.failing_resources
            .lock()
            .unwrap()
            .insert(resource.to_string());
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RestBackend for FakeRest {
    async fn get(&self, path: &str) -> Result<Vec<Value>, RestError> {
        self.log(format!("GET {path}"));
        let (resource, filters) = parse_path(path);
        if *self.fail_reads.lock().unwrap() || self.failing_resources.lock().unwrap().contains(&resource) {
            return Err(RestError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self
            .rows(&resource)
            .into_iter()
            .filter(|row| matches(row, &filters))
            .collect())
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Vec<Value>, RestError> {
        self.log(format!("POST {path}"));
        let (resource, _) = parse_path(path);
        if let Some(reject) = self.reject_post.lock().unwrap().as_ref() {
            if reject(&resource, body) {
                return Err(RestError::Status {
                    status: 400,
                    body: "rejected".to_string(),
                });
            }
        }
        let id = self.seed(&resource, body.clone());
        let mut row = body.clone();
        row["id"] = json!(id);
        Ok(vec![row])
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Vec<Value>, RestError> {
        self.log(format!("PATCH {path}"));
        let (resource, filters) = parse_path(path);
        let mut tables = self.tables.lock().unwrap();
        let mut updated = Vec::new();
        for row in tables.entry(resource).or_default().iter_mut() {
            if matches(row, &filters) {
                if let (Some(row), Some(patch)) = (row.as_object_mut(), body.as_object()) {
                    row.extend(patch.clone());
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, path: &str) -> Result<(), RestError> {
        self.log(format!("DELETE {path}"));
        let (resource, filters) = parse_path(path);
        if let Some(rows) = self.tables.lock().unwrap().get_mut(&resource) {
            rows.retain(|row| !matches(row, &filters));
        }
        Ok(())
    }
}

pub fn sample_feedback() -> ApplicantFeedback {
    ApplicantFeedback {
        overall_score: 78,
        recommendation: "Proceed to the next round.".to_string(),
        personality_profile: PersonalityProfile {
            traits: vec!["methodical".to_string()],
            communication_style: "Clear".to_string(),
            confidence: 70,
        },
        performance_analysis: PerformanceAnalysis {
            strengths: vec!["ownership model".to_string()],
            weaknesses: vec!["async".to_string()],
            technical_skills: vec!["Rust".to_string()],
        },
        improvement_suggestions: vec!["Practice tokio".to_string()],
    }
}

/// AI client returning canned drafts and feedback.
pub struct FakeAi {
    pub drafts: Vec<GeneratedQuestion>,
    pub fail: bool,
    pub question_calls: AtomicUsize,
    pub feedback_calls: AtomicUsize,
    pub last_feedback_request: Mutex<Option<FeedbackRequest>>,
}

impl FakeAi {
    pub fn with_drafts(texts: &[&str]) -> Self {
        Self {
            drafts: texts
                .iter()
                .map(|t| GeneratedQuestion {
                    question: t.to_string(),
                    difficulty: Difficulty::Intermediate,
                })
                .collect(),
            fail: false,
            question_calls: AtomicUsize::new(0),
            feedback_calls: AtomicUsize::new(0),
            last_feedback_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_drafts(&[])
        }
    }
}

fn provider_down() -> LlmError {
    LlmError::Api {
        status: 529,
        message: "overloaded".to_string(),
    }
}

#[async_trait]
impl InterviewAi for FakeAi {
    async fn generate_questions(
        &self,
        _job_role: &str,
        _existing_questions: &[String],
    ) -> Result<Vec<GeneratedQuestion>, LlmError> {
        self.question_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(provider_down());
        }
        Ok(self.drafts.clone())
    }

    async fn generate_applicant_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<ApplicantFeedback, LlmError> {
        self.feedback_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_feedback_request.lock().unwrap() = Some(request.clone());
        if self.fail {
            return Err(provider_down());
        }
        Ok(sample_feedback())
    }
}

/// Application state over `rest`, an in-memory store and a two-draft AI.
pub fn app_state(rest: Arc<FakeRest>) -> AppState {
    let store = Arc::new(LocalStore::in_memory());
    AppState {
        rest,
        ai: Arc::new(FakeAi::with_drafts(&["Generated one?", "Generated two?"])),
        settings: Arc::new(SettingsStore::load(store.clone())),
        provenance: ProvenanceCache::new(store),
        fault_reporter: Arc::new(TracingReporter),
        boundaries: Arc::new(BoundaryRegistry::default()),
    }
}
