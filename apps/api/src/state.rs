use std::sync::Arc;

use crate::boundary::{BoundaryRegistry, FaultReporter};
use crate::interview_ai::InterviewAi;
use crate::provenance::ProvenanceCache;
use crate::rest::RestBackend;
use crate::settings::SettingsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub rest: Arc<dyn RestBackend>,
    /// Pluggable AI backend. Default: `LlmInterviewAi`.
    pub ai: Arc<dyn InterviewAi>,
    /// Created once at startup from the local store; lives for the whole process.
    pub settings: Arc<SettingsStore>,
    pub provenance: ProvenanceCache,
    /// Receives every render fault caught by a page boundary.
    pub fault_reporter: Arc<dyn FaultReporter>,
    /// Views whose boundary gave up, until manually reset.
    pub boundaries: Arc<BoundaryRegistry>,
}
