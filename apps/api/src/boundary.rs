//! Error boundary around page rendering.
//!
//! A render fault moves the boundary to `Faulted`; it then retries with
//! exponential backoff (1s, 2s, 4s) for at most three attempts. When retries
//! run out the caller gets a `Fallback` carrying the remaining actions and a
//! diagnostics report.
//!
//! ```text
//! Normal -> Faulted -> Retrying -> Normal
//!                   |           -> Faulted
//!                   -> (reset)  -> Normal
//! ```
//!
//! A view whose boundary ran out of retries stays tripped in the
//! [`BoundaryRegistry`] and keeps serving its fallback until it is reset.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

pub const MAX_RETRIES: u32 = 3;
const BASE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RenderFault {
    pub message: String,
}

impl From<serde_json::Error> for RenderFault {
    fn from(e: serde_json::Error) -> Self {
        Self {
            message: format!("view serialization failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoundaryState {
    Normal,
    Faulted { fault: String, retries: u32 },
    Retrying { attempt: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackAction {
    Retry,
    Reset,
    Reload,
    CopyDiagnostics,
}

/// What the caller shows instead of the faulted view.
#[derive(Debug, Clone, Serialize)]
pub struct Fallback {
    pub message: String,
    /// Key to pass back when resetting this view.
    pub view: String,
    pub actions: Vec<FallbackAction>,
    pub diagnostics: String,
}

/// Hook that receives every captured fault.
pub trait FaultReporter: Send + Sync {
    fn report(&self, fault: &RenderFault, diagnostics: &str);
}

/// Default reporter: forwards faults to the log.
pub struct TracingReporter;

impl FaultReporter for TracingReporter {
    fn report(&self, fault: &RenderFault, diagnostics: &str) {
        error!("Render fault: {fault}\n{diagnostics}");
    }
}

pub struct ErrorBoundary {
    label: String,
    state: BoundaryState,
    retries: u32,
    last_fault: Option<(RenderFault, DateTime<Utc>)>,
    reporter: Option<Arc<dyn FaultReporter>>,
    base_delay: Duration,
}

impl ErrorBoundary {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            state: BoundaryState::Normal,
            retries: 0,
            last_fault: None,
            reporter: None,
            base_delay: BASE_DELAY,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn FaultReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    /// Faulted with no retries left.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, BoundaryState::Faulted { .. }) && self.next_retry_delay().is_none()
    }

    /// Records a fault and moves to `Faulted`.
    pub fn capture(&mut self, fault: RenderFault) {
        self.state = BoundaryState::Faulted {
            fault: fault.message.clone(),
            retries: self.retries,
        };
        self.last_fault = Some((fault, Utc::now()));
        if let (Some(reporter), Some((fault, _))) = (&self.reporter, &self.last_fault) {
            reporter.report(fault, &self.diagnostics());
        }
    }

    /// Delay before the next retry, or `None` when not faulted or out of attempts.
    pub fn next_retry_delay(&self) -> Option<Duration> {
        match self.state {
            BoundaryState::Faulted { .. } if self.retries < MAX_RETRIES => {
                Some(self.base_delay * (1u32 << self.retries))
            }
            _ => None,
        }
    }

    /// Manual reset: back to `Normal` with a fresh retry budget.
    pub fn reset(&mut self) {
        info!("Boundary '{}' reset", self.label);
        self.state = BoundaryState::Normal;
        self.retries = 0;
        self.last_fault = None;
    }

    pub fn diagnostics(&self) -> String {
        let (fault, at) = match &self.last_fault {
            Some((fault, at)) => (fault.message.as_str(), at.to_rfc3339()),
            None => ("none", "-".to_string()),
        };
        format!(
            "Error: {fault}\nView: {}\nRetries: {}/{MAX_RETRIES}\nTime: {at}\nVersion: {}",
            self.label,
            self.retries,
            env!("CARGO_PKG_VERSION")
        )
    }

    pub fn fallback(&self) -> Fallback {
        let mut actions = Vec::with_capacity(4);
        if self.next_retry_delay().is_some() {
            actions.push(FallbackAction::Retry);
        }
        actions.extend([
            FallbackAction::Reset,
            FallbackAction::Reload,
            FallbackAction::CopyDiagnostics,
        ]);
        Fallback {
            message: format!("Something went wrong while rendering {}.", self.label),
            view: self.label.clone(),
            actions,
            diagnostics: self.diagnostics(),
        }
    }

    /// Renders through the boundary, retrying faults until the budget is spent.
    pub async fn run<T, F, Fut>(&mut self, mut render: F) -> Result<T, Fallback>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RenderFault>>,
    {
        match render().await {
            Ok(view) => return Ok(self.recovered(view)),
            Err(fault) => self.capture(fault),
        }

        while let Some(delay) = self.next_retry_delay() {
            self.retries += 1;
            self.state = BoundaryState::Retrying {
                attempt: self.retries,
            };
            warn!(
                "Render of '{}' failed, retry {}/{} after {}ms",
                self.label,
                self.retries,
                MAX_RETRIES,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;

            match render().await {
                Ok(view) => return Ok(self.recovered(view)),
                Err(fault) => self.capture(fault),
            }
        }

        Err(self.fallback())
    }

    fn recovered<T>(&mut self, view: T) -> T {
        if self.retries > 0 {
            info!("Render of '{}' recovered after {} retries", self.label, self.retries);
        }
        self.state = BoundaryState::Normal;
        self.retries = 0;
        self.last_fault = None;
        view
    }
}

/// Boundaries that gave up, keyed by view.
#[derive(Default)]
pub struct BoundaryRegistry {
    tripped: Mutex<BTreeMap<String, ErrorBoundary>>,
}

impl BoundaryRegistry {
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, ErrorBoundary>> {
        self.tripped.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The fallback a tripped view keeps showing, if any.
    pub fn fallback_for(&self, view: &str) -> Option<Fallback> {
        self.lock().get(view).map(ErrorBoundary::fallback)
    }

    /// Keeps an exhausted boundary so later requests see its fallback.
    pub fn trip(&self, boundary: ErrorBoundary) {
        if boundary.is_exhausted() {
            warn!("View '{}' tripped its error boundary", boundary.label());
            self.lock().insert(boundary.label().to_string(), boundary);
        }
    }

    /// Manual reset of one view. Unknown views are already `Normal`.
    pub fn reset(&self, view: &str) -> BoundaryState {
        match self.lock().remove(view) {
            Some(mut boundary) => {
                boundary.reset();
                boundary.state().clone()
            }
            None => BoundaryState::Normal,
        }
    }

    pub fn states(&self) -> BTreeMap<String, BoundaryState> {
        self.lock()
            .iter()
            .map(|(view, boundary)| (view.clone(), boundary.state().clone()))
            .collect()
    }
}
