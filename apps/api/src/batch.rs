//! Batch operations with per-item result accounting.
//!
//! Items run strictly one after another. A failing item is recorded and the
//! loop moves on; the batch itself never fails.

use std::future::Future;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Every item succeeded (including the empty batch).
    Full,
    Partial,
    None,
}

#[derive(Debug)]
pub struct ItemFailure<I, E> {
    /// Position of the item in the input.
    pub index: usize,
    pub item: I,
    pub error: E,
}

#[derive(Debug)]
pub struct BatchResult<I, O, E> {
    pub succeeded: Vec<O>,
    pub failed: Vec<ItemFailure<I, E>>,
}

impl<I, O, E> BatchResult<I, O, E> {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn outcome(&self) -> BatchOutcome {
        match (self.succeeded.len(), self.failed.len()) {
            (_, 0) => BatchOutcome::Full,
            (0, _) => BatchOutcome::None,
            _ => BatchOutcome::Partial,
        }
    }
}

/// Applies `op` to each item in order, awaiting each before starting the next.
pub async fn run_sequential<I, O, E, F, Fut>(items: Vec<I>, mut op: F) -> BatchResult<I, O, E>
where
    I: Clone,
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<O, E>>,
{
    let mut result = BatchResult {
        succeeded: Vec::with_capacity(items.len()),
        failed: Vec::new(),
    };

    for (index, item) in items.into_iter().enumerate() {
        match op(item.clone()).await {
            Ok(output) => result.succeeded.push(output),
            Err(error) => result.failed.push(ItemFailure { index, item, error }),
        }
    }

    result
}
