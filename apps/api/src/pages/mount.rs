//! Mount tracking for page loads.
//!
//! Page work runs on its own task so that a disconnecting client never cuts a
//! mutation sequence short. The result is delivered only while the requester
//! is still mounted; a late completion is dropped without error.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::debug;

use crate::errors::AppError;

#[derive(Clone)]
pub struct Mount(Arc<AtomicBool>);

impl Mount {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Unmounts when dropped.
    pub fn guard(&self) -> MountGuard {
        MountGuard(self.clone())
    }

    /// Hands `value` to the requester if still mounted. Returns whether it was delivered.
    pub fn deliver<T>(&self, label: &str, tx: oneshot::Sender<T>, value: T) -> bool {
        if !self.is_mounted() {
            debug!("{label} finished after unmount; result discarded");
            return false;
        }
        tx.send(value).is_ok()
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MountGuard(Mount);

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.0.unmount();
    }
}

/// Runs `work` on a detached task and waits for it while mounted.
///
/// Dropping the returned future unmounts: `work` still runs to completion
/// but its result is discarded.
pub async fn run_mounted<T, F>(label: &'static str, work: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>> + Send + 'static,
    T: Send + 'static,
{
    let mount = Mount::new();
    let _guard = mount.guard();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = work.await;
        mount.deliver(label, tx, result);
    });

    rx.await
        .map_err(|_| AppError::Internal(anyhow::anyhow!("{label} task ended without a result")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_delivers_while_mounted() {
        let value = run_mounted("page", async { Ok::<_, AppError>(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_unmounted_delivery_is_a_no_op() {
        let mount = Mount::new();
        let (tx, mut rx) = oneshot::channel::<u8>();
        mount.unmount();
        assert!(!mount.deliver("page", tx, 1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_guard_unmounts_on_drop() {
        let mount = Mount::new();
        drop(mount.guard());
        assert!(!mount.is_mounted());
    }

    #[tokio::test]
    async fn test_work_finishes_after_requester_goes_away() {
        let release = Arc::new(Notify::new());
        let finished = Arc::new(AtomicUsize::new(0));

        let work = {
            let release = release.clone();
            let finished = finished.clone();
            async move {
                release.notified().await;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AppError>(())
            }
        };

        // The requester gives up before the work completes.
        let timed_out = tokio::time::timeout(Duration::from_millis(20), run_mounted("page", work)).await;
        assert!(timed_out.is_err());

        release.notify_one();
        for _ in 0..100 {
            if finished.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
