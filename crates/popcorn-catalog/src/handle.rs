//! Cancellable in-flight catalog request.
//!
//! A [`RequestHandle`] owns a spawned request task and the
//! [`CancellationToken`] that stops it. Whoever issues a newer request of the
//! same kind calls [`RequestHandle::cancel`] on the old one; the task then
//! resolves to [`CatalogError::Cancelled`] no matter how the network call
//! would have ended.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::CatalogError;

pub struct RequestHandle<T> {
    cancel: CancellationToken,
    task: JoinHandle<Result<T, CatalogError>>,
}

impl<T: Send + 'static> RequestHandle<T> {
    /// Spawn `request` on the current runtime, racing it against cancellation.
    pub fn spawn<F>(request: F) -> Self
    where
        F: Future<Output = Result<T, CatalogError>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_clone.cancelled() => Err(CatalogError::Cancelled),
                result = request => result,
            }
        });

        Self { cancel, task }
    }
}

impl<T> RequestHandle<T> {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A token that cancels this request; stays usable after `join` consumes the handle.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the outcome.
    ///
    /// Once `cancel` has been called the result is always `Cancelled`, even if
    /// the response happened to arrive first.
    pub async fn join(self) -> Result<T, CatalogError> {
        let outcome = match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(CatalogError::Cancelled),
            Err(e) => Err(CatalogError::Transport(format!("request task failed: {}", e))),
        };

        if self.cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }
        outcome
    }
}
