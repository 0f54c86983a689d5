//! Port contract for notification enqueueing.

use crate::notify::domain::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Enqueues workflow notifications for later delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Enqueues one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Enqueue`] when the notification could not be
    /// queued; callers treat this as fatal for the enclosing operation.
    async fn enqueue(&self, notification: Notification) -> NotifyResult<()>;

    /// Enqueues a batch of notifications, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Enqueue`] from the first failing enqueue.
    async fn enqueue_all(&self, notifications: Vec<Notification>) -> NotifyResult<()> {
        for notification in notifications {
            self.enqueue(notification).await?;
        }
        Ok(())
    }
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Queueing-layer failure.
    #[error("notification enqueue error: {0}")]
    Enqueue(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifyError {
    /// Wraps an enqueue error.
    pub fn enqueue(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Enqueue(Arc::new(err))
    }
}
