//! Recording notifier for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::notify::{
    domain::Notification,
    ports::{Notifier, NotifyError, NotifyResult},
};

/// Notifier that records every enqueued notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every notification enqueued so far.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Enqueue`] when the backing lock is poisoned.
    pub fn sent(&self) -> NotifyResult<Vec<Notification>> {
        let sent = self
            .sent
            .read()
            .map_err(|err| NotifyError::enqueue(std::io::Error::other(err.to_string())))?;
        Ok(sent.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn enqueue(&self, notification: Notification) -> NotifyResult<()> {
        let mut sent = self
            .sent
            .write()
            .map_err(|err| NotifyError::enqueue(std::io::Error::other(err.to_string())))?;
        sent.push(notification);
        Ok(())
    }
}
