use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(user_id: Uuid, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Fire-and-forget delivery channel. The coordinator logs delivery failures
/// and never retries; transitions are already committed by the time a
/// notification is dispatched.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), Error>;
}

/// Delivery channel of last resort; keeps local runs observable.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), Error> {
        tracing::info!(
            user_id = %notification.user_id,
            title = %notification.title,
            body = %notification.body,
            "notification"
        );

        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// Records everything it is asked to deliver so tests can assert exact
    /// notification counts per transition.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: Notification) -> Result<(), Error> {
            self.sent.lock().await.push(notification);

            Ok(())
        }
    }
}
