//! Access-code delivery.
//!
//! Registration hands the freshly issued code to an [`AccessCodeNotifier`].
//! Delivery is best-effort: callers log failures and never undo the
//! registration because of them.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Content of an access-code email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeMessage {
    pub guest_id: Uuid,
    pub recipient_email: String,
    pub recipient_name: String,
    pub access_code: String,
    pub event_slug: String,
    pub event_name: String,
}

/// Delivery failure.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Notifier configuration error: {0}")]
    Configuration(String),

    #[error("Failed to deliver access code: {0}")]
    Delivery(String),
}

/// Sends a guest their access code.
#[async_trait::async_trait]
pub trait AccessCodeNotifier: Send + Sync {
    async fn send_access_code(&self, message: &AccessCodeMessage) -> Result<(), NotifierError>;
}

/// Notifier that keeps every message in memory.
///
/// Used by tests to assert on what would have been sent.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<AccessCodeMessage>>>,
    simulate_failure: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records nothing and fails every delivery.
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            simulate_failure: true,
        }
    }

    /// Snapshot of the messages delivered so far.
    pub fn sent(&self) -> Vec<AccessCodeMessage> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait::async_trait]
impl AccessCodeNotifier for RecordingNotifier {
    async fn send_access_code(&self, message: &AccessCodeMessage) -> Result<(), NotifierError> {
        if self.simulate_failure {
            tracing::warn!(
                guest_id = %message.guest_id,
                "Recording notifier simulating failure"
            );
            return Err(NotifierError::Delivery("Simulated failure".to_string()));
        }

        let mut sent = match self.sent.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sent.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> AccessCodeMessage {
        AccessCodeMessage {
            guest_id: Uuid::new_v4(),
            recipient_email: "ada@example.com".into(),
            recipient_name: "Ada".into(),
            access_code: "A1B2C3".into(),
            event_slug: "demo".into(),
            event_name: "Demo".into(),
        }
    }

    #[tokio::test]
    async fn test_recording_notifier_records() {
        let notifier = RecordingNotifier::new();
        let msg = message();
        notifier.send_access_code(&msg).await.unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], msg);
    }

    #[tokio::test]
    async fn test_recording_notifier_clones_share_storage() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        notifier.send_access_code(&message()).await.unwrap();
        assert_eq!(handle.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_notifier() {
        let notifier = RecordingNotifier::failing();
        let result = notifier.send_access_code(&message()).await;
        assert!(matches!(result, Err(NotifierError::Delivery(_))));
        assert!(notifier.sent().is_empty());
    }
}
