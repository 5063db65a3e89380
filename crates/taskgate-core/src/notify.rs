//! Activity notifications.
//!
//! Requests made by technicians are announced on a queue so a manager-side
//! consumer can follow them. Delivery is fire-and-forget.

use thiserror::Error;

/// Name of the queue notifications are published on.
pub const NOTIFICATION_QUEUE: &str = "notification-queue";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
  #[error("notification queue is full")]
  Full,

  #[error("notification queue is closed")]
  Closed,

  #[error("failed to publish notification: {0}")]
  Backend(String),
}

/// A sink for notification payloads. Object safe so the HTTP layer can hold
/// any implementation behind `Arc<dyn Publisher>`.
pub trait Publisher: Send + Sync {
  fn publish(&self, payload: &[u8]) -> Result<(), PublishError>;
}

/// A technician request, as announced on the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub subject_id: u32,
  pub method:     String,
  pub url:        String,
}

impl Notification {
  pub fn new(
    subject_id: u32,
    method: impl Into<String>,
    url: impl Into<String>,
  ) -> Self {
    Self {
      subject_id,
      method: method.into(),
      url: url.into(),
    }
  }

  pub fn message(&self) -> String {
    format!(
      "User {} tried to perform a {} request in the URL: {}",
      self.subject_id, self.method, self.url
    )
  }

  pub fn send(&self, publisher: &dyn Publisher) -> Result<(), PublishError> {
    publisher.publish(self.message().as_bytes())
  }
}
