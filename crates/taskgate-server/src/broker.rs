//! In-process notification queue.
//!
//! [`QueuePublisher`] is the producer half handed to the API; the consumer
//! task drains the queue and logs every message.

use taskgate_core::notify::{NOTIFICATION_QUEUE, PublishError, Publisher};
use tokio::{
  sync::mpsc::{self, error::TrySendError},
  task::JoinHandle,
};

/// A bounded queue producer. Publishing never waits: a full queue is an
/// error.
#[derive(Debug, Clone)]
pub struct QueuePublisher {
  tx: mpsc::Sender<Vec<u8>>,
}

impl Publisher for QueuePublisher {
  fn publish(&self, payload: &[u8]) -> Result<(), PublishError> {
    self.tx.try_send(payload.to_vec()).map_err(|e| match e {
      TrySendError::Full(_) => PublishError::Full,
      TrySendError::Closed(_) => PublishError::Closed,
    })
  }
}

/// Create a queue holding up to `capacity` pending messages.
pub fn channel(capacity: usize) -> (QueuePublisher, mpsc::Receiver<Vec<u8>>) {
  let (tx, rx) = mpsc::channel(capacity.max(1));
  (QueuePublisher { tx }, rx)
}

/// Drain `rx` until every publisher is dropped.
pub fn spawn_consumer(mut rx: mpsc::Receiver<Vec<u8>>) -> JoinHandle<()> {
  tokio::spawn(async move {
    tracing::info!(queue = NOTIFICATION_QUEUE, "waiting for notifications");
    while let Some(payload) = rx.recv().await {
      tracing::info!(
        queue = NOTIFICATION_QUEUE,
        message = %String::from_utf8_lossy(&payload),
        "notification received"
      );
    }
    tracing::info!(queue = NOTIFICATION_QUEUE, "notification queue closed");
  })
}

#[cfg(test)]
mod tests {
  use taskgate_core::notify::Notification;

  use super::*;

  #[tokio::test]
  async fn published_messages_reach_the_receiver() {
    let (publisher, mut rx) = channel(4);
    Notification::new(2, "GET", "/tasks").send(&publisher).unwrap();

    let received = rx.recv().await.unwrap();
    assert_eq!(
      received,
      b"User 2 tried to perform a GET request in the URL: /tasks"
    );
  }

  #[tokio::test]
  async fn full_queue_is_an_error() {
    let (publisher, _rx) = channel(1);
    publisher.publish(b"first").unwrap();
    assert_eq!(publisher.publish(b"second"), Err(PublishError::Full));
  }

  #[tokio::test]
  async fn closed_queue_is_an_error() {
    let (publisher, rx) = channel(1);
    drop(rx);
    assert_eq!(publisher.publish(b"lost"), Err(PublishError::Closed));
  }

  #[tokio::test]
  async fn consumer_exits_when_publishers_are_gone() {
    let (publisher, rx) = channel(8);
    let consumer = spawn_consumer(rx);
    publisher.publish(b"hello").unwrap();
    drop(publisher);
    consumer.await.unwrap();
  }
}
