//! The `Task` entity. Summaries are stored encrypted and only ever leave
//! the process as plaintext after [`Task::open`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  cipher::{DecryptionError, SummaryCipher},
  error::{Result, ValidationError},
  escape,
};

/// Longest summary kept, in characters, after escaping.
pub const MAX_SUMMARY_CHARS: usize = 2500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
  pub id:         u64,
  /// Ciphertext as loaded from the store, plaintext after [`Task::open`].
  pub summary:    String,
  pub user_id:    u32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Task {
  pub fn open(mut self, cipher: &SummaryCipher) -> Result<Self, DecryptionError> {
    self.summary = cipher.decrypt(&self.summary)?;
    Ok(self)
  }
}

/// A task as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskInput {
  pub summary: String,
  pub user_id: Option<u32>,
}

impl TaskInput {
  /// Normalise, truncate, validate and encrypt a task for insertion.
  pub fn prepare(self, cipher: &SummaryCipher) -> Result<NewTask> {
    let summary = normalise(&self.summary)?;
    let user_id = match self.user_id {
      Some(id) if id != 0 => id,
      _ => return Err(ValidationError::RequiredUser.into()),
    };
    Ok(NewTask {
      summary: cipher.encrypt(&summary)?,
      user_id,
    })
  }

  /// As [`TaskInput::prepare`], but the owner is optional.
  pub fn prepare_changes(self, cipher: &SummaryCipher) -> Result<TaskChanges> {
    let summary = normalise(&self.summary)?;
    if self.user_id == Some(0) {
      return Err(ValidationError::RequiredUser.into());
    }
    Ok(TaskChanges {
      summary: cipher.encrypt(&summary)?,
      user_id: self.user_id,
    })
  }
}

fn normalise(raw: &str) -> Result<String, ValidationError> {
  let mut summary = escape::clean(raw);
  escape::truncate_chars(&mut summary, MAX_SUMMARY_CHARS);
  if summary.is_empty() {
    return Err(ValidationError::RequiredSummary);
  }
  Ok(summary)
}

/// A validated task with its summary already encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
  pub summary: String,
  pub user_id: u32,
}

/// Replacement fields for an existing task. `user_id: None` keeps the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
  pub summary: String,
  pub user_id: Option<u32>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn cipher() -> SummaryCipher { SummaryCipher::new("task-tests") }

  fn input(summary: &str, user_id: Option<u32>) -> TaskInput {
    TaskInput { summary: summary.into(), user_id }
  }

  #[test]
  fn prepared_summary_is_encrypted_and_recoverable() {
    let cipher = cipher();
    let new = input("  replace <valve>  ", Some(4)).prepare(&cipher).unwrap();
    assert_ne!(new.summary, "replace &lt;valve&gt;");
    assert_eq!(new.user_id, 4);
    assert_eq!(cipher.decrypt(&new.summary).unwrap(), "replace &lt;valve&gt;");
  }

  #[test]
  fn long_summaries_are_truncated() {
    let cipher = cipher();
    let new = input(&"a".repeat(3000), Some(1)).prepare(&cipher).unwrap();
    assert_eq!(cipher.decrypt(&new.summary).unwrap().chars().count(), MAX_SUMMARY_CHARS);
  }

  #[test]
  fn blank_summary_is_required() {
    let err = input("   ", Some(1)).prepare(&cipher()).unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::RequiredSummary)));
  }

  #[test]
  fn owner_is_required_on_create() {
    for user_id in [None, Some(0)] {
      let err = input("x", user_id).prepare(&cipher()).unwrap_err();
      assert!(matches!(err, Error::Validation(ValidationError::RequiredUser)));
    }
  }

  #[test]
  fn owner_is_optional_on_update() {
    let changes = input("x", None).prepare_changes(&cipher()).unwrap();
    assert_eq!(changes.user_id, None);
    let err = input("x", Some(0)).prepare_changes(&cipher()).unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::RequiredUser)));
  }

  #[test]
  fn open_decrypts_and_rejects_foreign_ciphertext() {
    let cipher = cipher();
    let now = Utc::now();
    let task = Task {
      id:         1,
      summary:    cipher.encrypt("hello").unwrap(),
      user_id:    1,
      created_at: now,
      updated_at: now,
    };
    assert_eq!(task.clone().open(&cipher).unwrap().summary, "hello");
    assert_eq!(
      task.open(&SummaryCipher::new("other")).unwrap_err(),
      DecryptionError::Authentication
    );
  }
}
