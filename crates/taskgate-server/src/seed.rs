//! First-run demo data: one manager, two technicians and a task each.

use taskgate_core::{
  Role,
  cipher::SummaryCipher,
  store::DataStore,
  task::TaskInput,
  user::{Action, UserInput},
};

use crate::{Error, Result};

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "123";

const SEED: [(&str, &str, Role, &str); 3] = [
  ("Felipe Galdino", "felipegaldino16@gmail.com", Role::Manager, "Hello world 4"),
  ("David Cossette", "david.cossette@gmail.com", Role::Technician, "Hello world 5"),
  ("Mary Robbins", "mary.robbins@gmail.com", Role::Technician, "Hello world 6"),
];

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

/// Insert the demo users and tasks unless the store already has users.
/// Returns whether anything was written.
pub async fn seed<S: DataStore>(store: &S, cipher: &SummaryCipher) -> Result<bool> {
  if store.count_users().await.map_err(store_err)? > 0 {
    return Ok(false);
  }

  for (name, email, role, summary) in SEED {
    let mut input = UserInput {
      name:     name.to_owned(),
      email:    email.to_owned(),
      password: SEED_PASSWORD.to_owned(),
      role:     Some(role.bits()),
    };
    input.prepare();
    input.validate(Action::Create).map_err(taskgate_core::Error::from)?;
    let user = store
      .add_user(input.into_new_user()?)
      .await
      .map_err(store_err)?;

    let task = TaskInput {
      summary: summary.to_owned(),
      user_id: Some(user.id),
    }
    .prepare(cipher)?;
    store.add_task(task).await.map_err(store_err)?;

    tracing::info!(user_id = user.id, role = %role, "seeded user");
  }

  Ok(true)
}

#[cfg(test)]
mod tests {
  use taskgate_core::{password, store::TaskQuery};
  use taskgate_store_sqlite::SqliteStore;

  use super::*;

  #[tokio::test]
  async fn seeds_an_empty_store_once() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let cipher = SummaryCipher::new("seed-test");

    assert!(seed(&store, &cipher).await.unwrap());
    assert!(!seed(&store, &cipher).await.unwrap());

    assert_eq!(store.count_users().await.unwrap(), 3);
    let tasks = store.list_tasks(&TaskQuery::default()).await.unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(cipher.decrypt(&tasks[0].summary).unwrap(), "Hello world 4");
  }

  #[tokio::test]
  async fn seeded_accounts_use_the_shared_password() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    seed(&store, &SummaryCipher::new("seed-test")).await.unwrap();

    let manager = store
      .find_user_by_email("felipegaldino16@gmail.com")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(manager.role, Role::Manager);
    assert!(password::verify(&manager.password_hash, SEED_PASSWORD).is_ok());
  }
}
