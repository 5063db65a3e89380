//! Integration tests for `SqliteStore` against an in-memory database.

use taskgate_core::{
  Role,
  store::{DataStore, StoreError, StoreErrorKind, TaskQuery, UniqueField},
  task::{NewTask, TaskChanges},
  user::{NewUser, UserChanges},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(name: &str, role: Role) -> NewUser {
  NewUser {
    name:          name.to_owned(),
    email:         format!("{}@example.com", name.to_lowercase()),
    password_hash: "$argon2id$placeholder".to_owned(),
    role,
  }
}

fn new_task(summary: &str, user_id: u32) -> NewTask {
  NewTask {
    summary: summary.to_owned(),
    user_id,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let user = s.add_user(new_user("Mary", Role::Technician)).await.unwrap();
  assert_eq!(user.role, Role::Technician);
  assert_eq!(user.created_at, user.updated_at);

  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(fetched, user);
}

#[tokio::test]
async fn missing_user_is_none() {
  let s = store().await;
  assert!(s.get_user(99).await.unwrap().is_none());
  assert!(s.find_user_by_email("ghost@example.com").await.unwrap().is_none());
  assert_eq!(s.delete_user(99).await.unwrap(), 0);
}

#[tokio::test]
async fn find_user_by_email() {
  let s = store().await;
  let user = s.add_user(new_user("David", Role::Technician)).await.unwrap();

  let found = s.find_user_by_email("david@example.com").await.unwrap().unwrap();
  assert_eq!(found.id, user.id);
  assert_eq!(found.password_hash, "$argon2id$placeholder");
}

#[tokio::test]
async fn duplicate_name_and_email_are_typed_conflicts() {
  let s = store().await;
  s.add_user(new_user("Felipe", Role::Manager)).await.unwrap();

  let mut same_name = new_user("Felipe", Role::Manager);
  same_name.email = "felipe.other@example.com".to_owned();
  let err = s.add_user(same_name).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::Conflict(UniqueField::Name));

  let mut other = new_user("Other", Role::Manager);
  other.email = "felipe@example.com".to_owned();
  let err = s.add_user(other).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::Conflict(UniqueField::Email));
}

#[tokio::test]
async fn list_and_count_users() {
  let s = store().await;
  assert_eq!(s.count_users().await.unwrap(), 0);
  for name in ["A", "B", "C"] {
    s.add_user(new_user(name, Role::Technician)).await.unwrap();
  }

  assert_eq!(s.count_users().await.unwrap(), 3);
  assert_eq!(s.list_users(100).await.unwrap().len(), 3);
  assert_eq!(s.list_users(2).await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_user_keeps_role_when_not_given() {
  let s = store().await;
  let user = s.add_user(new_user("Mary", Role::Technician)).await.unwrap();

  let changes = UserChanges {
    name:          "Mary R".to_owned(),
    email:         "mary.r@example.com".to_owned(),
    password_hash: "$argon2id$new".to_owned(),
    role:          None,
  };
  let updated = s.update_user(user.id, changes.clone()).await.unwrap().unwrap();
  assert_eq!(updated.name, "Mary R");
  assert_eq!(updated.role, Role::Technician);
  assert!(updated.updated_at >= user.updated_at);

  let promoted = s
    .update_user(user.id, UserChanges { role: Some(Role::Manager), ..changes.clone() })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(promoted.role, Role::Manager);

  assert!(s.update_user(999, changes).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_user_cascades_to_its_tasks() {
  let s = store().await;
  let user = s.add_user(new_user("Mary", Role::Technician)).await.unwrap();
  let task = s.add_task(new_task("cipher", user.id)).await.unwrap();

  assert_eq!(s.delete_user(user.id).await.unwrap(), 1);
  assert!(s.get_task(task.id).await.unwrap().is_none());
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_task() {
  let s = store().await;
  let user = s.add_user(new_user("Mary", Role::Technician)).await.unwrap();

  let task = s.add_task(new_task("opaque", user.id)).await.unwrap();
  assert_eq!(task.user_id, user.id);

  let fetched = s.get_task(task.id).await.unwrap().unwrap();
  assert_eq!(fetched, task);
  assert!(s.get_task(u64::MAX).await.unwrap().is_none());
}

#[tokio::test]
async fn task_for_missing_owner_is_missing_reference() {
  let s = store().await;
  let err = s.add_task(new_task("orphan", 42)).await.unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::MissingReference);
}

#[tokio::test]
async fn list_tasks_filters_by_owner() {
  let s = store().await;
  let a = s.add_user(new_user("A", Role::Technician)).await.unwrap();
  let b = s.add_user(new_user("B", Role::Technician)).await.unwrap();
  s.add_task(new_task("a1", a.id)).await.unwrap();
  s.add_task(new_task("a2", a.id)).await.unwrap();
  s.add_task(new_task("b1", b.id)).await.unwrap();

  assert_eq!(s.list_tasks(&TaskQuery::default()).await.unwrap().len(), 3);

  let owned = s
    .list_tasks(&TaskQuery { owner: Some(a.id), limit: None })
    .await
    .unwrap();
  assert_eq!(owned.len(), 2);
  assert!(owned.iter().all(|t| t.user_id == a.id));

  let capped = s
    .list_tasks(&TaskQuery { owner: None, limit: Some(1) })
    .await
    .unwrap();
  assert_eq!(capped.len(), 1);
}

#[tokio::test]
async fn update_task_replaces_summary_and_optionally_owner() {
  let s = store().await;
  let a = s.add_user(new_user("A", Role::Technician)).await.unwrap();
  let b = s.add_user(new_user("B", Role::Technician)).await.unwrap();
  let task = s.add_task(new_task("old", a.id)).await.unwrap();

  let kept = s
    .update_task(task.id, TaskChanges { summary: "new".into(), user_id: None })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(kept.summary, "new");
  assert_eq!(kept.user_id, a.id);

  let moved = s
    .update_task(task.id, TaskChanges { summary: "newer".into(), user_id: Some(b.id) })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(moved.user_id, b.id);

  let err = s
    .update_task(task.id, TaskChanges { summary: "x".into(), user_id: Some(77) })
    .await
    .unwrap_err();
  assert_eq!(err.kind(), StoreErrorKind::MissingReference);

  assert!(
    s.update_task(999, TaskChanges { summary: "x".into(), user_id: None })
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn delete_task_reports_rows_removed() {
  let s = store().await;
  let a = s.add_user(new_user("A", Role::Technician)).await.unwrap();
  let task = s.add_task(new_task("gone", a.id)).await.unwrap();

  assert_eq!(s.delete_task(task.id).await.unwrap(), 1);
  assert_eq!(s.delete_task(task.id).await.unwrap(), 0);
}
