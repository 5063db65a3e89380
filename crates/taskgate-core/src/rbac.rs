//! Role-based access decisions.
//!
//! Every decision is a pure function of the caller's [`Claims`] and, where a
//! resource is involved, the id of the identity that owns it. Managers are
//! allowed everything, technicians only what they own, and any other role
//! value is denied.

use thiserror::Error;

use crate::{role::Role, token::Claims};

/// The caller is authenticated but may not perform the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("user not authorized")]
pub struct Forbidden;

/// Which tasks a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
  All,
  OwnedBy(u32),
}

/// Access to a resource owned by `owner_id`. For users, the owner of a user
/// record is the user itself.
pub fn authorize_owned(claims: &Claims, owner_id: u32) -> Result<(), Forbidden> {
  match claims.role() {
    Some(Role::Manager) => Ok(()),
    Some(Role::Technician) if claims.user_id == owner_id => Ok(()),
    _ => Err(Forbidden),
  }
}

/// Manager-only operations: creating and listing users.
pub fn require_manager(claims: &Claims) -> Result<(), Forbidden> {
  match claims.role() {
    Some(Role::Manager) => Ok(()),
    _ => Err(Forbidden),
  }
}

pub fn task_scope(claims: &Claims) -> Result<TaskScope, Forbidden> {
  match claims.role() {
    Some(Role::Manager) => Ok(TaskScope::All),
    Some(Role::Technician) => Ok(TaskScope::OwnedBy(claims.user_id)),
    None => Err(Forbidden),
  }
}

/// A new task must be owned by its creator, whatever the creator's role.
pub fn authorize_task_create(
  claims: &Claims,
  owner_id: u32,
) -> Result<(), Forbidden> {
  match claims.role() {
    Some(_) if claims.user_id == owner_id => Ok(()),
    _ => Err(Forbidden),
  }
}

/// Naming a new owner on update. Technicians may only name themselves.
pub fn authorize_reassign(
  claims: &Claims,
  new_owner: u32,
) -> Result<(), Forbidden> {
  authorize_owned(claims, new_owner)
}
