//! The `User` entity and its client-facing input form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  error::{Result, ValidationError},
  escape, password,
  role::Role,
};

/// A stored user. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
  pub id:            u32,
  pub name:          String,
  pub email:         String,
  #[serde(skip)]
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Which rule set [`UserInput::validate`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Create,
  Update,
  Login,
}

/// A user as submitted by a client. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserInput {
  pub name:     String,
  pub email:    String,
  pub password: String,
  /// Role bitmask; kept raw so an unknown value is a validation error
  /// rather than a parse failure.
  pub role:     Option<u32>,
}

impl UserInput {
  pub fn prepare(&mut self) {
    self.name = escape::clean(&self.name);
    self.email = escape::clean(&self.email);
  }

  /// Check required fields in a fixed order and report the first failure.
  pub fn validate(&self, action: Action) -> Result<(), ValidationError> {
    if action != Action::Login && self.name.is_empty() {
      return Err(ValidationError::RequiredName);
    }
    if self.password.is_empty() {
      return Err(ValidationError::RequiredPassword);
    }
    if self.email.is_empty() {
      return Err(ValidationError::RequiredEmail);
    }
    match (action, self.role) {
      (Action::Create, None | Some(0)) => {
        return Err(ValidationError::RequiredRole);
      }
      (Action::Create | Action::Update, Some(bits))
        if Role::from_bits(bits).is_none() =>
      {
        return Err(ValidationError::InvalidRole);
      }
      _ => {}
    }
    if !escape::is_valid_email(&self.email) {
      return Err(ValidationError::InvalidEmail);
    }
    Ok(())
  }

  pub fn role(&self) -> Option<Role> { self.role.and_then(Role::from_bits) }

  /// Hash the password and produce the record to insert.
  pub fn into_new_user(self) -> Result<NewUser> {
    let role = self.role().ok_or(ValidationError::RequiredRole)?;
    Ok(NewUser {
      password_hash: password::hash(&self.password)?,
      name: self.name,
      email: self.email,
      role,
    })
  }

  /// Hash the password and produce the replacement fields. The role is only
  /// carried over when the caller may change roles.
  pub fn into_changes(self, may_change_role: bool) -> Result<UserChanges> {
    let role = if may_change_role { self.role() } else { None };
    Ok(UserChanges {
      password_hash: password::hash(&self.password)?,
      name: self.name,
      email: self.email,
      role,
    })
  }
}

/// A validated user ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
}

/// Replacement fields for an existing user. `role: None` keeps the stored
/// role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Option<Role>,
}
