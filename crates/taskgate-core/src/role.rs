//! User roles.
//!
//! Roles travel as bitmask integers (`Manager = 0b01`, `Technician = 0b10`)
//! in request bodies, token claims and the database, but every check in this
//! workspace is an equality match. A value with both bits set is not a role.

use serde::{Deserialize, Serialize};

/// The role a user is assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Role {
  Manager,
  Technician,
}

impl Role {
  /// The bitmask value carried on the wire.
  pub const fn bits(self) -> u32 {
    match self {
      Self::Manager => 0b01,
      Self::Technician => 0b10,
    }
  }

  /// Exact-match decoding; `None` for zero, unknown or combined values.
  pub const fn from_bits(bits: u32) -> Option<Self> {
    match bits {
      0b01 => Some(Self::Manager),
      0b10 => Some(Self::Technician),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Manager => "manager",
      Self::Technician => "technician",
    }
  }
}

impl std::fmt::Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<Role> for u32 {
  fn from(role: Role) -> Self { role.bits() }
}

impl TryFrom<u32> for Role {
  type Error = String;

  fn try_from(bits: u32) -> Result<Self, Self::Error> {
    Self::from_bits(bits).ok_or_else(|| format!("unknown role value: {bits}"))
  }
}
