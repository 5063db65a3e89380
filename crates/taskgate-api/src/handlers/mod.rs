//! Route handlers, one module per resource.

pub mod home;
pub mod login;
pub mod tasks;
pub mod users;
