//! Core types and trait definitions for Taskgate.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the bearer-token service, the role-based access decisions, the summary
//! cipher and password hashing, and the `User`/`Task` entities. Persistence
//! and notification delivery are reached through the [`store::DataStore`] and
//! [`notify::Publisher`] traits.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cipher;
pub mod error;
pub mod notify;
pub mod password;
pub mod rbac;
pub mod role;
pub mod store;
pub mod task;
pub mod token;
pub mod user;

mod escape;

pub use error::{Error, Result, ValidationError};
pub use role::Role;
