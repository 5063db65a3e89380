//! Process wiring for the Taskgate server: configuration, the in-process
//! notification queue and first-run seeding. The binary in `main.rs` glues
//! these to [`taskgate_api::api_router`].

pub mod broker;
pub mod error;
pub mod seed;
pub mod settings;

pub use settings::ServerConfig;
pub use error::{Error, Result};
