//! Shared utilities, configuration, and error handling for the Freehub client
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration management following 12-factor principles
//! - Error taxonomy and user-facing messages
//! - Client-local persistence (cart and session records)
//! - Screen scopes that discard stale responses

pub mod config;
pub mod error;
pub mod screen;
pub mod state;
pub mod storage;

pub use config::ClientConfig;
pub use error::{Error, Result, LIST_VIEW_ROUTE, LOGIN_ROUTE};
pub use screen::ScreenScope;
pub use state::StateError;
pub use storage::{FileStore, LocalStore, MemoryStore};
