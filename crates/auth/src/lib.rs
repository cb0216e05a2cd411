//! Session handling for the Freehub client
//!
//! Provides the credential context shared by every privileged operation,
//! login/logout against the marketplace API, and role-based routing of
//! freshly authenticated sessions.

mod context;
mod router;
mod service;

pub use context::CredentialContext;
pub use router::{RoleRouter, CLIENT_ROUTE, DASHBOARD_ROUTE};
pub use service::{AuthService, LoginOutcome};
