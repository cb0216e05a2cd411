//! Domain entities and state machines for the Freehub client

pub mod entities;
pub mod state;

pub use entities::*;
pub use state::{GigEvent, GigState, GigStateMachine, StateError};
