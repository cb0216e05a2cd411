//! State machines for Freehub entities
//!
//! The gig lifecycle is owned by the server. The only transition the client
//! may drive is "mark complete", which moves any open gig to `completed`.

pub use freehub_common::StateError;

// ============================================================================
// Gig State Machine
// ============================================================================

/// Gig status states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GigState {
    Active,
    Pending,
    Paused,
    Rejected,
    Completed,
}

impl GigState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for GigState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Pending => write!(f, "pending"),
            Self::Paused => write!(f, "paused"),
            Self::Rejected => write!(f, "rejected"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Events that trigger gig state transitions on the client
#[derive(Debug, Clone, PartialEq)]
pub enum GigEvent {
    /// Freelancer marks the gig as delivered
    MarkComplete,
}

impl std::fmt::Display for GigEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MarkComplete => write!(f, "mark_complete"),
        }
    }
}

/// Gig state machine
pub struct GigStateMachine;

impl GigStateMachine {
    /// Attempt a state transition
    ///
    /// Returns the new state if the transition is valid, or an error otherwise.
    pub fn transition(current: GigState, event: GigEvent) -> Result<GigState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        match event {
            GigEvent::MarkComplete => Ok(GigState::Completed),
        }
    }
}
