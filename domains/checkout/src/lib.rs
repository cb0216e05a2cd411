//! Checkout domain: single-gig purchase and sequential cart checkout

mod orchestrator;
mod report;

pub use orchestrator::CheckoutOrchestrator;
pub use report::{CheckoutPolicy, CheckoutReport, ItemOutcome, ItemResult};
