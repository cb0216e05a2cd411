//! Gigs domain layer: attachments, submission form, listing

pub mod attachments;
pub mod form;
pub mod listing;
