//! Gigs domain: image attachments, gig records, listing cache and stats

pub mod domain;
pub mod manager;

// Re-export domain types at the crate root for convenience
pub use domain::attachments::{Attachment, AttachmentList, PreviewHandle};
pub use domain::form::GigForm;
pub use domain::listing::{GigListing, GigStats};
pub use manager::GigRecordManager;
