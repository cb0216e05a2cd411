//! Image attachment builder
//!
//! One ordered list holds both the remote images a gig already has and the
//! local files picked for upload, so a preview and its file can never drift
//! apart. Local previews are tracked in a pool and released when their entry
//! goes away.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use freehub_api::ImagePlan;
use freehub_domain::PendingFile;

type PreviewPool = Arc<Mutex<HashSet<Uuid>>>;

/// Locally renderable preview of a pending file.
///
/// Dropping the handle releases it from the pool that issued it.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    pool: PreviewPool,
}

impl PreviewHandle {
    fn issue(pool: &PreviewPool) -> Self {
        let id = Uuid::new_v4();
        pool.lock().unwrap_or_else(|e| e.into_inner()).insert(id);
        Self {
            id,
            pool: pool.clone(),
        }
    }

    /// Object URL for the preview
    pub fn url(&self) -> String {
        format!("blob:freehub/{}", self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.pool
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

/// One entry of the image list
#[derive(Debug)]
pub enum Attachment {
    /// Remote image reference the gig already has
    Kept(String),
    /// Local file waiting to be uploaded
    New {
        file: PendingFile,
        preview: PreviewHandle,
    },
}

impl Attachment {
    /// What a screen renders for this entry
    pub fn preview_source(&self) -> String {
        match self {
            Attachment::Kept(reference) => reference.clone(),
            Attachment::New { preview, .. } => preview.url(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Attachment::Kept(_))
    }
}

/// Ordered, editable list of gig images
#[derive(Debug, Default)]
pub struct AttachmentList {
    entries: Vec<Attachment>,
    removed: Vec<String>,
    pool: PreviewPool,
}

impl AttachmentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the images a gig already has (edit screen)
    pub fn from_remote<I, S>(references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: references
                .into_iter()
                .map(|reference| Attachment::Kept(reference.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Append each file as a pending attachment with its own preview
    pub fn add_files(&mut self, files: impl IntoIterator<Item = PendingFile>) {
        for file in files {
            let preview = PreviewHandle::issue(&self.pool);
            self.entries.push(Attachment::New { file, preview });
        }
    }

    /// Remove the entry at `index`.
    ///
    /// A remote reference is remembered as removed; a local file is dropped
    /// together with its preview. Out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        if let Attachment::Kept(reference) = &removed {
            self.removed.push(reference.clone());
        }
        Some(removed)
    }

    pub fn entries(&self) -> &[Attachment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Preview sources in display order
    pub fn previews(&self) -> Vec<String> {
        self.entries.iter().map(Attachment::preview_source).collect()
    }

    /// Remote references still in the list, in display order
    pub fn kept_refs(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Attachment::Kept(reference) => Some(reference.clone()),
                Attachment::New { .. } => None,
            })
            .collect()
    }

    /// Local files still in the list, in display order
    pub fn new_files(&self) -> Vec<PendingFile> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Attachment::New { file, .. } => Some(file.clone()),
                Attachment::Kept(_) => None,
            })
            .collect()
    }

    /// Remote references the user removed
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    /// Number of previews currently held
    pub fn live_previews(&self) -> usize {
        self.pool.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Image changes for an update that preserves the kept references
    pub fn image_plan(&self) -> ImagePlan {
        ImagePlan::keep(self.kept_refs(), self.new_files())
    }

    /// Image changes for an update that replaces every remote image
    pub fn replacement_plan(&self) -> ImagePlan {
        ImagePlan::replace_all(self.new_files())
    }

    /// Drop every entry and release all previews
    pub fn teardown(&mut self) {
        self.entries.clear();
        self.removed.clear();
    }
}
