//! Gig record manager
//!
//! The only writer of gig resources. Every operation checks its local
//! preconditions (form validation, session, role) before the first request,
//! and none of them retries.

use std::sync::{Arc, Mutex, MutexGuard};

use freehub_api::{CreateGigRequest, ImagePlan, MarketplaceApi, UpdateGigRequest};
use freehub_auth::CredentialContext;
use freehub_common::storage::{load_json, save_json, COMPLETED_KEY};
use freehub_common::{Error, LocalStore, Result};
use freehub_domain::{Gig, Session};

use crate::domain::attachments::AttachmentList;
use crate::domain::form::GigForm;
use crate::domain::listing::{GigListing, GigStats};

pub struct GigRecordManager {
    api: Arc<dyn MarketplaceApi>,
    credentials: CredentialContext,
    store: Arc<dyn LocalStore>,
    listing: Mutex<GigListing>,
}

impl GigRecordManager {
    /// Create a manager, reloading completions persisted by an earlier run
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        credentials: CredentialContext,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        let pending: Vec<String> = match load_json(store.as_ref(), COMPLETED_KEY) {
            Ok(pending) => pending.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable pending completions");
                Vec::new()
            }
        };

        Self {
            api,
            credentials,
            store,
            listing: Mutex::new(GigListing::with_pending(pending)),
        }
    }

    fn listing(&self) -> MutexGuard<'_, GigListing> {
        self.listing.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist_pending(&self, pending: &[String]) -> Result<()> {
        if pending.is_empty() {
            self.store.remove(COMPLETED_KEY)
        } else {
            save_json(self.store.as_ref(), COMPLETED_KEY, pending)
        }
    }

    /// Drop `id` from the cache and save what is left of the pending
    /// completions. The remote change already happened, so a failed save is
    /// only logged.
    fn evict(&self, id: &str) {
        let pending = {
            let mut listing = self.listing();
            listing.evict(id);
            listing.pending_completions()
        };
        if let Err(e) = self.persist_pending(&pending) {
            tracing::warn!(gig_id = %id, error = %e, "Failed to save pending completions");
        }
    }

    /// Session allowed to create, edit and delete gigs
    fn writer_session(&self) -> Result<Arc<Session>> {
        let session = self.credentials.require_session()?;
        if !session.role().can_manage_gigs() {
            return Err(Error::Authorization(
                "Only freelancers can manage gigs".to_string(),
            ));
        }
        Ok(session)
    }

    /// Create a gig from the form and every pending attachment
    pub async fn create(&self, form: GigForm, attachments: &AttachmentList) -> Result<Gig> {
        let fields = form.into_fields()?;
        let session = self.writer_session()?;

        let images = attachments.new_files();
        tracing::debug!(title = %fields.title, images = images.len(), "Submitting new gig");

        let gig = self
            .api
            .create_gig(Some(&session.token), CreateGigRequest { fields, images })
            .await
            .map_err(Error::from)?;

        tracing::info!(gig_id = %gig.id, images = gig.images.len(), "Gig created");
        self.listing().upsert(gig.clone());
        Ok(gig)
    }

    /// Load one gig. Callers route to `Error::fallback_route` on failure.
    pub async fn fetch_one(&self, id: &str) -> Result<Gig> {
        let session = self.credentials.require_session()?;

        let gig = self
            .api
            .get_gig(Some(&session.token), id)
            .await
            .map_err(|e| {
                tracing::debug!(gig_id = %id, error = %e, "Failed to load gig");
                Error::from(e)
            })?;

        let mut listing = self.listing();
        listing.upsert(gig.clone());
        Ok(listing.overlay(gig))
    }

    /// Update fields, keeping the attachment list's remote references and
    /// appending its new files
    pub async fn update(
        &self,
        id: &str,
        form: GigForm,
        attachments: &AttachmentList,
    ) -> Result<Gig> {
        self.update_with_plan(id, form, attachments.image_plan())
            .await
    }

    /// Update fields with an explicit image plan
    pub async fn update_with_plan(&self, id: &str, form: GigForm, images: ImagePlan) -> Result<Gig> {
        let fields = form.into_fields()?;
        let session = self.writer_session()?;

        tracing::debug!(
            gig_id = %id,
            keep_existing = images.keep_existing,
            kept = images.kept.len(),
            uploads = images.uploads.len(),
            "Submitting gig update"
        );

        let result = self
            .api
            .update_gig(Some(&session.token), id, UpdateGigRequest { fields, images })
            .await;

        match result {
            Ok(gig) => {
                tracing::info!(gig_id = %gig.id, images = gig.images.len(), "Gig updated");
                self.listing().upsert(gig.clone());
                Ok(gig)
            }
            Err(e) if e.is_not_found() => {
                self.evict(id);
                Err(Error::Conflict(format!(
                    "Gig {} no longer exists and cannot be updated",
                    id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a gig. A gig that is already gone counts as deleted.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let session = self.writer_session()?;

        match self.api.delete_gig(Some(&session.token), id).await {
            Ok(()) => tracing::info!(gig_id = %id, "Gig deleted"),
            Err(e) if e.is_not_found() => {
                tracing::info!(gig_id = %id, "Gig was already deleted");
            }
            Err(e) => {
                tracing::warn!(gig_id = %id, error = %e, "Gig delete failed");
                return Err(Error::from(e));
            }
        }

        self.evict(id);
        Ok(())
    }

    /// Fetch the session's gigs and refresh the cached listing
    pub async fn list(&self) -> Result<Vec<Gig>> {
        let session = self.credentials.require_session()?;

        let gigs = self
            .api
            .list_gigs(Some(&session.token))
            .await
            .map_err(Error::from)?;
        tracing::debug!(count = gigs.len(), "Loaded gigs");

        let (view, pending) = {
            let mut listing = self.listing();
            listing.replace(gigs);
            (listing.view(), listing.pending_completions())
        };
        if let Err(e) = self.persist_pending(&pending) {
            tracing::warn!(error = %e, "Failed to save pending completions");
        }
        Ok(view)
    }

    /// Gigs the session has favorited
    pub async fn favorites(&self) -> Result<Vec<Gig>> {
        let session = self.credentials.require_session()?;
        self.api
            .list_favorites(Some(&session.token))
            .await
            .map_err(Error::from)
    }

    /// Mark a listed gig completed on the client only. The change is kept as
    /// a pending write until a fetched list confirms it.
    pub fn mark_complete(&self, id: &str) -> Result<Gig> {
        let (gig, pending) = {
            let mut listing = self.listing();
            let gig = listing.mark_complete(id)?;
            (gig, listing.pending_completions())
        };
        self.persist_pending(&pending)?;
        tracing::info!(gig_id = %id, "Gig marked complete locally");
        Ok(gig)
    }

    /// Cached listing with pending writes applied
    pub fn cached(&self) -> Vec<Gig> {
        self.listing().view()
    }

    pub fn stats(&self) -> GigStats {
        self.listing().stats()
    }
}
