//! Cached gig listing with client-side completions
//!
//! The server list is authoritative for everything except "mark complete",
//! which the client applies at once as a pending write. A pending completion
//! is dropped as soon as a fetched list reports the gig completed or no longer
//! contains it.

use std::collections::BTreeSet;

use serde::Serialize;

use freehub_common::{Error, Result};
use freehub_domain::{Gig, GigStatus};

/// Aggregate numbers shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GigStats {
    pub total: usize,
    pub completed: usize,
    /// Percent of gigs completed, rounded to the nearest integer
    pub success_rate: u32,
}

impl GigStats {
    pub fn from_gigs(gigs: &[Gig]) -> Self {
        let total = gigs.len();
        let completed = gigs
            .iter()
            .filter(|gig| gig.status == GigStatus::Completed)
            .count();
        Self {
            total,
            completed,
            success_rate: success_rate(completed, total),
        }
    }
}

/// `completed / total` as a rounded percentage, 0 for an empty listing
pub fn success_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (completed * 200 + total) / (total * 2);
    rate as u32
}

/// Local view of the gig list
#[derive(Debug, Clone, Default)]
pub struct GigListing {
    gigs: Vec<Gig>,
    pending_complete: BTreeSet<String>,
}

impl GigListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with completions carried over from an earlier run
    pub fn with_pending(pending: impl IntoIterator<Item = String>) -> Self {
        Self {
            gigs: Vec::new(),
            pending_complete: pending.into_iter().collect(),
        }
    }

    /// Replace the cache with an authoritative list and reconcile pending writes
    pub fn replace(&mut self, gigs: Vec<Gig>) {
        self.pending_complete.retain(|id| {
            gigs.iter()
                .any(|gig| &gig.id == id && gig.status != GigStatus::Completed)
        });
        self.gigs = gigs;
    }

    /// Insert or refresh a single gig, keeping its position
    pub fn upsert(&mut self, gig: Gig) {
        if gig.status == GigStatus::Completed {
            self.pending_complete.remove(&gig.id);
        }
        match self.gigs.iter_mut().find(|existing| existing.id == gig.id) {
            Some(existing) => *existing = gig,
            None => self.gigs.push(gig),
        }
    }

    /// Drop a gig from the cache. Returns whether it was present.
    pub fn evict(&mut self, id: &str) -> bool {
        self.pending_complete.remove(id);
        let before = self.gigs.len();
        self.gigs.retain(|gig| gig.id != id);
        self.gigs.len() != before
    }

    /// Apply the client-side completion to `id`
    pub fn mark_complete(&mut self, id: &str) -> Result<Gig> {
        let gig = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("Gig {} is not in the current listing", id)))?;
        gig.status.mark_complete()?;

        self.pending_complete.insert(id.to_string());
        self.get(id)
            .ok_or_else(|| Error::Internal(format!("Gig {} vanished from the listing", id)))
    }

    /// One gig with pending writes applied
    pub fn get(&self, id: &str) -> Option<Gig> {
        self.gigs
            .iter()
            .find(|gig| gig.id == id)
            .map(|gig| self.overlay(gig.clone()))
    }

    /// Apply pending writes to a gig fetched on its own
    pub fn overlay(&self, mut gig: Gig) -> Gig {
        if self.pending_complete.contains(&gig.id) {
            gig.status = GigStatus::Completed;
        }
        gig
    }

    /// Every cached gig with pending writes applied
    pub fn view(&self) -> Vec<Gig> {
        self.gigs
            .iter()
            .map(|gig| self.overlay(gig.clone()))
            .collect()
    }

    pub fn stats(&self) -> GigStats {
        GigStats::from_gigs(&self.view())
    }

    /// Ids completed locally but not yet confirmed by the server
    pub fn pending_completions(&self) -> Vec<String> {
        self.pending_complete.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.gigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gigs.is_empty()
    }
}
