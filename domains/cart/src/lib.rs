//! Cart domain: client-persisted cart of gigs selected for purchase
//!
//! The cart is an ordered array of `{_id, title, price}` snapshots under the
//! `cart` storage key. It is never synced with the server; stale entries only
//! surface at checkout.

use std::sync::Arc;

use rust_decimal::Decimal;

use freehub_common::storage::{load_json, save_json, CART_KEY};
use freehub_common::{Error, LocalStore, Result};
use freehub_domain::{CartItem, Gig};

/// The only writer of cart entries
#[derive(Clone)]
pub struct CartStore {
    store: Arc<dyn LocalStore>,
}

impl CartStore {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Vec<CartItem>> {
        match load_json::<Vec<CartItem>>(self.store.as_ref(), CART_KEY) {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(Error::Serialization(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable cart");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, items: &[CartItem]) -> Result<()> {
        save_json(self.store.as_ref(), CART_KEY, items)
    }

    /// Insert `item`, replacing any entry with the same id in place
    pub fn add(&self, item: CartItem) -> Result<()> {
        let mut items = self.load()?;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => {
                tracing::debug!(gig_id = %item.id, "Added gig to cart");
                items.push(item);
            }
        }
        self.save(&items)
    }

    /// Snapshot `gig` into the cart
    pub fn add_gig(&self, gig: &Gig) -> Result<()> {
        self.add(CartItem::from(gig))
    }

    /// Remove the entry for `gig_id`. Returns whether one was present.
    pub fn remove(&self, gig_id: &str) -> Result<bool> {
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|item| item.id != gig_id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items)?;
        Ok(true)
    }

    /// Remove every entry whose id is in `gig_ids`
    pub fn remove_many(&self, gig_ids: &[String]) -> Result<()> {
        if gig_ids.is_empty() {
            return Ok(());
        }
        let mut items = self.load()?;
        items.retain(|item| !gig_ids.contains(&item.id));
        self.save(&items)
    }

    /// Entries in insertion order
    pub fn list(&self) -> Result<Vec<CartItem>> {
        self.load()
    }

    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }

    pub fn contains(&self, gig_id: &str) -> Result<bool> {
        Ok(self.load()?.iter().any(|item| item.id == gig_id))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Sum of the snapshot prices
    pub fn total(&self) -> Result<Decimal> {
        Ok(self.load()?.iter().map(|item| item.price).sum())
    }
}
