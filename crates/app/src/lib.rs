//! Freehub client composition root
//!
//! Wires the marketplace API, client-local storage and session context into
//! the gig, cart and checkout components.

pub mod cli;

use std::sync::Arc;

use freehub_api::{ApiConfig, MarketplaceApi, MarketplaceApiFactory};
use freehub_auth::{AuthService, CredentialContext};
use freehub_cart::CartStore;
use freehub_checkout::{CheckoutOrchestrator, CheckoutPolicy};
use freehub_common::{ClientConfig, FileStore, LocalStore};
use freehub_gigs::GigRecordManager;

/// Every component of one client process, sharing a single session context
pub struct Freehub {
    pub config: ClientConfig,
    pub api: Arc<dyn MarketplaceApi>,
    pub credentials: CredentialContext,
    pub auth: AuthService,
    pub gigs: GigRecordManager,
    pub cart: CartStore,
    pub checkout: CheckoutOrchestrator,
}

impl Freehub {
    /// Build the client described by `config`, persisting state in its data directory
    pub fn from_config(config: ClientConfig) -> Result<Self, anyhow::Error> {
        config.validate()?;

        let api = MarketplaceApiFactory::create(ApiConfig::from(&config))?;
        let store = FileStore::new(config.data_dir.clone());
        tracing::debug!(data_dir = %store.root().display(), "Using local data directory");

        Self::assemble(config, Arc::from(api), Arc::new(store))
    }

    /// Build the client from explicit parts
    pub fn assemble(
        config: ClientConfig,
        api: Arc<dyn MarketplaceApi>,
        store: Arc<dyn LocalStore>,
    ) -> Result<Self, anyhow::Error> {
        let credentials = CredentialContext::restore(store.clone())?;
        let cart = CartStore::new(store.clone());

        Ok(Self {
            auth: AuthService::new(api.clone(), credentials.clone()),
            gigs: GigRecordManager::new(api.clone(), credentials.clone(), store),
            checkout: CheckoutOrchestrator::new(api.clone(), credentials.clone(), cart.clone()),
            cart,
            credentials,
            api,
            config,
        })
    }

    /// Cart checkout over this client's session and cart with a different
    /// failure policy
    pub fn checkout_with(&self, policy: CheckoutPolicy) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(self.api.clone(), self.credentials.clone(), self.cart.clone())
            .with_policy(policy)
    }
}
