//! Checkout orchestrator
//!
//! Turns the cart, or a single gig, into remote order requests. Cart items
//! are ordered one at a time in cart order: request N is only sent after
//! request N-1 resolved. There is no rollback; the report says exactly which
//! items were ordered and only those leave the cart.

use std::sync::Arc;

use freehub_api::MarketplaceApi;
use freehub_auth::CredentialContext;
use freehub_cart::CartStore;
use freehub_common::{Error, Result};
use freehub_domain::CheckoutRedirect;

use crate::report::{CheckoutPolicy, CheckoutReport, ItemOutcome, ItemResult};

pub struct CheckoutOrchestrator {
    api: Arc<dyn MarketplaceApi>,
    credentials: CredentialContext,
    cart: CartStore,
    policy: CheckoutPolicy,
}

impl CheckoutOrchestrator {
    pub fn new(api: Arc<dyn MarketplaceApi>, credentials: CredentialContext, cart: CartStore) -> Self {
        Self {
            api,
            credentials,
            cart,
            policy: CheckoutPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CheckoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CheckoutPolicy {
        self.policy
    }

    /// Open a checkout session for one gig and return where to redirect
    pub async fn purchase(&self, gig_id: &str) -> Result<CheckoutRedirect> {
        let session = self.credentials.require_session()?;

        let response = self
            .api
            .create_checkout_session(Some(&session.token), gig_id)
            .await
            .map_err(|e| {
                tracing::warn!(gig_id = %gig_id, error = %e, "Checkout session failed");
                Error::from(e)
            })?;

        match response.url {
            Some(url) if !url.trim().is_empty() => {
                tracing::info!(gig_id = %gig_id, "Checkout session created");
                Ok(CheckoutRedirect { url })
            }
            _ => Err(Error::Server {
                status: 200,
                message: "Failed to initiate checkout session".to_string(),
            }),
        }
    }

    /// Order every cart item, sequentially, and prune the ordered ones
    pub async fn checkout_cart(&self) -> Result<CheckoutReport> {
        let items = self.cart.list()?;
        if items.is_empty() {
            return Err(Error::EmptyCart);
        }
        let session = self.credentials.require_session()?;

        let mut results = Vec::with_capacity(items.len());
        let mut stopped = false;

        for item in items {
            if stopped {
                results.push(ItemResult {
                    item,
                    outcome: ItemOutcome::NotAttempted,
                });
                continue;
            }

            let outcome = match self.api.create_order(Some(&session.token), &item.id).await {
                Ok(order) => {
                    tracing::debug!(gig_id = %item.id, "Order created");
                    ItemOutcome::Ordered { order }
                }
                Err(e) => {
                    let reason = Error::from(e).user_message();
                    tracing::warn!(gig_id = %item.id, reason = %reason, "Order failed");
                    stopped = self.policy == CheckoutPolicy::StopOnFirstFailure;
                    ItemOutcome::Failed { reason }
                }
            };
            results.push(ItemResult { item, outcome });
        }

        let mut report = CheckoutReport {
            results,
            cart_updated: true,
        };

        // Items added while the orders were in flight stay in the cart
        if let Err(e) = self.cart.remove_many(&report.ordered_ids()) {
            tracing::error!(error = %e, "Failed to update cart after checkout");
            report.cart_updated = false;
        }

        let ordered = report.ordered().count();
        if report.is_complete() {
            tracing::info!(count = ordered, "Cart checkout finished");
        } else {
            tracing::warn!(
                ordered,
                total = report.results.len(),
                "Cart checkout finished with failures"
            );
        }
        Ok(report)
    }
}
