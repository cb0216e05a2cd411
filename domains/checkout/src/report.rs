//! Per-item checkout results

use serde::Serialize;

use freehub_domain::{CartItem, Order};

/// How cart checkout reacts to a failing item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPolicy {
    /// Stop at the first failure; later items are not attempted
    #[default]
    StopOnFirstFailure,
    /// Attempt every item regardless of earlier failures
    AttemptAll,
}

/// What happened to one cart item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Ordered { order: Order },
    Failed { reason: String },
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResult {
    pub item: CartItem,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

impl ItemResult {
    pub fn is_ordered(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Ordered { .. })
    }
}

/// Outcome of a cart checkout, in cart order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutReport {
    pub results: Vec<ItemResult>,
    /// False when the cart could not be pruned after ordering
    pub cart_updated: bool,
}

impl CheckoutReport {
    /// Every item was ordered
    pub fn is_complete(&self) -> bool {
        self.results.iter().all(ItemResult::is_ordered)
    }

    pub fn ordered(&self) -> impl Iterator<Item = &ItemResult> {
        self.results.iter().filter(|r| r.is_ordered())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ItemResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Failed { .. }))
    }

    pub fn not_attempted(&self) -> impl Iterator<Item = &ItemResult> {
        self.results
            .iter()
            .filter(|r| r.outcome == ItemOutcome::NotAttempted)
    }

    /// Ids of the items that now have an order
    pub fn ordered_ids(&self) -> Vec<String> {
        self.ordered().map(|r| r.item.id.clone()).collect()
    }

    /// Text shown after checkout
    pub fn user_message(&self) -> String {
        let total = self.results.len();
        let ordered = self.ordered().count();

        if ordered == total {
            return if total == 1 {
                "Order placed successfully".to_string()
            } else {
                format!("All {} orders placed successfully", total)
            };
        }

        let failures: Vec<String> = self
            .failed()
            .map(|r| match &r.outcome {
                ItemOutcome::Failed { reason } => format!("{}: {}", r.item.title, reason),
                _ => r.item.title.clone(),
            })
            .collect();
        let skipped = self.not_attempted().count();

        let mut message = format!(
            "Ordered {} of {} items. Failed: {}",
            ordered,
            total,
            failures.join("; ")
        );
        if skipped > 0 {
            message.push_str(&format!(". {} not attempted, still in your cart", skipped));
        }
        message
    }
}
