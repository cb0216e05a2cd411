//! Screen scopes guarding against stale responses
//!
//! A screen owns a `ScreenScope` for as long as it is mounted. Requests started
//! from the screen run to completion even after the user navigates away; their
//! results are simply dropped once the scope has been torn down.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Lifetime marker for one mounted screen.
#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the screen as gone. Pending results become no-ops.
    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Await `request` and hand back its output only if the screen is still
    /// mounted when it resolves.
    ///
    /// The request itself is never cancelled: mutations that reached the server
    /// still complete.
    pub async fn apply<F, T>(&self, request: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let output = request.await;
        if self.token.is_cancelled() {
            tracing::warn!("Discarding response for a screen that was torn down");
            None
        } else {
            Some(output)
        }
    }
}
