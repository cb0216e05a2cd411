//! Login and logout against the marketplace API

use std::sync::Arc;

use freehub_api::{LoginRequest, MarketplaceApi};
use freehub_common::{Error, Result, LOGIN_ROUTE};
use freehub_domain::Session;

use crate::context::CredentialContext;
use crate::router::RoleRouter;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: Arc<Session>,
    /// Where the caller should navigate next
    pub route: &'static str,
}

/// Authentication flows that create or destroy the session
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn MarketplaceApi>,
    credentials: CredentialContext,
}

impl AuthService {
    pub fn new(api: Arc<dyn MarketplaceApi>, credentials: CredentialContext) -> Self {
        Self { api, credentials }
    }

    pub fn credentials(&self) -> &CredentialContext {
        &self.credentials
    }

    /// Exchange credentials for a session and pick the landing route
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(Error::Validation("Please fill all fields".to_string()));
        }

        let response = self
            .api
            .login(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Login rejected");
                Error::from(e)
            })?;

        let session = self
            .credentials
            .establish(Session::new(response.token, response.user))?;
        let route = RoleRouter::route_for(session.role());

        tracing::info!(
            user_id = %session.user.id,
            role = %session.role(),
            route,
            "Logged in"
        );
        Ok(LoginOutcome { session, route })
    }

    /// Clear the session; returns the route to show afterwards
    pub fn logout(&self) -> Result<&'static str> {
        self.credentials.clear()?;
        tracing::info!("Logged out");
        Ok(LOGIN_ROUTE)
    }
}
