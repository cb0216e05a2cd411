//! Role-based landing routes

use freehub_common::LIST_VIEW_ROUTE;
use freehub_domain::Role;

/// Landing surface for client accounts
pub const CLIENT_ROUTE: &str = "/client";

/// Landing surface for freelancers and any other role
pub const DASHBOARD_ROUTE: &str = LIST_VIEW_ROUTE;

/// Picks the dashboard an authenticated session lands on
pub struct RoleRouter;

impl RoleRouter {
    pub fn route_for(role: Role) -> &'static str {
        match role {
            Role::Client => CLIENT_ROUTE,
            Role::Freelancer | Role::Other => DASHBOARD_ROUTE,
        }
    }
}
