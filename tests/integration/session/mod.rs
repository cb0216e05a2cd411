//! Login, role routing and session restore tests

use freehub_api::mock::MockOperation;
use freehub_auth::{CLIENT_ROUTE, DASHBOARD_ROUTE};
use freehub_common::{Error, LOGIN_ROUTE};
use freehub_domain::Role;

use crate::common::{TestApp, CLIENT_EMAIL, FREELANCER_EMAIL, PASSWORD};

#[test_log::test(tokio::test)]
async fn test_login_routes_by_role() {
    let t = TestApp::new().unwrap();

    let outcome = t.app.auth.login(CLIENT_EMAIL, PASSWORD).await.unwrap();
    assert_eq!(outcome.route, CLIENT_ROUTE);
    assert_eq!(t.app.credentials.role(), Some(Role::Client));

    let outcome = t.app.auth.login(FREELANCER_EMAIL, PASSWORD).await.unwrap();
    assert_eq!(outcome.route, DASHBOARD_ROUTE);
    assert_eq!(t.app.credentials.role(), Some(Role::Freelancer));
}

#[test_log::test(tokio::test)]
async fn test_blank_credentials_fail_before_network() {
    let t = TestApp::new().unwrap();

    let err = t.app.auth.login("", PASSWORD).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.user_message(), "Please fill all fields");
    assert!(t.api.calls_for(MockOperation::Login).is_empty());
}

#[test_log::test(tokio::test)]
async fn test_rejected_login_leaves_no_session() {
    let t = TestApp::new().unwrap();

    let err = t.app.auth.login(CLIENT_EMAIL, "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!t.app.credentials.is_authenticated());
    assert!(!t.reopen().unwrap().credentials.is_authenticated());
}

#[test_log::test(tokio::test)]
async fn test_session_restores_on_restart() {
    let t = TestApp::new().unwrap();
    t.login_freelancer().await.unwrap();

    let reopened = t.reopen().unwrap();
    let session = reopened.credentials.current().expect("restored session");
    assert_eq!(session.user.email, FREELANCER_EMAIL);
    assert_eq!(reopened.credentials.role(), Some(Role::Freelancer));

    reopened.gigs.list().await.unwrap();
    assert!(t
        .api
        .calls_for(MockOperation::ListGigs)
        .iter()
        .all(|call| call.authorized));
}

#[test_log::test(tokio::test)]
async fn test_logout_clears_persisted_session() {
    let t = TestApp::new().unwrap();
    t.login_client().await.unwrap();

    assert_eq!(t.app.auth.logout().unwrap(), LOGIN_ROUTE);
    assert!(!t.app.credentials.is_authenticated());

    let reopened = t.reopen().unwrap();
    assert!(!reopened.credentials.is_authenticated());
    let err = reopened.gigs.list().await.unwrap_err();
    assert_eq!(err.fallback_route(), Some(LOGIN_ROUTE));
}
