//! Cart checkout and single-gig purchase tests

use freehub_api::mock::{MockFailure, MockOperation};
use freehub_checkout::{CheckoutPolicy, ItemOutcome};
use freehub_common::Error;

use crate::common::TestApp;

async fn client_with_cart(ids: &[&str]) -> TestApp {
    let t = TestApp::new().unwrap();
    t.login_client().await.unwrap();
    for (i, id) in ids.iter().enumerate() {
        let gig = t.seed_gig(id, &format!("Gig {id}"), 10 * (i as i64 + 1));
        t.app.cart.add_gig(&gig).unwrap();
    }
    t.api.reset();
    t
}

fn cart_ids(t: &TestApp) -> Vec<String> {
    t.app
        .cart
        .list()
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_empty_cart_places_no_orders() {
    let t = client_with_cart(&[]).await;

    let err = t.app.checkout.checkout_cart().await.unwrap_err();
    assert!(matches!(err, Error::EmptyCart));
    assert!(t.api.calls_for(MockOperation::CreateOrder).is_empty());
}

#[test_log::test(tokio::test)]
async fn test_full_success_clears_cart() {
    let t = client_with_cart(&["a", "b", "c"]).await;

    let report = t.app.checkout.checkout_cart().await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.user_message(), "All 3 orders placed successfully");
    assert_eq!(t.api.orders().len(), 3);
    assert!(t.app.cart.is_empty().unwrap());
}

#[test_log::test(tokio::test)]
async fn test_second_item_failure_stops_and_keeps_unordered_items() {
    let t = client_with_cart(&["a", "b", "c"]).await;
    t.api.fail_on(
        MockOperation::CreateOrder,
        Some("b"),
        MockFailure::status(500, "Payment provider unavailable"),
    );

    let report = t.app.checkout.checkout_cart().await.unwrap();

    let calls: Vec<_> = t
        .api
        .calls_for(MockOperation::CreateOrder)
        .into_iter()
        .filter_map(|call| call.target)
        .collect();
    assert_eq!(calls, ["a", "b"]);
    assert!(!report.is_complete());
    assert!(matches!(report.results[0].outcome, ItemOutcome::Ordered { .. }));
    assert_eq!(
        report.results[1].outcome,
        ItemOutcome::Failed {
            reason: "Payment provider unavailable".to_string()
        }
    );
    assert_eq!(report.results[2].outcome, ItemOutcome::NotAttempted);
    assert_eq!(
        report.user_message(),
        "Ordered 1 of 3 items. Failed: Gig b: Payment provider unavailable. \
         1 not attempted, still in your cart"
    );

    assert_eq!(cart_ids(&t), ["b", "c"]);
}

#[test_log::test(tokio::test)]
async fn test_attempt_all_orders_past_a_failure() {
    let t = client_with_cart(&["a", "b", "c"]).await;
    t.api
        .fail_on(MockOperation::CreateOrder, Some("b"), MockFailure::Network);

    let report = t
        .app
        .checkout_with(CheckoutPolicy::AttemptAll)
        .checkout_cart()
        .await
        .unwrap();

    assert_eq!(t.api.calls_for(MockOperation::CreateOrder).len(), 3);
    assert_eq!(report.ordered_ids(), ["a", "c"]);
    assert_eq!(cart_ids(&t), ["b"]);
}

#[test_log::test(tokio::test)]
async fn test_checkout_requires_session() {
    let t = client_with_cart(&["a"]).await;
    t.app.auth.logout().unwrap();

    let err = t.app.checkout.checkout_cart().await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
    assert!(t.api.recorded_calls().is_empty());
    assert_eq!(cart_ids(&t), ["a"]);
}

#[test_log::test(tokio::test)]
async fn test_purchase_returns_redirect_url() {
    let t = client_with_cart(&["a"]).await;

    let redirect = t.app.checkout.purchase("a").await.unwrap();
    assert_eq!(redirect.url, "https://checkout.mock/session/a");
    // Buying directly does not touch the cart
    assert_eq!(cart_ids(&t), ["a"]);
}

#[test_log::test(tokio::test)]
async fn test_purchase_of_unknown_gig_surfaces_server_message() {
    let t = client_with_cart(&[]).await;

    let err = t.app.checkout.purchase("missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.user_message(), "Gig not found");
}
