//! Cart persistence tests

use rust_decimal::Decimal;

use freehub_common::storage::CART_KEY;

use crate::common::{gig, TestApp};

#[test_log::test(tokio::test)]
async fn test_cart_dedupes_and_keeps_insertion_order() {
    let t = TestApp::new().unwrap();
    let cart = &t.app.cart;

    cart.add_gig(&gig("a", "Logo", 50)).unwrap();
    cart.add_gig(&gig("b", "Banner", 20)).unwrap();
    cart.add_gig(&gig("a", "Logo v2", 60)).unwrap();

    let items = cart.list().unwrap();
    let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(items[0].title, "Logo v2");
    assert_eq!(cart.total().unwrap(), Decimal::new(80, 0));
}

#[test_log::test(tokio::test)]
async fn test_cart_survives_restart() {
    let t = TestApp::new().unwrap();
    t.app.cart.add_gig(&gig("a", "Logo", 50)).unwrap();
    t.app.cart.add_gig(&gig("b", "Banner", 20)).unwrap();
    assert!(t.app.cart.remove("a").unwrap());

    let reopened = t.reopen().unwrap();
    let items = reopened.cart.list().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "b");
}

#[test_log::test(tokio::test)]
async fn test_removing_unknown_item_is_noop() {
    let t = TestApp::new().unwrap();
    t.app.cart.add_gig(&gig("a", "Logo", 50)).unwrap();

    assert!(!t.app.cart.remove("zzz").unwrap());
    assert_eq!(t.app.cart.len().unwrap(), 1);
}

#[test_log::test(tokio::test)]
async fn test_corrupt_cart_file_reads_as_empty() {
    let t = TestApp::new().unwrap();
    t.app.cart.add_gig(&gig("a", "Logo", 50)).unwrap();

    let path = t.data_dir.path().join(format!("{CART_KEY}.json"));
    assert!(path.exists());
    std::fs::write(path, "{not json").unwrap();

    let reopened = t.reopen().unwrap();
    assert!(reopened.cart.is_empty().unwrap());

    reopened.cart.add_gig(&gig("b", "Banner", 20)).unwrap();
    assert_eq!(reopened.cart.len().unwrap(), 1);
}
