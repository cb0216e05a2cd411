//! End-to-end flows over HTTP against a stub marketplace server

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use freehub_api::client::HttpMarketplaceClient;
use freehub_api::ApiConfig;
use freehub_app::Freehub;
use freehub_common::{ClientConfig, Error, FileStore};

const TOKEN: &str = "jwt-abc";

fn client(server: &MockServer, data_dir: &TempDir) -> Freehub {
    let base_url = format!("{}/api", server.uri());
    let config = ClientConfig {
        api_url: base_url.clone(),
        data_dir: data_dir.path().to_path_buf(),
        provider: "http".to_string(),
        ..ClientConfig::default()
    };
    let api = HttpMarketplaceClient::new(ApiConfig {
        provider: "http".to_string(),
        base_url,
        timeout: None,
    })
    .unwrap();
    Freehub::assemble(config, Arc::new(api), Arc::new(FileStore::new(data_dir.path()))).unwrap()
}

fn gig_json(id: &str, title: &str, price: f64, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": title,
        "desc": format!("{title} description"),
        "price": price,
        "category": "design",
        "images": ["/uploads/cover.png"],
        "status": status
    })
}

async fn mount_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "sam@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": TOKEN,
            "user": {"_id": "u-1", "name": "Sam", "email": "sam@example.com", "role": role}
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[test_log::test(tokio::test)]
async fn test_freelancer_login_and_dashboard_stats() {
    let server = MockServer::start().await;
    let data_dir = tempfile::tempdir().unwrap();
    mount_login(&server, "freelancer").await;
    Mock::given(method("GET"))
        .and(path("/api/gigs"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                gig_json("g1", "Logo", 50.0, "active"),
                gig_json("g2", "Banner", 20.0, "completed"),
                gig_json("g3", "Flyer", 15.0, "active")
            ]
        })))
        .mount(&server)
        .await;

    let app = client(&server, &data_dir);
    let outcome = app.auth.login("sam@example.com", "pw").await.unwrap();
    assert_eq!(outcome.route, "/dashboard");

    let gigs = app.gigs.list().await.unwrap();
    assert_eq!(gigs.len(), 3);
    let stats = app.gigs.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.success_rate, 33);

    // Session persisted for the next process
    let reopened = client(&server, &data_dir);
    assert!(reopened.credentials.is_authenticated());
}

#[test_log::test(tokio::test)]
async fn test_client_cart_checkout_stops_at_failing_order() {
    let server = MockServer::start().await;
    let data_dir = tempfile::tempdir().unwrap();
    mount_login(&server, "client").await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(json!({"gigId": "g1"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"_id": "o-1", "gigId": "g1", "status": "pending"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(json!({"gigId": "g2"})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Gig is no longer available"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(json!({"gigId": "g3"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = client(&server, &data_dir);
    let outcome = app.auth.login("sam@example.com", "pw").await.unwrap();
    assert_eq!(outcome.route, "/client");

    for (id, title) in [("g1", "Logo"), ("g2", "Banner"), ("g3", "Flyer")] {
        let gig = serde_json::from_value(gig_json(id, title, 10.0, "active")).unwrap();
        app.cart.add_gig(&gig).unwrap();
    }

    let report = app.checkout.checkout_cart().await.unwrap();
    assert_eq!(report.ordered_ids(), ["g1"]);
    assert_eq!(
        report.user_message(),
        "Ordered 1 of 3 items. Failed: Banner: Gig is no longer available. \
         1 not attempted, still in your cart"
    );

    let remaining: Vec<String> = app.cart.list().unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(remaining, ["g2", "g3"]);
}

#[test_log::test(tokio::test)]
async fn test_buy_now_redirects_to_checkout_url() {
    let server = MockServer::start().await;
    let data_dir = tempfile::tempdir().unwrap();
    mount_login(&server, "client").await;
    Mock::given(method("POST"))
        .and(path("/api/orders/create-checkout-session"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_json(json!({"gigId": "g1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"url": "https://pay.example.com/cs_test_1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/orders/create-checkout-session"))
        .and(body_json(json!({"gigId": "g2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let app = client(&server, &data_dir);
    app.auth.login("sam@example.com", "pw").await.unwrap();

    let redirect = app.checkout.purchase("g1").await.unwrap();
    assert_eq!(redirect.url, "https://pay.example.com/cs_test_1");

    let err = app.checkout.purchase("g2").await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to initiate checkout session");
}

#[test_log::test(tokio::test)]
async fn test_unreachable_server_surfaces_network_error() {
    let server = MockServer::start().await;
    let data_dir = tempfile::tempdir().unwrap();
    let app = client(&server, &data_dir);
    drop(server);

    let err = app.auth.login("sam@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert_eq!(err.user_message(), "Could not reach the server");
    assert!(!app.credentials.is_authenticated());
}

#[test_log::test(tokio::test)]
async fn test_login_response_with_blank_token_establishes_nothing() {
    let server = MockServer::start().await;
    let data_dir = tempfile::tempdir().unwrap();
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "",
            "user": {"_id": "u-1", "name": "Sam", "email": "sam@example.com", "role": "client"}
        })))
        .mount(&server)
        .await;

    let app = client(&server, &data_dir);
    let err = app.auth.login("sam@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, Error::Internal(_)));
    assert!(!app.credentials.is_authenticated());
    assert!(!client(&server, &data_dir).credentials.is_authenticated());
}
