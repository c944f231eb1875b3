#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use maspatas_api::{
    ApiClient, Collection, CollectionKind, Error, NewEntity, NewProduct, NewSale, NewSaleLine,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = ApiClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    (server, client)
}

fn token(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn obtain_credential_posts_username_and_password() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .and(body_json(json!({"username": "admin", "password": "maspatas123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = client
        .obtain_credential("admin", &token("maspatas123"))
        .await
        .unwrap();
    assert_eq!(credential.expose_secret(), "tok-1");
}

#[tokio::test]
async fn rejected_login_is_a_remote_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Credenciales inválidas"})),
        )
        .mount(&server)
        .await;

    let err = client
        .obtain_credential("admin", &token("wrong"))
        .await
        .unwrap_err();
    match err {
        Error::Remote { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Credenciales inválidas");
        }
        other => panic!("expected Remote error, got: {other:?}"),
    }
}

#[tokio::test]
async fn empty_access_token_is_not_a_credential() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": ""})))
        .mount(&server)
        .await;

    let err = client
        .obtain_credential("admin", &token("maspatas123"))
        .await
        .unwrap_err();
    assert!(err.is_communication(), "got: {err:?}");
}

// ── Collections ─────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_collection_decodes_each_kind() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "P-001",
            "name": "Collar",
            "sku": "COL-1",
            "price_amount": "9.99",
            "currency": "USD"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"product_id": "P-001", "stock": 15},
            {"product_id": "P-002", "stock": 8}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sales"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "sale_id": "S-1",
            "client_id": "C-001",
            "created_at": "2025-01-10T12:00:00+00:00",
            "total_amount": "19.98",
            "currency": "USD",
            "lines": [{"product_id": "P-001", "quantity": 2, "unit_price": "9.99", "subtotal": "19.98"}]
        }])))
        .mount(&server)
        .await;

    let products = client.fetch_collection(CollectionKind::Products).await.unwrap();
    let Collection::Products(products) = products else {
        panic!("wrong collection kind");
    };
    assert_eq!(products[0].sku, "COL-1");
    assert_eq!(products[0].price_amount, "9.99");

    let inventory = client.fetch_collection(CollectionKind::Inventory).await.unwrap();
    assert_eq!(inventory.kind(), CollectionKind::Inventory);
    assert_eq!(inventory.len(), 2);

    let sales = client.list_sales().await.unwrap();
    assert_eq!(sales[0].lines[0].quantity, 2);
    assert_eq!(sales[0].total_amount, "19.98");
}

#[tokio::test]
async fn empty_collection_is_ok() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let clients = client.fetch_collection(CollectionKind::Clients).await.unwrap();
    assert!(clients.is_empty());
}

#[tokio::test]
async fn non_json_success_is_a_communication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got: {err:?}");
    assert!(err.is_communication());
}

#[tokio::test]
async fn wrong_shape_is_a_communication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let err = client.list_inventory().await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got: {err:?}");
}

#[tokio::test]
async fn failure_without_detail_is_a_communication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sales"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.list_sales().await.unwrap_err();
    assert!(
        matches!(err, Error::UnexpectedStatus { status: 502, .. }),
        "got: {err:?}"
    );
    assert!(err.is_communication());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let client = ApiClient::from_reqwest("http://127.0.0.1:9/api", reqwest::Client::new()).unwrap();
    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.is_communication());
}

// ── Single records ──────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_product_carries_backend_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products/P-404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Producto no encontrado"})),
        )
        .mount(&server)
        .await;

    let err = client.get_product("P-404").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Producto no encontrado");
}

#[tokio::test]
async fn get_client_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/clients/C-001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "C-001",
            "full_name": "Ana Pérez",
            "email": "ana@example.com"
        })))
        .mount(&server)
        .await;

    let record = client.get_client("C-001").await.unwrap();
    assert_eq!(record.full_name, "Ana Pérez");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_entity_sends_bearer_and_typed_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({
            "product_id": "P1",
            "name": "Collar",
            "sku": "COL-1",
            "price_amount": "9.99",
            "currency": "USD",
            "initial_stock": 5
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "P1"})))
        .expect(1)
        .mount(&server)
        .await;

    let entity = NewEntity::Product(NewProduct {
        product_id: "P1".into(),
        name: "Collar".into(),
        sku: "COL-1".into(),
        price_amount: "9.99".into(),
        currency: "USD".into(),
        initial_stock: 5,
    });
    let record = client.create_entity(&token("tok-1"), &entity).await.unwrap();
    assert_eq!(record, json!({"id": "P1"}));
}

#[tokio::test]
async fn create_sale_validation_details_are_joined() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/sales"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": ["price_amount: invalid", "currency: invalid"]
        })))
        .mount(&server)
        .await;

    let entity = NewEntity::Sale(NewSale {
        sale_id: "S1".into(),
        client_id: "C1".into(),
        lines: vec![NewSaleLine {
            product_id: "P1".into(),
            quantity: 2,
        }],
    });
    let err = client
        .create_entity(&token("tok-1"), &entity)
        .await
        .unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.to_string(), "price_amount: invalid, currency: invalid");
}

#[tokio::test]
async fn expired_credential_is_reported_not_handled() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token inválido"})))
        .mount(&server)
        .await;

    let entity = NewEntity::Client(maspatas_api::NewClient {
        client_id: "C1".into(),
        full_name: "Ana".into(),
        email: "ana@example.com".into(),
    });
    let err = client
        .create_entity(&token("stale"), &entity)
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Token inválido");
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn health_check() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    assert!(client.health().await.unwrap().is_ok());
}
