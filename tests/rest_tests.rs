//! HTTP tests for the invoice and sign-in routes over in-memory storage

#![cfg(feature = "in-memory")]

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use invoices::core::actions::{CREATE_VALIDATION_MESSAGE, UPDATE_VALIDATION_MESSAGE};
use invoices::core::auth::INVALID_CREDENTIALS_MESSAGE;
use invoices::core::validation::schema::AMOUNT_MESSAGE;
use invoices::prelude::*;
use serde_json::{Value, json};
use std::time::Duration;

const LIST: &str = "/dashboard/invoices";

struct TestApp {
    server: TestServer,
    invoices: InMemoryInvoiceService,
    cache: ViewCache,
}

fn create_test_app() -> TestApp {
    let invoices = InMemoryInvoiceService::new();
    let cache = ViewCache::new();

    let users = InMemoryUserStore::new();
    users
        .add(User::new("User", "user@nextmail.com", "123456").unwrap())
        .unwrap();

    let app = ServerBuilder::new()
        .with_invoice_service(invoices.clone())
        .with_credentials_provider(UserStoreCredentialsProvider::new(users))
        .with_view_cache(cache.clone())
        .build()
        .expect("Failed to build router");

    TestApp {
        server: TestServer::new(app).expect("Failed to create test server"),
        invoices,
        cache,
    }
}

fn invoice_form(customer_id: &str, amount: &str, status: &str) -> FormData {
    FormData::new()
        .with("customerId", customer_id)
        .with("amount", amount)
        .with("status", status)
}

async fn seed(invoices: &InMemoryInvoiceService) -> Uuid {
    invoices
        .insert(NewInvoice {
            customer_id: "cust-1".into(),
            amount: 1000,
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        })
        .await
        .unwrap()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_redirects_to_list() {
    let app = create_test_app();

    let response = app
        .server
        .post(LIST)
        .form(&invoice_form("cust-9", "15.50", "paid"))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), LIST);

    let stored = app.invoices.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].customer_id, "cust-9");
    assert_eq!(stored[0].amount, 1550);
    assert_eq!(stored[0].status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn test_create_validation_failure_is_unprocessable() {
    let app = create_test_app();

    let response = app
        .server
        .post(LIST)
        .form(&invoice_form("cust-1", "0", "paid"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "errors": { "amount": [AMOUNT_MESSAGE] },
            "message": CREATE_VALIDATION_MESSAGE,
        })
    );
    assert!(app.invoices.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_form_field_uses_first_value() {
    let app = create_test_app();

    let response = app
        .server
        .post(LIST)
        .bytes(Bytes::from_static(
            b"customerId=cust-1&amount=12.5&amount=0&status=paid",
        ))
        .content_type("application/x-www-form-urlencoded")
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let stored = app.invoices.list().await.unwrap();
    assert_eq!(stored[0].amount, 1250);
}

#[tokio::test]
async fn test_amount_beyond_cent_range_is_unprocessable() {
    let app = create_test_app();

    let response = app
        .server
        .post(LIST)
        .form(&invoice_form("cust-1", "1e20", "paid"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({ "amount": [AMOUNT_MESSAGE] })
    );
    assert!(app.invoices.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_form_body_is_bad_request() {
    let app = create_test_app();

    let response = app.server.post(LIST).text("customerId=cust-1").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_BODY");
    assert!(app.invoices.list().await.unwrap().is_empty());
}

// =============================================================================
// List / Get
// =============================================================================

#[tokio::test]
async fn test_list_is_cached_until_mutation() {
    let app = create_test_app();
    seed(&app.invoices).await;

    let first = app.server.get(LIST).await;
    first.assert_status(StatusCode::OK);
    assert_eq!(first.json::<Value>()["count"], 1);
    assert!(app.cache.contains(LIST));

    // Writes that bypass the actions are not seen until invalidation
    seed(&app.invoices).await;
    assert_eq!(app.server.get(LIST).await.json::<Value>()["count"], 1);

    app.server
        .post(LIST)
        .form(&invoice_form("cust-2", "3", "pending"))
        .await
        .assert_status(StatusCode::SEE_OTHER);
    assert!(!app.cache.contains(LIST));

    assert_eq!(app.server.get(LIST).await.json::<Value>()["count"], 3);
}

/// In-memory table whose `list()` answers with a snapshot taken before a delay
#[derive(Clone, Default)]
struct SlowListing {
    table: InMemoryInvoiceService,
}

#[async_trait]
impl InvoiceService for SlowListing {
    async fn insert(&self, invoice: NewInvoice) -> Result<Uuid> {
        self.table.insert(invoice).await
    }

    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<()> {
        self.table.update(id, changes).await
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.table.delete(id).await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>> {
        self.table.get(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let snapshot = self.table.list().await?;
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(snapshot)
    }
}

#[tokio::test]
async fn test_create_during_list_render_is_not_hidden_by_cache() {
    let service = SlowListing::default();
    let app = ServerBuilder::new()
        .with_invoice_service(service.clone())
        .build()
        .unwrap();
    let server = TestServer::new(app).unwrap();

    let (listed, created) = tokio::join!(async { server.get(LIST).await }, async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        server
            .post(LIST)
            .form(&invoice_form("cust-1", "5", "paid"))
            .await
    });

    created.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(listed.json::<Value>()["count"], 0);
    assert_eq!(service.table.list().await.unwrap().len(), 1);

    let after = server.get(LIST).await;
    assert_eq!(after.json::<Value>()["count"], 1);
}

#[tokio::test]
async fn test_get_invoice() {
    let app = create_test_app();
    let id = seed(&app.invoices).await;

    let response = app.server.get(&format!("{}/{}", LIST, id)).await;

    response.assert_status(StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["amount"], 1000);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["date"], "2024-01-15");
}

#[tokio::test]
async fn test_get_unknown_invoice_is_not_found() {
    let app = create_test_app();

    let response = app.server.get(&format!("{}/{}", LIST, Uuid::new_v4())).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "INVOICE_NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = create_test_app();

    app.server
        .get(&format!("{}/not-a-uuid", LIST))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.server
        .delete(&format!("{}/not-a-uuid", LIST))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_form_route_redirects() {
    let app = create_test_app();
    let id = seed(&app.invoices).await;

    let response = app
        .server
        .post(&format!("{}/{}/edit", LIST, id))
        .form(&invoice_form("cust-7", "42", "paid"))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), LIST);

    let updated = app.invoices.get(&id).await.unwrap().unwrap();
    assert_eq!(updated.customer_id, "cust-7");
    assert_eq!(updated.amount, 4200);
    assert_eq!(updated.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
}

#[tokio::test]
async fn test_update_validation_failure_leaves_row() {
    let app = create_test_app();
    let id = seed(&app.invoices).await;

    let response = app
        .server
        .put(&format!("{}/{}", LIST, id))
        .form(&invoice_form("", "42", "paid"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["message"], UPDATE_VALIDATION_MESSAGE);
    assert_eq!(
        app.invoices.get(&id).await.unwrap().unwrap().customer_id,
        "cust-1"
    );
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_returns_no_content() {
    let app = create_test_app();
    let id = seed(&app.invoices).await;
    let path = format!("{}/{}", LIST, id);

    app.server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
    app.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);

    // Deleting again is still a success
    app.server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_form_route_returns_to_list() {
    let app = create_test_app();
    let id = seed(&app.invoices).await;

    let response = app.server.post(&format!("{}/{}/delete", LIST, id)).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), LIST);
    assert!(app.invoices.get(&id).await.unwrap().is_none());
}

// =============================================================================
// Sign-in
// =============================================================================

#[tokio::test]
async fn test_login_success_redirects_to_dashboard() {
    let app = create_test_app();

    let response = app
        .server
        .post("/login")
        .form(
            &FormData::new()
                .with("email", "user@nextmail.com")
                .with("password", "123456"),
        )
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/dashboard");
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = create_test_app();

    let response = app
        .server
        .post("/login")
        .form(
            &FormData::new()
                .with("email", "user@nextmail.com")
                .with("password", "wrong-password"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": INVALID_CREDENTIALS_MESSAGE })
    );
}

#[tokio::test]
async fn test_login_without_provider_is_unauthorized() {
    let app = ServerBuilder::new()
        .with_invoice_service(InMemoryInvoiceService::new())
        .build()
        .unwrap();
    let server = TestServer::new(app).unwrap();

    server
        .post("/login")
        .form(
            &FormData::new()
                .with("email", "user@nextmail.com")
                .with("password", "123456"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_test_app();

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");
}
