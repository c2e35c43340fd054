//! Router builder for the invoice and sign-in routes

use crate::server::handlers::{
    AppState, create_invoice, delete_invoice, delete_invoice_form, get_invoice, health_check,
    list_invoices, login, update_invoice,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build the action routes
///
/// With the default list route `/dashboard/invoices`:
/// - GET    /dashboard/invoices              - Cached invoice list view
/// - POST   /dashboard/invoices              - Create an invoice (form)
/// - GET    /dashboard/invoices/{id}         - Get one invoice
/// - PUT    /dashboard/invoices/{id}         - Update an invoice (form)
/// - DELETE /dashboard/invoices/{id}         - Delete an invoice
/// - POST   /dashboard/invoices/{id}/edit    - Update an invoice (HTML form)
/// - POST   /dashboard/invoices/{id}/delete  - Delete an invoice (HTML form)
/// - POST   /login                           - Credential sign-in (form)
pub fn build_action_routes(state: AppState) -> Router {
    let base = state.invoices.list_path().trim_end_matches('/').to_string();

    Router::new()
        .route(&base, get(list_invoices).post(create_invoice))
        .route(
            &format!("{}/{{id}}", base),
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route(&format!("{}/{{id}}/edit", base), post(update_invoice))
        .route(&format!("{}/{{id}}/delete", base), post(delete_invoice_form))
        .route("/login", post(login))
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}
