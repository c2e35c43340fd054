//! HTTP handlers exposing the invoice and sign-in actions
//!
//! Handlers translate action outcomes into responses: a successful mutation
//! invalidates the cached list view and redirects (`303 See Other`), a
//! validation failure renders the form state with `422`, and a persistence
//! failure renders it with `500`.

use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::RoutesConfig;
use crate::core::error::{InvoiceError, InvoicesResult, RequestError, ValidationError};
use crate::core::{
    ActionOutcome, ActionState, AuthActions, CredentialsProvider, FormData, InvoiceActions,
    InvoiceService,
};
use crate::server::cache::ViewCache;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<InvoiceActions<Arc<dyn InvoiceService>>>,
    pub auth: Arc<AuthActions<Arc<dyn CredentialsProvider>>>,
    pub cache: ViewCache,
    pub routes: Arc<RoutesConfig>,
}

fn parse_id(raw: &str) -> InvoicesResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        ValidationError::InvalidId {
            value: raw.to_string(),
        }
        .into()
    })
}

fn form_body(form: Result<Form<FormData>, FormRejection>) -> InvoicesResult<FormData> {
    form.map(|Form(data)| data).map_err(|rejection| {
        RequestError::InvalidBody {
            message: rejection.body_text(),
        }
        .into()
    })
}

/// Turn an action outcome into a response, applying its cache signal
fn respond(cache: &ViewCache, outcome: ActionOutcome, fallback: Option<&str>) -> Response {
    match outcome {
        ActionOutcome::Success(after) => {
            cache.invalidate(&after.revalidate);
            match after.redirect.as_deref().or(fallback) {
                Some(target) => Redirect::to(target).into_response(),
                None => StatusCode::NO_CONTENT.into_response(),
            }
        }
        failure @ ActionOutcome::ValidationFailure { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(failure.state())).into_response()
        }
        failure @ ActionOutcome::PersistenceFailure { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failure.state())).into_response()
        }
    }
}

/// GET {invoices}: the invoice list view, served from cache when fresh
pub async fn list_invoices(State(state): State<AppState>) -> InvoicesResult<Json<Value>> {
    let path = state.invoices.list_path();

    if let Some(view) = state.cache.get(path) {
        tracing::debug!(path, "Serving cached view");
        return Ok(Json(view));
    }

    let generation = state.cache.generation(path);
    let invoices = state.invoices.service().list().await?;
    let view = json!({
        "invoices": invoices,
        "count": invoices.len()
    });
    state.cache.put_if_generation(path, generation, view.clone());

    Ok(Json(view))
}

/// GET {invoices}/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> InvoicesResult<Json<Value>> {
    let id = parse_id(&id)?;

    let invoice = state
        .invoices
        .service()
        .get(&id)
        .await?
        .ok_or(InvoiceError::NotFound { id })?;

    Ok(Json(json!(invoice)))
}

/// POST {invoices}
pub async fn create_invoice(
    State(state): State<AppState>,
    form: Result<Form<FormData>, FormRejection>,
) -> InvoicesResult<Response> {
    let form = form_body(form)?;
    let outcome = state
        .invoices
        .create_invoice(&ActionState::default(), &form)
        .await;
    Ok(respond(&state.cache, outcome, None))
}

/// PUT {invoices}/{id} and POST {invoices}/{id}/edit
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<FormData>, FormRejection>,
) -> InvoicesResult<Response> {
    let id = parse_id(&id)?;
    let form = form_body(form)?;
    let outcome = state
        .invoices
        .update_invoice(&id, &ActionState::default(), &form)
        .await;
    Ok(respond(&state.cache, outcome, None))
}

/// DELETE {invoices}/{id}
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> InvoicesResult<Response> {
    let id = parse_id(&id)?;
    let outcome = state.invoices.delete_invoice(&id).await;
    Ok(respond(&state.cache, outcome, None))
}

/// POST {invoices}/{id}/delete: form variant that returns to the list
pub async fn delete_invoice_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> InvoicesResult<Response> {
    let id = parse_id(&id)?;
    let outcome = state.invoices.delete_invoice(&id).await;
    Ok(respond(
        &state.cache,
        outcome,
        Some(state.invoices.list_path()),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<FormData>, FormRejection>,
) -> InvoicesResult<Response> {
    let form = form_body(form)?;
    let response = match state.auth.sign_in(&form).await {
        Ok(_) => Redirect::to(&state.routes.after_login).into_response(),
        Err(message) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": message })),
        )
            .into_response(),
    };
    Ok(response)
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-actions"
    }))
}
