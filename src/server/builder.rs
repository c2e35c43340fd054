//! ServerBuilder for fluent API to build HTTP servers

use super::cache::ViewCache;
use super::handlers::AppState;
use super::router::{build_action_routes, health_routes};
use crate::config::RoutesConfig;
use crate::core::auth::DenyAllProvider;
use crate::core::{AuthActions, CredentialsProvider, InvoiceActions, InvoiceService};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder wiring the actions to their storage and exposing them over HTTP
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_invoice_service(InMemoryInvoiceService::new())
///     .with_credentials_provider(UserStoreCredentialsProvider::new(users))
///     .build()?;
/// ```
pub struct ServerBuilder {
    invoice_service: Option<Arc<dyn InvoiceService>>,
    credentials_provider: Option<Arc<dyn CredentialsProvider>>,
    routes: RoutesConfig,
    cache: ViewCache,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            invoice_service: None,
            credentials_provider: None,
            routes: RoutesConfig::default(),
            cache: ViewCache::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the invoice service (required)
    pub fn with_invoice_service(mut self, service: impl InvoiceService + 'static) -> Self {
        self.invoice_service = Some(Arc::new(service));
        self
    }

    /// Set the credentials provider used by `/login`
    ///
    /// Without one, every sign-in is rejected.
    pub fn with_credentials_provider(
        mut self,
        provider: impl CredentialsProvider + 'static,
    ) -> Self {
        self.credentials_provider = Some(Arc::new(provider));
        self
    }

    /// Override the list and post-login routes
    pub fn with_routes(mut self, routes: RoutesConfig) -> Self {
        self.routes = routes;
        self
    }

    /// Share a view cache with the caller (e.g. to inspect it in tests)
    pub fn with_view_cache(mut self, cache: ViewCache) -> Self {
        self.cache = cache;
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the handler state
    pub fn build_state(&mut self) -> Result<AppState> {
        let service = self.invoice_service.take().ok_or_else(|| {
            anyhow::anyhow!("InvoiceService is required. Call .with_invoice_service()")
        })?;

        let provider: Arc<dyn CredentialsProvider> = match self.credentials_provider.take() {
            Some(provider) => provider,
            None => {
                tracing::warn!("No credentials provider configured, sign-in is disabled");
                Arc::new(DenyAllProvider)
            }
        };

        Ok(AppState {
            invoices: Arc::new(
                InvoiceActions::new(service).with_list_path(self.routes.invoices.clone()),
            ),
            auth: Arc::new(AuthActions::new(provider)),
            cache: self.cache.clone(),
            routes: Arc::new(self.routes.clone()),
        })
    }

    /// Build the final router
    ///
    /// This generates:
    /// - Health check routes
    /// - Invoice action routes and the sign-in route
    /// - Custom routes
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;

        let mut app = health_routes().merge(build_action_routes(state));
        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(all(test, feature = "in-memory"))]
mod tests {
    use super::*;
    use crate::storage::InMemoryInvoiceService;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_build_requires_invoice_service() {
        let err = ServerBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("InvoiceService is required"));
    }

    #[test]
    fn test_build_state_uses_configured_routes() {
        let mut builder = ServerBuilder::new()
            .with_invoice_service(InMemoryInvoiceService::new())
            .with_routes(RoutesConfig {
                invoices: "/billing".into(),
                after_login: "/home".into(),
            });
        let state = builder.build_state().unwrap();

        assert_eq!(state.invoices.list_path(), "/billing");
        assert_eq!(state.routes.after_login, "/home");
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = ServerBuilder::new()
            .with_invoice_service(InMemoryInvoiceService::new())
            .build()
            .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
