//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the catalog and assignment store from validated config
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Run the sweeper alongside the server
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::assignments::{AssignmentStore, Sweeper};
use crate::config::LaneChangeConfig;
use crate::http::handlers::{
    assign_lane, clear_assignment, introspect_catalog, query_assignment, serve_lane,
};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lanes::{Catalog, CatalogError};
use crate::routing::LaneDispatcher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: LaneDispatcher,
}

/// HTTP server for the lane-change service.
pub struct HttpServer {
    router: Router,
    config: LaneChangeConfig,
    store: Arc<AssignmentStore>,
}

impl HttpServer {
    /// Create a new HTTP server from validated configuration.
    pub fn new(config: LaneChangeConfig) -> Result<Self, CatalogError> {
        let catalog = Arc::new(Catalog::new(&config.default_lane, config.lanes.clone())?);
        let store = Arc::new(AssignmentStore::from_config(&config.assignments));

        tracing::info!(
            lanes = catalog.len(),
            default = %catalog.default_key(),
            default_ttl_secs = config.assignments.default_ttl_secs,
            "Lane catalog loaded"
        );

        let state = AppState {
            dispatcher: LaneDispatcher::new(catalog, store.clone()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            store,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &LaneChangeConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(serve_lane))
            .route(
                "/change",
                get(query_assignment)
                    .post(assign_lane)
                    .delete(clear_assignment)
                    .fallback(query_assignment),
            )
            .route("/config", any(introspect_catalog))
            .fallback(serve_lane)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let sweeper = Sweeper::new(self.store.clone(), self.config.assignments.sweep_interval());
        tokio::spawn(sweeper.run(shutdown.resubscribe()));

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn store(&self) -> &Arc<AssignmentStore> {
        &self.store
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &LaneChangeConfig {
        &self.config
    }
}
