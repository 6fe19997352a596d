//! HTTP API Layer
//!
//! This crate provides the REST API for the beneficiary registry using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for document types and beneficiaries
//! - **Middleware**: Request id, tracing, CORS, request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::postgres(pool), &config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use domain_beneficiary::{BeneficiaryRepository, BeneficiaryStore, DocumentRuleRegistry};
use infra_db::{DatabasePool, PostgresBeneficiaryStore, PostgresDocumentRuleRegistry};

use crate::config::ApiConfig;
use crate::handlers::{beneficiaries, documents, health};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<dyn DocumentRuleRegistry>,
    pub beneficiaries: BeneficiaryRepository,
}

impl AppState {
    /// Creates state over any pair of port implementations
    pub fn new(rules: Arc<dyn DocumentRuleRegistry>, store: Arc<dyn BeneficiaryStore>) -> Self {
        Self {
            beneficiaries: BeneficiaryRepository::new(rules.clone(), store),
            rules,
        }
    }

    /// Creates state backed by PostgreSQL
    pub fn postgres(pool: DatabasePool) -> Self {
        Self::new(
            Arc::new(PostgresDocumentRuleRegistry::new(pool.clone())),
            Arc::new(PostgresBeneficiaryStore::new(pool)),
        )
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Ports the handlers work against
/// * `config` - API configuration (CORS origin)
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState, config: &ApiConfig) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let document_routes = Router::new()
        .route("/", get(documents::list_documents))
        .route("/:id", get(documents::get_document));

    let beneficiary_routes = Router::new()
        .route(
            "/",
            get(beneficiaries::list_beneficiaries).post(beneficiaries::create_beneficiary),
        )
        .route(
            "/:id",
            get(beneficiaries::get_beneficiary)
                .put(beneficiaries::update_beneficiary)
                .delete(beneficiaries::delete_beneficiary),
        );

    let api_routes = Router::new()
        .nest("/documentos", document_routes)
        .nest("/beneficiarios", beneficiary_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware));

    // Last layer added is outermost: CORS, then request id, then tracing
    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(config.cors_allowed_origin.as_deref()))
        .with_state(state)
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(_)) => {
            warn!(origin = ?allowed_origin, "Ignoring unparseable CORS origin, allowing any");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
