//! Domain Adapters
//!
//! This module provides adapter implementations for the beneficiary domain
//! ports, connecting them to the PostgreSQL database layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::{PostgresBeneficiaryStore, PostgresDocumentRuleRegistry};
//! use domain_beneficiary::BeneficiaryRepository;
//!
//! let repository = BeneficiaryRepository::new(
//!     Arc::new(PostgresDocumentRuleRegistry::new(pool.clone())),
//!     Arc::new(PostgresBeneficiaryStore::new(pool)),
//! );
//! ```

use std::time::Instant;

use chrono::Utc;
use sqlx::PgPool;

use core_kernel::{AdapterHealth, HealthCheckResult};

pub mod beneficiary_store;
pub mod document_rules;

pub use beneficiary_store::PostgresBeneficiaryStore;
pub use document_rules::PostgresDocumentRuleRegistry;

/// Checks database connectivity with a `SELECT 1`
async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    let (status, message) = match result {
        Ok(_) => (AdapterHealth::Healthy, None),
        Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
    };

    HealthCheckResult {
        adapter_id: adapter_id.to_string(),
        status,
        latency_ms,
        message,
        checked_at: Utc::now(),
    }
}
