//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL storage for the beneficiary registry
//! using SQLx.
//!
//! # Architecture
//!
//! - [`repositories`]: table-level SQL and row types
//! - [`adapters`]: implementations of the `domain_beneficiary` ports over
//!   the repositories
//! - [`pool`]: connection pool and embedded migrations
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresBeneficiaryStore;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/beneficiarios")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresBeneficiaryStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig, DEFAULT_DATABASE_URL};
pub use error::DatabaseError;
pub use adapters::{PostgresBeneficiaryStore, PostgresDocumentRuleRegistry};
