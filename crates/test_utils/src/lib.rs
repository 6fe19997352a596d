//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! beneficiary registry test suite.
//!
//! # Modules
//!
//! - `fixtures`: Seeded document types and ready-made in-memory repositories
//! - `builders`: Builder for beneficiary drafts
//! - `database`: PostgreSQL container management
//! - `assertions`: Assertion helpers for beneficiary results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
