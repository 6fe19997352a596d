//! Repository implementations for the registry tables
//!
//! This module provides the SQL for each table and the row types it maps
//! to. Queries are built at runtime and bound positionally; the adapters in
//! [`crate::adapters`] convert rows into domain types.

pub mod document_type;
pub mod beneficiary;

pub use document_type::{DocumentTypeRepository, DocumentTypeRow};
pub use beneficiary::{BeneficiaryRepository, BeneficiaryRow, BeneficiaryValues, BeneficiaryViewRow};
