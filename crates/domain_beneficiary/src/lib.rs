//! Beneficiary Domain
//!
//! This crate owns the rules for registering program beneficiaries against
//! a reference table of identity-document types.
//!
//! # Components
//!
//! - **DocumentRuleRegistry**: read-only port exposing the document types and
//!   the format rule each one carries (exact length, numeric-only, active flag)
//! - **BeneficiaryStore**: persistence port with transactional units of work
//! - **BeneficiaryRepository**: the validation-and-persistence workflow that
//!   enforces document format, uniqueness, and sex code before any write
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_beneficiary::{BeneficiaryRepository, BeneficiaryDraft, InMemoryStore};
//!
//! let store = Arc::new(InMemoryStore::with_document_types(document_types).await);
//! let repository = BeneficiaryRepository::new(store.clone(), store);
//!
//! let created = repository.create(draft).await?;
//! assert_eq!(created.document_abbreviation, "DNI");
//! ```

pub mod beneficiary;
pub mod document_type;
pub mod error;
pub mod validation;
pub mod ports;
pub mod repository;

pub use beneficiary::{Beneficiary, BeneficiaryDraft, BeneficiaryView, Sex, ValidatedBeneficiary};
pub use document_type::{DocumentType, FormatViolation, MAX_DOCUMENT_LENGTH};
pub use error::BeneficiaryError;
pub use ports::{BeneficiaryStore, BeneficiaryUnitOfWork, DocumentRuleRegistry};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryStore;
pub use repository::BeneficiaryRepository;
