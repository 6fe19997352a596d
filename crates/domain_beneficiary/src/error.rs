//! Beneficiary domain errors
//!
//! Every validation failure is detected before any write and carries enough
//! detail for the caller to correct the input. `Internal` covers storage and
//! unexpected failures; its detail is for server logs only.

use thiserror::Error;

use core_kernel::{BeneficiaryId, DocumentTypeId, PortError};
use crate::document_type::FormatViolation;

/// Errors that can occur in the beneficiary workflow
#[derive(Debug, Error)]
pub enum BeneficiaryError {
    /// No beneficiary with the given id
    #[error("Beneficiary not found: {0}")]
    NotFound(BeneficiaryId),

    /// One or more fields have the wrong shape (blank or too long)
    #[error("Invalid field(s): {}", .0.join(", "))]
    InvalidField(Vec<String>),

    /// The referenced document type does not exist
    #[error("Invalid document type: {0}")]
    InvalidDocumentType(DocumentTypeId),

    /// The document number breaks its type's length or character rule
    #[error("Invalid document format: {0}")]
    InvalidDocumentFormat(#[from] FormatViolation),

    /// Another beneficiary already holds this document
    #[error("A beneficiary with document number {document_number} of type {document_type_id} already exists")]
    DuplicateDocument {
        document_type_id: DocumentTypeId,
        document_number: String,
    },

    /// Sex code is not exactly "M" or "F"
    #[error("Invalid sex code '{0}': expected 'M' or 'F'")]
    InvalidSex(String),

    /// The target id and the id embedded in the record disagree
    #[error("Id mismatch: target {path}, record {body}")]
    IdMismatch {
        path: BeneficiaryId,
        body: BeneficiaryId,
    },

    /// Storage or unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BeneficiaryError {
    /// Creates a DuplicateDocument error
    pub fn duplicate(document_type_id: DocumentTypeId, document_number: impl Into<String>) -> Self {
        BeneficiaryError::DuplicateDocument {
            document_type_id,
            document_number: document_number.into(),
        }
    }
}

/// Port failures outside the validation path are internal
impl From<PortError> for BeneficiaryError {
    fn from(err: PortError) -> Self {
        BeneficiaryError::Internal(err.to_string())
    }
}
