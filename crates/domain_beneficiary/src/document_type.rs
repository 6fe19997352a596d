//! Identity document types and their format rules
//!
//! Each document type (national ID, passport, foreigner card, ...) belongs to
//! a country and fixes the exact number of characters a document number must
//! have, and whether those characters must all be decimal digits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{CoreError, DocumentTypeId};

/// Longest document number the registry stores
pub const MAX_DOCUMENT_LENGTH: u16 = 20;

/// A reference entry describing a category of identity document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: DocumentTypeId,
    /// Display name, e.g. "Documento Nacional de Identidad"
    pub name: String,
    /// Short form, e.g. "DNI"
    pub abbreviation: String,
    pub country: String,
    /// Exact character count a document number must have
    pub expected_length: u16,
    /// Whether document numbers may only contain decimal digits
    pub numeric_only: bool,
    /// Inactive types are hidden from choice lists but still validate
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Why a document number does not satisfy its type's rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatViolation {
    #[error("document number must contain only digits")]
    NonNumeric,

    #[error("document number must have {expected} characters, got {actual}")]
    WrongLength { expected: u16, actual: usize },
}

impl DocumentType {
    /// Creates an active document type
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` unless `expected_length` is between 1
    /// and [`MAX_DOCUMENT_LENGTH`].
    pub fn new(
        id: DocumentTypeId,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        country: impl Into<String>,
        expected_length: u16,
        numeric_only: bool,
    ) -> Result<Self, CoreError> {
        Self::check_expected_length(expected_length)?;

        let now = Utc::now();
        Ok(Self {
            id,
            name: name.into(),
            abbreviation: abbreviation.into(),
            country: country.into(),
            expected_length,
            numeric_only,
            active: true,
            created_at: now,
            modified_at: now,
        })
    }

    /// Validates a stored length against the registry bounds
    pub fn check_expected_length(expected_length: u16) -> Result<(), CoreError> {
        if expected_length == 0 || expected_length > MAX_DOCUMENT_LENGTH {
            return Err(CoreError::validation(format!(
                "expected length must be between 1 and {}, got {}",
                MAX_DOCUMENT_LENGTH, expected_length
            )));
        }
        Ok(())
    }

    /// Returns a copy of this type flagged inactive
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self.modified_at = Utc::now();
        self
    }

    /// Checks a document number against this type's rule
    ///
    /// The numeric-only check runs before the length check, so a value that
    /// violates both reports `NonNumeric`.
    pub fn check_number(&self, document_number: &str) -> Result<(), FormatViolation> {
        if self.numeric_only && !document_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormatViolation::NonNumeric);
        }

        let actual = document_number.chars().count();
        if actual != usize::from(self.expected_length) {
            return Err(FormatViolation::WrongLength {
                expected: self.expected_length,
                actual,
            });
        }

        Ok(())
    }

    /// Ordering used by choice lists: country, then name
    pub fn list_key(&self) -> (&str, &str) {
        (&self.country, &self.name)
    }
}
