//! Custom Test Assertions
//!
//! Provides assertion helpers for beneficiary results that give more
//! meaningful failure messages than matching by hand.

use std::collections::HashSet;
use std::fmt::Debug;

use domain_beneficiary::{BeneficiaryDraft, BeneficiaryError, BeneficiaryView, FormatViolation};

/// Asserts that a joined record carries every field of the draft it was created from
///
/// # Panics
///
/// Panics naming the first field that differs
pub fn assert_view_matches_draft(view: &BeneficiaryView, draft: &BeneficiaryDraft) {
    let b = &view.beneficiary;
    assert_eq!(b.first_names, draft.first_names, "first_names differ");
    assert_eq!(b.last_names, draft.last_names, "last_names differ");
    assert_eq!(b.document_type_id, draft.document_type_id, "document_type_id differs");
    assert_eq!(b.document_number, draft.document_number, "document_number differs");
    assert_eq!(b.birth_date, draft.birth_date, "birth_date differs");
    assert_eq!(b.sex.code(), draft.sex, "sex differs");
    assert!(b.modified_at >= b.created_at, "modified_at precedes created_at");
}

/// Asserts that no two records share a document type and number
pub fn assert_unique_documents(views: &[BeneficiaryView]) {
    let mut seen = HashSet::new();
    for view in views {
        let key = (view.beneficiary.document_type_id, view.beneficiary.document_number.as_str());
        assert!(
            seen.insert(key),
            "document {} of type {} held by more than one beneficiary",
            key.1,
            key.0
        );
    }
}

/// Asserts that a result failed with `DuplicateDocument`
pub fn assert_duplicate_document<T: Debug>(result: &Result<T, BeneficiaryError>) {
    assert!(
        matches!(result, Err(BeneficiaryError::DuplicateDocument { .. })),
        "Expected DuplicateDocument, got {:?}",
        result
    );
}

/// Asserts that a result failed with `InvalidDocumentFormat` for a non-digit
pub fn assert_non_numeric<T: Debug>(result: &Result<T, BeneficiaryError>) {
    assert!(
        matches!(result, Err(BeneficiaryError::InvalidDocumentFormat(FormatViolation::NonNumeric))),
        "Expected non-numeric InvalidDocumentFormat, got {:?}",
        result
    );
}

/// Asserts that a result failed with `InvalidDocumentFormat` naming the required length
pub fn assert_wrong_length<T: Debug>(result: &Result<T, BeneficiaryError>, expected: u16) {
    match result {
        Err(BeneficiaryError::InvalidDocumentFormat(FormatViolation::WrongLength { expected: e, .. })) => {
            assert_eq!(*e, expected, "wrong required length reported");
        }
        other => panic!("Expected wrong-length InvalidDocumentFormat, got {:?}", other),
    }
}

/// Asserts that a result failed with `NotFound`
pub fn assert_not_found<T: Debug>(result: &Result<T, BeneficiaryError>) {
    assert!(
        matches!(result, Err(BeneficiaryError::NotFound(_))),
        "Expected NotFound, got {:?}",
        result
    );
}
