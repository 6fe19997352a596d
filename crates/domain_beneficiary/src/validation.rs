//! Beneficiary validation rules
//!
//! The checks that need no storage access live here; the workflow in
//! [`crate::repository`] interleaves them with the document-type lookup and
//! the uniqueness check so the overall order is:
//!
//! 0. field shape (names non-blank, at most 100 characters)
//! 1. document type resolves
//! 2. numeric-only rule
//! 3. exact length rule
//! 4. no other beneficiary holds the same document
//! 5. sex code is "M" or "F"
//!
//! The first failing step wins.

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::beneficiary::{BeneficiaryDraft, Sex, ValidatedBeneficiary};
use crate::document_type::DocumentType;
use crate::error::BeneficiaryError;

/// Stateless validator for beneficiary drafts
pub struct BeneficiaryValidator;

impl BeneficiaryValidator {
    /// Step 0: field shape
    ///
    /// Reports every offending field at once, sorted by name.
    pub fn check_fields(draft: &BeneficiaryDraft) -> Result<(), BeneficiaryError> {
        let mut fields: Vec<String> = match draft.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors.field_errors().keys().map(|k| k.to_string()).collect(),
        };

        if draft.first_names.trim().is_empty() {
            fields.push("first_names".to_string());
        }
        if draft.last_names.trim().is_empty() {
            fields.push("last_names".to_string());
        }

        fields.sort();
        fields.dedup();

        if fields.is_empty() {
            Ok(())
        } else {
            Err(BeneficiaryError::InvalidField(fields))
        }
    }

    /// Steps 2 and 3: the document number against its type's rule
    pub fn check_document(
        draft: &BeneficiaryDraft,
        document_type: &DocumentType,
    ) -> Result<(), BeneficiaryError> {
        document_type
            .check_number(&draft.document_number)
            .map_err(BeneficiaryError::from)
    }

    /// Step 5: the sex code
    pub fn check_sex(code: &str) -> Result<Sex, BeneficiaryError> {
        Sex::from_code(code).ok_or_else(|| BeneficiaryError::InvalidSex(code.to_string()))
    }

    /// Builds the record to write once every step has passed
    pub fn finish(draft: BeneficiaryDraft, sex: Sex, recorded_at: DateTime<Utc>) -> ValidatedBeneficiary {
        ValidatedBeneficiary {
            first_names: draft.first_names,
            last_names: draft.last_names,
            document_type_id: draft.document_type_id,
            document_number: draft.document_number,
            birth_date: draft.birth_date,
            sex,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::DocumentTypeId;

    fn draft() -> BeneficiaryDraft {
        BeneficiaryDraft {
            id: None,
            first_names: "Luis Alberto".to_string(),
            last_names: "Mamani Condori".to_string(),
            document_type_id: DocumentTypeId::new(1),
            document_number: "45871236".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1978, 11, 2).unwrap(),
            sex: "M".to_string(),
        }
    }

    #[test]
    fn test_valid_fields_pass() {
        assert!(BeneficiaryValidator::check_fields(&draft()).is_ok());
    }

    #[test]
    fn test_blank_names_rejected() {
        let mut d = draft();
        d.first_names = "   ".to_string();

        match BeneficiaryValidator::check_fields(&d) {
            Err(BeneficiaryError::InvalidField(fields)) => assert_eq!(fields, vec!["first_names"]),
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_all_offending_fields_reported() {
        let mut d = draft();
        d.first_names = String::new();
        d.last_names = "x".repeat(101);

        match BeneficiaryValidator::check_fields(&d) {
            Err(BeneficiaryError::InvalidField(fields)) => {
                assert_eq!(fields, vec!["first_names", "last_names"]);
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_hundred_character_name_allowed() {
        let mut d = draft();
        d.last_names = "ñ".repeat(100);
        assert!(BeneficiaryValidator::check_fields(&d).is_ok());
    }

    #[test]
    fn test_check_sex() {
        assert_eq!(BeneficiaryValidator::check_sex("F").unwrap(), Sex::Female);
        assert!(matches!(
            BeneficiaryValidator::check_sex("f"),
            Err(BeneficiaryError::InvalidSex(code)) if code == "f"
        ));
    }

    #[test]
    fn test_finish_carries_fields() {
        let at = Utc::now();
        let record = BeneficiaryValidator::finish(draft(), Sex::Male, at);

        assert_eq!(record.document_number, "45871236");
        assert_eq!(record.sex, Sex::Male);
        assert_eq!(record.recorded_at, at);
    }
}
