//! Beneficiary records
//!
//! A beneficiary moves through three shapes:
//!
//! - [`BeneficiaryDraft`]: what a client submits, unvalidated (the sex code is
//!   still a raw string so an invalid code reaches the validation step)
//! - [`ValidatedBeneficiary`]: a draft that passed every rule, ready to write
//! - [`Beneficiary`] / [`BeneficiaryView`]: the stored record, and the stored
//!   record joined with its document type's display fields

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{BeneficiaryId, DocumentTypeId};
use crate::document_type::DocumentType;

/// Sex code of a beneficiary, transmitted as "M" or "F"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Parses the single-character code, case-sensitively
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Sex::Male),
            "F" => Some(Sex::Female),
            _ => None,
        }
    }

    /// Returns the single-character code
    pub fn code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

/// A beneficiary as submitted for create or full-replace update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BeneficiaryDraft {
    /// Embedded id; on update it must agree with the target id when present
    pub id: Option<BeneficiaryId>,
    #[validate(length(min = 1, max = 100))]
    pub first_names: String,
    #[validate(length(min = 1, max = 100))]
    pub last_names: String,
    pub document_type_id: DocumentTypeId,
    pub document_number: String,
    pub birth_date: NaiveDate,
    pub sex: String,
}

/// A draft that passed the validation algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBeneficiary {
    pub first_names: String,
    pub last_names: String,
    pub document_type_id: DocumentTypeId,
    pub document_number: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    /// Timestamp to record as modification time (and creation time on insert)
    pub recorded_at: DateTime<Utc>,
}

/// A stored beneficiary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: BeneficiaryId,
    pub first_names: String,
    pub last_names: String,
    pub document_type_id: DocumentTypeId,
    pub document_number: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Beneficiary {
    /// Materializes a validated record under a freshly assigned id
    pub fn from_validated(id: BeneficiaryId, record: ValidatedBeneficiary) -> Self {
        Self {
            id,
            first_names: record.first_names,
            last_names: record.last_names,
            document_type_id: record.document_type_id,
            document_number: record.document_number,
            birth_date: record.birth_date,
            sex: record.sex,
            created_at: record.recorded_at,
            modified_at: record.recorded_at,
        }
    }

    /// Overwrites every mutable field in place; `created_at` is untouched
    pub fn apply(&mut self, record: ValidatedBeneficiary) {
        self.first_names = record.first_names;
        self.last_names = record.last_names;
        self.document_type_id = record.document_type_id;
        self.document_number = record.document_number;
        self.birth_date = record.birth_date;
        self.sex = record.sex;
        self.modified_at = record.recorded_at;
    }
}

/// A beneficiary joined with its document type's display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryView {
    pub beneficiary: Beneficiary,
    pub document_name: String,
    pub document_abbreviation: String,
    pub document_country: String,
}

impl BeneficiaryView {
    /// Joins a stored beneficiary with the document type it references
    pub fn join(beneficiary: Beneficiary, document_type: &DocumentType) -> Self {
        Self {
            beneficiary,
            document_name: document_type.name.clone(),
            document_abbreviation: document_type.abbreviation.clone(),
            document_country: document_type.country.clone(),
        }
    }

    pub fn id(&self) -> BeneficiaryId {
        self.beneficiary.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(at: DateTime<Utc>) -> ValidatedBeneficiary {
        ValidatedBeneficiary {
            first_names: "María Elena".to_string(),
            last_names: "Quispe Huamán".to_string(),
            document_type_id: DocumentTypeId::new(1),
            document_number: "12345678".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 3, 14).unwrap(),
            sex: Sex::Female,
            recorded_at: at,
        }
    }

    #[test]
    fn test_sex_codes_are_case_sensitive() {
        assert_eq!(Sex::from_code("M"), Some(Sex::Male));
        assert_eq!(Sex::from_code("F"), Some(Sex::Female));
        assert_eq!(Sex::from_code("m"), None);
        assert_eq!(Sex::from_code("X"), None);
        assert_eq!(Sex::from_code(""), None);
        assert_eq!(Sex::from_code("MF"), None);
    }

    #[test]
    fn test_sex_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Sex::Female).unwrap(), "\"F\"");
        assert_eq!(Sex::Male.code(), "M");
    }

    #[test]
    fn test_from_validated_sets_both_timestamps() {
        let at = Utc::now();
        let beneficiary = Beneficiary::from_validated(BeneficiaryId::new(3), record(at));

        assert_eq!(beneficiary.id, BeneficiaryId::new(3));
        assert_eq!(beneficiary.created_at, at);
        assert_eq!(beneficiary.modified_at, at);
    }

    #[test]
    fn test_apply_keeps_created_at() {
        let created = Utc::now() - chrono::Duration::days(2);
        let mut beneficiary = Beneficiary::from_validated(BeneficiaryId::new(3), record(created));

        let later = Utc::now();
        let mut changes = record(later);
        changes.document_number = "87654321".to_string();
        beneficiary.apply(changes);

        assert_eq!(beneficiary.created_at, created);
        assert_eq!(beneficiary.modified_at, later);
        assert_eq!(beneficiary.document_number, "87654321");
    }

    #[test]
    fn test_draft_length_rules() {
        let mut draft = BeneficiaryDraft {
            id: None,
            first_names: "Ana".to_string(),
            last_names: "Torres".to_string(),
            document_type_id: DocumentTypeId::new(1),
            document_number: "12345678".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
            sex: "F".to_string(),
        };
        assert!(draft.validate().is_ok());

        draft.first_names = "a".repeat(101);
        draft.last_names = String::new();
        let errors = draft.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_names"));
        assert!(fields.contains_key("last_names"));
    }
}
