//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{Days, NaiveDate};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use core_kernel::{BeneficiaryId, DocumentTypeId};
use domain_beneficiary::BeneficiaryDraft;

use crate::fixtures::{BeneficiaryFixtures, DocumentTypeFixtures};

/// Builder for beneficiary drafts
///
/// Defaults to a valid DNI holder, so a bare `build()` passes validation.
#[derive(Debug, Clone)]
pub struct BeneficiaryDraftBuilder {
    id: Option<BeneficiaryId>,
    first_names: String,
    last_names: String,
    document_type_id: DocumentTypeId,
    document_number: String,
    birth_date: NaiveDate,
    sex: String,
}

impl Default for BeneficiaryDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BeneficiaryDraftBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: None,
            first_names: "María Elena".to_string(),
            last_names: "Quispe Huamán".to_string(),
            document_type_id: DocumentTypeFixtures::dni().id,
            document_number: BeneficiaryFixtures::dni_number().to_string(),
            birth_date: BeneficiaryFixtures::birth_date(),
            sex: "F".to_string(),
        }
    }

    /// Creates a builder with fake names, a random DNI number and birth date
    ///
    /// Two random builders collide on the document number with negligible
    /// probability; tests that need distinct numbers should set them.
    pub fn random() -> Self {
        let number: u32 = (10_000_000..100_000_000u32).fake();
        let age_days: u64 = (6_570..32_850u64).fake();
        let birth_date = NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.checked_sub_days(Days::new(age_days)))
            .expect("birth date in range");
        let sex = if (0..2u8).fake::<u8>() == 0 { "M" } else { "F" };

        Self::new()
            .with_first_names(FirstName().fake::<String>())
            .with_last_names(LastName().fake::<String>())
            .with_document_number(number.to_string())
            .with_birth_date(birth_date)
            .with_sex(sex)
    }

    /// Sets the embedded id
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(BeneficiaryId::new(id));
        self
    }

    pub fn with_first_names(mut self, names: impl Into<String>) -> Self {
        self.first_names = names.into();
        self
    }

    pub fn with_last_names(mut self, names: impl Into<String>) -> Self {
        self.last_names = names.into();
        self
    }

    /// Sets the document type and number together
    pub fn with_document(mut self, document_type_id: DocumentTypeId, number: impl Into<String>) -> Self {
        self.document_type_id = document_type_id;
        self.document_number = number.into();
        self
    }

    pub fn with_document_type_id(mut self, document_type_id: DocumentTypeId) -> Self {
        self.document_type_id = document_type_id;
        self
    }

    pub fn with_document_number(mut self, number: impl Into<String>) -> Self {
        self.document_number = number.into();
        self
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = date;
        self
    }

    /// Sets the raw sex code; invalid codes are allowed
    pub fn with_sex(mut self, code: impl Into<String>) -> Self {
        self.sex = code.into();
        self
    }

    /// Builds the draft
    pub fn build(self) -> BeneficiaryDraft {
        BeneficiaryDraft {
            id: self.id,
            first_names: self.first_names,
            last_names: self.last_names,
            document_type_id: self.document_type_id,
            document_number: self.document_number,
            birth_date: self.birth_date,
            sex: self.sex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_draft_satisfies_dni_rule() {
        let draft = BeneficiaryDraftBuilder::new().build();

        assert_eq!(draft.document_type_id, DocumentTypeId::new(1));
        assert!(DocumentTypeFixtures::dni().check_number(&draft.document_number).is_ok());
        assert!(draft.id.is_none());
    }

    #[test]
    fn test_random_draft_satisfies_dni_rule() {
        for _ in 0..20 {
            let draft = BeneficiaryDraftBuilder::random().build();
            assert!(DocumentTypeFixtures::dni().check_number(&draft.document_number).is_ok());
            assert!(!draft.first_names.trim().is_empty());
            assert!(draft.sex == "M" || draft.sex == "F");
        }
    }
}
