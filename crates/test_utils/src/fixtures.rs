//! Pre-built Test Fixtures
//!
//! Provides ready-to-use document types and stores for tests. The document
//! types mirror the seed migration row for row (same ids, same rules), so a
//! test written against the in-memory store can run unchanged against a
//! migrated PostgreSQL database.

use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use core_kernel::DocumentTypeId;
use domain_beneficiary::{BeneficiaryRepository, DocumentType, InMemoryStore};

/// Every seeded document type, active and inactive
pub static DOCUMENT_TYPES: Lazy<Vec<DocumentType>> = Lazy::new(DocumentTypeFixtures::all);

/// Fixture for document type test data
pub struct DocumentTypeFixtures;

impl DocumentTypeFixtures {
    fn build(id: i32, name: &str, abbreviation: &str, country: &str, length: u16, numeric_only: bool) -> DocumentType {
        DocumentType::new(DocumentTypeId::new(id), name, abbreviation, country, length, numeric_only)
            .expect("fixture document type has a valid length")
    }

    /// Peruvian national ID: 8 digits
    pub fn dni() -> DocumentType {
        Self::build(1, "Documento Nacional de Identidad", "DNI", "Perú", 8, true)
    }

    /// Peruvian foreigner card: 9 characters, letters allowed
    pub fn carne_extranjeria() -> DocumentType {
        Self::build(2, "Carné de Extranjería", "CE", "Perú", 9, false)
    }

    /// Passport: 9 characters, letters allowed
    pub fn passport() -> DocumentType {
        Self::build(3, "Pasaporte", "PAS", "Perú", 9, false)
    }

    /// Peruvian taxpayer number: 11 digits
    pub fn ruc() -> DocumentType {
        Self::build(4, "Registro Único de Contribuyentes", "RUC", "Perú", 11, true)
    }

    /// Colombian citizenship card: 10 digits
    pub fn cedula_colombia() -> DocumentType {
        Self::build(5, "Cédula de Ciudadanía", "CC", "Colombia", 10, true)
    }

    /// Bolivian identity card: 7 digits
    pub fn cedula_bolivia() -> DocumentType {
        Self::build(6, "Cédula de Identidad", "CI", "Bolivia", 7, true)
    }

    /// Retired electoral booklet: inactive, still validates
    pub fn libreta_electoral() -> DocumentType {
        Self::build(7, "Libreta Electoral", "LE", "Perú", 8, true).deactivated()
    }

    /// All fixtures in id order
    pub fn all() -> Vec<DocumentType> {
        vec![
            Self::dni(),
            Self::carne_extranjeria(),
            Self::passport(),
            Self::ruc(),
            Self::cedula_colombia(),
            Self::cedula_bolivia(),
            Self::libreta_electoral(),
        ]
    }

    /// An id no fixture uses
    pub fn unknown_id() -> DocumentTypeId {
        DocumentTypeId::new(99)
    }
}

/// Fixture for beneficiary field values
pub struct BeneficiaryFixtures;

impl BeneficiaryFixtures {
    /// A valid DNI number
    pub fn dni_number() -> &'static str {
        "12345678"
    }

    /// A valid passport number
    pub fn passport_number() -> &'static str {
        "AB1234567"
    }

    /// Standard birth date
    pub fn birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 5, 17).expect("valid date")
    }
}

/// Creates an in-memory store seeded with every fixture document type
pub async fn seeded_store() -> InMemoryStore {
    InMemoryStore::with_document_types(DOCUMENT_TYPES.clone()).await
}

/// Creates a repository over a fresh seeded in-memory store
///
/// The store handle is returned too, for inspecting state directly.
pub async fn in_memory_repository() -> (BeneficiaryRepository, InMemoryStore) {
    let store = seeded_store().await;
    let shared = Arc::new(store.clone());
    (BeneficiaryRepository::new(shared.clone(), shared), store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_ids_are_unique_and_ordered() {
        let ids: Vec<i32> = DOCUMENT_TYPES.iter().map(|d| d.id.get()).collect();
        assert_eq!(ids, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_only_libreta_is_inactive() {
        let inactive: Vec<_> = DOCUMENT_TYPES.iter().filter(|d| !d.active).collect();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].abbreviation, "LE");
    }

    #[test]
    fn test_fixture_numbers_satisfy_their_types() {
        assert!(DocumentTypeFixtures::dni().check_number(BeneficiaryFixtures::dni_number()).is_ok());
        assert!(DocumentTypeFixtures::passport().check_number(BeneficiaryFixtures::passport_number()).is_ok());
    }
}
