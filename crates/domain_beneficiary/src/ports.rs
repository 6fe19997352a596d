//! Beneficiary Domain Ports
//!
//! This module defines the port interfaces the beneficiary workflow needs
//! from storage, so the same workflow runs against PostgreSQL (`infra_db`)
//! and against the in-memory store used in tests.
//!
//! # Architecture
//!
//! - [`DocumentRuleRegistry`]: read-only access to document types
//! - [`BeneficiaryStore`]: joined reads, deletes, and transactional writes
//! - [`BeneficiaryUnitOfWork`]: one atomic transaction; the uniqueness check
//!   and the write it guards run inside the same unit of work
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_beneficiary::{BeneficiaryRepository, DocumentRuleRegistry, BeneficiaryStore};
//!
//! let rules: Arc<dyn DocumentRuleRegistry> = Arc::new(PostgresDocumentRuleRegistry::new(pool.clone()));
//! let store: Arc<dyn BeneficiaryStore> = Arc::new(PostgresBeneficiaryStore::new(pool));
//! let repository = BeneficiaryRepository::new(rules, store);
//! ```

use async_trait::async_trait;

use core_kernel::{BeneficiaryId, DocumentTypeId, DomainPort, HealthCheckable, PortError};

use crate::beneficiary::{Beneficiary, BeneficiaryView, ValidatedBeneficiary};
use crate::document_type::DocumentType;

/// Read-only access to the identity document types
#[async_trait]
pub trait DocumentRuleRegistry: DomainPort + HealthCheckable {
    /// Returns every active document type ordered by country, then name
    async fn list_active(&self) -> Result<Vec<DocumentType>, PortError>;

    /// Returns the document type with the given id, active or not
    ///
    /// # Returns
    ///
    /// The document type if found, or `PortError::NotFound`
    async fn get_by_id(&self, id: DocumentTypeId) -> Result<DocumentType, PortError>;
}

/// Storage for beneficiary records
#[async_trait]
pub trait BeneficiaryStore: DomainPort + HealthCheckable {
    /// Returns every beneficiary joined with its document type, newest id first
    async fn list(&self) -> Result<Vec<BeneficiaryView>, PortError>;

    /// Returns one joined beneficiary, or `PortError::NotFound`
    async fn get(&self, id: BeneficiaryId) -> Result<BeneficiaryView, PortError>;

    /// Removes a beneficiary, or returns `PortError::NotFound`
    async fn delete(&self, id: BeneficiaryId) -> Result<(), PortError>;

    /// Opens a unit of work
    ///
    /// Writes made through the returned handle become visible only after
    /// [`BeneficiaryUnitOfWork::commit`]; dropping it discards them.
    async fn begin(&self) -> Result<Box<dyn BeneficiaryUnitOfWork>, PortError>;
}

/// One atomic transaction against the beneficiary store
#[async_trait]
pub trait BeneficiaryUnitOfWork: Send {
    /// Checks whether a beneficiary exists
    async fn exists(&mut self, id: BeneficiaryId) -> Result<bool, PortError>;

    /// Checks whether a document is already held by a beneficiary other than `excluding`
    async fn document_in_use(
        &mut self,
        document_type_id: DocumentTypeId,
        document_number: &str,
        excluding: Option<BeneficiaryId>,
    ) -> Result<bool, PortError>;

    /// Inserts a new beneficiary and returns it with its assigned id
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` on a duplicate document, `PortError::MissingReference`
    /// if the document type does not exist.
    async fn insert(&mut self, record: ValidatedBeneficiary) -> Result<Beneficiary, PortError>;

    /// Overwrites an existing beneficiary in place and returns the stored record
    async fn update(
        &mut self,
        id: BeneficiaryId,
        record: ValidatedBeneficiary,
    ) -> Result<Beneficiary, PortError>;

    /// Makes every write of this unit of work durable
    async fn commit(self: Box<Self>) -> Result<(), PortError>;
}

/// In-memory implementation of the beneficiary ports for testing
///
/// A single lock guards the whole state. A unit of work holds the write lock
/// for its lifetime and stages changes on a copy, so commit is all-or-nothing
/// and concurrent writers are serialized.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
    use chrono::Utc;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    #[derive(Debug, Clone)]
    struct MemoryState {
        document_types: BTreeMap<DocumentTypeId, DocumentType>,
        beneficiaries: BTreeMap<BeneficiaryId, Beneficiary>,
        next_id: i32,
    }

    impl Default for MemoryState {
        fn default() -> Self {
            Self {
                document_types: BTreeMap::new(),
                beneficiaries: BTreeMap::new(),
                next_id: 1,
            }
        }
    }

    impl MemoryState {
        fn document_in_use(
            &self,
            document_type_id: DocumentTypeId,
            document_number: &str,
            excluding: Option<BeneficiaryId>,
        ) -> bool {
            self.beneficiaries.values().any(|b| {
                Some(b.id) != excluding
                    && b.document_type_id == document_type_id
                    && b.document_number == document_number
            })
        }

        fn join(&self, beneficiary: &Beneficiary) -> Result<BeneficiaryView, PortError> {
            let document_type = self
                .document_types
                .get(&beneficiary.document_type_id)
                .ok_or_else(|| PortError::internal(format!(
                    "beneficiary {} references missing document type {}",
                    beneficiary.id, beneficiary.document_type_id
                )))?;
            Ok(BeneficiaryView::join(beneficiary.clone(), document_type))
        }

        fn check_write(
            &self,
            id: Option<BeneficiaryId>,
            record: &ValidatedBeneficiary,
        ) -> Result<(), PortError> {
            if !self.document_types.contains_key(&record.document_type_id) {
                return Err(PortError::missing_reference(format!(
                    "document type {} does not exist",
                    record.document_type_id
                )));
            }
            if self.document_in_use(record.document_type_id, &record.document_number, id) {
                return Err(PortError::conflict(format!(
                    "document {} of type {} already registered",
                    record.document_number, record.document_type_id
                )));
            }
            Ok(())
        }
    }

    /// In-memory store implementing both beneficiary ports
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryStore {
        state: Arc<RwLock<MemoryState>>,
    }

    impl InMemoryStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a store seeded with document types
        pub async fn with_document_types(document_types: Vec<DocumentType>) -> Self {
            let store = Self::new();
            for document_type in document_types {
                store.put_document_type(document_type).await;
            }
            store
        }

        /// Inserts or replaces a document type
        pub async fn put_document_type(&self, document_type: DocumentType) {
            self.state
                .write()
                .await
                .document_types
                .insert(document_type.id, document_type);
        }

        /// Number of stored beneficiaries
        pub async fn beneficiary_count(&self) -> usize {
            self.state.read().await.beneficiaries.len()
        }
    }

    impl DomainPort for InMemoryStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-beneficiary-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory store always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl DocumentRuleRegistry for InMemoryStore {
        async fn list_active(&self) -> Result<Vec<DocumentType>, PortError> {
            let state = self.state.read().await;
            let mut active: Vec<DocumentType> = state
                .document_types
                .values()
                .filter(|d| d.active)
                .cloned()
                .collect();
            active.sort_by(|a, b| a.list_key().cmp(&b.list_key()));
            Ok(active)
        }

        async fn get_by_id(&self, id: DocumentTypeId) -> Result<DocumentType, PortError> {
            self.state
                .read()
                .await
                .document_types
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("DocumentType", id))
        }
    }

    #[async_trait]
    impl BeneficiaryStore for InMemoryStore {
        async fn list(&self) -> Result<Vec<BeneficiaryView>, PortError> {
            let state = self.state.read().await;
            state
                .beneficiaries
                .values()
                .rev()
                .map(|b| state.join(b))
                .collect()
        }

        async fn get(&self, id: BeneficiaryId) -> Result<BeneficiaryView, PortError> {
            let state = self.state.read().await;
            let beneficiary = state
                .beneficiaries
                .get(&id)
                .ok_or_else(|| PortError::not_found("Beneficiary", id))?;
            state.join(beneficiary)
        }

        async fn delete(&self, id: BeneficiaryId) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .beneficiaries
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Beneficiary", id))
        }

        async fn begin(&self) -> Result<Box<dyn BeneficiaryUnitOfWork>, PortError> {
            let guard = Arc::clone(&self.state).write_owned().await;
            let staged = guard.clone();
            Ok(Box::new(MemoryUnitOfWork { guard, staged }))
        }
    }

    /// Unit of work over the in-memory store
    struct MemoryUnitOfWork {
        guard: OwnedRwLockWriteGuard<MemoryState>,
        staged: MemoryState,
    }

    #[async_trait]
    impl BeneficiaryUnitOfWork for MemoryUnitOfWork {
        async fn exists(&mut self, id: BeneficiaryId) -> Result<bool, PortError> {
            Ok(self.staged.beneficiaries.contains_key(&id))
        }

        async fn document_in_use(
            &mut self,
            document_type_id: DocumentTypeId,
            document_number: &str,
            excluding: Option<BeneficiaryId>,
        ) -> Result<bool, PortError> {
            Ok(self.staged.document_in_use(document_type_id, document_number, excluding))
        }

        async fn insert(&mut self, record: ValidatedBeneficiary) -> Result<Beneficiary, PortError> {
            self.staged.check_write(None, &record)?;

            let id = BeneficiaryId::new(self.staged.next_id);
            self.staged.next_id += 1;

            let beneficiary = Beneficiary::from_validated(id, record);
            self.staged.beneficiaries.insert(id, beneficiary.clone());
            Ok(beneficiary)
        }

        async fn update(
            &mut self,
            id: BeneficiaryId,
            record: ValidatedBeneficiary,
        ) -> Result<Beneficiary, PortError> {
            self.staged.check_write(Some(id), &record)?;

            let beneficiary = self
                .staged
                .beneficiaries
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Beneficiary", id))?;
            beneficiary.apply(record);
            Ok(beneficiary.clone())
        }

        async fn commit(self: Box<Self>) -> Result<(), PortError> {
            let MemoryUnitOfWork { mut guard, staged } = *self;
            *guard = staged;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::InMemoryStore;
    use chrono::{NaiveDate, Utc};
    use crate::beneficiary::Sex;

    fn dni() -> DocumentType {
        DocumentType::new(DocumentTypeId::new(1), "Documento Nacional de Identidad", "DNI", "Perú", 8, true)
            .unwrap()
    }

    fn record(number: &str) -> ValidatedBeneficiary {
        ValidatedBeneficiary {
            first_names: "Rosa".to_string(),
            last_names: "Flores".to_string(),
            document_type_id: DocumentTypeId::new(1),
            document_number: number.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            sex: Sex::Female,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_unit_of_work_is_discarded() {
        let store = InMemoryStore::with_document_types(vec![dni()]).await;

        {
            let mut uow = store.begin().await.unwrap();
            uow.insert(record("12345678")).await.unwrap();
        }

        assert_eq!(store.beneficiary_count().await, 0);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = InMemoryStore::with_document_types(vec![dni()]).await;

        let mut uow = store.begin().await.unwrap();
        let first = uow.insert(record("12345678")).await.unwrap();
        let second = uow.insert(record("87654321")).await.unwrap();
        uow.commit().await.unwrap();

        let listed: Vec<_> = store.list().await.unwrap().into_iter().map(|v| v.id()).collect();
        assert_eq!(listed, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_insert_enforces_unique_document() {
        let store = InMemoryStore::with_document_types(vec![dni()]).await;

        let mut uow = store.begin().await.unwrap();
        uow.insert(record("12345678")).await.unwrap();
        let err = uow.insert(record("12345678")).await.unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_insert_requires_document_type() {
        let store = InMemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        let err = uow.insert(record("12345678")).await.unwrap_err();

        assert!(matches!(err, PortError::MissingReference { .. }));
    }

    #[tokio::test]
    async fn test_list_active_orders_by_country_then_name() {
        let store = InMemoryStore::with_document_types(vec![
            DocumentType::new(DocumentTypeId::new(3), "Pasaporte", "PAS", "Perú", 9, false).unwrap(),
            DocumentType::new(DocumentTypeId::new(2), "Cédula de Ciudadanía", "CC", "Colombia", 10, true).unwrap(),
            dni(),
            DocumentType::new(DocumentTypeId::new(4), "Carné de Extranjería", "CE", "Perú", 9, true)
                .unwrap()
                .deactivated(),
        ])
        .await;

        let names: Vec<_> = store
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.abbreviation)
            .collect();

        assert_eq!(names, vec!["CC", "DNI", "PAS"]);
    }

    #[tokio::test]
    async fn test_put_document_type_replaces_same_id() {
        let store = InMemoryStore::with_document_types(vec![dni()]).await;

        store
            .put_document_type(
                DocumentType::new(DocumentTypeId::new(1), "Pasaporte", "PAS", "Perú", 9, false).unwrap(),
            )
            .await;

        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].abbreviation, "PAS");
    }

    #[tokio::test]
    async fn test_get_by_id_finds_inactive_type() {
        let store = InMemoryStore::with_document_types(vec![dni().deactivated()]).await;

        let found = store.get_by_id(DocumentTypeId::new(1)).await.unwrap();
        assert!(!found.active);

        let missing = store.get_by_id(DocumentTypeId::new(99)).await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.delete(BeneficiaryId::new(1)).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
