//! Beneficiary Repository
//!
//! The validation-and-persistence workflow. Every write goes through here,
//! so the rules hold no matter which adapter sits behind the ports.
//!
//! # Ordering
//!
//! On create the first failing step wins: field shape, document type,
//! numeric-only rule, exact length, uniqueness, sex code.
//!
//! On update an id mismatch is reported first, then a missing target, then
//! the same steps as create with the target itself excluded from the
//! uniqueness check.
//!
//! The uniqueness check and the write it guards share one unit of work, so
//! two concurrent writers cannot both pass the check for the same document.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use core_kernel::{BeneficiaryId, DocumentTypeId, HealthCheckResult, PortError};

use crate::beneficiary::{BeneficiaryDraft, BeneficiaryView, ValidatedBeneficiary};
use crate::document_type::DocumentType;
use crate::error::BeneficiaryError;
use crate::ports::{BeneficiaryStore, DocumentRuleRegistry};
use crate::validation::BeneficiaryValidator;

/// Beneficiary workflow over the storage ports
#[derive(Clone)]
pub struct BeneficiaryRepository {
    rules: Arc<dyn DocumentRuleRegistry>,
    store: Arc<dyn BeneficiaryStore>,
}

impl BeneficiaryRepository {
    /// Creates a new repository
    ///
    /// # Arguments
    ///
    /// * `rules` - Source of document types
    /// * `store` - Beneficiary storage
    pub fn new(rules: Arc<dyn DocumentRuleRegistry>, store: Arc<dyn BeneficiaryStore>) -> Self {
        Self { rules, store }
    }

    /// Every beneficiary joined with its document type, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<BeneficiaryView>, BeneficiaryError> {
        self.store.list().await.map_err(BeneficiaryError::from)
    }

    /// One beneficiary joined with its document type
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: BeneficiaryId) -> Result<BeneficiaryView, BeneficiaryError> {
        self.store.get(id).await.map_err(|e| not_found_or_internal(e, id))
    }

    /// Validates and stores a new beneficiary
    ///
    /// Any id embedded in the draft is ignored; the store assigns one.
    ///
    /// # Returns
    ///
    /// The stored record joined with its document type
    #[instrument(skip(self, draft), fields(document_type_id = %draft.document_type_id))]
    pub async fn create(&self, draft: BeneficiaryDraft) -> Result<BeneficiaryView, BeneficiaryError> {
        BeneficiaryValidator::check_fields(&draft)?;
        let document_type = self.resolve_document_type(draft.document_type_id).await?;
        BeneficiaryValidator::check_document(&draft, &document_type)?;

        let mut uow = self.store.begin().await.map_err(BeneficiaryError::from)?;

        if uow
            .document_in_use(draft.document_type_id, &draft.document_number, None)
            .await
            .map_err(BeneficiaryError::from)?
        {
            return Err(BeneficiaryError::duplicate(draft.document_type_id, draft.document_number));
        }

        let sex = BeneficiaryValidator::check_sex(&draft.sex)?;
        let record = BeneficiaryValidator::finish(draft, sex, Utc::now());
        let conflict = conflict_context(&record);

        let beneficiary = uow
            .insert(record)
            .await
            .map_err(|e| write_error(e, &conflict))?;
        uow.commit().await.map_err(|e| write_error(e, &conflict))?;

        info!(beneficiary_id = %beneficiary.id, "Beneficiary created");
        Ok(BeneficiaryView::join(beneficiary, &document_type))
    }

    /// Validates and fully replaces an existing beneficiary
    ///
    /// # Arguments
    ///
    /// * `id` - Target beneficiary
    /// * `draft` - Replacement values; its id, when present, must equal `id`
    #[instrument(skip(self, draft), fields(document_type_id = %draft.document_type_id))]
    pub async fn update(&self, id: BeneficiaryId, draft: BeneficiaryDraft) -> Result<(), BeneficiaryError> {
        if let Some(body) = draft.id {
            if body != id {
                return Err(BeneficiaryError::IdMismatch { path: id, body });
            }
        }

        // Looked up before the unit of work opens; reported only after the
        // target is known to exist.
        let document_type = self.rules.get_by_id(draft.document_type_id).await;

        let mut uow = self.store.begin().await.map_err(BeneficiaryError::from)?;

        if !uow.exists(id).await.map_err(BeneficiaryError::from)? {
            return Err(BeneficiaryError::NotFound(id));
        }

        BeneficiaryValidator::check_fields(&draft)?;
        let document_type = document_type.map_err(|e| document_type_error(e, draft.document_type_id))?;
        BeneficiaryValidator::check_document(&draft, &document_type)?;

        if uow
            .document_in_use(draft.document_type_id, &draft.document_number, Some(id))
            .await
            .map_err(BeneficiaryError::from)?
        {
            return Err(BeneficiaryError::duplicate(draft.document_type_id, draft.document_number));
        }

        let sex = BeneficiaryValidator::check_sex(&draft.sex)?;
        let record = BeneficiaryValidator::finish(draft, sex, Utc::now());
        let conflict = conflict_context(&record);

        uow.update(id, record).await.map_err(|e| {
            if e.is_not_found() {
                BeneficiaryError::NotFound(id)
            } else {
                write_error(e, &conflict)
            }
        })?;
        uow.commit().await.map_err(|e| write_error(e, &conflict))?;

        info!(beneficiary_id = %id, "Beneficiary updated");
        Ok(())
    }

    /// Removes a beneficiary
    #[instrument(skip(self))]
    pub async fn delete(&self, id: BeneficiaryId) -> Result<(), BeneficiaryError> {
        self.store.delete(id).await.map_err(|e| not_found_or_internal(e, id))?;

        info!(beneficiary_id = %id, "Beneficiary deleted");
        Ok(())
    }

    /// Health of both storage ports
    pub async fn health_check(&self) -> Vec<HealthCheckResult> {
        vec![self.rules.health_check().await, self.store.health_check().await]
    }

    async fn resolve_document_type(&self, id: DocumentTypeId) -> Result<DocumentType, BeneficiaryError> {
        self.rules
            .get_by_id(id)
            .await
            .map_err(|e| document_type_error(e, id))
    }
}

fn conflict_context(record: &ValidatedBeneficiary) -> (DocumentTypeId, String) {
    (record.document_type_id, record.document_number.clone())
}

fn document_type_error(err: PortError, id: DocumentTypeId) -> BeneficiaryError {
    if err.is_not_found() {
        BeneficiaryError::InvalidDocumentType(id)
    } else {
        BeneficiaryError::from(err)
    }
}

fn not_found_or_internal(err: PortError, id: BeneficiaryId) -> BeneficiaryError {
    if err.is_not_found() {
        BeneficiaryError::NotFound(id)
    } else {
        BeneficiaryError::from(err)
    }
}

/// Maps a failed write; constraint violations raced past the checks above
fn write_error(err: PortError, (document_type_id, document_number): &(DocumentTypeId, String)) -> BeneficiaryError {
    if err.is_conflict() {
        return BeneficiaryError::duplicate(*document_type_id, document_number.clone());
    }
    match err {
        PortError::MissingReference { .. } => BeneficiaryError::InvalidDocumentType(*document_type_id),
        other => BeneficiaryError::from(other),
    }
}
