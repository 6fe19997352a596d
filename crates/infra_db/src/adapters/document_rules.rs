//! PostgreSQL Document Rule Adapter
//!
//! Implements [`DocumentRuleRegistry`] over the `document_types` table.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DocumentTypeId, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_beneficiary::{DocumentRuleRegistry, DocumentType};

use crate::error::DatabaseError;
use crate::repositories::{DocumentTypeRepository, DocumentTypeRow};

/// PostgreSQL-backed implementation of the DocumentRuleRegistry trait
#[derive(Debug, Clone)]
pub struct PostgresDocumentRuleRegistry {
    repository: DocumentTypeRepository,
    pool: PgPool,
}

impl PostgresDocumentRuleRegistry {
    /// Creates a new adapter over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DocumentTypeRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresDocumentRuleRegistry {}

#[async_trait]
impl HealthCheckable for PostgresDocumentRuleRegistry {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-document-rules").await
    }
}

#[async_trait]
impl DocumentRuleRegistry for PostgresDocumentRuleRegistry {
    #[instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<DocumentType>, PortError> {
        debug!("Listing active document types");

        let rows = self.repository.list_active().await?;
        rows.into_iter()
            .map(row_to_document_type)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PortError::from)
    }

    #[instrument(skip(self), fields(document_type_id = %id))]
    async fn get_by_id(&self, id: DocumentTypeId) -> Result<DocumentType, PortError> {
        let row = self.repository.get_by_id(id.get()).await?;
        row_to_document_type(row).map_err(PortError::from)
    }
}

/// Converts a document type row to the domain type
///
/// The length bounds are enforced by a CHECK constraint; a row outside them
/// is reported as invalid data rather than trusted.
pub(crate) fn row_to_document_type(row: DocumentTypeRow) -> Result<DocumentType, DatabaseError> {
    let expected_length = u16::try_from(row.expected_length)
        .map_err(|_| DatabaseError::InvalidData(format!(
            "document type {} has expected_length {}",
            row.id, row.expected_length
        )))?;
    DocumentType::check_expected_length(expected_length)
        .map_err(|e| DatabaseError::InvalidData(format!("document type {}: {}", row.id, e)))?;

    Ok(DocumentType {
        id: DocumentTypeId::new(row.id),
        name: row.name,
        abbreviation: row.abbreviation,
        country: row.country,
        expected_length,
        numeric_only: row.numeric_only,
        active: row.active,
        created_at: row.created_at,
        modified_at: row.modified_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(expected_length: i32) -> DocumentTypeRow {
        DocumentTypeRow {
            id: 1,
            name: "Documento Nacional de Identidad".to_string(),
            abbreviation: "DNI".to_string(),
            country: "Perú".to_string(),
            expected_length,
            numeric_only: true,
            active: false,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts() {
        let document_type = row_to_document_type(row(8)).unwrap();

        assert_eq!(document_type.id, DocumentTypeId::new(1));
        assert_eq!(document_type.expected_length, 8);
        assert!(!document_type.active);
    }

    #[test]
    fn test_out_of_range_length_is_invalid_data() {
        assert!(matches!(row_to_document_type(row(0)), Err(DatabaseError::InvalidData(_))));
        assert!(matches!(row_to_document_type(row(-3)), Err(DatabaseError::InvalidData(_))));
        assert!(matches!(row_to_document_type(row(21)), Err(DatabaseError::InvalidData(_))));
    }
}
