//! PostgreSQL Beneficiary Adapter
//!
//! Implements [`BeneficiaryStore`] over the `beneficiaries` table. A unit of
//! work is one READ COMMITTED transaction; the `UNIQUE (document_type_id,
//! document_number)` constraint backs the uniqueness check made inside it
//! when a concurrent writer commits the same document first.
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - unique violation (23505) -> `PortError::Conflict`
//! - foreign key violation (23503) -> `PortError::MissingReference`

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use core_kernel::{
    BeneficiaryId, DocumentTypeId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
use domain_beneficiary::{
    Beneficiary, BeneficiaryStore, BeneficiaryUnitOfWork, BeneficiaryView, Sex,
    ValidatedBeneficiary,
};

use crate::error::DatabaseError;
use crate::repositories::{BeneficiaryRepository, BeneficiaryRow, BeneficiaryValues, BeneficiaryViewRow};

/// PostgreSQL-backed implementation of the BeneficiaryStore trait
#[derive(Debug, Clone)]
pub struct PostgresBeneficiaryStore {
    repository: BeneficiaryRepository,
    pool: PgPool,
}

impl PostgresBeneficiaryStore {
    /// Creates a new PostgreSQL beneficiary adapter
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BeneficiaryRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresBeneficiaryStore {}

#[async_trait]
impl HealthCheckable for PostgresBeneficiaryStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-beneficiary-store").await
    }
}

#[async_trait]
impl BeneficiaryStore for PostgresBeneficiaryStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<BeneficiaryView>, PortError> {
        let rows = self.repository.list_joined().await?;
        debug!(count = rows.len(), "Listed beneficiaries");

        rows.into_iter()
            .map(row_to_view)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PortError::from)
    }

    #[instrument(skip(self), fields(beneficiary_id = %id))]
    async fn get(&self, id: BeneficiaryId) -> Result<BeneficiaryView, PortError> {
        let row = self.repository.get_joined(id.get()).await?;
        row_to_view(row).map_err(PortError::from)
    }

    #[instrument(skip(self), fields(beneficiary_id = %id))]
    async fn delete(&self, id: BeneficiaryId) -> Result<(), PortError> {
        self.repository.delete(id.get()).await?;
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn BeneficiaryUnitOfWork>, PortError> {
        let tx = self.repository.begin().await?;
        Ok(Box::new(PgUnitOfWork {
            repository: self.repository.clone(),
            tx,
        }))
    }
}

/// One transaction; rolled back when dropped uncommitted
struct PgUnitOfWork {
    repository: BeneficiaryRepository,
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl BeneficiaryUnitOfWork for PgUnitOfWork {
    async fn exists(&mut self, id: BeneficiaryId) -> Result<bool, PortError> {
        Ok(self.repository.exists(&mut self.tx, id.get()).await?)
    }

    async fn document_in_use(
        &mut self,
        document_type_id: DocumentTypeId,
        document_number: &str,
        excluding: Option<BeneficiaryId>,
    ) -> Result<bool, PortError> {
        Ok(self
            .repository
            .document_in_use(
                &mut self.tx,
                document_type_id.get(),
                document_number,
                excluding.map(BeneficiaryId::get),
            )
            .await?)
    }

    async fn insert(&mut self, record: ValidatedBeneficiary) -> Result<Beneficiary, PortError> {
        let row = self.repository.insert(&mut self.tx, values(record)).await?;
        row_to_beneficiary(row).map_err(PortError::from)
    }

    async fn update(
        &mut self,
        id: BeneficiaryId,
        record: ValidatedBeneficiary,
    ) -> Result<Beneficiary, PortError> {
        let row = self
            .repository
            .update(&mut self.tx, id.get(), values(record))
            .await?;
        row_to_beneficiary(row).map_err(PortError::from)
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        self.tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }
}

fn values(record: ValidatedBeneficiary) -> BeneficiaryValues {
    BeneficiaryValues {
        first_names: record.first_names,
        last_names: record.last_names,
        document_type_id: record.document_type_id.get(),
        document_number: record.document_number,
        birth_date: record.birth_date,
        sex: record.sex.code(),
        recorded_at: record.recorded_at,
    }
}

/// Converts a beneficiary row to the domain type
fn row_to_beneficiary(row: BeneficiaryRow) -> Result<Beneficiary, DatabaseError> {
    let sex = Sex::from_code(row.sex.trim()).ok_or_else(|| {
        DatabaseError::InvalidData(format!("beneficiary {} has sex code '{}'", row.id, row.sex))
    })?;

    Ok(Beneficiary {
        id: BeneficiaryId::new(row.id),
        first_names: row.first_names,
        last_names: row.last_names,
        document_type_id: DocumentTypeId::new(row.document_type_id),
        document_number: row.document_number,
        birth_date: row.birth_date,
        sex,
        created_at: row.created_at,
        modified_at: row.modified_at,
    })
}

fn row_to_view(row: BeneficiaryViewRow) -> Result<BeneficiaryView, DatabaseError> {
    Ok(BeneficiaryView {
        beneficiary: row_to_beneficiary(row.beneficiary)?,
        document_name: row.document_name,
        document_abbreviation: row.document_abbreviation,
        document_country: row.document_country,
    })
}
