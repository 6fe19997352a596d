//! Beneficiary repository implementation
//!
//! SQL access to the `beneficiaries` table. Reads go through the pool; the
//! writes and checks that must be atomic take the caller's transaction.
//!
//! Joined reads select the document type's display columns alongside the
//! beneficiary columns in a single query.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction, query, query_as, query_scalar};

use crate::error::DatabaseError;

const BENEFICIARY_COLUMNS: &str = r#"
    id, first_names, last_names, document_type_id, document_number,
    birth_date, sex, created_at, modified_at
"#;

const JOINED_SELECT: &str = r#"
    SELECT
        b.id, b.first_names, b.last_names, b.document_type_id, b.document_number,
        b.birth_date, b.sex, b.created_at, b.modified_at,
        d.name AS document_name,
        d.abbreviation AS document_abbreviation,
        d.country AS document_country
    FROM beneficiaries b
    JOIN document_types d ON d.id = b.document_type_id
"#;

/// A row of the `beneficiaries` table
#[derive(Debug, Clone, FromRow)]
pub struct BeneficiaryRow {
    pub id: i32,
    pub first_names: String,
    pub last_names: String,
    pub document_type_id: i32,
    pub document_number: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// A beneficiary row joined with its document type's display columns
#[derive(Debug, Clone, FromRow)]
pub struct BeneficiaryViewRow {
    #[sqlx(flatten)]
    pub beneficiary: BeneficiaryRow,
    pub document_name: String,
    pub document_abbreviation: String,
    pub document_country: String,
}

/// Column values for an insert or a full-row update
#[derive(Debug, Clone)]
pub struct BeneficiaryValues {
    pub first_names: String,
    pub last_names: String,
    pub document_type_id: i32,
    pub document_number: String,
    pub birth_date: NaiveDate,
    pub sex: &'static str,
    pub recorded_at: DateTime<Utc>,
}

/// Repository over the `beneficiaries` table
#[derive(Debug, Clone)]
pub struct BeneficiaryRepository {
    pool: PgPool,
}

impl BeneficiaryRepository {
    /// Creates a new BeneficiaryRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists every beneficiary joined with its document type, newest id first
    pub async fn list_joined(&self) -> Result<Vec<BeneficiaryViewRow>, DatabaseError> {
        let sql = format!("{JOINED_SELECT} ORDER BY b.id DESC");

        let rows = query_as::<Postgres, BeneficiaryViewRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Retrieves one beneficiary joined with its document type
    ///
    /// # Returns
    ///
    /// The joined row or a NotFound error
    pub async fn get_joined(&self, id: i32) -> Result<BeneficiaryViewRow, DatabaseError> {
        let sql = format!("{JOINED_SELECT} WHERE b.id = $1");

        query_as::<Postgres, BeneficiaryViewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Beneficiary", id))
    }

    /// Deletes a beneficiary
    ///
    /// # Returns
    ///
    /// NotFound if no row had the given id
    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = query("DELETE FROM beneficiaries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Beneficiary", id));
        }
        Ok(())
    }

    /// Opens a READ COMMITTED transaction
    ///
    /// Of two writers racing for the same document, the second blocks on the
    /// unique index until the first commits, then fails with a unique
    /// violation.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, DatabaseError> {
        Ok(self.pool.begin().await?)
    }

    /// Checks whether a beneficiary row exists
    pub async fn exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> Result<bool, DatabaseError> {
        let found = query_scalar::<Postgres, bool>(
            "SELECT EXISTS (SELECT 1 FROM beneficiaries WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(found)
    }

    /// Checks whether a document pair is held by a row other than `excluding`
    pub async fn document_in_use(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document_type_id: i32,
        document_number: &str,
        excluding: Option<i32>,
    ) -> Result<bool, DatabaseError> {
        let found = query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM beneficiaries
                WHERE document_type_id = $1
                  AND document_number = $2
                  AND ($3::INTEGER IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(document_type_id)
        .bind(document_number)
        .bind(excluding)
        .fetch_one(&mut **tx)
        .await?;

        Ok(found)
    }

    /// Inserts a beneficiary and returns the stored row
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        values: BeneficiaryValues,
    ) -> Result<BeneficiaryRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO beneficiaries (
                first_names, last_names, document_type_id, document_number,
                birth_date, sex, created_at, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {BENEFICIARY_COLUMNS}
            "#
        );

        let row = query_as::<Postgres, BeneficiaryRow>(&sql)
            .bind(values.first_names)
            .bind(values.last_names)
            .bind(values.document_type_id)
            .bind(values.document_number)
            .bind(values.birth_date)
            .bind(values.sex)
            .bind(values.recorded_at)
            .fetch_one(&mut **tx)
            .await?;

        Ok(row)
    }

    /// Overwrites every mutable column of a row; `created_at` is untouched
    ///
    /// # Returns
    ///
    /// The stored row or a NotFound error
    pub async fn update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        values: BeneficiaryValues,
    ) -> Result<BeneficiaryRow, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE beneficiaries SET
                first_names = $2,
                last_names = $3,
                document_type_id = $4,
                document_number = $5,
                birth_date = $6,
                sex = $7,
                modified_at = $8
            WHERE id = $1
            RETURNING {BENEFICIARY_COLUMNS}
            "#
        );

        query_as::<Postgres, BeneficiaryRow>(&sql)
            .bind(id)
            .bind(values.first_names)
            .bind(values.last_names)
            .bind(values.document_type_id)
            .bind(values.document_number)
            .bind(values.birth_date)
            .bind(values.sex)
            .bind(values.recorded_at)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Beneficiary", id))
    }
}
