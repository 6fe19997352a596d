//! Document type repository implementation
//!
//! Read access to the `document_types` reference table. Rows are written by
//! the seed migration; the service never mutates them.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, query_as};

use crate::error::DatabaseError;

const DOCUMENT_TYPE_COLUMNS: &str = r#"
    id, name, abbreviation, country, expected_length,
    numeric_only, active, created_at, modified_at
"#;

/// A row of the `document_types` table
#[derive(Debug, Clone, FromRow)]
pub struct DocumentTypeRow {
    pub id: i32,
    pub name: String,
    pub abbreviation: String,
    pub country: String,
    pub expected_length: i32,
    pub numeric_only: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Repository over the `document_types` table
#[derive(Debug, Clone)]
pub struct DocumentTypeRepository {
    pool: PgPool,
}

impl DocumentTypeRepository {
    /// Creates a new DocumentTypeRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists active document types ordered by country, then name
    pub async fn list_active(&self) -> Result<Vec<DocumentTypeRow>, DatabaseError> {
        let sql = format!(
            "SELECT {DOCUMENT_TYPE_COLUMNS} FROM document_types WHERE active ORDER BY country, name"
        );

        let rows = query_as::<Postgres, DocumentTypeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Retrieves a document type by id, whether active or not
    ///
    /// # Arguments
    ///
    /// * `id` - The document type identifier
    ///
    /// # Returns
    ///
    /// The row or a NotFound error
    pub async fn get_by_id(&self, id: i32) -> Result<DocumentTypeRow, DatabaseError> {
        let sql = format!("SELECT {DOCUMENT_TYPE_COLUMNS} FROM document_types WHERE id = $1");

        query_as::<Postgres, DocumentTypeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("DocumentType", id))
    }
}
