//! Document type handlers

use axum::{extract::{rejection::PathRejection, Path, State}, Json};

use core_kernel::DocumentTypeId;
use domain_beneficiary::DocumentRuleRegistry;

use crate::{AppState, error::ApiError};
use crate::dto::document::DocumentTypeResponse;

/// Lists active document types, ordered by country then name
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentTypeResponse>>, ApiError> {
    let document_types = state.rules.list_active().await?;
    Ok(Json(document_types.into_iter().map(Into::into).collect()))
}

/// Gets a document type by ID, active or not
pub async fn get_document(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DocumentTypeResponse>, ApiError> {
    let Path(id) = id?;
    let document_type = state.rules.get_by_id(DocumentTypeId::new(id)).await?;
    Ok(Json(document_type.into()))
}
