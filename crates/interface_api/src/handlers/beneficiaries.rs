//! Beneficiary handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use core_kernel::BeneficiaryId;

use crate::{AppState, error::ApiError};
use crate::dto::beneficiary::{BeneficiaryRequest, BeneficiaryResponse};

/// Lists beneficiaries, newest first
pub async fn list_beneficiaries(
    State(state): State<AppState>,
) -> Result<Json<Vec<BeneficiaryResponse>>, ApiError> {
    let views = state.beneficiaries.list().await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// Gets a beneficiary by ID
pub async fn get_beneficiary(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<BeneficiaryResponse>, ApiError> {
    let Path(id) = id?;
    let view = state.beneficiaries.get_by_id(BeneficiaryId::new(id)).await?;
    Ok(Json(view.into()))
}

/// Creates a beneficiary
///
/// Answers 201 with the stored record and its location.
pub async fn create_beneficiary(
    State(state): State<AppState>,
    request: Result<Json<BeneficiaryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let view = state.beneficiaries.create(request.into()).await?;
    let location = format!("/api/beneficiarios/{}", view.id());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BeneficiaryResponse::from(view)),
    ))
}

/// Replaces a beneficiary
pub async fn update_beneficiary(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    request: Result<Json<BeneficiaryRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(request) = request?;
    state
        .beneficiaries
        .update(BeneficiaryId::new(id), request.into())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a beneficiary
pub async fn delete_beneficiary(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.beneficiaries.delete(BeneficiaryId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
