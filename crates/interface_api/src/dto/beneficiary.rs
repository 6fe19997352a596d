//! Beneficiary DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BeneficiaryId, DocumentTypeId};
use domain_beneficiary::{BeneficiaryDraft, BeneficiaryView};

/// Body of create and update requests
///
/// `sexo` stays a raw string so an invalid code is reported by validation
/// rather than as a malformed body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub nombres: String,
    pub apellidos: String,
    pub documento_identidad_id: i32,
    pub numero_documento: String,
    pub fecha_nacimiento: NaiveDate,
    pub sexo: String,
}

impl From<BeneficiaryRequest> for BeneficiaryDraft {
    fn from(r: BeneficiaryRequest) -> Self {
        BeneficiaryDraft {
            id: r.id.map(BeneficiaryId::new),
            first_names: r.nombres,
            last_names: r.apellidos,
            document_type_id: DocumentTypeId::new(r.documento_identidad_id),
            document_number: r.numero_documento,
            birth_date: r.fecha_nacimiento,
            sex: r.sexo,
        }
    }
}

/// A beneficiary joined with its document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryResponse {
    pub id: i32,
    pub nombres: String,
    pub apellidos: String,
    pub documento_identidad_id: i32,
    pub numero_documento: String,
    pub fecha_nacimiento: NaiveDate,
    pub sexo: String,
    pub documento_nombre: String,
    pub documento_abreviatura: String,
    pub documento_pais: String,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_modificacion: DateTime<Utc>,
}

impl From<BeneficiaryView> for BeneficiaryResponse {
    fn from(view: BeneficiaryView) -> Self {
        let b = view.beneficiary;
        Self {
            id: b.id.get(),
            nombres: b.first_names,
            apellidos: b.last_names,
            documento_identidad_id: b.document_type_id.get(),
            numero_documento: b.document_number,
            fecha_nacimiento: b.birth_date,
            sexo: b.sex.code().to_string(),
            documento_nombre: view.document_name,
            documento_abreviatura: view.document_abbreviation,
            documento_pais: view.document_country,
            fecha_creacion: b.created_at,
            fecha_modificacion: b.modified_at,
        }
    }
}
