//! Document type DTOs

use serde::{Deserialize, Serialize};

use domain_beneficiary::DocumentType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeResponse {
    pub id: i32,
    pub nombre: String,
    pub abreviatura: String,
    pub pais: String,
    pub longitud: u16,
    pub solo_numeros: bool,
    pub activo: bool,
}

impl From<DocumentType> for DocumentTypeResponse {
    fn from(d: DocumentType) -> Self {
        Self {
            id: d.id.get(),
            nombre: d.name,
            abreviatura: d.abbreviation,
            pais: d.country,
            longitud: d.expected_length,
            solo_numeros: d.numeric_only,
            activo: d.active,
        }
    }
}
