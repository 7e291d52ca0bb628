use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClientRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[serde(rename = "telefone", default)]
    #[validate(length(max = 20, message = "Phone is too long"))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(length(max = 14, message = "CPF is too long"))]
    pub cpf: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub cpf: Option<String>,
    #[serde(rename = "dataCadastro")]
    pub created_utc: DateTime<Utc>,
}
