//! Client (cliente) model.

use chrono::{DateTime, Utc};
use order_types::{ClientRequest, ClientResponse};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub client_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating or replacing a client.
#[derive(Debug, Clone)]
pub struct WriteClient {
    pub name: String,
    pub phone: Option<String>,
    pub cpf: Option<String>,
}

impl From<ClientRequest> for WriteClient {
    fn from(req: ClientRequest) -> Self {
        WriteClient {
            name: req.name.trim().to_string(),
            phone: req.phone.filter(|p| !p.trim().is_empty()),
            cpf: req.cpf.filter(|c| !c.trim().is_empty()),
        }
    }
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        ClientResponse {
            id: client.client_id,
            name: client.name,
            phone: client.phone,
            cpf: client.cpf,
            created_utc: client.created_utc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validator::Validate;

    #[test]
    fn blank_optional_fields_are_dropped() {
        let req: ClientRequest = serde_json::from_value(json!({
            "nome": "  Maria Souza ",
            "telefone": " ",
            "cpf": "123.456.789-00"
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let write = WriteClient::from(req);
        assert_eq!(write.name, "Maria Souza");
        assert_eq!(write.phone, None);
        assert_eq!(write.cpf.as_deref(), Some("123.456.789-00"));
    }
}
