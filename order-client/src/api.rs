//! Typed HTTP client for the order service API.

use crate::draft::OrderDraft;
use crate::error::ClientError;
use chrono::{DateTime, NaiveDate, Utc};
use order_types::{
    ClientRequest, ClientResponse, CreateUserRequest, FinanceSummary, LoginRequest, LoginResponse,
    OrderRequest, OrderResponse, Period, ReceiptSnapshot, ServiceRequest, ServiceResponse,
    SettingsPayload, SuccessResponse, UserResponse,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiHealth {
    pub status: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "dbConnection")]
    pub db_connection: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct FinanceParams {
    periodo: Period,
    #[serde(skip_serializing_if = "Option::is_none")]
    inicio: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fim: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct OrderApiClient {
    http: Client,
    base_url: String,
}

impl OrderApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Send a request and decode the JSON body.
    ///
    /// A 404 or an empty success body is `NotFound`; other error statuses
    /// carry the decoded `{error, details}` body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, resource = what, "Request to order service failed");
            e
        })?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), resource = what, bytes = body.len(), "Order service responded");

        if status == StatusCode::NOT_FOUND {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| what.to_string());
            return Err(ClientError::NotFound(message));
        }

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ClientError::NotFound(what.to_string()));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn health(&self) -> Result<ApiHealth, ClientError> {
        self.send(self.http.get(self.url("/health")), "health").await
    }

    pub async fn list_clients(&self) -> Result<Vec<ClientResponse>, ClientError> {
        self.send(self.http.get(self.url("/clientes")), "clientes").await
    }

    pub async fn create_client(&self, client: &ClientRequest) -> Result<ClientResponse, ClientError> {
        self.send(self.http.post(self.url("/clientes")).json(client), "clientes")
            .await
    }

    pub async fn update_client(&self, id: Uuid, client: &ClientRequest) -> Result<ClientResponse, ClientError> {
        self.send(
            self.http.put(self.url(&format!("/clientes/{}", id))).json(client),
            &format!("cliente {}", id),
        )
        .await
    }

    /// Refused with a 409 while the client still has orders.
    pub async fn delete_client(&self, id: Uuid) -> Result<(), ClientError> {
        let _: SuccessResponse = self
            .send(
                self.http.delete(self.url(&format!("/clientes/{}", id))),
                &format!("cliente {}", id),
            )
            .await?;
        Ok(())
    }

    pub async fn list_services(&self) -> Result<Vec<ServiceResponse>, ClientError> {
        self.send(self.http.get(self.url("/servicos")), "servicos").await
    }

    pub async fn create_service(&self, service: &ServiceRequest) -> Result<ServiceResponse, ClientError> {
        self.send(self.http.post(self.url("/servicos")).json(service), "servicos")
            .await
    }

    pub async fn delete_service(&self, id: Uuid) -> Result<(), ClientError> {
        let _: SuccessResponse = self
            .send(
                self.http.delete(self.url(&format!("/servicos/{}", id))),
                &format!("servico {}", id),
            )
            .await?;
        Ok(())
    }

    pub async fn list_orders(&self) -> Result<Vec<OrderResponse>, ClientError> {
        self.send(self.http.get(self.url("/pedidos")), "pedidos").await
    }

    pub async fn get_order(&self, id: Uuid) -> Result<OrderResponse, ClientError> {
        self.send(
            self.http.get(self.url(&format!("/pedidos/{}", id))),
            &format!("pedido {}", id),
        )
        .await
    }

    pub async fn create_order(&self, order: &OrderRequest) -> Result<OrderResponse, ClientError> {
        self.send(self.http.post(self.url("/pedidos")).json(order), "pedidos")
            .await
    }

    pub async fn replace_order(&self, id: Uuid, order: &OrderRequest) -> Result<OrderResponse, ClientError> {
        self.send(
            self.http.put(self.url(&format!("/pedidos/{}", id))).json(order),
            &format!("pedido {}", id),
        )
        .await
    }

    /// Create or replace from a draft, depending on whether `id` is known.
    pub async fn save_draft(&self, id: Option<Uuid>, draft: &OrderDraft) -> Result<OrderResponse, ClientError> {
        let request = draft.to_request()?;
        match id {
            Some(id) => self.replace_order(id, &request).await,
            None => self.create_order(&request).await,
        }
    }

    pub async fn mark_withdrawn(&self, id: Uuid) -> Result<OrderResponse, ClientError> {
        self.send(
            self.http.patch(self.url(&format!("/pedidos/{}/withdraw", id))),
            &format!("pedido {}", id),
        )
        .await
    }

    pub async fn mark_paid(&self, id: Uuid) -> Result<OrderResponse, ClientError> {
        self.send(
            self.http.patch(self.url(&format!("/pedidos/{}/pay", id))),
            &format!("pedido {}", id),
        )
        .await
    }

    pub async fn get_receipt(&self, id: Uuid) -> Result<ReceiptSnapshot, ClientError> {
        self.send(
            self.http.get(self.url(&format!("/pedidos/{}/receipt", id))),
            &format!("pedido {}", id),
        )
        .await
    }

    pub async fn finance_summary(
        &self,
        period: Period,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<FinanceSummary, ClientError> {
        let params = FinanceParams {
            periodo: period,
            inicio: start,
            fim: end,
        };
        self.send(self.http.get(self.url("/financeiro")).query(&params), "financeiro")
            .await
    }

    /// Wrong credentials come back as an `Api` error with status 401.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(self.http.post(self.url("/login")).json(&body), "login")
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, ClientError> {
        self.send(self.http.get(self.url("/users")), "users").await
    }

    pub async fn create_user(&self, user: &CreateUserRequest) -> Result<UserResponse, ClientError> {
        self.send(self.http.post(self.url("/users")).json(user), "users").await
    }

    pub async fn delete_user(&self, username: &str) -> Result<(), ClientError> {
        let _: SuccessResponse = self
            .send(
                self.http.delete(self.url(&format!("/users/{}", username))),
                &format!("user {}", username),
            )
            .await?;
        Ok(())
    }

    pub async fn change_password(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let _: SuccessResponse = self
            .send(
                self.http
                    .patch(self.url(&format!("/users/{}/password", username)))
                    .json(&PasswordBody { password }),
                &format!("user {}", username),
            )
            .await?;
        Ok(())
    }

    pub async fn get_settings(&self) -> Result<SettingsPayload, ClientError> {
        self.send(self.http.get(self.url("/settings")), "settings").await
    }

    pub async fn save_settings(&self, settings: &SettingsPayload) -> Result<(), ClientError> {
        let _: SuccessResponse = self
            .send(self.http.post(self.url("/settings")).json(settings), "settings")
            .await?;
        Ok(())
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(decoded) => ClientError::Api {
            status: status.as_u16(),
            message: decoded.error,
            details: decoded.details,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            message: String::from_utf8_lossy(body).trim().to_string(),
            details: None,
        },
    }
}
