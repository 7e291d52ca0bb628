//! Service catalog (servico) model.

use chrono::{DateTime, Utc};
use order_types::{ServiceRequest, ServiceResponse};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct CatalogService {
    pub service_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateCatalogService {
    pub name: String,
    pub price: Decimal,
}

impl From<ServiceRequest> for CreateCatalogService {
    fn from(req: ServiceRequest) -> Self {
        CreateCatalogService {
            name: req.name.trim().to_string(),
            price: req.price,
        }
    }
}

impl From<CatalogService> for ServiceResponse {
    fn from(service: CatalogService) -> Self {
        ServiceResponse {
            id: service.service_id,
            name: service.name,
            price: service.price,
        }
    }
}
