//! Request extractors shared by the services.

use crate::error::AppError;
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that is deserialized and then validated.
///
/// Malformed JSON (including unknown fields on structs that deny them) is a
/// `400 Bad Request`; a body over the configured limit is a
/// `413 Payload Too Large`; a body that parses but fails validation is a
/// `422 Unprocessable Entity`.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge
                } else {
                    AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e.body_text()))
                }
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
