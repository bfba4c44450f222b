use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::dtos::ErrorResponse;

/// JSON extractor that runs the DTO's `validator` rules before the handler
/// sees the payload. A body that fails to parse is a 400; one that parses
/// but breaks a rule is a 422.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await.map_err(|e| {
            let response = ErrorResponse {
                error: format!("Malformed request body: {}", e),
            };
            (StatusCode::BAD_REQUEST, Json(response)).into_response()
        })?;

        body.validate().map_err(|e| {
            let response = ErrorResponse {
                error: format!("Invalid request: {}", e),
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response()
        })?;

        Ok(ValidatedJson(body))
    }
}
