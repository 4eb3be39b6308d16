//! Error responses. Every failure is rendered as `{"message": "..."}`.

use crate::catalog_actor::CatalogError;
use crate::order_actor::OrderError;
use crate::payments::PaymentError;
use crate::user_actor::UserError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 with the failing operation named in front of the cause.
    pub fn internal(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{context}: {cause}"))
    }

    pub fn from_catalog(context: &str, e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => Self::not_found("Product not found"),
            CatalogError::ValidationError(_) => Self::bad_request(format!("{context}: {e}")),
            CatalogError::ActorCommunicationError(_) => Self::internal(context, e),
        }
    }

    pub fn from_order(context: &str, e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) => Self::not_found("Order not found"),
            e if e.is_validation() => Self::bad_request(format!("{context}: {e}")),
            e => Self::internal(context, e),
        }
    }

    pub fn from_user(context: &str, e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => Self::not_found("User not found"),
            UserError::ValidationError(_) | UserError::AlreadyExists(_) => {
                Self::bad_request(format!("{context}: {e}"))
            }
            UserError::ActorCommunicationError(_) => Self::internal(context, e),
        }
    }

    pub fn from_payment(context: &str, e: PaymentError) -> Self {
        match e {
            PaymentError::InvalidRequest(message) => Self::bad_request(message),
            PaymentError::NotFound(message) => Self::not_found(message),
            PaymentError::ServiceUnavailable(message) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            PaymentError::Provider(message) => Self::internal(context, message),
            PaymentError::Store(e) => Self::from_order(context, e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), message = %self.message, "Request failed");
        } else {
            warn!(status = self.status.as_u16(), message = %self.message, "Request rejected");
        }
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}
