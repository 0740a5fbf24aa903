use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Stable numeric error codes returned to clients in the `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    InvalidToken = 1,
    InvalidRefreshToken = 2,
    ResourceNotFound = 3,
    InternalError = 4,
    Unauthorized = 5,
    Forbidden = 6,
    InvalidRequest = 7,
    ValidationError = 8,
    EmailAlreadyExists = 9,
    ProducerNotExist = 10,
    WrongEmailOrPassword = 11,
    ProducerIsUsed = 12,
    UserIsBlocked = 13,
    ProductNotExist = 14,
    ProductIsUsed = 15,
    CartIsEmpty = 16,
    OrderCantBeDeleted = 17,
    OrderCantBeUpdated = 18,
    OrderNotExist = 19,
}

impl ErrorCode {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub const fn status(self) -> StatusCode {
        match self {
            Self::InvalidToken | Self::InvalidRefreshToken | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Forbidden | Self::WrongEmailOrPassword | Self::UserIsBlocked => {
                StatusCode::FORBIDDEN
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidToken | Self::InvalidRefreshToken => "invalid token",
            Self::ResourceNotFound => "resource not found",
            Self::InternalError => "internal error",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::InvalidRequest => "invalid request",
            Self::ValidationError => "validation error",
            Self::EmailAlreadyExists => "user with this email already exists",
            Self::ProducerNotExist => "producer with this id doesn't exist",
            Self::WrongEmailOrPassword => "wrong email or password",
            Self::ProducerIsUsed => "this producer is already used and can not be deleted",
            Self::UserIsBlocked => "user is blocked",
            Self::ProductNotExist => "product with this id doesn't exist",
            Self::ProductIsUsed => "this product is already used and can not be deleted",
            Self::CartIsEmpty => "cart is empty",
            Self::OrderCantBeDeleted => "only new orders can be deleted",
            Self::OrderCantBeUpdated => "products can only be changed in new orders",
            Self::OrderNotExist => "order with this id doesn't exist",
        }
    }
}

/// Error returned by every handler and service.
///
/// Rendered as `{"error": <code>, "message": <text>}`. Server errors are
/// logged with their full chain and replaced with a generic message.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, code: ErrorCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
        }
    }

    /// Builds an error whose status and message come from the code itself.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code.status(), code, anyhow!(code.message()))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            err,
        )
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::internal(err)
    }

    pub fn not_found() -> Self {
        Self::from_code(ErrorCode::ResourceNotFound)
    }

    pub fn invalid_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidRequest, err)
    }

    pub fn validation<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, err)
    }

    pub fn invalid_token() -> Self {
        Self::from_code(ErrorCode::InvalidToken)
    }

    pub fn unauthorized() -> Self {
        Self::from_code(ErrorCode::Unauthorized)
    }

    pub fn forbidden() -> Self {
        Self::from_code(ErrorCode::Forbidden)
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code)
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self::internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_server_error() {
            tracing::error!(error = ?self.error, code = self.code.as_u16(), "request failed");
            ErrorCode::InternalError.message().to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({
            "error": self.code.as_u16(),
            "message": message,
        }));

        (self.status, body).into_response()
    }
}
