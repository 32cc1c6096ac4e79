//! 核心错误处理模块

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 请求数据违反字段规则
    #[error("{0}")]
    Validation(String),
    #[error("Product not found")]
    ProductNotFound,
    #[error("Not found")]
    RouteNotFound,
    #[error("Request timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::ProductNotFound | CatalogError::RouteNotFound => StatusCode::NOT_FOUND,
            CatalogError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl From<JsonRejection> for CatalogError {
    fn from(rejection: JsonRejection) -> Self {
        CatalogError::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let CatalogError::Validation(msg) = &self {
            tracing::debug!("Rejected request: {}", msg);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_kinds_to_statuses() {
        assert_eq!(
            CatalogError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CatalogError::ProductNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(CatalogError::RouteNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(CatalogError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn product_not_found_message_is_fixed() {
        assert_eq!(CatalogError::ProductNotFound.to_string(), "Product not found");
    }
}
