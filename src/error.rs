//! # 에러 처리 모듈
//!
//! HTTP 계층에서 쓰는 에러 타입을 정의합니다.
//! 도메인 에러(`StoreError`, `EntryError`, `AuthError`)는 `From` 변환으로 들어오고,
//! `IntoResponse` 구현이 이를 상태 코드와 JSON 본문으로 바꿉니다.
//!
//! 응답 본문 형태:
//! ```json
//! { "error": { "code": "not_found", "message": "Resource not found" } }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{db::StoreError, models::EntryError, services::AuthError};

/// 핸들러가 반환하는 에러
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 저장소 오류. 종류에 따라 409 / 503 / 500으로 나뉩니다.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// 원격 서비스 오류 (HTTP 502). 원격이 401/403을 주면 그대로 401로 돌려줍니다.
    #[error("Upstream error: {0}")]
    Upstream(#[from] AuthError),
}

impl From<EntryError> for AppError {
    fn from(e: EntryError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl IntoResponse for AppError {
    /// 내부 에러는 실제 내용을 로그에만 남기고, 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Store(StoreError::ConstraintViolation { ref collection, ref key }) => (
                StatusCode::CONFLICT,
                "conflict",
                format!("{collection} already contains {key}"),
            ),
            AppError::Store(ref e) if e.is_unavailable() => {
                tracing::error!("Store unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "The local store is unavailable".to_string(),
                )
            }
            AppError::Store(ref e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Upstream(AuthError::Status(status))
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "Invalid credentials".to_string(),
                )
            }
            AppError::Upstream(AuthError::Status(status)) if status == StatusCode::CONFLICT => (
                StatusCode::CONFLICT,
                "conflict",
                "Account already exists".to_string(),
            ),
            AppError::Upstream(ref e) => {
                tracing::warn!("Upstream error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    "The remote service request failed".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
