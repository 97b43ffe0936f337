//! # Bearer 토큰 추출기
//!
//! `Authorization: Bearer <token>` 헤더에서 토큰을 꺼냅니다.
//! 토큰 자체는 검증하지 않고 원격 생성기에 그대로 전달합니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// `Authorization: Bearer <token>` 헤더의 토큰
///
/// 토큰은 원격 서비스가 발급한 불투명한 값이므로 여기서는 형식만 확인합니다.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = TokenRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(TokenRejection::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(TokenRejection::InvalidToken)?;

        Ok(BearerToken(token.to_string()))
    }
}

#[derive(Debug)]
pub enum TokenRejection {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            TokenRejection::MissingToken => ("missing_token", "Authorization token is required"),
            TokenRejection::InvalidToken => ("invalid_token", "Invalid authorization token"),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
