//! # 인증 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/v1/auth/login`    → 원격 로그인 후 토큰을 로컬에 저장
//! - `POST /api/v1/auth/register` → 원격 가입 후 토큰을 로컬에 저장
//! - `GET  /api/v1/auth/lookup`   → 원격에 계정이 있는지 확인

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use super::AppState;
use crate::{db, error::AppError, models::*};

fn validate(email: &str, password: &str) -> Result<(), AppError> {
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }
    Ok(())
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate(&req.email, &req.password)?;

    let token = state.auth.login(&req.email, &req.password).await?;
    let user = db::save_user(&state.store, &User::new(req.email, token)).await?;

    tracing::info!(email = %user.email, "user logged in");
    Ok(Json(user.into()))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate(&req.email, &req.password)?;

    let token = state.auth.register(&req.email, &req.password).await?;
    let user = db::save_user(&state.store, &User::new(req.email, token)).await?;

    tracing::info!(email = %user.email, "user registered");
    Ok(Json(user.into()))
}

/// `GET /auth/lookup?email=`: `{ "exists": bool }`
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Value>, AppError> {
    let exists = state.auth.lookup(&query.email).await?;
    Ok(Json(json!({ "exists": exists })))
}
