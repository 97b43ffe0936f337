//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/v1/health` → `{ "status": "ok", "schema_version": 20240401000000 }`

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::{db::StoreError, error::AppError};

/// `GET /health`: 서버 상태와 적용된 스키마 버전을 확인합니다.
///
/// 버전을 읽지 못하면 저장소를 쓸 수 없는 것으로 보고 503을 돌려줍니다.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let schema_version = state
        .store
        .schema_version()
        .await
        .map_err(|e| match e {
            StoreError::Database(e) => StoreError::Unavailable(e),
            other => other,
        })?;
    Ok(Json(json!({
        "status": "ok",
        "schema_version": schema_version
    })))
}
