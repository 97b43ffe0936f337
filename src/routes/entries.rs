//! # 저널 엔트리 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/entries` → 엔트리 목록 (최신순)
//! - `POST   /api/v1/entries` → 새 엔트리 생성
//! - `DELETE /api/v1/entries` → 모든 엔트리 삭제

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::{db, error::AppError, models::*};

/// `GET /entries`: `{ "entries": [...] }`
pub async fn list_entries(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let entries = db::list_entries(&state.store).await?;
    Ok(Json(json!({ "entries": entries })))
}

/// `POST /entries`: 공백뿐인 내용은 400입니다.
pub async fn create_entry(
    State(state): State<AppState>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntry>), AppError> {
    let entry = JournalEntry::new(req.content)?;
    let entry = db::create_entry(&state.store, entry).await?;
    tracing::debug!(id = %entry.id, "entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `DELETE /entries`: 이미 비어 있어도 204입니다.
pub async fn clear_entries(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    db::clear_entries(&state.store).await?;
    Ok(StatusCode::NO_CONTENT)
}
