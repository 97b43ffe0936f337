//! # 저장소 에러 타입
//!
//! `is_unavailable()`이 참인 에러는 파일을 열 수 없거나 풀이 닫힌 경우입니다.

use sqlx::migrate::MigrateError;
use thiserror::Error;

use super::Collection;

#[derive(Debug, Error)]
pub enum StoreError {
    /// 저장소를 열 수 없음 (경로 없음, 권한 없음 등). 세션 전체에 치명적입니다.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// 스키마 마이그레이션 실패. 이 역시 저장소를 쓸 수 없는 상태입니다.
    #[error("store unavailable: migration failed: {0}")]
    Migration(#[from] MigrateError),

    /// 기본 키 또는 유일 인덱스 필드가 이미 존재함
    #[error("constraint violation: {collection} already contains key {key:?}")]
    ConstraintViolation { collection: Collection, key: String },

    #[error("index {index} does not belong to collection {collection}")]
    UnknownIndex { index: &'static str, collection: Collection },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_)
                | StoreError::Migration(_)
                | StoreError::Database(
                    sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)
                )
        )
    }
}
