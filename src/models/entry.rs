//! # 저널 엔트리 모델
//!
//! 사용자가 남기는 짧은 기록 한 건입니다. 한 번 만들어지면 수정되지 않고,
//! 전체 삭제(clear)로만 사라집니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::timestamp_now;

/// 저널 엔트리. DB의 `entry` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JournalEntry {
    /// 클라이언트에서 생성하는 UUIDv7
    pub id: String,
    /// 생성 시각 (밀리초 단위, 이후 변경되지 않음)
    pub created_date: DateTime<Utc>,
    pub content: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry content must not be empty")]
    EmptyContent,
}

impl JournalEntry {
    /// 새 엔트리를 만듭니다. 공백뿐인 내용은 거부합니다.
    ///
    /// 내용 자체는 다듬지 않고 입력 그대로 보관합니다.
    pub fn new(content: impl Into<String>) -> Result<Self, EntryError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(EntryError::EmptyContent);
        }

        Ok(Self {
            id: uuid::Uuid::now_v7().to_string(),
            created_date: timestamp_now(),
            content,
        })
    }
}

/// `POST /entries` 요청 본문
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub content: String,
}
