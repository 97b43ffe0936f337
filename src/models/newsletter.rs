//! # 뉴스레터 모델
//!
//! 생성이 성공할 때마다 한 건씩 쌓이며, 저장된 뒤에는 바뀌지 않습니다.
//! 더 새로운 행이 생기면 그 행이 "현재" 뉴스레터가 됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, types::Json, FromRow, Row};

use super::DocumentNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Newsletter {
    pub id: String,
    /// 생성 시각 (내용이 다루는 기간이 아님)
    pub created_date: DateTime<Utc>,
    /// 문서 본문이 없을 때 보여줄 일반 텍스트
    pub content: String,
    /// 이번 호의 강조 색상
    pub color: String,
    /// 렌더링할 문서 본문. `html` 컬럼에 JSON 텍스트로 저장됩니다.
    pub html: Option<DocumentNode>,
}

// `html` 컬럼이 nullable JSON이라 derive 대신 직접 구현합니다.
impl<'r> FromRow<'r, SqliteRow> for Newsletter {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let html: Option<Json<DocumentNode>> = row.try_get("html")?;

        Ok(Self {
            id: row.try_get("id")?,
            created_date: row.try_get("created_date")?,
            content: row.try_get("content")?,
            color: row.try_get("color")?,
            html: html.map(|Json(node)| node),
        })
    }
}
