//! # 원격 뉴스레터 생성기 (DocumentGenerator)
//!
//! 엔트리 스냅샷과 bearer 토큰을 받아 새 뉴스레터 문서를 만들어 주는 외부 협력자입니다.
//!
//! ## 전송 계약
//! ```text
//! POST {API_URL}web-newsletter
//! Authorization: Bearer <token>
//! { "entries": [{ "id": "...", "content": "...", "createdDate": "MM/DD/YYYY" }] }
//!
//! 200 → { "newsletter": "...", "color": "...", "jsonified_html": { ...DocumentNode } }
//! ```
//! 성공이 아닌 상태 코드, 전송 오류, 디코딩 실패는 모두 "생성되지 않음"으로 취급합니다.
//! 재시도는 하지 않습니다.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DocumentNode, JournalEntry};

#[derive(Debug, Error)]
pub enum GenerationError {
    /// 연결 실패 또는 응답 본문 디코딩 실패
    #[error("generator request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generator responded with status {0}")]
    Status(StatusCode),
}

/// 전송용 엔트리. 날짜는 `MM/DD/YYYY` 문자열로 정규화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEntry {
    pub id: String,
    pub content: String,
    pub created_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub entries: Vec<WireEntry>,
}

impl GenerationRequest {
    /// 엔트리 스냅샷을 전송 형태로 바꿉니다. 날짜는 `offset` 기준 지역 날짜입니다.
    pub fn from_entries(entries: &[JournalEntry], offset: FixedOffset) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|entry| WireEntry {
                    id: entry.id.clone(),
                    content: entry.content.clone(),
                    created_date: format_entry_date(entry.created_date, offset),
                })
                .collect(),
        }
    }
}

pub fn format_entry_date(date: DateTime<Utc>, offset: FixedOffset) -> String {
    date.with_timezone(&offset).format("%m/%d/%Y").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub newsletter: String,
    pub color: String,
    #[serde(default)]
    pub jsonified_html: Option<DocumentNode>,
}

#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate(
        &self,
        token: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}

/// reqwest 기반 생성기
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGenerator {
    /// `api_url`은 `/`로 끝나는 기본 URL입니다 (예: `https://api.example.com/`).
    pub fn new(api_url: &str) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: format!("{api_url}web-newsletter"),
        })
    }
}

#[async_trait]
impl DocumentGenerator for HttpGenerator {
    async fn generate(
        &self,
        token: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            entries = request.entries.len(),
            "requesting newsletter generation"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status));
        }

        Ok(response.json::<GenerationResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: &str, created: &str, content: &str) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            created_date: DateTime::parse_from_rfc3339(created).unwrap().with_timezone(&Utc),
            content: content.to_string(),
        }
    }

    #[test]
    fn request_uses_month_day_year_dates() {
        let entries = vec![
            entry("a", "2024-03-06T12:00:00Z", "ran 5k"),
            entry("b", "2024-12-31T23:30:00Z", "new year's eve"),
        ];
        let request = GenerationRequest::from_entries(&entries, FixedOffset::east_opt(0).unwrap());

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "entries": [
                    { "id": "a", "content": "ran 5k", "createdDate": "03/06/2024" },
                    { "id": "b", "content": "new year's eve", "createdDate": "12/31/2024" }
                ]
            })
        );
    }

    #[test]
    fn request_dates_follow_local_offset() {
        let entries = vec![entry("b", "2024-12-31T23:30:00Z", "late")];
        let request =
            GenerationRequest::from_entries(&entries, FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(request.entries[0].created_date, "01/01/2025");
    }

    #[test]
    fn response_html_is_optional() {
        let response: GenerationResponse =
            serde_json::from_value(json!({ "newsletter": "hello", "color": "#ffcc00" })).unwrap();
        assert_eq!(response.jsonified_html, None);
    }

    #[test]
    fn response_with_malformed_html_is_rejected() {
        let result: Result<GenerationResponse, _> = serde_json::from_value(json!({
            "newsletter": "hello",
            "color": "#ffcc00",
            "jsonified_html": { "tag": "text" }
        }));
        assert!(result.is_err());
    }
}
