#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc, Weekday};
use reqwest::StatusCode;
use ritual::{
    db::Store,
    models::DocumentNode,
    services::{
        DocumentGenerator, FreshnessWindow, GenerationError, GenerationRequest, GenerationResponse,
    },
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};
use tempfile::TempDir;

/// 테스트 하나가 쓰는 임시 저장소. `TempDir`이 drop되면 파일도 지워집니다.
pub struct TestStore {
    pub store: Store,
    pub url: String,
    _dir: TempDir,
}

pub async fn test_store() -> TestStore {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("ritual.db").display());
    let store = Store::connect(&url).await.unwrap();
    TestStore {
        store,
        url,
        _dir: dir,
    }
}

pub fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
}

/// 일요일 09:00 UTC 기준 창
pub fn utc_window() -> FreshnessWindow {
    FreshnessWindow::new(Weekday::Sun, 9, FixedOffset::east_opt(0).unwrap())
}

/// 테스트용 요소 생성기
pub fn el(tag: &str, children: Vec<DocumentNode>) -> DocumentNode {
    DocumentNode::element(tag, children).unwrap()
}

pub fn sample_document() -> DocumentNode {
    DocumentNode::root(vec![
        el("h1", vec![DocumentNode::text("Your week")]),
        el(
            "p",
            vec![
                DocumentNode::text("You ran"),
                el("strong", vec![DocumentNode::text("three times")]),
            ],
        )
        .with_attr("class", "lead")
        .unwrap(),
    ])
}

/// 호출 횟수와 마지막 요청을 기록하는 생성기
pub struct StubGenerator {
    calls: AtomicUsize,
    fail: bool,
    requests: Mutex<Vec<(String, GenerationRequest)>>,
}

impl StubGenerator {
    pub fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, GenerationRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentGenerator for StubGenerator {
    async fn generate(
        &self,
        token: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests
            .lock()
            .unwrap()
            .push((token.to_string(), request.clone()));

        if self.fail {
            return Err(GenerationError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }

        Ok(GenerationResponse {
            newsletter: format!("newsletter #{call}"),
            color: "#ffcc00".to_string(),
            jsonified_html: Some(sample_document()),
        })
    }
}
