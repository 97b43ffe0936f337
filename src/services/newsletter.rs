//! # 뉴스레터 캐시
//!
//! 가장 최근에 저장된 뉴스레터가 현재 신선도 창 안에 있으면 그대로 돌려주고,
//! 없거나 오래됐으면 원격 생성기를 한 번 호출해 새 뉴스레터를 저장합니다.
//!
//! ## 창 단위 상태
//! ```text
//! NoRecordOrStale ──generate──▶ Fresh        (성공, 저장됨)
//!        ▲      └──generate──▶ NoRecordOrStale (실패, 아무것도 저장 안 함)
//!        └──────── 창 경계가 지나면 ───────── Fresh
//! ```
//! 상태는 저장된 행과 현재 시각으로 매번 다시 계산하며 메모리 플래그를 두지 않습니다.
//! 그래서 캐시 객체를 새로 만들어도 같은 창 안에서는 재생성이 일어나지 않습니다.
//!
//! 두 요청이 동시에 "오래됨"을 읽고 둘 다 생성하는 경쟁은 막지 않습니다.
//! 이 경우 뉴스레터 행이 두 개 생기고, 최신 조회는 나중 행을 돌려줍니다.

use chrono::{DateTime, SubsecRound, Utc};
use std::{fmt, sync::Arc};

use super::{
    freshness::FreshnessWindow,
    generator::{DocumentGenerator, GenerationRequest},
};
use crate::{
    db::{self, Store},
    models::{DocumentNode, JournalEntry, Newsletter},
};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// 신선도 창 기준의 캐시 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    NoRecordOrStale,
    Fresh,
}

#[derive(Clone)]
pub struct NewsletterCache {
    store: Store,
    generator: Arc<dyn DocumentGenerator>,
    window: FreshnessWindow,
    clock: Clock,
}

impl fmt::Debug for NewsletterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsletterCache")
            .field("store", &self.store)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl NewsletterCache {
    pub fn new(store: Store, generator: Arc<dyn DocumentGenerator>, window: FreshnessWindow) -> Self {
        Self {
            store,
            generator,
            window,
            clock: Arc::new(Utc::now),
        }
    }

    /// 현재 시각 공급자를 바꿉니다.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn window(&self) -> &FreshnessWindow {
        &self.window
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)().trunc_subsecs(3)
    }

    /// 저장된 최신 뉴스레터를 생성 없이 읽습니다. 없으면 `None`입니다.
    pub async fn peek_if_exists(&self) -> Option<Newsletter> {
        match db::latest_newsletter(&self.store).await {
            Ok(newsletter) => newsletter,
            Err(e) => {
                tracing::error!(error = %e, "failed to read latest newsletter");
                None
            }
        }
    }

    /// 현재 창의 상태를 저장된 행으로부터 계산합니다.
    pub async fn state(&self) -> CacheState {
        match self.peek_if_exists().await {
            Some(newsletter) if self.window.is_fresh(newsletter.created_date, self.now()) => {
                CacheState::Fresh
            }
            _ => CacheState::NoRecordOrStale,
        }
    }

    /// 신선한 뉴스레터가 있으면 그대로, 없으면 새로 생성해 저장한 뒤 반환합니다.
    ///
    /// 저장소 읽기나 생성이 실패하면 로그만 남기고 `None`을 반환합니다.
    /// 엔트리 목록이 비어 있어도 그대로 생성기에 넘깁니다 (빈 목록 검사는 호출 측 책임).
    pub async fn get_current_or_refresh(
        &self,
        token: &str,
        entries: &[JournalEntry],
    ) -> Option<Newsletter> {
        let latest = match db::latest_newsletter(&self.store).await {
            Ok(latest) => latest,
            Err(e) => {
                tracing::error!(error = %e, "failed to read latest newsletter");
                return None;
            }
        };

        let now = self.now();
        match latest {
            Some(newsletter) if self.window.is_fresh(newsletter.created_date, now) => {
                tracing::debug!(id = %newsletter.id, "newsletter is fresh, skipping generation");
                Some(newsletter)
            }
            stale => {
                if let Some(newsletter) = stale {
                    tracing::info!(
                        id = %newsletter.id,
                        created = %newsletter.created_date,
                        anchor = %self.window.anchor_before(now),
                        "newsletter is stale"
                    );
                }
                self.generate(token, entries).await
            }
        }
    }

    async fn generate(&self, token: &str, entries: &[JournalEntry]) -> Option<Newsletter> {
        let request = GenerationRequest::from_entries(entries, self.window.offset());

        let response = match self.generator.generate(token, &request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "newsletter generation failed");
                return None;
            }
        };

        // 잘못된 트리를 저장하면 이후 읽기가 모두 실패하므로 저장 전에 걸러냅니다.
        if let Some(Err(e)) = response.jsonified_html.as_ref().map(DocumentNode::validate) {
            tracing::warn!(error = %e, "generator returned a malformed document");
            return None;
        }

        let newsletter = Newsletter {
            id: uuid::Uuid::now_v7().to_string(),
            created_date: self.now(),
            content: response.newsletter,
            color: response.color,
            html: response.jsonified_html,
        };

        if let Err(e) = self.store.insert(&newsletter).await {
            tracing::error!(error = %e, "failed to persist generated newsletter");
            return None;
        }

        tracing::info!(id = %newsletter.id, entries = entries.len(), "newsletter generated");
        Some(newsletter)
    }
}
