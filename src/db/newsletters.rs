//! # 뉴스레터 레코드 저장
//!
//! 본문 문서(`html`)는 nullable JSON 컬럼에 담깁니다.
//! 최신 조회는 `newsletter_created_date` 인덱스를 씁니다.

use sqlx::types::Json;

use super::{encode_timestamp, Collection, Index, InsertQuery, Record, Store, StoreError};
use crate::models::Newsletter;

impl Record for Newsletter {
    const COLLECTION: Collection = Collection::Newsletter;

    fn key(&self) -> &str {
        &self.id
    }

    fn bind_insert<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query
            .bind(&self.id)
            .bind(encode_timestamp(&self.created_date))
            .bind(&self.content)
            .bind(&self.color)
            .bind(self.html.as_ref().map(Json))
    }
}

/// 생성 시각이 가장 늦은 뉴스레터
pub async fn latest_newsletter(store: &Store) -> Result<Option<Newsletter>, StoreError> {
    store.latest_by_index(Index::NewsletterCreatedDate).await
}
