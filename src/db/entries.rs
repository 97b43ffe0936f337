//! # 저널 엔트리 쿼리 모듈

use super::{encode_timestamp, Collection, InsertQuery, Record, Store, StoreError};
use crate::models::JournalEntry;

impl Record for JournalEntry {
    const COLLECTION: Collection = Collection::Entry;

    fn key(&self) -> &str {
        &self.id
    }

    fn bind_insert<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query
            .bind(&self.id)
            .bind(encode_timestamp(&self.created_date))
            .bind(&self.content)
    }
}

/// 새 엔트리를 만들어 저장하고 반환합니다.
pub async fn create_entry(store: &Store, entry: JournalEntry) -> Result<JournalEntry, StoreError> {
    store.insert(&entry).await?;
    Ok(entry)
}

/// 모든 엔트리를 최신순으로 반환합니다.
///
/// 저장소는 순서를 보장하지 않으므로 정렬은 여기서 합니다.
pub async fn list_entries(store: &Store) -> Result<Vec<JournalEntry>, StoreError> {
    let mut entries: Vec<JournalEntry> = store.get_all().await?;
    entries.sort_by(|a, b| b.created_date.cmp(&a.created_date));
    Ok(entries)
}

pub async fn clear_entries(store: &Store) -> Result<(), StoreError> {
    store.clear(Collection::Entry).await
}
