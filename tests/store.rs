mod common;

use common::{at, sample_document, test_store};
use ritual::{
    db::{self, Collection, Index, StoreCell, StoreError},
    models::{JournalEntry, Newsletter, User},
};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::str::FromStr;

fn entry(id: &str, created: &str, content: &str) -> JournalEntry {
    JournalEntry {
        id: id.to_string(),
        created_date: at(created),
        content: content.to_string(),
    }
}

fn newsletter(id: &str, created: &str) -> Newsletter {
    Newsletter {
        id: id.to_string(),
        created_date: at(created),
        content: format!("content of {id}"),
        color: "#123456".to_string(),
        html: None,
    }
}

async fn schema_objects(pool: &SqlitePool) -> Vec<(String, String)> {
    sqlx::query_as(
        "SELECT type, name FROM sqlite_master WHERE name NOT LIKE 'sqlite_%' ORDER BY type, name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

/// 모든 삽입 순서
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let first = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first.clone());
            out.push(tail);
        }
    }
    out
}

#[test_log::test(tokio::test)]
async fn get_all_returns_exactly_what_was_inserted() {
    let t = test_store().await;
    let records = vec![
        JournalEntry::new("walked the dog").unwrap(),
        entry("b", "2024-03-05T10:00:00Z", "same minute"),
        entry("a", "2024-03-05T10:00:00Z", "same minute"),
        entry("z", "2023-01-01T00:00:00.999Z", "old"),
    ];
    let mut expected = records.clone();
    expected.sort_by(|a, b| a.id.cmp(&b.id));

    let orders = permutations(&records);
    assert_eq!(orders.len(), 24);
    for order in orders {
        db::clear_entries(&t.store).await.unwrap();
        for record in &order {
            t.store.insert(record).await.unwrap();
        }

        let mut all: Vec<JournalEntry> = t.store.get_all().await.unwrap();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(all, expected, "insertion order {:?}", ids(&order));
    }
}

fn ids(entries: &[JournalEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

#[test_log::test(tokio::test)]
async fn list_entries_is_newest_first() {
    let t = test_store().await;
    for e in [
        entry("b", "2024-03-05T10:00:00Z", "middle"),
        entry("c", "2024-03-06T10:00:00Z", "newest"),
        entry("a", "2024-03-04T10:00:00Z", "oldest"),
    ] {
        db::create_entry(&t.store, e).await.unwrap();
    }

    let ids: Vec<_> = db::list_entries(&t.store)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
}

#[test_log::test(tokio::test)]
async fn duplicate_key_is_rejected_and_first_row_kept() {
    let t = test_store().await;
    t.store
        .insert(&entry("same", "2024-03-04T10:00:00Z", "first"))
        .await
        .unwrap();

    let err = t
        .store
        .insert(&entry("same", "2024-03-05T10:00:00Z", "second"))
        .await
        .unwrap_err();
    match err {
        StoreError::ConstraintViolation { collection, key } => {
            assert_eq!(collection, Collection::Entry);
            assert_eq!(key, "same");
        }
        other => panic!("expected constraint violation, got {other:?}"),
    }

    let all: Vec<JournalEntry> = t.store.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "first");
}

#[test_log::test(tokio::test)]
async fn latest_by_index_ignores_insertion_order() {
    let t = test_store().await;
    let records = [
        newsletter("mid", "2024-03-03T10:00:00Z"),
        newsletter("latest", "2024-03-10T10:00:00.001Z"),
        newsletter("close", "2024-03-10T10:00:00Z"),
        newsletter("early", "2024-02-25T10:00:00Z"),
    ];

    for order in permutations(&records) {
        t.store.clear(Collection::Newsletter).await.unwrap();
        for n in &order {
            t.store.insert(n).await.unwrap();
        }

        let latest = db::latest_newsletter(&t.store).await.unwrap().unwrap();
        let inserted: Vec<_> = order.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(latest.id, "latest", "insertion order {inserted:?}");
    }
}

#[test_log::test(tokio::test)]
async fn latest_by_index_on_empty_collection_is_none() {
    let t = test_store().await;
    assert_eq!(db::latest_newsletter(&t.store).await.unwrap(), None);
}

#[test_log::test(tokio::test)]
async fn newsletter_document_survives_storage() {
    let t = test_store().await;
    let mut stored = newsletter("with-html", "2024-03-06T12:00:00.123Z");
    stored.html = Some(sample_document());
    t.store.insert(&stored).await.unwrap();

    let loaded = db::latest_newsletter(&t.store).await.unwrap().unwrap();
    assert_eq!(loaded, stored);
}

#[test_log::test(tokio::test)]
async fn find_user_by_email_index() {
    let t = test_store().await;
    let saved = db::save_user(&t.store, &User::new("ana@example.com", "token-1"))
        .await
        .unwrap();
    assert_eq!(saved.token, "token-1");

    let found = db::find_by_email(&t.store, "ana@example.com").await.unwrap();
    assert_eq!(found, Some(saved));
    assert_eq!(db::find_by_email(&t.store, "bo@example.com").await.unwrap(), None);
}

#[test_log::test(tokio::test)]
async fn save_user_replaces_token_for_same_email() {
    let t = test_store().await;
    let first = db::save_user(&t.store, &User::new("ana@example.com", "old"))
        .await
        .unwrap();
    let second = db::save_user(&t.store, &User::new("ana@example.com", "new"))
        .await
        .unwrap();

    assert_eq!(second.token, "new");
    assert_eq!(second.created_date, first.created_date);
    let users: Vec<User> = t.store.get_all().await.unwrap();
    assert_eq!(users.len(), 1);

    let err = t
        .store
        .insert(&User::new("ana@example.com", "other"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation { collection: Collection::User, .. }));
}

#[test_log::test(tokio::test)]
async fn index_of_another_collection_is_rejected() {
    let t = test_store().await;
    let err = t
        .store
        .find_by_index::<JournalEntry>(Index::UserEmail, "ana@example.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnknownIndex { index: "user_email", collection: Collection::Entry }
    ));

    let err = t
        .store
        .latest_by_index::<User>(Index::NewsletterCreatedDate)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownIndex { .. }));
}

#[test_log::test(tokio::test)]
async fn clear_is_idempotent() {
    let t = test_store().await;
    db::create_entry(&t.store, JournalEntry::new("one").unwrap())
        .await
        .unwrap();
    t.store.insert(&newsletter("n", "2024-03-06T12:00:00Z")).await.unwrap();

    db::clear_entries(&t.store).await.unwrap();
    db::clear_entries(&t.store).await.unwrap();

    assert!(db::list_entries(&t.store).await.unwrap().is_empty());
    // 다른 컬렉션은 건드리지 않습니다.
    assert!(db::latest_newsletter(&t.store).await.unwrap().is_some());
}

#[test_log::test(tokio::test)]
async fn migration_is_idempotent() {
    let t = test_store().await;
    let before = schema_objects(t.store.pool()).await;
    for collection in [Collection::Entry, Collection::User, Collection::Newsletter] {
        assert!(before.contains(&("table".to_string(), collection.table().to_string())));
    }
    assert!(before.contains(&("index".to_string(), "user_email".to_string())));
    assert!(before.contains(&("index".to_string(), "newsletter_created_date".to_string())));

    t.store.migrate().await.unwrap();
    assert_eq!(schema_objects(t.store.pool()).await, before);

    let reopened = ritual::db::Store::connect(&t.url).await.unwrap();
    assert_eq!(schema_objects(reopened.pool()).await, before);
    assert_eq!(reopened.schema_version().await.unwrap(), Some(20240401000000));
}

#[test_log::test(tokio::test)]
async fn legacy_store_is_upgraded_without_data_loss() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("legacy.db").display());

    // 첫 버전 앱이 만든 것처럼 entry 테이블만 있는 파일
    let options = SqliteConnectOptions::from_str(&url)
        .unwrap()
        .create_if_missing(true);
    let legacy = SqlitePool::connect_with(options).await.unwrap();
    sqlx::query(
        "CREATE TABLE entry (id TEXT PRIMARY KEY NOT NULL, created_date TEXT NOT NULL, content TEXT NOT NULL)",
    )
    .execute(&legacy)
    .await
    .unwrap();
    sqlx::query("INSERT INTO entry (id, created_date, content) VALUES (?, ?, ?)")
        .bind("old-entry")
        .bind("2023-12-31T08:00:00.000Z")
        .bind("written before the upgrade")
        .execute(&legacy)
        .await
        .unwrap();
    legacy.close().await;

    let store = ritual::db::Store::connect(&url).await.unwrap();

    let entries = db::list_entries(&store).await.unwrap();
    assert_eq!(
        entries,
        vec![entry("old-entry", "2023-12-31T08:00:00Z", "written before the upgrade")]
    );
    assert_eq!(db::latest_newsletter(&store).await.unwrap(), None);
    assert_eq!(db::find_by_email(&store, "ana@example.com").await.unwrap(), None);
}

#[test_log::test(tokio::test)]
async fn store_cell_opens_once() {
    let t = test_store().await;
    let cell = StoreCell::new(t.url.clone());
    assert!(cell.get().is_none());

    let first = cell.open().await.unwrap();
    db::create_entry(first, JournalEntry::new("hello").unwrap())
        .await
        .unwrap();
    let second = cell.open().await.unwrap();

    assert!(std::ptr::eq(first, second));
    assert!(cell.get().is_some());
    assert_eq!(db::list_entries(second).await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn store_cell_reports_unavailable_store() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}",
        dir.path().join("missing").join("ritual.db").display()
    );
    let cell = StoreCell::new(url);

    let err = cell.open().await.unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {err:?}");
    assert!(cell.get().is_none());
}
