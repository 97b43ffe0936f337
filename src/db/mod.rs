//! # 로컬 영속 저장소 (Data Access Layer)
//!
//! 세 개의 이름 있는 컬렉션을 SQLite 테이블로 보관합니다:
//!
//! | 컬렉션 | 테이블 | 기본 키 | 인덱스 |
//! |--------|--------|---------|--------|
//! | `Entry` | `entry` | `id` | - |
//! | `User` | `user` | `email` | `user_email` (UNIQUE) |
//! | `Newsletter` | `newsletter` | `id` | `newsletter_created_date` |
//!
//! ## 스키마 진화
//! `./migrations`의 SQL 파일이 바이너리에 포함되며, `_sqlx_migrations` 테이블에
//! 적용된 버전이 기록됩니다. 모든 문장은 `IF NOT EXISTS`로 보호된 추가 전용
//! 변경이므로, 예전 스키마로 만들어진 저장소에 다시 실행해도 데이터가 사라지지 않습니다.
//!
//! 각 하위 모듈:
//! - `entries`: 엔트리 생성/목록
//! - `users`: 이메일 기준 사용자 저장/조회
//! - `newsletters`: 최신 뉴스레터 조회

pub mod entries;
pub mod error;
pub mod newsletters;
pub mod users;

pub use entries::*;
pub use error::StoreError;
pub use newsletters::*;
pub use users::*;

use chrono::{DateTime, Utc};
use sqlx::{
    migrate::Migrator,
    query::Query,
    sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    FromRow, Sqlite, SqlitePool,
};
use std::{fmt, str::FromStr};
use tokio::sync::OnceCell;

/// 컴파일 시점에 포함되는 마이그레이션 묶음
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 저장소가 관리하는 컬렉션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Entry,
    User,
    Newsletter,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Entry => "entry",
            Collection::User => "user",
            Collection::Newsletter => "newsletter",
        }
    }

    /// INSERT 시 바인딩 순서와 같은 컬럼 목록
    fn columns(self) -> &'static [&'static str] {
        match self {
            Collection::Entry => &["id", "created_date", "content"],
            Collection::User => &["email", "token", "created_date"],
            Collection::Newsletter => &["id", "created_date", "content", "color", "html"],
        }
    }

    fn insert_sql(self) -> String {
        let columns = self.columns();
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table(),
            columns.join(", "),
            placeholders
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// 기본 키가 아닌 필드로 조회하기 위한 이름 있는 인덱스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    /// `user.email` 유일 인덱스
    UserEmail,
    /// `newsletter.created_date` 최신순 조회 인덱스
    NewsletterCreatedDate,
}

impl Index {
    pub fn name(self) -> &'static str {
        match self {
            Index::UserEmail => "user_email",
            Index::NewsletterCreatedDate => "newsletter_created_date",
        }
    }

    pub fn collection(self) -> Collection {
        match self {
            Index::UserEmail => Collection::User,
            Index::NewsletterCreatedDate => Collection::Newsletter,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Index::UserEmail => "email",
            Index::NewsletterCreatedDate => "created_date",
        }
    }
}

pub type InsertQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// 컬렉션 하나에 저장되는 레코드 타입
///
/// `bind_insert`는 `Collection::columns()`와 같은 순서로 값을 바인딩해야 합니다.
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin {
    const COLLECTION: Collection;

    /// 충돌 보고용 기본 키 값
    fn key(&self) -> &str;

    fn bind_insert<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q>;
}

/// 타임스탬프 저장 포맷. 문자열 비교가 시간 순서와 일치하도록 자릿수를 고정합니다.
pub fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// 열려 있는 저장소 핸들
///
/// `SqlitePool`은 내부적으로 Arc를 쓰므로 clone해도 같은 풀을 가리킵니다.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// 데이터베이스에 연결하고 마이그레이션을 적용합니다.
    ///
    /// 파일이 없으면 새로 만듭니다. 플랫폼 저장소에 접근할 수 없으면
    /// `StoreError::Unavailable`을 반환합니다.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StoreError::Unavailable)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(StoreError::Unavailable)?;

        let store = Self { pool };
        store.migrate().await?;

        let version = store.schema_version().await?;
        tracing::info!(?version, "store opened");
        Ok(store)
    }

    /// 아직 적용되지 않은 마이그레이션만 순서대로 실행합니다. 여러 번 호출해도 안전합니다.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// 적용된 마이그레이션 중 가장 높은 버전
    pub async fn schema_version(&self) -> Result<Option<i64>, StoreError> {
        let version: Option<i64> =
            sqlx::query_scalar("SELECT MAX(version) FROM _sqlx_migrations WHERE success = 1")
                .fetch_one(&self.pool)
                .await?;
        Ok(version)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 레코드를 저장합니다.
    ///
    /// 기본 키나 유일 인덱스 값이 이미 있으면 `ConstraintViolation`을 반환하고
    /// 아무것도 쓰지 않습니다.
    pub async fn insert<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let collection = R::COLLECTION;
        let sql = collection.insert_sql();

        let result = record.bind_insert(sqlx::query(&sql)).execute(&self.pool).await;
        match result {
            Ok(_) => {
                tracing::debug!(%collection, key = record.key(), "record inserted");
                Ok(())
            }
            Err(sqlx::Error::Database(ref e)) if e.is_unique_violation() => {
                tracing::warn!(%collection, key = record.key(), "duplicate key rejected");
                Err(StoreError::ConstraintViolation {
                    collection,
                    key: record.key().to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 컬렉션의 모든 레코드. 순서는 보장하지 않습니다.
    pub async fn get_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!("SELECT * FROM {}", R::COLLECTION.table());
        let records = sqlx::query_as::<_, R>(&sql).fetch_all(&self.pool).await?;
        Ok(records)
    }

    /// 인덱스 값으로 레코드 하나를 찾습니다. 없으면 `None`입니다.
    pub async fn find_by_index<R: Record>(
        &self,
        index: Index,
        value: &str,
    ) -> Result<Option<R>, StoreError> {
        check_index::<R>(index)?;

        let sql = format!(
            "SELECT * FROM {} WHERE {} = ? LIMIT 1",
            R::COLLECTION.table(),
            index.column()
        );
        let record = sqlx::query_as::<_, R>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// 인덱스 값이 가장 큰 레코드. 같은 값이면 나중에 삽입된 행이 이깁니다.
    pub async fn latest_by_index<R: Record>(&self, index: Index) -> Result<Option<R>, StoreError> {
        check_index::<R>(index)?;

        let sql = format!(
            "SELECT * FROM {} ORDER BY {} DESC, rowid DESC LIMIT 1",
            R::COLLECTION.table(),
            index.column()
        );
        let record = sqlx::query_as::<_, R>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// 컬렉션의 모든 행을 지웁니다. 이미 비어 있어도 성공합니다.
    pub async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {}", collection.table());
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        tracing::info!(%collection, removed = result.rows_affected(), "collection cleared");
        Ok(())
    }
}

fn check_index<R: Record>(index: Index) -> Result<(), StoreError> {
    if index.collection() == R::COLLECTION {
        Ok(())
    } else {
        Err(StoreError::UnknownIndex {
            index: index.name(),
            collection: R::COLLECTION,
        })
    }
}

/// 세션이 소유하는 지연 초기화 저장소 핸들
///
/// `open()`은 처음 호출될 때만 연결하고, 이후에는 같은 핸들을 돌려줍니다.
/// 실패한 open은 셀을 비워 두므로 `get()`으로 "아직 안 열림"과 구분할 수 있습니다.
#[derive(Debug)]
pub struct StoreCell {
    database_url: String,
    cell: OnceCell<Store>,
}

impl StoreCell {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            cell: OnceCell::new(),
        }
    }

    pub async fn open(&self) -> Result<&Store, StoreError> {
        self.cell
            .get_or_try_init(|| Store::connect(&self.database_url))
            .await
    }

    /// 이미 열린 핸들. 아직 열리지 않았거나 열기에 실패했다면 `None`입니다.
    pub fn get(&self) -> Option<&Store> {
        self.cell.get()
    }
}
