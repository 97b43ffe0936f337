//! # 사용자 레코드 저장
//!
//! `user` 컬렉션은 이메일이 키이며 `user_email` 인덱스로 조회합니다.

use super::{encode_timestamp, Collection, Index, InsertQuery, Record, Store, StoreError};
use crate::models::User;

impl Record for User {
    const COLLECTION: Collection = Collection::User;

    fn key(&self) -> &str {
        &self.email
    }

    fn bind_insert<'q>(&'q self, query: InsertQuery<'q>) -> InsertQuery<'q> {
        query
            .bind(&self.email)
            .bind(&self.token)
            .bind(encode_timestamp(&self.created_date))
    }
}

pub async fn find_by_email(store: &Store, email: &str) -> Result<Option<User>, StoreError> {
    store.find_by_index(Index::UserEmail, email).await
}

/// 로그인할 때마다 같은 이메일의 토큰을 최신 값으로 바꿉니다.
///
/// 최초 가입 시각(`created_date`)은 유지되며, 저장된 행을 그대로 돌려줍니다.
pub async fn save_user(store: &Store, user: &User) -> Result<User, StoreError> {
    let saved = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO user (email, token, created_date)
        VALUES (?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET token = excluded.token
        RETURNING email, token, created_date
        "#,
    )
    .bind(&user.email)
    .bind(&user.token)
    .bind(encode_timestamp(&user.created_date))
    .fetch_one(store.pool())
    .await?;

    Ok(saved)
}
