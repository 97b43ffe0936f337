//! # 사용자 모델과 인증 요청/응답 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp_now;

/// 원격 계정의 로컬 투영. 비밀번호는 저장하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub email: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_date: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
            created_date: timestamp_now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub email: String,
    pub token: String,
}

impl From<User> for AuthResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            token: user.token,
        }
    }
}
