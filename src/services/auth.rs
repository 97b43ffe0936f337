//! # 원격 인증 클라이언트
//!
//! 계정과 토큰 발급은 원격 서비스가 담당합니다. 여기서는 요청을 그대로 전달하고
//! 발급된 bearer 토큰만 돌려받습니다.
//!
//! ```text
//! GET  {API_URL}user?email=...   → 200 (있음) / 404 (없음)
//! POST {API_URL}login            { email, password } → { token }
//! POST {API_URL}register         { email, password } → { token }
//! ```

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth service responded with status {0}")]
    Status(StatusCode),
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    api_url: String,
}

impl AuthClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            api_url: api_url.into(),
        })
    }

    /// 이메일로 가입된 계정이 있는지 확인합니다.
    pub async fn lookup(&self, email: &str) -> Result<bool, AuthError> {
        let response = self
            .client
            .get(format!("{}user", self.api_url))
            .query(&[("email", email)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(AuthError::Status(status)),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.request_token("login", email, password).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.request_token("register", email, password).await
    }

    async fn request_token(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let response = self
            .client
            .post(format!("{}{}", self.api_url, path))
            .json(&Credentials { email, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "auth service rejected request");
            return Err(AuthError::Status(status));
        }

        let body: TokenResponse = response.json().await?;
        Ok(body.token)
    }
}
