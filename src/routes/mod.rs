//! # 라우트 핸들러 모듈
//!
//! 로컬 HTTP API입니다. 모든 경로는 `/api/v1` 아래에 붙습니다.
//!
//! 각 하위 모듈:
//! - `auth`: 원격 인증 서비스 프록시 (로그인, 가입, 계정 조회)
//! - `entries`: 저널 엔트리 목록/생성/전체 삭제
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `newsletter`: 현재 뉴스레터 조회, 갱신, 점진적 렌더링(SSE)

pub mod auth;
pub mod entries;
pub mod health;
pub mod newsletter;

pub use entries::*;
pub use health::*;
pub use newsletter::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;

use crate::{
    db::Store,
    services::{AuthClient, NewsletterCache},
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 안의 값들은 모두 내부적으로 Arc를 써서 clone 비용이 작습니다.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub cache: NewsletterCache,
    pub auth: AuthClient,
    /// 렌더링 단계 사이 간격
    pub render_tick: Duration,
}

/// `/api/v1` 아래의 전체 라우터
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/lookup", get(auth::lookup));

    let api_routes = Router::new()
        .merge(auth_routes)
        .route(
            "/entries",
            get(list_entries).post(create_entry).delete(clear_entries),
        )
        .route("/newsletter", get(current_newsletter))
        .route("/newsletter/refresh", post(refresh_newsletter))
        .route("/newsletter/render", get(render_newsletter))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}
