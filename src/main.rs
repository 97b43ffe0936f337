//! # Ritual 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 로컬 저장소 열기 (마이그레이션 포함)
//! 4. 원격 생성기/인증 클라이언트와 뉴스레터 캐시 구성
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

use anyhow::Result;
use ritual::{
    config::Config,
    db::StoreCell,
    routes::{self, AppState},
    services::{AuthClient, HttpGenerator, NewsletterCache},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 ritual, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ritual=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting Ritual server on {}:{}", config.host, config.port);

    // 저장소는 세션 전체에서 하나만 열고 AppState로 공유합니다.
    let cell = StoreCell::new(config.database_url.clone());
    let store = match cell.open().await {
        Ok(store) => store.clone(),
        Err(e) => {
            tracing::error!(error = %e, "failed to open local store");
            return Err(e.into());
        }
    };

    let generator = HttpGenerator::new(&config.api_url)?;
    let cache = NewsletterCache::new(store.clone(), Arc::new(generator), config.window);
    tracing::info!(
        api_url = %config.api_url,
        offset = %config.window.offset(),
        "newsletter cache ready"
    );

    let state = AppState {
        store,
        cache,
        auth: AuthClient::new(config.api_url.clone())?,
        render_tick: config.render_tick,
    };

    // 개발 환경에서는 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
