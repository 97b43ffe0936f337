//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수(또는 `.env`)에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `API_URL`: 원격 생성기/인증 서비스 기본 URL (기본값: `http://localhost:8000/`)
//! - `HOST`, `PORT`: 서버 바인딩 주소 (기본값: `127.0.0.1:3000`)
//! - `RENDER_TICK_MS`: 렌더링 단계 간격 (기본값: 40ms)
//! - `NEWSLETTER_ANCHOR_WEEKDAY`, `NEWSLETTER_ANCHOR_HOUR`: 신선도 창 기준 (기본값: 일요일 9시)
//! - `NEWSLETTER_UTC_OFFSET_MINUTES`: 기준 시각의 UTC 오프셋 (기본값: 시작 시점의 지역 오프셋)

use chrono::{FixedOffset, Local, Weekday};
use std::{env, time::Duration};

use crate::services::FreshnessWindow;

/// 애플리케이션 전체 설정
///
/// 서버 시작 시 한 번 읽어 온 뒤 변하지 않습니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/ritual.db")
    pub database_url: String,
    /// 항상 `/`로 끝납니다.
    pub api_url: String,
    pub host: String,
    pub port: u16,
    pub render_tick: Duration,
    pub window: FreshnessWindow,
}

impl Config {
    /// 환경변수에서 설정값을 읽습니다.
    ///
    /// `DATABASE_URL`만 필수이고, 나머지는 없거나 해석할 수 없으면 기본값을 씁니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        let mut api_url =
            env::var("API_URL").unwrap_or_else(|_| "http://localhost:8000/".to_string());
        if !api_url.ends_with('/') {
            api_url.push('/');
        }

        let weekday = env::var("NEWSLETTER_ANCHOR_WEEKDAY")
            .ok()
            .and_then(|value| value.parse::<Weekday>().ok())
            .unwrap_or(Weekday::Sun);
        let hour = env::var("NEWSLETTER_ANCHOR_HOUR")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(9);
        let offset = env::var("NEWSLETTER_UTC_OFFSET_MINUTES")
            .ok()
            .and_then(|value| value.parse::<i32>().ok())
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(|| *Local::now().offset());

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            api_url,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            render_tick: Duration::from_millis(
                env::var("RENDER_TICK_MS")
                    .ok()
                    .and_then(|value| value.parse::<u64>().ok())
                    .filter(|ms| *ms > 0)
                    .unwrap_or(40),
            ),
            window: FreshnessWindow::new(weekday, hour, offset),
        })
    }
}
