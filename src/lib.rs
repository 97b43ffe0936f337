//! # Ritual
//!
//! 저널 클라이언트 코어입니다.
//!
//! - `db`: 스키마가 진화하는 로컬 SQLite 저장소
//! - `services`: 주간 뉴스레터 캐시, 원격 생성기/인증 클라이언트, 점진적 렌더러
//! - `routes`: 위 기능을 노출하는 로컬 HTTP API

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
