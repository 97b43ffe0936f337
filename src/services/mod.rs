//! # 서비스 계층
//!
//! DB 접근 위에서 동작하는 비즈니스 로직과 외부 협력자 클라이언트입니다.
//!
//! - `freshness`: 주간 신선도 창 계산
//! - `generator`: 원격 뉴스레터 생성기
//! - `newsletter`: 창 단위 뉴스레터 캐시
//! - `renderer`: 단어 단위 점진적 렌더링
//! - `auth`: 원격 인증 클라이언트

pub mod auth;
pub mod freshness;
pub mod generator;
pub mod newsletter;
pub mod renderer;

pub use auth::{AuthClient, AuthError};
pub use freshness::FreshnessWindow;
pub use generator::{
    DocumentGenerator, GenerationError, GenerationRequest, GenerationResponse, HttpGenerator,
};
pub use newsletter::{CacheState, NewsletterCache};
pub use renderer::{play, render_now, ElementTree, RenderStep, RenderSteps, Surface};
