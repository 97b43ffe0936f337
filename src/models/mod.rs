//! # 데이터 모델 모듈
//!
//! 저장소가 다루는 세 컬렉션의 레코드와 뉴스레터 문서 트리를 정의합니다:
//! - `entry`: 저널 엔트리
//! - `user`: 원격 계정의 로컬 투영
//! - `newsletter`: 생성된 뉴스레터
//! - `document`: 뉴스레터 본문 트리 (`DocumentNode`)

use chrono::{DateTime, SubsecRound, Utc};

pub mod document;
pub mod entry;
pub mod newsletter;
pub mod user;

pub use document::*;
pub use entry::*;
pub use newsletter::*;
pub use user::*;

/// 저장 포맷(밀리초 정밀도)에 맞춰 잘라낸 현재 시각.
/// 저장 후 다시 읽어도 같은 값이 나오도록 모든 생성 시각은 이 함수를 거칩니다.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
