//! # 뉴스레터 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/newsletter`         → 저장된 최신 뉴스레터 (생성하지 않음)
//! - `POST /api/v1/newsletter/refresh` → 이번 주 뉴스레터를 보장 (필요하면 생성)
//! - `GET  /api/v1/newsletter/render`  → 본문 문서를 단계별 SSE 이벤트로 재생
//!
//! ## SSE 이벤트
//! ```text
//! event: step
//! data: {"op":"create_element","id":0,"parent":null,"tag":"p","attributes":{}}
//!
//! event: step
//! data: {"op":"append_text","parent":0,"text":" hi"}
//!
//! event: done
//! data: 2
//! ```

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures_util::stream::{self, Stream};
use serde_json::{json, Value};

use super::AppState;
use crate::{
    db,
    error::AppError,
    middleware::BearerToken,
    services::renderer::{RenderStep, RenderSteps, MIN_TICK},
};

/// `GET /newsletter`: `{ "newsletter": Newsletter | null }`
pub async fn current_newsletter(State(state): State<AppState>) -> Json<Value> {
    let newsletter = state.cache.peek_if_exists().await;
    Json(json!({ "newsletter": newsletter }))
}

/// `POST /newsletter/refresh`
///
/// 엔트리가 하나도 없으면 생성기를 부르지 않고 400을 돌려줍니다.
/// 생성이 실패하면 에러 대신 204로 "이번에는 없음"을 알립니다.
pub async fn refresh_newsletter(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Response, AppError> {
    let entries = db::list_entries(&state.store).await?;
    if entries.is_empty() {
        return Err(AppError::BadRequest(
            "At least one entry is required to build a newsletter".to_string(),
        ));
    }

    match state.cache.get_current_or_refresh(&token, &entries).await {
        Some(newsletter) => Ok(Json(newsletter).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

fn step_event(step: &RenderStep) -> Result<Event, axum::Error> {
    Event::default().event("step").json_data(step)
}

/// `GET /newsletter/render`
///
/// 연결이 끊기면 스트림이 drop되면서 재생도 멈춥니다.
pub async fn render_newsletter(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let document = state
        .cache
        .peek_if_exists()
        .await
        .and_then(|newsletter| newsletter.html)
        .ok_or(AppError::NotFound)?;

    // 스트림이 'static이어야 하므로 단계를 미리 모아 둡니다.
    let steps: Vec<RenderStep> = RenderSteps::new(&document).collect();
    let total = steps.len();
    let interval = tokio::time::interval(state.render_tick.max(MIN_TICK));

    let events = stream::unfold(
        (steps.into_iter(), interval, false),
        move |(mut steps, mut interval, finished)| async move {
            if finished {
                return None;
            }
            interval.tick().await;
            match steps.next() {
                Some(step) => Some((step_event(&step), (steps, interval, false))),
                None => {
                    tracing::debug!(steps = total, "render stream finished");
                    let done = Event::default().event("done").data(total.to_string());
                    Some((Ok(done), (steps, interval, true)))
                }
            }
        },
    );

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
